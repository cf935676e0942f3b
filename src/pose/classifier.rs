use nalgebra::Matrix3;
use std::fmt;
use tracing::debug;

use super::frame::Frame;
use super::model::FaceModel;

/// Angular dead zone in degrees: rotation below this threshold on both axes
/// is classified as facing forward.
pub const DEAD_ZONE_DEG: f64 = 15.0;

/// Below this the decomposition is at the gimbal-lock singularity and the
/// alternate formula applies.
const GIMBAL_EPSILON: f64 = 1e-6;

/// Qualitative head direction. `Forward` is emitted alone when no axis
/// clears the dead zone or no face is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadDirection {
    Up,
    Down,
    Left,
    Right,
    Forward,
}

impl HeadDirection {
    /// Lower-case label used on the wire.
    pub fn token(&self) -> &'static str {
        match self {
            HeadDirection::Up => "up",
            HeadDirection::Down => "down",
            HeadDirection::Left => "left",
            HeadDirection::Right => "right",
            HeadDirection::Forward => "forward",
        }
    }
}

impl fmt::Display for HeadDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The qualitative directions read off one frame, horizontal label first.
/// Never empty; at most one horizontal and one vertical entry, or `Forward`
/// alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionSet(Vec<HeadDirection>);

impl DirectionSet {
    pub fn forward() -> Self {
        Self(vec![HeadDirection::Forward])
    }

    /// Apply the dead-zone policy to a pitch/yaw pair in degrees.
    ///
    /// Pitch sign is inverted relative to yaw: turning left gives a positive
    /// yaw, but looking up gives a negative pitch.
    pub fn from_angles(pitch: f64, yaw: f64) -> Self {
        let mut directions = Vec::with_capacity(2);

        if yaw < -DEAD_ZONE_DEG {
            directions.push(HeadDirection::Right);
        } else if yaw > DEAD_ZONE_DEG {
            directions.push(HeadDirection::Left);
        }
        if pitch < -DEAD_ZONE_DEG {
            directions.push(HeadDirection::Up);
        } else if pitch > DEAD_ZONE_DEG {
            directions.push(HeadDirection::Down);
        }

        if directions.is_empty() {
            directions.push(HeadDirection::Forward);
        }
        Self(directions)
    }

    pub fn iter(&self) -> impl Iterator<Item = HeadDirection> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[HeadDirection] {
        &self.0
    }
}

/// Euler angles (pitch, yaw, roll) in degrees from a rotation matrix, using
/// the aerospace x-y-z decomposition with a guard for the gimbal-lock
/// singularity.
pub fn euler_angles(rotation: &Matrix3<f64>) -> (f64, f64, f64) {
    let sy = (rotation[(0, 0)].powi(2) + rotation[(1, 0)].powi(2)).sqrt();

    let (pitch, yaw, roll) = if sy >= GIMBAL_EPSILON {
        (
            rotation[(2, 1)].atan2(rotation[(2, 2)]),
            (-rotation[(2, 0)]).atan2(sy),
            rotation[(1, 0)].atan2(rotation[(0, 0)]),
        )
    } else {
        (
            (-rotation[(1, 2)]).atan2(rotation[(1, 1)]),
            (-rotation[(2, 0)]).atan2(sy),
            0.0,
        )
    };

    (pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}

/// Wraps the opaque face model and turns frames into direction sets.
pub struct HeadPoseClassifier<M> {
    model: M,
}

impl<M: FaceModel> HeadPoseClassifier<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Classify one frame. A frame without a face, or a model failure, reads
    /// as facing forward; neither is an error.
    pub fn classify(&mut self, frame: &Frame) -> DirectionSet {
        let transform = match self.model.detect(frame) {
            Ok(Some(transform)) => transform,
            Ok(None) => return DirectionSet::forward(),
            Err(err) => {
                debug!(%err, "face detection failed");
                return DirectionSet::forward();
            }
        };

        let rotation = transform.matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let (pitch, yaw, _roll) = euler_angles(&rotation);
        debug!(pitch, yaw, "head pose");
        DirectionSet::from_angles(pitch, yaw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::frame::PixelFormat;
    use crate::pose::model::FaceTransform;
    use anyhow::anyhow;
    use nalgebra::Rotation3;

    struct FixedPose {
        pitch: f64,
        yaw: f64,
    }

    impl FaceModel for FixedPose {
        fn detect(&mut self, _frame: &Frame) -> anyhow::Result<Option<FaceTransform>> {
            Ok(Some(FaceTransform::from_rotation(
                Rotation3::from_euler_angles(self.pitch.to_radians(), self.yaw.to_radians(), 0.0),
            )))
        }
    }

    struct NoFace;

    impl FaceModel for NoFace {
        fn detect(&mut self, _frame: &Frame) -> anyhow::Result<Option<FaceTransform>> {
            Ok(None)
        }
    }

    struct Broken;

    impl FaceModel for Broken {
        fn detect(&mut self, _frame: &Frame) -> anyhow::Result<Option<FaceTransform>> {
            Err(anyhow!("model exploded"))
        }
    }

    fn frame() -> Frame {
        Frame::filled(4, 4, PixelFormat::Srgb8, 128)
    }

    fn classify(pitch: f64, yaw: f64) -> Vec<HeadDirection> {
        let mut classifier = HeadPoseClassifier::new(FixedPose { pitch, yaw });
        classifier.classify(&frame()).as_slice().to_vec()
    }

    #[test]
    fn test_dead_zone_policy() {
        assert_eq!(classify(0.0, -16.0), vec![HeadDirection::Right]);
        assert_eq!(classify(0.0, 16.0), vec![HeadDirection::Left]);
        assert_eq!(classify(-16.0, 0.0), vec![HeadDirection::Up]);
        assert_eq!(classify(16.0, 0.0), vec![HeadDirection::Down]);
        assert_eq!(classify(0.0, 0.0), vec![HeadDirection::Forward]);
    }

    #[test]
    fn test_inside_dead_zone_is_forward() {
        assert_eq!(classify(14.0, -14.0), vec![HeadDirection::Forward]);
        assert_eq!(classify(-14.9, 14.9), vec![HeadDirection::Forward]);
    }

    #[test]
    fn test_diagonal_is_horizontal_then_vertical() {
        assert_eq!(
            classify(20.0, 20.0),
            vec![HeadDirection::Left, HeadDirection::Down]
        );
        assert_eq!(
            classify(-20.0, -20.0),
            vec![HeadDirection::Right, HeadDirection::Up]
        );
    }

    #[test]
    fn test_no_face_reads_forward() {
        let mut classifier = HeadPoseClassifier::new(NoFace);
        assert_eq!(classifier.classify(&frame()), DirectionSet::forward());
    }

    #[test]
    fn test_model_failure_reads_forward() {
        let mut classifier = HeadPoseClassifier::new(Broken);
        assert_eq!(classifier.classify(&frame()), DirectionSet::forward());
    }

    #[test]
    fn test_euler_round_trip() {
        let rotation = Rotation3::from_euler_angles(
            10.0_f64.to_radians(),
            -20.0_f64.to_radians(),
            5.0_f64.to_radians(),
        );
        let (pitch, yaw, roll) = euler_angles(rotation.matrix());

        assert!((pitch - 10.0).abs() < 1e-9);
        assert!((yaw + 20.0).abs() < 1e-9);
        assert!((roll - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_gimbal_lock_guard() {
        // Yaw at exactly 90 degrees collapses sy to zero; the alternate
        // formula still recovers pitch and yaw, and roll reads as zero.
        let rotation = Rotation3::from_euler_angles(
            30.0_f64.to_radians(),
            90.0_f64.to_radians(),
            0.0,
        );
        let (pitch, yaw, roll) = euler_angles(rotation.matrix());

        assert!((pitch - 30.0).abs() < 1e-6);
        assert!((yaw - 90.0).abs() < 1e-6);
        assert_eq!(roll, 0.0);
    }
}
