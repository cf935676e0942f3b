use anyhow::Result;
use nalgebra::{Matrix4, Rotation3};

use super::frame::Frame;

/// Score for one face blendshape category. Carried through for callers that
/// want it; the direction policy never reads the values.
#[derive(Debug, Clone, PartialEq)]
pub struct Blendshape {
    pub name: String,
    pub score: f32,
}

/// Output of the face model for one frame: the 4x4 facial transformation
/// matrix (its top-left 3x3 is the rotation) plus any blendshape scores.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceTransform {
    pub matrix: Matrix4<f64>,
    pub blendshapes: Vec<Blendshape>,
}

impl FaceTransform {
    pub fn from_rotation(rotation: Rotation3<f64>) -> Self {
        Self {
            matrix: rotation.to_homogeneous(),
            blendshapes: Vec::new(),
        }
    }
}

/// The opaque face-landmark model. Implementations detect at most one face
/// per frame and report its transformation matrix, or `None` when no face
/// is found.
pub trait FaceModel {
    fn detect(&mut self, frame: &Frame) -> Result<Option<FaceTransform>>;
}

/// Stand-in model that cycles through a scripted sequence of head poses,
/// holding each for a number of frames. Keeps the pipeline runnable end to
/// end without the real landmark model, which lives behind the trait.
pub struct ScriptedModel {
    /// (pitch, yaw) pairs in degrees.
    poses: Vec<(f64, f64)>,
    hold_frames: u32,
    index: usize,
    remaining: u32,
}

impl ScriptedModel {
    pub fn new(poses: Vec<(f64, f64)>, hold_frames: u32) -> Self {
        Self {
            poses,
            hold_frames: hold_frames.max(1),
            index: 0,
            remaining: hold_frames.max(1),
        }
    }

    /// A slow sweep through the four turn quadrants with forward rests
    /// between them.
    pub fn sweep() -> Self {
        Self::new(
            vec![
                (0.0, 0.0),
                (0.0, 25.0),  // look left
                (0.0, 0.0),
                (0.0, -25.0), // look right
                (0.0, 0.0),
                (-25.0, 0.0), // look up
                (0.0, 0.0),
                (25.0, 0.0),  // look down
            ],
            15,
        )
    }
}

impl FaceModel for ScriptedModel {
    fn detect(&mut self, _frame: &Frame) -> Result<Option<FaceTransform>> {
        let Some(&(pitch, yaw)) = self.poses.get(self.index) else {
            return Ok(None); // empty script reads as "no face"
        };

        self.remaining -= 1;
        if self.remaining == 0 {
            self.index = (self.index + 1) % self.poses.len();
            self.remaining = self.hold_frames;
        }

        // nalgebra's euler order is x, y, z: pitch is about x, yaw about y.
        let rotation = Rotation3::from_euler_angles(pitch.to_radians(), yaw.to_radians(), 0.0);
        Ok(Some(FaceTransform::from_rotation(rotation)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::frame::PixelFormat;

    #[test]
    fn test_scripted_model_advances_after_hold() {
        let frame = Frame::filled(2, 2, PixelFormat::Srgb8, 0);
        let mut model = ScriptedModel::new(vec![(0.0, 0.0), (0.0, 25.0)], 2);

        let first = model.detect(&frame).unwrap().unwrap();
        let second = model.detect(&frame).unwrap().unwrap();
        let third = model.detect(&frame).unwrap().unwrap();

        assert_eq!(first.matrix, second.matrix);
        assert_ne!(second.matrix, third.matrix);
    }

    #[test]
    fn test_empty_script_reports_no_face() {
        let frame = Frame::filled(2, 2, PixelFormat::Srgb8, 0);
        let mut model = ScriptedModel::new(Vec::new(), 1);
        assert!(model.detect(&frame).unwrap().is_none());
    }
}
