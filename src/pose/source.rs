use anyhow::Result;

use super::frame::{Frame, PixelFormat};

/// Source of camera frames. Returning `None` means the stream has ended and
/// the pipeline should shut down.
pub trait FrameSource {
    fn capture(&mut self) -> Result<Option<Frame>>;
}

/// Test-pattern source standing in for a real camera: emits flat sRGB frames
/// at a fixed size, with the shade cycling so consecutive frames differ.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    shade: u8,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shade: 0,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn capture(&mut self) -> Result<Option<Frame>> {
        self.shade = self.shade.wrapping_add(1);
        Ok(Some(Frame::filled(
            self.width,
            self.height,
            PixelFormat::Srgb8,
            self.shade,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_frames_vary() {
        let mut source = SyntheticSource::new(8, 8);
        let a = source.capture().unwrap().unwrap();
        let b = source.capture().unwrap().unwrap();
        assert_eq!(a.width, 8);
        assert_ne!(a.pixels[0], b.pixels[0]);
    }
}
