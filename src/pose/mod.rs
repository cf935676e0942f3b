//! The direction pipeline: latest-value-wins frame handoff, head-pose
//! classification behind an opaque model seam, and the worker thread that
//! links the two. The capture and classification stages share nothing but
//! the two slots.

pub mod classifier;
pub mod frame;
pub mod model;
pub mod slot;
pub mod source;
pub mod worker;

// Re-export commonly used types
pub use classifier::{DirectionSet, HeadDirection, HeadPoseClassifier, DEAD_ZONE_DEG};
pub use frame::{CaptureEvent, Frame, PixelFormat};
pub use model::{Blendshape, FaceModel, FaceTransform, ScriptedModel};
pub use slot::Slot;
pub use source::{FrameSource, SyntheticSource};
pub use worker::spawn_classifier;
