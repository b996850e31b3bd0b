pub mod angle;
pub mod gate;
pub mod keypoint;

pub use angle::angle_at;
pub use gate::{LandmarkGate, SignalIssue};
pub use keypoint::{Detection, Keypoint, LandmarkIndex, PoseFrame};
