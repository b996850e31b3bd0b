pub mod classifier;
pub mod cycle;
pub mod exercise;

pub use classifier::{classify, Readings, SideReading};
pub use cycle::{CyclePhase, LimbSide, LimbState, RepCounter};
pub use exercise::ExerciseKind;
