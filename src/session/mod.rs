pub mod display;
pub mod record;
pub mod state;

pub use display::DisplayPayload;
pub use record::{SessionHistory, SessionRecord};
pub use state::{RepSession, SessionState};
