pub mod session;
pub mod tracing;

pub use session::{TestSession, fixture_path};
pub use tracing::{CapturedEvent, capture_events};
