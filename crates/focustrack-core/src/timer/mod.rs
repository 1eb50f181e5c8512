mod phase;
mod registry;
mod session;

pub use phase::{Phase, PhaseConfig, Preset};
pub use registry::{SessionHandle, TimerRegistry};
pub use session::{format_clock, SessionSnapshot, SessionState, TimerSession};
