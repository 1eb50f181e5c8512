//! # FocusTrack Core Library
//!
//! Task bookkeeping plus per-task Pomodoro timers. Everything the
//! `focustrack` CLI does goes through this crate.
//!
//! ## Architecture
//!
//! - **Tasks**: an ordered, index-addressed list kept by [`TaskManager`]
//! - **Timer**: [`TimerSession`] is a pure work/break state machine advanced
//!   by `tick()`; [`TimerRegistry`] owns one session per task and drives
//!   running sessions from tokio tickers
//! - **Storage**: a line-oriented text store behind [`TaskStore`] and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TaskManager`]: Task list operations
//! - [`TimerRegistry`]: Per-task timer control
//! - [`TimerListener`]: Countdown callbacks
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod storage;
pub mod task;
pub mod timer;

pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::{SessionEvent, TimerListener};
pub use storage::{Config, MemoryStore, TaskStore, TextFileStore};
pub use task::{Task, TaskId, TaskManager, TaskStatus};
pub use timer::{
    Phase, PhaseConfig, Preset, SessionHandle, SessionSnapshot, SessionState, TimerRegistry,
    TimerSession,
};
