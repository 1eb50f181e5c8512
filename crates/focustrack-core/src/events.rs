use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskId;
use crate::timer::Phase;

/// Every state change of a timer session produces an Event.
/// Lifecycle commands return one; the ticker delivers the countdown ones
/// (`Tick`, `PhaseCompleted`, `CycleCompleted`) to the session's listener.
/// Registry `reset` and `change_config` also hand their `Reset` and
/// `ConfigChanged` events to the listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Started {
        task_id: TaskId,
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Paused {
        task_id: TaskId,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        task_id: TaskId,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Cancelled {
        task_id: TaskId,
        at: DateTime<Utc>,
    },
    /// Current phase re-armed to its full duration.
    Reset {
        task_id: TaskId,
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ConfigChanged {
        task_id: TaskId,
        config_name: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Tick {
        task_id: TaskId,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    PhaseCompleted {
        task_id: TaskId,
        was_work_phase: bool,
        at: DateTime<Utc>,
    },
    /// One full work -> break cycle finished; the session has stopped.
    CycleCompleted {
        task_id: TaskId,
        at: DateTime<Utc>,
    },
}

impl SessionEvent {
    pub fn task_id(&self) -> TaskId {
        match self {
            SessionEvent::Started { task_id, .. }
            | SessionEvent::Paused { task_id, .. }
            | SessionEvent::Resumed { task_id, .. }
            | SessionEvent::Cancelled { task_id, .. }
            | SessionEvent::Reset { task_id, .. }
            | SessionEvent::ConfigChanged { task_id, .. }
            | SessionEvent::Tick { task_id, .. }
            | SessionEvent::PhaseCompleted { task_id, .. }
            | SessionEvent::CycleCompleted { task_id, .. } => *task_id,
        }
    }

    /// Route countdown events to the matching listener callback.
    /// Lifecycle events have no callback and are ignored.
    pub fn notify<L: TimerListener + ?Sized>(&self, listener: &mut L) {
        match self {
            SessionEvent::Tick { remaining_secs, .. } => listener.on_tick(*remaining_secs),
            SessionEvent::PhaseCompleted { was_work_phase, .. } => {
                listener.on_phase_complete(*was_work_phase)
            }
            SessionEvent::CycleCompleted { .. } => listener.on_timer_complete(),
            _ => {}
        }
    }
}

/// Receives countdown events for one session.
///
/// Callbacks run while the session is locked (on the ticker's thread, or on
/// the caller's for `Reset` and `ConfigChanged`), so they arrive in order and
/// never concurrently. Override `on_event` to see those two. Callbacks must
/// not call into the registry or a session handle; forward events through a
/// channel instead.
pub trait TimerListener: Send {
    fn on_tick(&mut self, _remaining_secs: u64) {}

    fn on_phase_complete(&mut self, _was_work_phase: bool) {}

    fn on_timer_complete(&mut self) {}

    /// Entry point used by the ticker.
    fn on_event(&mut self, event: &SessionEvent) {
        event.notify(self);
    }
}

/// Closures see the raw event.
impl<F> TimerListener for F
where
    F: FnMut(&SessionEvent) + Send,
{
    fn on_event(&mut self, event: &SessionEvent) {
        self(event);
    }
}
