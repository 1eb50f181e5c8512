//! Timer session state machine.
//!
//! A session binds one task to one [`PhaseConfig`] and counts down a work
//! phase followed by a break phase. Like the rest of the core it has no
//! thread of its own: whoever drives it calls [`TimerSession::tick`] once per
//! elapsed second (see [`super::TimerRegistry`] for the tokio driver).
//!
//! ## State Transitions
//!
//! ```text
//! Idle ──start──> Running ──pause──> Paused ──resume──> Running
//!                    │
//!                    └─ break phase ends ──> Completed ──start──> Running
//!
//! any ──cancel──> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = TimerSession::new(&task, Preset::Pomodoro.config());
//! session.start();
//! // Once per second:
//! for event in session.tick() { /* ... */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::phase::{Phase, PhaseConfig};
use crate::events::SessionEvent;
use crate::task::{Task, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Never started, or cancelled.
    Idle,
    Running,
    Paused,
    /// One full work + break cycle finished; stopped until started again.
    Completed,
}

/// Point-in-time view of a session for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub task_id: TaskId,
    pub task_title: String,
    pub config_name: String,
    pub state: SessionState,
    pub phase: Phase,
    pub remaining_secs: u64,
    pub phase_total_secs: u64,
}

/// Countdown bound to one task.
#[derive(Debug, Clone)]
pub struct TimerSession {
    task_id: TaskId,
    task_title: String,
    config: PhaseConfig,
    state: SessionState,
    phase: Phase,
    remaining_secs: u64,
    /// Bumped on every transition into Running. Lets a driver tell whether
    /// the run it was started for is still the current one.
    run_epoch: u64,
}

impl TimerSession {
    /// New idle session armed with the full work duration.
    pub fn new(task: &Task, config: PhaseConfig) -> Self {
        Self {
            task_id: task.id,
            task_title: task.title.clone(),
            remaining_secs: config.work_secs(),
            config,
            state: SessionState::Idle,
            phase: Phase::Work,
            run_epoch: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn task_title(&self) -> &str {
        &self.task_title
    }

    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_work_phase(&self) -> bool {
        self.phase == Phase::Work
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn run_epoch(&self) -> u64 {
        self.run_epoch
    }

    pub fn phase_total_secs(&self) -> u64 {
        self.config.duration_secs(self.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        let total = self.phase_total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    pub fn phase_label(&self) -> &'static str {
        self.phase.label()
    }

    /// Remaining time as `MM:SS`. Minutes are not wrapped into hours.
    pub fn formatted_time(&self) -> String {
        format_clock(self.remaining_secs)
    }

    /// `<title> - <phase>: MM:SS`
    pub fn status_line(&self) -> String {
        format!(
            "{} - {}: {}",
            self.task_title,
            self.phase_label(),
            self.formatted_time()
        )
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            task_id: self.task_id,
            task_title: self.task_title.clone(),
            config_name: self.config.name().to_string(),
            state: self.state,
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            phase_total_secs: self.phase_total_secs(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Idle, Paused or Completed -> Running. No-op when already running.
    pub fn start(&mut self) -> Option<SessionEvent> {
        match self.state {
            SessionState::Running => None,
            SessionState::Idle | SessionState::Paused | SessionState::Completed => {
                self.enter_running();
                info!(task = %self.task_id, config = self.config.name(), "timer started");
                Some(SessionEvent::Started {
                    task_id: self.task_id,
                    phase: self.phase,
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
        }
    }

    /// Running -> Paused. Remaining time is frozen.
    pub fn pause(&mut self) -> Option<SessionEvent> {
        if self.state != SessionState::Running {
            return None;
        }
        self.state = SessionState::Paused;
        debug!(task = %self.task_id, remaining = self.remaining_secs, "timer paused");
        Some(SessionEvent::Paused {
            task_id: self.task_id,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Paused -> Running only.
    pub fn resume(&mut self) -> Option<SessionEvent> {
        if self.state != SessionState::Paused {
            return None;
        }
        self.enter_running();
        debug!(task = %self.task_id, remaining = self.remaining_secs, "timer resumed");
        Some(SessionEvent::Resumed {
            task_id: self.task_id,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Any state -> Idle, re-armed at the start of the work phase.
    /// Idempotent; only the first call reports an event.
    pub fn cancel(&mut self) -> Option<SessionEvent> {
        let already_idle = self.state == SessionState::Idle
            && self.phase == Phase::Work
            && self.remaining_secs == self.config.work_secs();
        self.state = SessionState::Idle;
        self.phase = Phase::Work;
        self.remaining_secs = self.config.work_secs();
        if already_idle {
            return None;
        }
        info!(task = %self.task_id, "timer cancelled");
        Some(SessionEvent::Cancelled {
            task_id: self.task_id,
            at: Utc::now(),
        })
    }

    /// Re-arm the current phase to its full duration. Running/paused state
    /// is untouched, so a running countdown carries on from the new value.
    pub fn reset(&mut self) -> Option<SessionEvent> {
        self.remaining_secs = self.phase_total_secs();
        debug!(task = %self.task_id, phase = %self.phase, "phase reset");
        Some(SessionEvent::Reset {
            task_id: self.task_id,
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Swap the configuration and restart at the work phase, keeping the
    /// running/paused state. A running session gets a new run epoch so its
    /// driver restarts the one-second cadence.
    pub fn change_config(&mut self, config: PhaseConfig) -> Option<SessionEvent> {
        self.config = config;
        self.phase = Phase::Work;
        self.remaining_secs = self.config.work_secs();
        if self.state == SessionState::Running {
            self.enter_running();
        }
        info!(task = %self.task_id, config = self.config.name(), "timer configuration changed");
        Some(SessionEvent::ConfigChanged {
            task_id: self.task_id,
            config_name: self.config.name().to_string(),
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Advance by one second. Does nothing unless running.
    ///
    /// Decrements a non-zero countdown first; if the countdown is then at
    /// zero the phase completes within the same tick. Finishing the break
    /// ends the cycle and stops the session.
    pub fn tick(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.state != SessionState::Running {
            return events;
        }
        let at = Utc::now();

        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            events.push(SessionEvent::Tick {
                task_id: self.task_id,
                remaining_secs: self.remaining_secs,
                at,
            });
        }

        if self.remaining_secs == 0 {
            let was_work_phase = self.is_work_phase();
            events.push(SessionEvent::PhaseCompleted {
                task_id: self.task_id,
                was_work_phase,
                at,
            });
            debug!(task = %self.task_id, was_work_phase, "phase complete");

            if was_work_phase {
                self.phase = Phase::Break;
                self.remaining_secs = self.config.break_secs();
            } else {
                self.phase = Phase::Work;
                self.remaining_secs = self.config.work_secs();
                self.state = SessionState::Completed;
                info!(task = %self.task_id, "timer cycle complete");
                events.push(SessionEvent::CycleCompleted {
                    task_id: self.task_id,
                    at,
                });
            }
        }

        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter_running(&mut self) {
        self.state = SessionState::Running;
        self.run_epoch = self.run_epoch.wrapping_add(1);
    }
}

/// `MM:SS` for a second count.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
