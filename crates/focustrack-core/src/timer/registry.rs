//! Per-task timer ownership and the tokio tick driver.
//!
//! The registry maps a [`TaskId`] to at most one live session. Each running
//! session has its own ticker task on the registry's runtime that calls
//! [`TimerSession::tick`] once a second and hands the resulting events to the
//! session's listener.
//!
//! Besides the countdown, the listener also hears `Reset` and `ConfigChanged`,
//! delivered by the control call itself so the display can refresh.
//!
//! Locking: the map and each session have their own `std::sync::Mutex`, and
//! the map lock is never held while a session lock is taken. The ticker ticks
//! and notifies while holding the session lock, so a control call that has
//! returned (pause, cancel) is never followed by a stale callback.
//! `start_timer` holds the new session's lock while it cancels the session
//! it replaces; the new one is not yet reachable by any ticker.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, trace};

use super::phase::PhaseConfig;
use super::session::{SessionSnapshot, SessionState, TimerSession};
use crate::events::{SessionEvent, TimerListener};
use crate::task::{Task, TaskId};

const TICK_PERIOD: Duration = Duration::from_secs(1);

struct LiveSession {
    session: TimerSession,
    listener: Option<Box<dyn TimerListener>>,
    ticker: Option<JoinHandle<()>>,
}

impl LiveSession {
    fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    fn notify(&mut self, event: &SessionEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_event(event);
        }
    }
}

/// Shared handle to a registered session.
///
/// Cloning is cheap; all clones refer to the same session.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<LiveSession>>,
}

impl SessionHandle {
    fn new(session: TimerSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LiveSession {
                session,
                listener: None,
                ticker: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LiveSession> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach the listener that receives this session's countdown events,
    /// replacing any previous one.
    pub fn set_listener(&self, listener: impl TimerListener + 'static) {
        self.lock().listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&self) {
        self.lock().listener = None;
    }

    /// Run `f` against the session under its lock.
    pub fn with<R>(&self, f: impl FnOnce(&TimerSession) -> R) -> R {
        f(&self.lock().session)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.with(TimerSession::snapshot)
    }

    pub fn task_id(&self) -> TaskId {
        self.with(TimerSession::task_id)
    }

    pub fn state(&self) -> SessionState {
        self.with(TimerSession::state)
    }

    pub fn is_running(&self) -> bool {
        self.with(TimerSession::is_running)
    }

    pub fn remaining_secs(&self) -> u64 {
        self.with(TimerSession::remaining_secs)
    }

    pub fn config(&self) -> PhaseConfig {
        self.with(|s| s.config().clone())
    }

    pub fn status_line(&self) -> String {
        self.with(TimerSession::status_line)
    }

    fn ptr_eq(&self, other: &SessionHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("session", &self.lock().session)
            .finish_non_exhaustive()
    }
}

/// Owner of the task -> session mapping.
///
/// Explicitly constructed by the entry point and shared by reference (or
/// `Arc`) with whoever needs to control timers.
pub struct TimerRegistry {
    runtime: Handle,
    sessions: Mutex<HashMap<TaskId, SessionHandle>>,
}

impl TimerRegistry {
    /// Tickers are spawned on `runtime`.
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn map(&self) -> MutexGuard<'_, HashMap<TaskId, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get(&self, task_id: TaskId) -> Option<SessionHandle> {
        self.map().get(&task_id).cloned()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self, task_id: TaskId) -> Option<SessionHandle> {
        self.get(task_id)
    }

    /// True iff the task has a session and it is running.
    pub fn has_active_timer(&self, task_id: TaskId) -> bool {
        self.get(task_id).is_some_and(|h| h.is_running())
    }

    /// Number of registered sessions, running or not.
    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    /// Snapshots of running sessions, ordered by task title.
    pub fn active_sessions(&self) -> Vec<SessionSnapshot> {
        let handles: Vec<SessionHandle> = self.map().values().cloned().collect();
        let mut active: Vec<SessionSnapshot> = handles
            .iter()
            .map(SessionHandle::snapshot)
            .filter(|s| s.state == SessionState::Running)
            .collect();
        active.sort_by(|a, b| a.task_title.cmp(&b.task_title));
        active
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a fresh session for `task`, cancelling any session it already
    /// has before the new one runs. Returns the handle so the caller can
    /// attach a listener; the first tick arrives one period later.
    pub fn start_timer(&self, task: &Task, config: PhaseConfig) -> SessionHandle {
        let handle = SessionHandle::new(TimerSession::new(task, config));
        {
            // Callers that find the new handle in the map wait here until it
            // has started.
            let mut live = handle.lock();
            let previous = self.map().insert(task.id, handle.clone());
            if let Some(previous) = previous {
                debug!(task = %task.id, "replacing existing timer");
                cancel_live(&mut previous.lock());
            }
            live.session.start();
            self.spawn_ticker(&handle, &mut live);
        }
        handle
    }

    /// Start an existing session again (after pause or a completed cycle).
    pub fn start(&self, task_id: TaskId) -> Option<SessionEvent> {
        let handle = self.get(task_id)?;
        let mut live = handle.lock();
        let event = live.session.start()?;
        self.spawn_ticker(&handle, &mut live);
        Some(event)
    }

    pub fn pause(&self, task_id: TaskId) -> Option<SessionEvent> {
        let handle = self.get(task_id)?;
        let mut live = handle.lock();
        let event = live.session.pause()?;
        live.stop_ticker();
        Some(event)
    }

    pub fn resume(&self, task_id: TaskId) -> Option<SessionEvent> {
        let handle = self.get(task_id)?;
        let mut live = handle.lock();
        let event = live.session.resume()?;
        self.spawn_ticker(&handle, &mut live);
        Some(event)
    }

    /// Cancel and unregister the task's session.
    pub fn cancel(&self, task_id: TaskId) -> Option<SessionEvent> {
        let handle = self.map().remove(&task_id)?;
        let mut live = handle.lock();
        cancel_live(&mut live)
    }

    /// Re-arm the current phase. The `Reset` event goes to the listener as
    /// well as the caller; no `Tick` is emitted.
    pub fn reset(&self, task_id: TaskId) -> Option<SessionEvent> {
        let handle = self.get(task_id)?;
        let mut live = handle.lock();
        let event = live.session.reset()?;
        live.notify(&event);
        Some(event)
    }

    /// Swap the phase configuration. A running session restarts its
    /// one-second cadence from the new work duration. The listener hears
    /// `ConfigChanged` before any tick of the new configuration.
    pub fn change_config(&self, task_id: TaskId, config: PhaseConfig) -> Option<SessionEvent> {
        let handle = self.get(task_id)?;
        let mut live = handle.lock();
        let event = live.session.change_config(config)?;
        live.notify(&event);
        if live.session.is_running() {
            self.spawn_ticker(&handle, &mut live);
        }
        Some(event)
    }

    /// Cancel and drop every session.
    pub fn clear_all(&self) {
        let drained: Vec<SessionHandle> = self.map().drain().map(|(_, h)| h).collect();
        for handle in &drained {
            cancel_live(&mut handle.lock());
        }
        debug!(count = drained.len(), "cleared all timers");
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Replace the session's ticker with one bound to its current run epoch.
    fn spawn_ticker(&self, handle: &SessionHandle, live: &mut LiveSession) {
        live.stop_ticker();
        let epoch = live.session.run_epoch();
        let weak: Weak<Mutex<LiveSession>> = Arc::downgrade(&handle.inner);
        let first = Instant::now() + TICK_PERIOD;

        live.ticker = Some(self.runtime.spawn(async move {
            let mut interval = time::interval_at(first, TICK_PERIOD);
            loop {
                interval.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                let mut guard = inner.lock().unwrap_or_else(PoisonError::into_inner);
                let live = &mut *guard;
                if live.session.run_epoch() != epoch || !live.session.is_running() {
                    break;
                }

                let events = live.session.tick();
                trace!(
                    task = %live.session.task_id(),
                    remaining = live.session.remaining_secs(),
                    "tick"
                );
                for event in &events {
                    live.notify(event);
                }
                if !live.session.is_running() {
                    break;
                }
            }
        }));
    }
}

fn cancel_live(live: &mut LiveSession) -> Option<SessionEvent> {
    live.stop_ticker();
    live.session.cancel()
}

impl Drop for TimerRegistry {
    fn drop(&mut self) {
        self.clear_all();
    }
}

impl std::fmt::Debug for TimerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("sessions", &self.len())
            .finish_non_exhaustive()
    }
}
