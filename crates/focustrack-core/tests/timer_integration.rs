//! Integration tests for the timer registry driving task bookkeeping.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use focustrack_core::{
    MemoryStore, PhaseConfig, SessionEvent, SessionState, TaskManager, TimerListener,
    TimerRegistry,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Listener that counts finished work phases into the shared task list and
/// forwards every event to the test.
struct CycleCounter {
    manager: Arc<Mutex<TaskManager>>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl TimerListener for CycleCounter {
    fn on_event(&mut self, event: &SessionEvent) {
        if let SessionEvent::PhaseCompleted {
            task_id,
            was_work_phase: true,
            ..
        } = event
        {
            self.manager.lock().unwrap().increment_cycles(*task_id);
        }
        let _ = self.events.send(event.clone());
    }
}

async fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut seen = Vec::new();
    while let Ok(Some(event)) = tokio::time::timeout(Duration::from_secs(30), rx.recv()).await {
        seen.push(event);
    }
    seen
}

#[tokio::test(start_paused = true)]
async fn test_work_completion_increments_task_cycles() {
    let manager = Arc::new(Mutex::new(TaskManager::new()));
    let task = manager.lock().unwrap().add("Write report", "").unwrap().clone();

    let registry = TimerRegistry::new(Handle::current());
    let handle = registry.start_timer(&task, PhaseConfig::new("tiny", "", 2, 1).unwrap());
    let (tx, mut rx) = mpsc::unbounded_channel();
    handle.set_listener(CycleCounter {
        manager: Arc::clone(&manager),
        events: tx,
    });

    let seen = drain(&mut rx).await;
    let ticks: Vec<u64> = seen
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Tick { remaining_secs, .. } => Some(*remaining_secs),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![1, 0, 0]);
    assert_eq!(handle.state(), SessionState::Completed);
    assert_eq!(manager.lock().unwrap().get(0).unwrap().completed_cycles(), 1);

    // Another cycle on the same session counts again.
    registry.start(task.id).unwrap();
    drain(&mut rx).await;
    assert_eq!(manager.lock().unwrap().get(0).unwrap().completed_cycles(), 2);

    let store = MemoryStore::new(Vec::new());
    manager.lock().unwrap().save_to(&store).unwrap();
    let reloaded = TaskManager::load_from(&store);
    assert_eq!(reloaded.get(0).unwrap().completed_cycles(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_work_ends_leaves_cycles_untouched() {
    let manager = Arc::new(Mutex::new(TaskManager::new()));
    let task = manager.lock().unwrap().add("Review PR", "").unwrap().clone();

    let registry = TimerRegistry::new(Handle::current());
    let handle = registry.start_timer(&task, PhaseConfig::new("short", "", 3, 1).unwrap());
    let (tx, mut rx) = mpsc::unbounded_channel();
    handle.set_listener(CycleCounter {
        manager: Arc::clone(&manager),
        events: tx,
    });

    rx.recv().await.unwrap();
    rx.recv().await.unwrap();
    registry.cancel(task.id).unwrap();

    assert!(drain(&mut rx).await.is_empty());
    assert!(!registry.has_active_timer(task.id));
    assert_eq!(manager.lock().unwrap().get(0).unwrap().completed_cycles(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_independent_timers_per_task() {
    let mut manager = TaskManager::new();
    let a = manager.add("A", "").unwrap().clone();
    let b = manager.add("B", "").unwrap().clone();

    let registry = TimerRegistry::new(Handle::current());
    let ha = registry.start_timer(&a, PhaseConfig::new("a", "", 5, 1).unwrap());
    let hb = registry.start_timer(&b, PhaseConfig::new("b", "", 5, 1).unwrap());
    let (tx, mut rx) = mpsc::unbounded_channel();
    hb.set_listener(move |e: &SessionEvent| {
        let _ = tx.send(e.clone());
    });

    registry.pause(a.id).unwrap();
    rx.recv().await.unwrap();
    rx.recv().await.unwrap();

    assert_eq!(ha.remaining_secs(), 5);
    assert_eq!(hb.remaining_secs(), 3);
    assert!(!registry.has_active_timer(a.id));
    assert!(registry.has_active_timer(b.id));
}
