//! Event system for analysis tasks
//!
//! Tasks report their lifecycle to the window through a channel. Every
//! task emits some progress events followed by exactly one terminal event.

use crossbeam_channel::Sender;
use std::sync::Arc;
use tracing::debug;

/// Identifier assigned to a task when it is submitted
pub type TaskId = u64;

/// Callback used to wake the UI loop after an event was sent
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// What happened inside a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEventKind {
    /// Coarse phase indicator in percent (0-100)
    Progress(u8),
    /// The generated description
    Result(String),
    /// Human readable failure description
    Error(String),
}

impl TaskEventKind {
    /// Whether this event ends the task's lifecycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskEventKind::Result(_) | TaskEventKind::Error(_))
    }
}

/// An event tagged with the task that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEvent {
    pub task_id: TaskId,
    pub kind: TaskEventKind,
}

/// Event emitter handed to a running task
pub struct EventEmitter {
    task_id: TaskId,
    sender: Sender<TaskEvent>,
    waker: Option<Waker>,
}

impl EventEmitter {
    /// Create a new event emitter for one task
    pub fn new(task_id: TaskId, sender: Sender<TaskEvent>, waker: Option<Waker>) -> Self {
        Self {
            task_id,
            sender,
            waker,
        }
    }

    /// Task this emitter reports for
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn progress(&self, percent: u8) {
        self.emit(TaskEventKind::Progress(percent.min(100)));
    }

    pub fn result(&self, text: String) {
        self.emit(TaskEventKind::Result(text));
    }

    pub fn error(&self, message: String) {
        self.emit(TaskEventKind::Error(message));
    }

    /// Send an event to the window and wake it
    pub fn emit(&self, kind: TaskEventKind) {
        let event = TaskEvent {
            task_id: self.task_id,
            kind,
        };

        // The window is gone when the receiver is dropped; nothing left to notify
        if self.sender.send(event).is_err() {
            debug!("Task {} event dropped, receiver closed", self.task_id);
            return;
        }

        if let Some(waker) = &self.waker {
            waker();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_terminal_kinds() {
        assert!(!TaskEventKind::Progress(50).is_terminal());
        assert!(TaskEventKind::Result("ok".into()).is_terminal());
        assert!(TaskEventKind::Error("bad".into()).is_terminal());
    }

    #[test]
    fn test_emitter_tags_events_and_wakes() {
        let (tx, rx) = unbounded();
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        let waker: Waker = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let emitter = EventEmitter::new(7, tx, Some(waker));
        emitter.progress(25);
        emitter.result("a cat".to_string());

        let events: Vec<TaskEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                TaskEvent { task_id: 7, kind: TaskEventKind::Progress(25) },
                TaskEvent { task_id: 7, kind: TaskEventKind::Result("a cat".into()) },
            ]
        );
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_progress_is_clamped() {
        let (tx, rx) = unbounded();
        let emitter = EventEmitter::new(1, tx, None);
        emitter.progress(250);
        assert_eq!(rx.try_recv().unwrap().kind, TaskEventKind::Progress(100));
    }

    #[test]
    fn test_emit_after_receiver_dropped_is_silent() {
        let (tx, rx) = unbounded();
        drop(rx);
        let emitter = EventEmitter::new(1, tx, None);
        emitter.error("gone".to_string());
    }
}
