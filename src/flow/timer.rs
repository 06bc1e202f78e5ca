//! Scheduled, cancellable stage transitions tied to a session

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::messages::FlowEvent;
use super::{FlowStage, SessionId};

/// What happens when a delay elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move to a stage whose message is already in place
    Reveal(FlowStage),
    /// Leave for the garden view
    HandOff,
}

/// Timers owned by the controller; aborted when a new session starts
#[derive(Default)]
pub(crate) struct TransitionTimers {
    handles: Vec<JoinHandle<()>>,
}

impl TransitionTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post `TransitionDue` for `session` back to the controller after `delay`
    pub fn schedule(
        &mut self,
        events: mpsc::Sender<FlowEvent>,
        session: SessionId,
        delay: Duration,
        transition: Transition,
    ) {
        debug!(%session, ?delay, ?transition, "schedule: called");
        self.handles.retain(|h| !h.is_finished());
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(FlowEvent::TransitionDue { session, transition }).await;
        });
        self.handles.push(handle);
    }

    /// Abort every timer that has not fired yet
    pub fn cancel_all(&mut self) -> usize {
        let mut cancelled = 0;
        for handle in self.handles.drain(..) {
            if !handle.is_finished() {
                cancelled += 1;
            }
            handle.abort();
        }
        if cancelled > 0 {
            debug!(cancelled, "cancel_all: aborted pending transitions");
        }
        cancelled
    }
}

impl Drop for TransitionTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scheduled_transition_fires_with_session() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut timers = TransitionTimers::new();

        timers.schedule(tx, SessionId(7), Duration::from_millis(5), Transition::HandOff);

        match rx.recv().await.unwrap() {
            FlowEvent::TransitionDue { session, transition } => {
                assert_eq!(session, SessionId(7));
                assert_eq!(transition, Transition::HandOff);
            }
            other => panic!("Expected TransitionDue, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancelled_transition_never_fires() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut timers = TransitionTimers::new();

        timers.schedule(
            tx,
            SessionId(1),
            Duration::from_millis(20),
            Transition::Reveal(FlowStage::MoodSelect),
        );
        assert_eq!(timers.cancel_all(), 1);

        let result = tokio::time::timeout(Duration::from_millis(60), rx.recv()).await;
        // Either nothing arrives or the channel closes because the task was dropped
        assert!(matches!(result, Err(_) | Ok(None)));
    }
}
