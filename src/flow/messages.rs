//! Flow controller messages
//!
//! Commands from the outside world, events the controller posts to itself,
//! and the error type for the handle.

use thiserror::Error;
use tokio::sync::oneshot;

use super::timer::Transition;
use super::{DisplayState, InputOutcome, SessionId};
use crate::domain::{Mood, TaskCategory};
use crate::transcript::Turn;

/// Errors from flow operations
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Channel error")]
    ChannelError,
}

/// Response from flow operations
pub type FlowResponse<T> = Result<T, FlowError>;

/// How a session begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    /// Greet the user and walk through the whole flow
    Fresh,
    /// Jump straight to task selection without calling the model
    SkipToTaskSelect,
}

/// Commands sent to the FlowController actor
#[derive(Debug)]
pub enum FlowCommand {
    Enter {
        mode: EntryMode,
        reply: oneshot::Sender<SessionId>,
    },
    /// The companion view gained focus; `skip` is the consumed route flag
    Focus {
        skip: bool,
        reply: oneshot::Sender<InputOutcome>,
    },

    // Mood carousel
    LayoutMoods {
        width: f64,
        reply: oneshot::Sender<InputOutcome>,
    },
    ScrollMoods {
        offset: f64,
        reply: oneshot::Sender<InputOutcome>,
    },
    HighlightMood {
        mood: Mood,
        reply: oneshot::Sender<InputOutcome>,
    },
    ConfirmMood {
        reply: oneshot::Sender<InputOutcome>,
    },

    // Reflection
    EditReflection {
        text: String,
        reply: oneshot::Sender<InputOutcome>,
    },
    SubmitReflection {
        reply: oneshot::Sender<InputOutcome>,
    },

    SelectTask {
        category: TaskCategory,
        reply: oneshot::Sender<InputOutcome>,
    },

    // Queries
    Snapshot {
        reply: oneshot::Sender<DisplayState>,
    },
    Transcript {
        reply: oneshot::Sender<Vec<Turn>>,
    },

    Shutdown,
}

/// Work finishing in the background, posted back to the controller
#[derive(Debug)]
pub enum FlowEvent {
    CompletionArrived { session: SessionId, reply: String },
    TransitionDue { session: SessionId, transition: Transition },
}
