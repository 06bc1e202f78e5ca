//! What the rendering collaborator sees

use serde::Serialize;

use super::FlowStage;
use crate::domain::{CompanionExpression, Mood, SeedId, TaskCategory};

/// Identity of one run through the flow; increases with every entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Choices the user has made so far in the current session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selections {
    /// Mood under the carousel's centre
    pub highlighted_mood: Mood,
    /// Mood the user confirmed
    pub mood: Option<Mood>,
    /// Free-text reflection being written
    pub reflection: String,
    pub task: Option<TaskCategory>,
    /// Seed planted for the chosen task
    pub seed: Option<SeedId>,
}

impl Default for Selections {
    fn default() -> Self {
        Self {
            highlighted_mood: Mood::DEFAULT,
            mood: None,
            reflection: String::new(),
            task: None,
            seed: None,
        }
    }
}

/// Snapshot of `(stage, displayed message, selections)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayState {
    /// `None` until the flow is entered for the first time
    pub session: Option<SessionId>,
    pub stage: FlowStage,
    pub message: String,
    pub selections: Selections,
    pub expression: CompanionExpression,
    /// A completion call is outstanding
    pub awaiting_reply: bool,
    /// A delayed transition is scheduled
    pub transition_pending: bool,
    /// The hand-off to the garden view has happened
    pub handed_off: bool,
}

impl DisplayState {
    pub(crate) fn idle() -> Self {
        Self {
            session: None,
            stage: FlowStage::Loading,
            message: FlowStage::Loading.placeholder().to_string(),
            selections: Selections::default(),
            expression: CompanionExpression::Neutral,
            awaiting_reply: false,
            transition_pending: false,
            handed_off: false,
        }
    }

    /// Nothing is in flight or scheduled
    pub fn is_settled(&self) -> bool {
        !self.awaiting_reply && !self.transition_pending
    }

    pub fn can_confirm_mood(&self) -> bool {
        self.stage == FlowStage::MoodSelect && !self.awaiting_reply
    }

    pub fn can_submit_reflection(&self) -> bool {
        self.stage == FlowStage::MoodWrite && !self.awaiting_reply && !self.selections.reflection.trim().is_empty()
    }

    pub fn can_select_task(&self) -> bool {
        self.stage == FlowStage::TaskSelect && !self.awaiting_reply
    }
}

/// Result of feeding one user input to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Applied,
    /// The input is not valid in the current state and was a no-op
    Ignored,
}

impl InputOutcome {
    pub fn is_applied(&self) -> bool {
        *self == InputOutcome::Applied
    }
}
