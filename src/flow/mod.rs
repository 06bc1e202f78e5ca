//! Conversation flow controller
//!
//! Drives the guided session (greeting, mood capture, reflection, task
//! recommendation, task selection, hand-off to the garden) as an actor that
//! publishes a [`DisplayState`] for the rendering side to present.

mod controller;
mod display;
mod messages;
mod navigation;
mod stage;
mod timer;

pub use controller::{FlowController, FlowHandle, SHORTCUT_MESSAGE, START_MESSAGE};
pub use display::{DisplayState, InputOutcome, Selections, SessionId};
pub use messages::{EntryMode, FlowError, FlowResponse};
pub use navigation::{Navigator, Route, RouteParams};
pub use stage::FlowStage;
pub use timer::Transition;
