//! HeartGarden - a garden companion for self-care
//!
//! A virtual companion chats with the user, captures their mood and a short
//! reflection, recommends a self-care task category, and plants a seed in a
//! garden that grows as the category's activities are completed.
//!
//! # Core Concepts
//!
//! - **Guided flow**: a fixed sequence of stages drives one model call per step
//! - **Full transcript**: every call resends the whole conversation
//! - **Fail soft**: model failures become a fixed apology, never an error
//! - **Session-scoped**: seeds live for the process lifetime only
//!
//! # Modules
//!
//! - [`flow`] - Conversation flow controller and display state
//! - [`garden`] - Seed registry actor
//! - [`llm`] - LLM client trait, OpenAI implementation, fail-soft wrapper
//! - [`transcript`] - Append-only conversation transcript
//! - [`domain`] - Moods, task categories, seeds
//! - [`prompts`] - Companion prompt templates
//! - [`terminal`] - Interactive terminal driver
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod flow;
pub mod garden;
pub mod llm;
pub mod prompts;
pub mod terminal;
pub mod testing;
pub mod transcript;

// Re-export commonly used types
pub use config::{CompanionConfig, Config, FlowConfig, LlmConfig};
pub use domain::{CompanionExpression, Mood, MoodCarousel, Seed, SeedId, TaskCategory};
pub use flow::{
    DisplayState, EntryMode, FlowController, FlowError, FlowHandle, FlowStage, InputOutcome, Navigator, Route,
    RouteParams, SessionId,
};
pub use garden::{GardenError, GardenEvent, GardenRegistry};
pub use llm::{ChatCompletionClient, CompletionRequest, CompletionResponse, FALLBACK_REPLY, LlmClient, LlmError};
pub use prompts::PromptLoader;
pub use transcript::{ConversationTranscript, Role, TranscriptError, Turn};
