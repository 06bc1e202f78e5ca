//! Prompt templates
//!
//! The companion's instruction prompt, embedded in the binary and overridable
//! from disk.

mod embedded;
mod loader;

pub use embedded::get_embedded;
pub use loader::{COMPANION_TEMPLATE, NamedEntry, PromptContext, PromptLoader};
