//! Garden state with actor pattern
//!
//! GardenRegistry owns the seeds planted during the process lifetime and
//! processes messages via channels. Nothing is persisted.

mod messages;
mod registry;

pub use messages::{GardenCommand, GardenError, GardenEvent, GardenResponse};
pub use registry::GardenRegistry;
