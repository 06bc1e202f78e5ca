//! Domain types for HeartGarden
//!
//! Moods, task categories, seeds and the companion's expression.

mod companion;
mod mood;
mod seed;
mod task;

pub use companion::CompanionExpression;
pub use mood::{MOOD_ITEM_SIZE, MOOD_ITEM_SPACING, MOOD_SNAP_INTERVAL, Mood, MoodCarousel};
pub use seed::{Seed, SeedId};
pub use task::{Activity, TaskCategory, activities_for, format_elapsed};
