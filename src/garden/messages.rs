//! Garden registry messages
//!
//! Commands and responses for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::{Seed, SeedId, TaskCategory};

/// Errors from garden operations
#[derive(Debug, Error)]
pub enum GardenError {
    #[error("Channel error")]
    ChannelError,
}

/// Response from garden operations
pub type GardenResponse<T> = Result<T, GardenError>;

/// Commands sent to the GardenRegistry actor
#[derive(Debug)]
pub enum GardenCommand {
    AddSeed {
        task_type: TaskCategory,
        reply: oneshot::Sender<Seed>,
    },
    UpdateSeedProgress {
        id: SeedId,
        progress: f64,
        reply: oneshot::Sender<Option<Seed>>,
    },
    RecordActivityCompleted {
        id: SeedId,
        reply: oneshot::Sender<Option<Seed>>,
    },
    GetSeed {
        id: SeedId,
        reply: oneshot::Sender<Option<Seed>>,
    },
    ListSeeds {
        reply: oneshot::Sender<Vec<Seed>>,
    },

    // Shutdown
    Shutdown,
}

/// Event broadcast when the garden changes
#[derive(Debug, Clone)]
pub enum GardenEvent {
    /// A new seed was planted
    SeedPlanted { seed: Seed },
    /// An existing seed's progress changed
    SeedGrew { id: SeedId, progress: f64 },
}
