//! GardenRegistry - actor that owns the session's seeds
//!
//! Processes commands via channels so the flow controller (writer) and any
//! number of display collaborators (readers) share one consistent view.

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::domain::{Seed, SeedId, TaskCategory};

use super::messages::{GardenCommand, GardenError, GardenEvent, GardenResponse};

/// Handle to send commands to the GardenRegistry actor
#[derive(Clone)]
pub struct GardenRegistry {
    tx: mpsc::Sender<GardenCommand>,
    /// Broadcast sender for garden change notifications
    event_tx: broadcast::Sender<GardenEvent>,
}

impl GardenRegistry {
    /// Spawn a new, empty GardenRegistry actor
    pub fn spawn() -> Self {
        debug!("spawn: called");
        let (tx, rx) = mpsc::channel(64);
        let (event_tx, _) = broadcast::channel(64);

        tokio::spawn(actor_loop(rx, event_tx.clone()));

        info!("GardenRegistry spawned");
        Self { tx, event_tx }
    }

    /// Subscribe to garden change events
    pub fn subscribe(&self) -> broadcast::Receiver<GardenEvent> {
        self.event_tx.subscribe()
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> GardenCommand) -> GardenResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| GardenError::ChannelError)?;
        reply_rx.await.map_err(|_| GardenError::ChannelError)
    }

    /// Plant a new seed with zero progress and return it
    pub async fn add_seed(&self, task_type: TaskCategory) -> GardenResponse<Seed> {
        debug!(%task_type, "add_seed: called");
        self.request(|reply| GardenCommand::AddSeed { task_type, reply }).await
    }

    /// Replace a seed's progress
    ///
    /// Unknown ids are ignored. Progress is clamped into `[0, 1]`.
    pub async fn update_seed_progress(&self, id: &SeedId, progress: f64) -> GardenResponse<()> {
        debug!(%id, %progress, "update_seed_progress: called");
        self.request(|reply| GardenCommand::UpdateSeedProgress {
            id: id.clone(),
            progress,
            reply,
        })
        .await
        .map(|_| ())
    }

    /// Grow a seed by one completed activity of its category
    pub async fn record_activity_completed(&self, id: &SeedId) -> GardenResponse<Option<Seed>> {
        debug!(%id, "record_activity_completed: called");
        self.request(|reply| GardenCommand::RecordActivityCompleted { id: id.clone(), reply })
            .await
    }

    pub async fn get_seed(&self, id: &SeedId) -> GardenResponse<Option<Seed>> {
        debug!(%id, "get_seed: called");
        self.request(|reply| GardenCommand::GetSeed { id: id.clone(), reply }).await
    }

    /// Snapshot of all seeds in planting order
    pub async fn list_seeds(&self) -> GardenResponse<Vec<Seed>> {
        debug!("list_seeds: called");
        self.request(|reply| GardenCommand::ListSeeds { reply }).await
    }

    /// Shutdown the registry
    pub async fn shutdown(&self) -> GardenResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(GardenCommand::Shutdown)
            .await
            .map_err(|_| GardenError::ChannelError)
    }
}

/// Set a seed's progress, returning the updated seed if it exists
fn apply_progress(seeds: &mut [Seed], id: &SeedId, progress: f64) -> Option<Seed> {
    if !progress.is_finite() {
        warn!(%id, %progress, "apply_progress: ignoring non-finite progress");
        return None;
    }
    match seeds.iter_mut().find(|s| &s.id == id) {
        Some(seed) => {
            seed.progress = progress.clamp(0.0, 1.0);
            Some(seed.clone())
        }
        None => {
            debug!(%id, "apply_progress: no seed with this id");
            None
        }
    }
}

/// The actor's main loop
async fn actor_loop(mut rx: mpsc::Receiver<GardenCommand>, event_tx: broadcast::Sender<GardenEvent>) {
    debug!("actor_loop: started");
    let mut seeds: Vec<Seed> = Vec::new();

    while let Some(cmd) = rx.recv().await {
        match cmd {
            GardenCommand::AddSeed { task_type, reply } => {
                debug!(%task_type, "actor_loop: AddSeed command");
                let seed = Seed::new(task_type);
                seeds.push(seed.clone());
                info!(id = %seed.id, %task_type, total = seeds.len(), "Seed planted");
                let _ = event_tx.send(GardenEvent::SeedPlanted { seed: seed.clone() });
                let _ = reply.send(seed);
            }

            GardenCommand::UpdateSeedProgress { id, progress, reply } => {
                debug!(%id, %progress, "actor_loop: UpdateSeedProgress command");
                let updated = apply_progress(&mut seeds, &id, progress);
                if let Some(ref seed) = updated {
                    let _ = event_tx.send(GardenEvent::SeedGrew {
                        id: seed.id.clone(),
                        progress: seed.progress,
                    });
                }
                let _ = reply.send(updated);
            }

            GardenCommand::RecordActivityCompleted { id, reply } => {
                debug!(%id, "actor_loop: RecordActivityCompleted command");
                let next = seeds
                    .iter()
                    .find(|s| s.id == id)
                    .map(|s| s.progress + s.growth_per_activity());
                let updated = next.and_then(|p| apply_progress(&mut seeds, &id, p));
                if let Some(ref seed) = updated {
                    let _ = event_tx.send(GardenEvent::SeedGrew {
                        id: seed.id.clone(),
                        progress: seed.progress,
                    });
                }
                let _ = reply.send(updated);
            }

            GardenCommand::GetSeed { id, reply } => {
                debug!(%id, "actor_loop: GetSeed command");
                let _ = reply.send(seeds.iter().find(|s| s.id == id).cloned());
            }

            GardenCommand::ListSeeds { reply } => {
                debug!(count = seeds.len(), "actor_loop: ListSeeds command");
                let _ = reply.send(seeds.clone());
            }

            GardenCommand::Shutdown => {
                debug!("actor_loop: Shutdown command");
                info!("GardenRegistry shutting down");
                break;
            }
        }
    }

    debug!("GardenRegistry actor stopped");
}
