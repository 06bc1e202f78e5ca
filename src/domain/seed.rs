//! Seed records planted in the garden

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TaskCategory;

/// Unique, time-ordered seed identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedId(String);

impl SeedId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 characters, for compact display
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl std::fmt::Display for SeedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SeedId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SeedId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A chosen self-care category, grown by completing its activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    pub id: SeedId,
    pub task_type: TaskCategory,
    pub created_at: DateTime<Utc>,
    /// Growth in `[0, 1]`
    pub progress: f64,
}

impl Seed {
    /// Freshly planted seed with zero progress
    pub fn new(task_type: TaskCategory) -> Self {
        Self {
            id: SeedId::generate(),
            task_type,
            created_at: Utc::now(),
            progress: 0.0,
        }
    }

    pub fn is_fully_grown(&self) -> bool {
        self.progress >= 1.0
    }

    /// Growth gained from completing one of the category's activities
    pub fn growth_per_activity(&self) -> f64 {
        let count = self.task_type.activities().len().max(1);
        1.0 / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_seed_starts_at_zero() {
        let seed = Seed::new(TaskCategory::Sleep);
        assert_eq!(seed.task_type, TaskCategory::Sleep);
        assert_eq!(seed.progress, 0.0);
        assert!(!seed.is_fully_grown());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: std::collections::HashSet<SeedId> = (0..100).map(|_| SeedId::generate()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_short_id() {
        let id = SeedId::from("0192f3a4-aaaa-bbbb");
        assert_eq!(id.short(), "0192f3a4");
        assert_eq!(SeedId::from("abc").short(), "abc");
    }

    #[test]
    fn test_growth_per_activity() {
        assert!((Seed::new(TaskCategory::Exercise).growth_per_activity() - 1.0 / 3.0).abs() < 1e-9);
        assert!((Seed::new(TaskCategory::Social).growth_per_activity() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_seed_serializes_task_type_id() {
        let seed = Seed::new(TaskCategory::HealthyEating);
        let json = serde_json::to_value(&seed).unwrap();
        assert_eq!(json["task_type"], "healthy-eating");
        assert_eq!(json["progress"], 0.0);
        assert!(json["id"].is_string());
    }
}
