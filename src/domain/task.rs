//! Self-care task categories and the activities offered for each

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One of the five self-care categories the companion can recommend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskCategory {
    Emotion,
    Social,
    HealthyEating,
    Exercise,
    Sleep,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 5] = [
        TaskCategory::Emotion,
        TaskCategory::Social,
        TaskCategory::HealthyEating,
        TaskCategory::Exercise,
        TaskCategory::Sleep,
    ];

    /// Category used when an identifier is not recognised
    pub const FALLBACK: TaskCategory = TaskCategory::Exercise;

    pub fn id(&self) -> &'static str {
        match self {
            TaskCategory::Emotion => "emotion",
            TaskCategory::Social => "social",
            TaskCategory::HealthyEating => "healthy-eating",
            TaskCategory::Exercise => "exercise",
            TaskCategory::Sleep => "sleep",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskCategory::Emotion => "Emotion",
            TaskCategory::Social => "Social",
            TaskCategory::HealthyEating => "Healthy Eating",
            TaskCategory::Exercise => "Exercise/Hobby",
            TaskCategory::Sleep => "Sleep",
        }
    }

    /// How the category is named in conversation
    pub fn phrase(&self) -> &'static str {
        match self {
            TaskCategory::Emotion => "emotion tasks",
            TaskCategory::Social => "social tasks",
            TaskCategory::HealthyEating => "healthy eating tasks",
            TaskCategory::Exercise => "exercise/hobby tasks",
            TaskCategory::Sleep => "sleep tasks",
        }
    }

    /// User turn sent when this category is picked
    pub fn selection_sentence(&self) -> String {
        format!("I'd like to try {}", self.phrase())
    }

    /// Heading for the category's activity list
    pub fn list_title(&self) -> String {
        format!("{} Tasks", self.label())
    }

    /// Parse an identifier, falling back to [`TaskCategory::FALLBACK`]
    pub fn parse_or_default(s: &str) -> TaskCategory {
        s.parse().unwrap_or_else(|_| {
            debug!(%s, "parse_or_default: unknown category, using fallback");
            TaskCategory::FALLBACK
        })
    }

    /// Concrete activities offered for this category
    pub fn activities(&self) -> &'static [Activity] {
        match self {
            TaskCategory::Exercise => EXERCISE_ACTIVITIES,
            TaskCategory::Emotion => EMOTION_ACTIVITIES,
            TaskCategory::Social => SOCIAL_ACTIVITIES,
            TaskCategory::HealthyEating => HEALTHY_EATING_ACTIVITIES,
            TaskCategory::Sleep => SLEEP_ACTIVITIES,
        }
    }

    /// Only exercise activities open the timed activity view
    pub fn is_timed(&self) -> bool {
        matches!(self, TaskCategory::Exercise)
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        TaskCategory::ALL
            .iter()
            .find(|c| c.id() == lower)
            .copied()
            .ok_or_else(|| format!("Unknown task category: {}", s))
    }
}

/// A single self-care activity within a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub id: &'static str,
    pub title: &'static str,
}

const fn activity(id: &'static str, title: &'static str) -> Activity {
    Activity { id, title }
}

const EXERCISE_ACTIVITIES: &[Activity] = &[
    activity("1", "Do 10 minutes of yoga"),
    activity("2", "Walk for 30 minutes"),
    activity("3", "Jump rope for 5 minutes"),
];

const EMOTION_ACTIVITIES: &[Activity] = &[
    activity("1", "Write down 3 things you're grateful for"),
    activity("2", "Draw how you feel"),
    activity("3", "Write a letter to yourself"),
    activity("4", "Listen to a healing song"),
];

const SOCIAL_ACTIVITIES: &[Activity] = &[
    activity("1", "Message a friend"),
    activity("2", "Call your family"),
    activity("3", "Join a hobby group"),
    activity("4", "Meet a friend for coffee"),
];

const HEALTHY_EATING_ACTIVITIES: &[Activity] = &[
    activity("1", "Cook yourself a healthy meal"),
    activity("2", "Drink 8 glasses of water"),
    activity("3", "Eat 5 different colored vegetables"),
    activity("4", "Try a new healthy recipe"),
];

const SLEEP_ACTIVITIES: &[Activity] = &[
    activity("1", "No phone 30 mins before bed"),
    activity("2", "Go to bed before 10 PM"),
    activity("3", "Meditate for 10 minutes"),
    activity("4", "Drink a glass of warm milk"),
];

/// Activity list for a raw category identifier, exercise when unknown
pub fn activities_for(category_id: &str) -> &'static [Activity] {
    TaskCategory::parse_or_default(category_id).activities()
}

/// Format an elapsed activity time as `MM:SS`
pub fn format_elapsed(total_secs: u64) -> String {
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}", mins, secs)
}
