//! Flow stages

use serde::Serialize;

/// The controller's current step in the guided flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowStage {
    Loading,
    MoodSelect,
    MoodWrite,
    TaskSelect,
    FinalMessage,
}

impl FlowStage {
    pub fn id(&self) -> &'static str {
        match self {
            FlowStage::Loading => "loading",
            FlowStage::MoodSelect => "mood-select",
            FlowStage::MoodWrite => "mood-write",
            FlowStage::TaskSelect => "task-select",
            FlowStage::FinalMessage => "final-message",
        }
    }

    /// Text shown until a reply for this stage has arrived
    pub fn placeholder(&self) -> &'static str {
        match self {
            FlowStage::Loading => "Analyzing...",
            FlowStage::MoodSelect => "How are you feeling today?",
            FlowStage::MoodWrite => "Write down how you feel...",
            FlowStage::TaskSelect => "Which task would you like to try?",
            FlowStage::FinalMessage => "Let's go to our garden!",
        }
    }

    /// Whether the user can act while this stage is shown
    pub fn is_interactive(&self) -> bool {
        matches!(self, FlowStage::MoodSelect | FlowStage::MoodWrite | FlowStage::TaskSelect)
    }
}

impl std::fmt::Display for FlowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stage_has_a_placeholder() {
        for stage in [
            FlowStage::Loading,
            FlowStage::MoodSelect,
            FlowStage::MoodWrite,
            FlowStage::TaskSelect,
            FlowStage::FinalMessage,
        ] {
            assert!(!stage.placeholder().is_empty());
        }
        assert_eq!(FlowStage::Loading.placeholder(), "Analyzing...");
    }

    #[test]
    fn test_interactive_stages() {
        assert!(!FlowStage::Loading.is_interactive());
        assert!(FlowStage::MoodSelect.is_interactive());
        assert!(FlowStage::TaskSelect.is_interactive());
        assert!(!FlowStage::FinalMessage.is_interactive());
    }

    #[test]
    fn test_serializes_kebab_case() {
        let json = serde_json::to_string(&FlowStage::FinalMessage).unwrap();
        assert_eq!(json, "\"final-message\"");
        assert_eq!(FlowStage::MoodSelect.to_string(), "mood-select");
    }
}
