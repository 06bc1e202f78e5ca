//! Companion avatar expression

use serde::Serialize;

use super::Mood;
use crate::flow::FlowStage;

/// Which face the companion shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanionExpression {
    Neutral,
    Happy,
    Sad,
}

impl CompanionExpression {
    /// Mirrors the user's mood only while they are writing about it
    pub fn for_stage(stage: FlowStage, mood: Option<Mood>) -> Self {
        match stage {
            FlowStage::MoodWrite => match mood {
                Some(m) if m.is_upbeat() => CompanionExpression::Happy,
                Some(_) => CompanionExpression::Sad,
                None => CompanionExpression::Neutral,
            },
            FlowStage::Loading | FlowStage::MoodSelect | FlowStage::TaskSelect | FlowStage::FinalMessage => {
                CompanionExpression::Neutral
            }
        }
    }

    /// Small text face for terminal display
    pub fn glyph(&self) -> &'static str {
        match self {
            CompanionExpression::Neutral => "(•‿•)",
            CompanionExpression::Happy => "(^‿^)",
            CompanionExpression::Sad => "(•︵•)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_outside_mood_write() {
        for stage in [
            FlowStage::Loading,
            FlowStage::MoodSelect,
            FlowStage::TaskSelect,
            FlowStage::FinalMessage,
        ] {
            assert_eq!(
                CompanionExpression::for_stage(stage, Some(Mood::Great)),
                CompanionExpression::Neutral
            );
        }
    }

    #[test]
    fn test_mood_write_mirrors_mood() {
        assert_eq!(
            CompanionExpression::for_stage(FlowStage::MoodWrite, Some(Mood::Good)),
            CompanionExpression::Happy
        );
        assert_eq!(
            CompanionExpression::for_stage(FlowStage::MoodWrite, Some(Mood::Meh)),
            CompanionExpression::Sad
        );
        assert_eq!(
            CompanionExpression::for_stage(FlowStage::MoodWrite, None),
            CompanionExpression::Neutral
        );
    }
}
