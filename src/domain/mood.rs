//! Mood scale and the carousel geometry used to highlight a mood

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One point on the fixed, ordered mood scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Meh,
    Bad,
}

impl Mood {
    /// All moods in display order
    pub const ALL: [Mood; 5] = [Mood::Great, Mood::Good, Mood::Okay, Mood::Meh, Mood::Bad];

    /// Pre-selected mood: the middle of the scale
    pub const DEFAULT: Mood = Mood::ALL[Mood::ALL.len() / 2];

    /// Identifier sent to the model when the mood is confirmed
    pub fn id(&self) -> &'static str {
        match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Meh => "meh",
            Mood::Bad => "bad",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Great => "Great",
            Mood::Good => "Good",
            Mood::Okay => "Okay",
            Mood::Meh => "Meh",
            Mood::Bad => "Bad",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Mood::Great => 0,
            Mood::Good => 1,
            Mood::Okay => 2,
            Mood::Meh => 3,
            Mood::Bad => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Mood> {
        Mood::ALL.get(index).copied()
    }

    /// Great and good read as upbeat; the rest as low
    pub fn is_upbeat(&self) -> bool {
        matches!(self, Mood::Great | Mood::Good)
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Mood::ALL
            .iter()
            .find(|m| m.id() == lower)
            .copied()
            .ok_or_else(|| format!("Unknown mood: {}. Use one of: great, good, okay, meh, bad", s))
    }
}

/// Width of one mood item in the carousel
pub const MOOD_ITEM_SIZE: f64 = 90.0;

/// Gap between neighbouring mood items
pub const MOOD_ITEM_SPACING: f64 = 24.0;

/// Distance between the centres of neighbouring items
pub const MOOD_SNAP_INTERVAL: f64 = MOOD_ITEM_SIZE + MOOD_ITEM_SPACING;

/// Horizontal mood carousel layout
///
/// The list is padded on both sides so the first and last items can sit in
/// the centre of the viewport. Mapping a scroll offset to a mood depends only
/// on the list width, the padding and the fixed item constants.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoodCarousel {
    pub width: f64,
    pub padding: f64,
}

impl MoodCarousel {
    /// Layout for a measured list width, padding chosen to centre one item
    pub fn from_layout(width: f64) -> Self {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let padding = ((width - MOOD_ITEM_SIZE) / 2.0).max(0.0);
        debug!(%width, %padding, "MoodCarousel::from_layout: called");
        Self { width, padding }
    }

    pub fn is_measured(&self) -> bool {
        self.width > 0.0
    }

    /// Index of the item nearest the viewport centre, clamped to the scale
    ///
    /// Returns `None` until the list has been measured.
    pub fn index_at(&self, offset_x: f64) -> Option<usize> {
        if !self.is_measured() || offset_x.is_nan() {
            return None;
        }
        let center_x = offset_x + self.width / 2.0;
        let adjusted = center_x - self.padding;
        let raw = ((adjusted - MOOD_ITEM_SIZE / 2.0) / MOOD_SNAP_INTERVAL).round();
        let last = (Mood::ALL.len() - 1) as f64;
        Some(raw.clamp(0.0, last) as usize)
    }

    /// Mood nearest the viewport centre for a scroll offset
    pub fn mood_at(&self, offset_x: f64) -> Option<Mood> {
        self.index_at(offset_x).and_then(Mood::from_index)
    }

    /// Scroll offset that centres the given mood
    pub fn offset_for(&self, mood: Mood) -> f64 {
        mood.index() as f64 * MOOD_SNAP_INTERVAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_is_middle_mood() {
        assert_eq!(Mood::DEFAULT, Mood::Okay);
        assert_eq!(Mood::DEFAULT.index(), 2);
    }

    #[test]
    fn test_index_round_trips() {
        for (i, mood) in Mood::ALL.iter().enumerate() {
            assert_eq!(mood.index(), i);
            assert_eq!(Mood::from_index(i), Some(*mood));
        }
        assert_eq!(Mood::from_index(5), None);
    }

    #[test]
    fn test_parse_mood() {
        assert_eq!("okay".parse::<Mood>(), Ok(Mood::Okay));
        assert_eq!(" GREAT ".parse::<Mood>(), Ok(Mood::Great));
        assert!("ecstatic".parse::<Mood>().is_err());
    }

    #[test]
    fn test_upbeat_split() {
        assert!(Mood::Great.is_upbeat());
        assert!(Mood::Good.is_upbeat());
        assert!(!Mood::Okay.is_upbeat());
        assert!(!Mood::Meh.is_upbeat());
        assert!(!Mood::Bad.is_upbeat());
    }

    #[test]
    fn test_from_layout_padding() {
        let c = MoodCarousel::from_layout(390.0);
        assert_eq!(c.padding, 150.0);

        // Narrower than one item: no negative padding
        let c = MoodCarousel::from_layout(60.0);
        assert_eq!(c.padding, 0.0);
    }

    #[test]
    fn test_unmeasured_carousel_has_no_index() {
        let c = MoodCarousel::default();
        assert_eq!(c.index_at(0.0), None);
        assert_eq!(c.mood_at(500.0), None);
    }

    #[test]
    fn test_offsets_centre_each_mood() {
        let c = MoodCarousel::from_layout(390.0);
        for mood in Mood::ALL {
            assert_eq!(c.mood_at(c.offset_for(mood)), Some(mood));
        }
    }

    #[test]
    fn test_nearest_index_rounding() {
        let c = MoodCarousel::from_layout(390.0);
        // Just under half an interval past "good" still snaps to "good"
        assert_eq!(c.mood_at(MOOD_SNAP_INTERVAL + 56.0), Some(Mood::Good));
        // Past the halfway point snaps to "okay"
        assert_eq!(c.mood_at(MOOD_SNAP_INTERVAL + 58.0), Some(Mood::Okay));
    }

    #[test]
    fn test_boundary_offsets_clamp() {
        let c = MoodCarousel::from_layout(390.0);
        assert_eq!(c.mood_at(-10_000.0), Some(Mood::Great));
        assert_eq!(c.mood_at(10_000.0), Some(Mood::Bad));
        assert_eq!(c.mood_at(f64::INFINITY), Some(Mood::Bad));
        assert_eq!(c.mood_at(f64::NAN), None);
    }

    proptest! {
        #[test]
        fn prop_mapping_is_pure_and_in_range(offset in -5_000.0f64..5_000.0, width in 1.0f64..2_000.0) {
            let c = MoodCarousel::from_layout(width);
            let first = c.index_at(offset);
            let second = MoodCarousel::from_layout(width).index_at(offset);
            prop_assert_eq!(first, second);
            let idx = first.unwrap();
            prop_assert!(idx < Mood::ALL.len());
        }

        #[test]
        fn prop_mapping_is_monotonic(a in -2_000.0f64..2_000.0, b in -2_000.0f64..2_000.0, width in 1.0f64..1_000.0) {
            let c = MoodCarousel::from_layout(width);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(c.index_at(lo).unwrap() <= c.index_at(hi).unwrap());
        }
    }
}
