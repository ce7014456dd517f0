use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceCategory {
    LowViewCount,
    LowEngagement,
    LowViewPercentage,
    LowCardClickRate,
    IntroDecline,
    SustainedDecline,
}

impl AdviceCategory {
    pub const ALL: [AdviceCategory; 6] = [
        AdviceCategory::LowViewCount,
        AdviceCategory::LowEngagement,
        AdviceCategory::LowViewPercentage,
        AdviceCategory::LowCardClickRate,
        AdviceCategory::IntroDecline,
        AdviceCategory::SustainedDecline,
    ];

    /// Stable key; also the file stem of the category's advice pool.
    pub fn key(self) -> &'static str {
        match self {
            AdviceCategory::LowViewCount => "low_view_count",
            AdviceCategory::LowEngagement => "low_engagement",
            AdviceCategory::LowViewPercentage => "low_view_percentage",
            AdviceCategory::LowCardClickRate => "low_card_click_rate",
            AdviceCategory::IntroDecline => "intro_decline",
            AdviceCategory::SustainedDecline => "sustained_decline",
        }
    }

    pub fn from_key(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        AdviceCategory::ALL
            .into_iter()
            .find(|category| category.key() == value)
    }

    pub fn metric_area(self) -> &'static str {
        match self {
            AdviceCategory::LowViewCount => "view count",
            AdviceCategory::LowEngagement => "engagement rate",
            AdviceCategory::LowViewPercentage => "average view percentage",
            AdviceCategory::LowCardClickRate => "card click rate",
            AdviceCategory::IntroDecline => "intro retention",
            AdviceCategory::SustainedDecline => "retention",
        }
    }

    pub fn fallback_message(self) -> String {
        format!(
            "There seems to be room for improvement for your video's {}, but no advice is available right now.",
            self.metric_area()
        )
    }
}

impl fmt::Display for AdviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
