use serde::{Deserialize, Serialize};

use crate::advice::{AdviceCategory, AdviceConfig};
use crate::metrics::{per_hundred_views, VideoMetrics};
use crate::retention::RetentionSignals;

/// Video-level statistics the advice rules look at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub views: f64,
    pub likes: f64,
    pub dislikes: f64,
    pub comments: f64,
    pub shares: f64,
    pub subscribers_gained: f64,
    pub average_view_percentage: f64,
    pub card_click_rate: f64,
}

impl AggregateStats {
    pub fn engagement_rate(&self) -> Option<f64> {
        per_hundred_views(
            self.likes + self.dislikes + self.comments + self.shares,
            self.views,
        )
    }
}

impl From<&VideoMetrics> for AggregateStats {
    fn from(metrics: &VideoMetrics) -> Self {
        Self {
            views: metrics.views,
            likes: metrics.likes,
            dislikes: metrics.dislikes,
            comments: metrics.comments,
            shares: metrics.shares,
            subscribers_gained: metrics.subscribers_gained,
            average_view_percentage: metrics.average_view_percentage,
            card_click_rate: metrics.card_click_rate,
        }
    }
}

pub type RulePredicate = fn(&AggregateStats, &RetentionSignals, &AdviceConfig) -> bool;

#[derive(Clone, Copy)]
pub struct AdviceRule {
    pub category: AdviceCategory,
    pub triggered: RulePredicate,
}

impl AdviceRule {
    pub fn applies(
        &self,
        stats: &AggregateStats,
        signals: &RetentionSignals,
        config: &AdviceConfig,
    ) -> bool {
        (self.triggered)(stats, signals, config)
    }
}

impl std::fmt::Debug for AdviceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdviceRule")
            .field("category", &self.category)
            .finish()
    }
}

/// Evaluated in this order; the order of the advice follows it.
pub static ADVICE_RULES: [AdviceRule; 6] = [
    AdviceRule {
        category: AdviceCategory::LowViewCount,
        triggered: low_view_count,
    },
    AdviceRule {
        category: AdviceCategory::LowEngagement,
        triggered: low_engagement,
    },
    AdviceRule {
        category: AdviceCategory::LowViewPercentage,
        triggered: low_view_percentage,
    },
    AdviceRule {
        category: AdviceCategory::LowCardClickRate,
        triggered: low_card_click_rate,
    },
    AdviceRule {
        category: AdviceCategory::IntroDecline,
        triggered: intro_decline,
    },
    AdviceRule {
        category: AdviceCategory::SustainedDecline,
        triggered: sustained_decline,
    },
];

pub fn rule_for(category: AdviceCategory) -> Option<&'static AdviceRule> {
    ADVICE_RULES.iter().find(|rule| rule.category == category)
}

fn low_view_count(stats: &AggregateStats, _: &RetentionSignals, config: &AdviceConfig) -> bool {
    stats.views < config.min_views
}

fn low_engagement(stats: &AggregateStats, _: &RetentionSignals, config: &AdviceConfig) -> bool {
    stats
        .engagement_rate()
        .is_some_and(|rate| rate <= config.max_engagement_rate)
}

fn low_view_percentage(
    stats: &AggregateStats,
    _: &RetentionSignals,
    config: &AdviceConfig,
) -> bool {
    stats.average_view_percentage <= config.max_view_percentage
}

fn low_card_click_rate(
    stats: &AggregateStats,
    _: &RetentionSignals,
    config: &AdviceConfig,
) -> bool {
    stats.card_click_rate <= config.max_card_click_rate
}

fn intro_decline(_: &AggregateStats, signals: &RetentionSignals, _: &AdviceConfig) -> bool {
    signals.intro_decline()
}

fn sustained_decline(_: &AggregateStats, signals: &RetentionSignals, _: &AdviceConfig) -> bool {
    signals.sustained_decline()
}
