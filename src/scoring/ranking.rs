use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub video_id: String,
    pub value: f64,
    pub engagement_rate: f64,
    pub subscriber_conversion: f64,
}

impl Score {
    /// `Less` when `self` ranks ahead of `other`: higher value first, then
    /// ascending video id.
    pub fn rank_cmp(&self, other: &Score) -> Ordering {
        other
            .value
            .total_cmp(&self.value)
            .then_with(|| self.video_id.cmp(&other.video_id))
    }
}

/// Returns at most `n` scores, best first. The input is left untouched.
pub fn select_top(scores: &HashMap<String, Score>, n: usize) -> Vec<Score> {
    let mut ranked: Vec<&Score> = scores.values().collect();
    ranked.sort_by(|a, b| a.rank_cmp(b));
    ranked.into_iter().take(n).cloned().collect()
}
