use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::error::Result;
use crate::metrics::{MetricsNormalizer, RawVideo, VideoMetrics};
use crate::scoring::{select_top, Score, ScoreCalculator};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exclusion {
    pub video_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RankingOutcome {
    pub top: Vec<Score>,
    pub scored: usize,
    pub excluded: Vec<Exclusion>,
}

/// Scores a batch video by video; a failing video is excluded and the rest
/// are still ranked.
#[derive(Debug, Clone)]
pub struct RankingPipeline {
    normalizer: MetricsNormalizer,
    calculator: ScoreCalculator,
    top_n: usize,
}

impl RankingPipeline {
    pub fn new(calculator: ScoreCalculator, top_n: usize) -> Self {
        Self {
            normalizer: MetricsNormalizer::new(),
            calculator,
            top_n,
        }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn rank(&self, videos: &[RawVideo]) -> RankingOutcome {
        self.rank_results(videos.iter().map(|video| {
            let metrics = self.normalizer.normalize_metrics(video);
            let video_id = match video.video_id.trim() {
                "" => "<unknown>".to_string(),
                id => id.to_string(),
            };
            (video_id, metrics)
        }))
    }

    pub fn rank_metrics(&self, videos: &[VideoMetrics]) -> RankingOutcome {
        self.rank_results(
            videos
                .iter()
                .map(|metrics| (metrics.video_id.clone(), Ok(metrics.clone()))),
        )
    }

    fn rank_results<I>(&self, videos: I) -> RankingOutcome
    where
        I: IntoIterator<Item = (String, Result<VideoMetrics>)>,
    {
        let mut scores: HashMap<String, Score> = HashMap::new();
        let mut excluded = Vec::new();

        for (video_id, metrics) in videos {
            let scored = metrics.and_then(|metrics| self.calculator.score(&metrics));
            match scored {
                Ok(score) => {
                    if scores.contains_key(&score.video_id) {
                        warn!(video_id = %score.video_id, "duplicate video in batch, excluded");
                        excluded.push(Exclusion {
                            video_id: score.video_id,
                            reason: "duplicate video id in batch".to_string(),
                        });
                    } else {
                        scores.insert(score.video_id.clone(), score);
                    }
                }
                Err(err) => {
                    warn!(video_id = %video_id, error = %err, "video excluded from ranking");
                    excluded.push(Exclusion {
                        video_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let top = select_top(&scores, self.top_n);
        info!(
            scored = scores.len(),
            excluded = excluded.len(),
            returned = top.len(),
            "ranking complete"
        );

        RankingOutcome {
            top,
            scored: scores.len(),
            excluded,
        }
    }
}
