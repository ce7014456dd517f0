pub mod advice;
pub mod config;
pub mod error;
pub mod metrics;
pub mod report;
pub mod retention;
pub mod scoring;

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;

use crate::advice::{AdviceCatalog, AdviceConfig, AdviceGenerator, AdviceResult, AggregateStats};
use crate::config::InsightsConfig;
use crate::error::Result;
use crate::metrics::{MetricsNormalizer, RawVideo, VideoMetrics};
use crate::report::VideoReport;
use crate::retention::{RetentionAnalyzer, RetentionCurve, RetentionSignals};
use crate::scoring::{RankingOutcome, RankingPipeline, Score, ScoreCalculator};

pub use crate::error::InsightsError;

pub fn score(metrics: &VideoMetrics) -> Result<Score> {
    ScoreCalculator::default().score(metrics)
}

pub fn select_top(scores: &HashMap<String, Score>, n: usize) -> Vec<Score> {
    scoring::select_top(scores, n)
}

pub fn analyze_retention(curve: &RetentionCurve) -> RetentionSignals {
    RetentionAnalyzer::default().analyze(curve)
}

pub fn generate_advice<R: Rng + ?Sized>(
    stats: &AggregateStats,
    signals: &RetentionSignals,
    catalog: Arc<AdviceCatalog>,
    rng: &mut R,
) -> AdviceResult {
    AdviceGenerator::new(AdviceConfig::default(), catalog).generate(stats, signals, rng)
}

pub fn rank_videos(videos: &[RawVideo], config: &InsightsConfig) -> RankingOutcome {
    let pipeline = RankingPipeline::new(
        ScoreCalculator::new(config.scoring.clone()),
        config.ranking.top_n,
    );
    pipeline.rank(videos)
}

pub fn analyze_video(
    video: &RawVideo,
    config: &InsightsConfig,
    catalog: Arc<AdviceCatalog>,
) -> Result<VideoReport> {
    let record = MetricsNormalizer::new().normalize(video)?;
    let score = ScoreCalculator::new(config.scoring.clone()).score(&record.metrics)?;
    let signals = RetentionAnalyzer::new(config.retention.clone()).analyze(&record.retention);

    let generator = AdviceGenerator::new(config.advice.clone(), catalog);
    let mut rng = advice_rng(config.advice.seed, &record.metrics.video_id);
    let advice = generator.generate(&AggregateStats::from(&record.metrics), &signals, &mut rng);

    Ok(VideoReport::new(record, score, signals, advice))
}

/// Seeded per video so a video's advice does not depend on where it sits in
/// a batch.
pub fn advice_rng(seed: Option<u64>, video_id: &str) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(stable_hash64(&format!("{}:{}", seed, video_id))),
        None => StdRng::from_entropy(),
    }
}

fn stable_hash64(value: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round().max(0.0) as i64;
    let mut chars: Vec<char> = rounded.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

/// Values are already on a percentage scale.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}

/// `m:ss` from a duration in seconds.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
