pub mod pipeline;
pub mod ranking;
pub mod weighted;

pub use pipeline::{Exclusion, RankingConfig, RankingOutcome, RankingPipeline};
pub use ranking::{select_top, Score};
pub use weighted::{ScoreCalculator, ScoreWeights};
