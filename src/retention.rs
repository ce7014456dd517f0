use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

// Drops are compared as decimals; this absorbs binary rounding such as
// 0.7 - 0.4 = 0.29999999999999993.
const DROP_TOLERANCE: f64 = 1e-12;

/// Retention ratios ordered by elapsed-time bucket, optionally paired with
/// the elapsed-time ratio each sample was taken at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetentionCurve {
    ratios: Vec<f64>,
    elapsed: Option<Vec<f64>>,
}

impl RetentionCurve {
    pub fn new(ratios: Vec<f64>) -> Self {
        Self {
            ratios,
            elapsed: None,
        }
    }

    pub fn with_elapsed(points: Vec<(f64, f64)>) -> Self {
        let (elapsed, ratios) = points.into_iter().unzip();
        Self {
            ratios,
            elapsed: Some(elapsed),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }

    pub fn elapsed(&self) -> Option<&[f64]> {
        self.elapsed.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    pub decile_len: usize,
    pub intro_drop: f64,
    pub sustained_drop: f64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            decile_len: 10,
            intro_drop: 0.3,
            sustained_drop: 0.2,
        }
    }
}

/// Data-quality problems found while analyzing a curve. Analysis continues
/// past them. Indices are positions in the curve as supplied, before any
/// reordering by elapsed time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MalformedCurve {
    OutOfRange { index: usize, value: f64 },
    OutOfOrder { index: usize },
}

impl fmt::Display for MalformedCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedCurve::OutOfRange { index, value } => {
                write!(f, "sample {} out of range: {}", index, value)
            }
            MalformedCurve::OutOfOrder { index } => {
                write!(f, "sample {} precedes its predecessor in elapsed time", index)
            }
        }
    }
}

/// `None` means the check was not applicable to the curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RetentionSignals {
    pub intro_decline: Option<bool>,
    pub sustained_decline: Option<bool>,
    pub warnings: Vec<MalformedCurve>,
}

impl RetentionSignals {
    pub fn not_applicable() -> Self {
        Self::default()
    }

    pub fn intro_decline(&self) -> bool {
        self.intro_decline.unwrap_or(false)
    }

    pub fn sustained_decline(&self) -> bool {
        self.sustained_decline.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetentionAnalyzer {
    config: RetentionConfig,
}

impl RetentionAnalyzer {
    pub fn new(config: RetentionConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, curve: &RetentionCurve) -> RetentionSignals {
        if curve.is_empty() {
            return RetentionSignals::not_applicable();
        }

        let mut warnings = Vec::new();
        let samples = ordered_samples(curve, &mut warnings);
        for &(index, value) in &samples {
            if !in_range(value) {
                warnings.push(MalformedCurve::OutOfRange { index, value });
            }
        }
        let ratios: Vec<f64> = samples.into_iter().map(|(_, ratio)| ratio).collect();

        for warning in &warnings {
            warn!(%warning, "malformed retention curve");
        }

        RetentionSignals {
            intro_decline: self.intro_decline(&ratios),
            sustained_decline: self.sustained_decline(&ratios),
            warnings,
        }
    }

    fn step(&self) -> usize {
        self.config.decile_len.max(1)
    }

    fn decile_drop(&self, ratios: &[f64], start: usize) -> Option<f64> {
        let first = *ratios.get(start)?;
        let last = *ratios.get(start + self.step() - 1)?;
        if !in_range(first) || !in_range(last) {
            return None;
        }
        Some(first - last)
    }

    fn intro_decline(&self, ratios: &[f64]) -> Option<bool> {
        self.decile_drop(ratios, 0)
            .map(|drop| meets(drop, self.config.intro_drop))
    }

    fn sustained_decline(&self, ratios: &[f64]) -> Option<bool> {
        let step = self.step();
        let mut evaluated = false;
        let mut start = step;

        while start + step <= ratios.len() {
            if let Some(drop) = self.decile_drop(ratios, start) {
                if meets(drop, self.config.sustained_drop) {
                    return Some(true);
                }
                evaluated = true;
            }
            start += step;
        }

        evaluated.then_some(false)
    }
}

/// Samples in elapsed-time order, each tagged with its input position.
fn ordered_samples(
    curve: &RetentionCurve,
    warnings: &mut Vec<MalformedCurve>,
) -> Vec<(usize, f64)> {
    let samples = curve.ratios().iter().copied().enumerate();
    let Some(elapsed) = curve.elapsed() else {
        return samples.collect();
    };

    let first_unordered = elapsed
        .windows(2)
        .position(|pair| pair[1] < pair[0])
        .map(|position| position + 1);

    match first_unordered {
        Some(index) => {
            warnings.push(MalformedCurve::OutOfOrder { index });
            let mut points: Vec<(f64, (usize, f64))> =
                elapsed.iter().copied().zip(samples).collect();
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            points.into_iter().map(|(_, sample)| sample).collect()
        }
        None => samples.collect(),
    }
}

fn in_range(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

fn meets(drop: f64, threshold: f64) -> bool {
    drop + DROP_TOLERANCE >= threshold
}
