use serde_json::Value;
use tracing::warn;

use crate::error::{InsightsError, Result};
use crate::metrics::{RawRetentionPoint, RawVideo, VideoMetrics, VideoRecord};
use crate::retention::RetentionCurve;

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsNormalizer;

impl MetricsNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, raw: &RawVideo) -> Result<VideoRecord> {
        let metrics = self.normalize_metrics(raw)?;
        let retention = normalize_curve(&metrics.video_id, &raw.retention);
        let relative_retention = raw
            .relative_retention
            .iter()
            .map(|value| sample_value(&metrics.video_id, value))
            .collect();

        Ok(VideoRecord {
            metrics,
            title: raw.title.clone(),
            retention,
            relative_retention,
        })
    }

    pub fn normalize_metrics(&self, raw: &RawVideo) -> Result<VideoMetrics> {
        let video_id = raw.video_id.trim();
        if let Some(reason) = &raw.malformed {
            let label = if video_id.is_empty() { "<unknown>" } else { video_id };
            return Err(InsightsError::invalid_metrics(
                label,
                format!("unreadable record: {reason}"),
            ));
        }
        if video_id.is_empty() {
            return Err(InsightsError::invalid_metrics("<unknown>", "missing video id"));
        }

        let views = field(video_id, "views", raw.views.as_ref())?
            .ok_or_else(|| InsightsError::invalid_metrics(video_id, "views missing"))?;
        if views == 0.0 {
            return Err(InsightsError::invalid_metrics(video_id, "views is zero"));
        }

        Ok(VideoMetrics {
            video_id: video_id.to_string(),
            comments: or_zero(field(video_id, "comments", raw.comments.as_ref())?),
            likes: or_zero(field(video_id, "likes", raw.likes.as_ref())?),
            dislikes: or_zero(field(video_id, "dislikes", raw.dislikes.as_ref())?),
            shares: or_zero(field(video_id, "shares", raw.shares.as_ref())?),
            subscribers_gained: or_zero(field(
                video_id,
                "subscribers_gained",
                raw.subscribers_gained.as_ref(),
            )?),
            views,
            watch_time_minutes: or_zero(field(
                video_id,
                "watch_time_minutes",
                raw.watch_time_minutes.as_ref(),
            )?),
            average_view_percentage: or_zero(field(
                video_id,
                "average_view_percentage",
                raw.average_view_percentage.as_ref(),
            )?),
            card_click_rate: or_zero(field(
                video_id,
                "card_click_rate",
                raw.card_click_rate.as_ref(),
            )?),
            average_view_duration: or_zero(field(
                video_id,
                "average_view_duration",
                raw.average_view_duration.as_ref(),
            )?),
        })
    }
}

fn or_zero(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

fn field(video_id: &str, name: &str, value: Option<&Value>) -> Result<Option<f64>> {
    let parsed = match value {
        Some(value) => numeric_value(value)
            .map_err(|reason| InsightsError::invalid_metrics(video_id, format!("{name}: {reason}")))?,
        None => None,
    };

    match parsed {
        Some(number) if !number.is_finite() => Err(InsightsError::invalid_metrics(
            video_id,
            format!("{name}: not a finite number"),
        )),
        Some(number) if number < 0.0 => Err(InsightsError::invalid_metrics(
            video_id,
            format!("{name}: negative value {number}"),
        )),
        other => Ok(other),
    }
}

/// `Ok(None)` means the value is absent (`null` or a blank string).
pub fn numeric_value(value: &Value) -> std::result::Result<Option<f64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("unrepresentable number {number}")),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| format!("not numeric: {trimmed:?}"))
        }
        other => Err(format!("unexpected value {other}")),
    }
}

fn normalize_curve(video_id: &str, points: &[RawRetentionPoint]) -> RetentionCurve {
    let all_timed = !points.is_empty()
        && points
            .iter()
            .all(|point| matches!(point, RawRetentionPoint::Point { .. }));

    if all_timed {
        let timed = points
            .iter()
            .filter_map(|point| match point {
                RawRetentionPoint::Point { elapsed, ratio } => {
                    Some((*elapsed, sample_value(video_id, ratio)))
                }
                RawRetentionPoint::Ratio(_) => None,
            })
            .collect();
        return RetentionCurve::with_elapsed(timed);
    }

    let ratios = points
        .iter()
        .map(|point| match point {
            RawRetentionPoint::Point { ratio, .. } => sample_value(video_id, ratio),
            RawRetentionPoint::Ratio(ratio) => sample_value(video_id, ratio),
        })
        .collect();
    RetentionCurve::new(ratios)
}

// Unreadable samples become NaN so the analyzer reports them as malformed.
fn sample_value(video_id: &str, value: &Value) -> f64 {
    match numeric_value(value) {
        Ok(Some(number)) => number,
        Ok(None) => f64::NAN,
        Err(reason) => {
            warn!(video_id, %reason, "unreadable retention sample");
            f64::NAN
        }
    }
}
