pub mod normalize;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, Read};
use std::path::Path;
use tracing::warn;

use crate::error::Result;
use crate::retention::RetentionCurve;

pub use normalize::MetricsNormalizer;

/// Canonical per-video metrics. Counts are held as `f64` so fractional
/// inputs keep their precision until presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetrics {
    pub video_id: String,
    pub comments: f64,
    pub likes: f64,
    pub dislikes: f64,
    pub shares: f64,
    pub subscribers_gained: f64,
    pub views: f64,
    pub watch_time_minutes: f64,
    pub average_view_percentage: f64,
    pub card_click_rate: f64,
    pub average_view_duration: f64,
}

impl VideoMetrics {
    pub fn engagement_count(&self) -> f64 {
        self.likes + self.dislikes + self.comments + self.shares
    }

    pub fn engagement_rate(&self) -> Option<f64> {
        per_hundred_views(self.engagement_count(), self.views)
    }

    pub fn subscriber_conversion(&self) -> Option<f64> {
        per_hundred_views(self.subscribers_gained, self.views)
    }
}

pub(crate) fn per_hundred_views(value: f64, views: f64) -> Option<f64> {
    if views > 0.0 {
        Some(value / views * 100.0)
    } else {
        None
    }
}

/// A normalized video: metrics plus its retention curves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoRecord {
    pub metrics: VideoMetrics,
    pub title: Option<String>,
    pub retention: RetentionCurve,
    pub relative_retention: Vec<f64>,
}

/// One video as delivered by the metrics source. Every metric may be a JSON
/// number, a decimal string, `null`, or absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawVideo {
    #[serde(default, alias = "videoId", alias = "id")]
    pub video_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub comments: Option<Value>,
    #[serde(default)]
    pub likes: Option<Value>,
    #[serde(default)]
    pub dislikes: Option<Value>,
    #[serde(default)]
    pub shares: Option<Value>,
    #[serde(default, alias = "subscribersGained")]
    pub subscribers_gained: Option<Value>,
    #[serde(default, alias = "viewCount")]
    pub views: Option<Value>,
    #[serde(default, alias = "estimatedMinutesWatched", alias = "watchTimeMinutes")]
    pub watch_time_minutes: Option<Value>,
    #[serde(default, alias = "averageViewPercentage")]
    pub average_view_percentage: Option<Value>,
    #[serde(default, alias = "cardClickRate")]
    pub card_click_rate: Option<Value>,
    #[serde(default, alias = "averageViewDuration")]
    pub average_view_duration: Option<Value>,
    #[serde(default, alias = "audienceWatchRatio")]
    pub retention: Vec<RawRetentionPoint>,
    #[serde(default, alias = "relativeRetentionPerformance")]
    pub relative_retention: Vec<Value>,
    /// Decode error for a record that did not match this shape.
    #[serde(skip)]
    pub malformed: Option<String>,
}

impl RawVideo {
    /// Decodes one record. A record of the wrong shape is kept, carrying its
    /// decode error, so that it is excluded on its own.
    pub fn from_value(value: Value) -> Self {
        let video_id = ["video_id", "videoId", "id"]
            .iter()
            .find_map(|key| value.get(*key).and_then(id_text))
            .unwrap_or_default();

        match serde_json::from_value::<RawVideo>(value) {
            Ok(video) => video,
            Err(err) => {
                warn!(video_id = %video_id, error = %err, "unreadable video record");
                RawVideo {
                    video_id,
                    malformed: Some(err.to_string()),
                    ..RawVideo::default()
                }
            }
        }
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRetentionPoint {
    Point {
        #[serde(alias = "elapsedVideoTimeRatio")]
        elapsed: f64,
        #[serde(alias = "audienceWatchRatio")]
        ratio: Value,
    },
    Ratio(Value),
}

/// Parses either a single video object or an array of them. Only a payload
/// that is not JSON at all is an error.
pub fn parse_videos(payload: &str) -> Result<Vec<RawVideo>> {
    let input: Value = serde_json::from_str(payload)?;
    Ok(match input {
        Value::Array(items) => items.into_iter().map(RawVideo::from_value).collect(),
        other => vec![RawVideo::from_value(other)],
    })
}

pub fn read_videos(path: Option<&Path>) -> Result<Vec<RawVideo>> {
    let payload = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    parse_videos(&payload)
}
