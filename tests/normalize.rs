use serde_json::json;
use std::sync::Arc;
use video_insights::advice::{AdviceCatalog, AdviceCategory};
use video_insights::config::InsightsConfig;
use video_insights::metrics::{parse_videos, MetricsNormalizer, RawVideo};
use video_insights::{analyze_video, format_duration, format_number, InsightsError};

fn raw(value: serde_json::Value) -> RawVideo {
    serde_json::from_value(value).unwrap()
}

#[test]
fn mixed_numeric_representations_are_accepted() {
    let video = raw(json!({
        "video_id": "abc",
        "comments": "12",
        "likes": 340,
        "dislikes": null,
        "shares": " 7 ",
        "views": "123456",
        "watch_time_minutes": 9876.5,
        "average_view_percentage": "41.25",
        "card_click_rate": 1.5
    }));

    let metrics = MetricsNormalizer::new().normalize_metrics(&video).unwrap();

    assert_eq!(metrics.video_id, "abc");
    assert_eq!(metrics.comments, 12.0);
    assert_eq!(metrics.likes, 340.0);
    assert_eq!(metrics.dislikes, 0.0);
    assert_eq!(metrics.shares, 7.0);
    assert_eq!(metrics.subscribers_gained, 0.0);
    assert_eq!(metrics.views, 123_456.0);
    assert_eq!(metrics.watch_time_minutes, 9876.5);
    assert_eq!(metrics.average_view_percentage, 41.25);
    assert_eq!(metrics.card_click_rate, 1.5);
}

#[test]
fn fractional_counts_keep_precision() {
    let video = raw(json!({"video_id": "f", "views": 8, "likes": 2.5, "comments": "0.25"}));

    let metrics = MetricsNormalizer::new().normalize_metrics(&video).unwrap();

    assert_eq!(metrics.likes, 2.5);
    assert_eq!(metrics.comments, 0.25);
    assert!((metrics.engagement_rate().unwrap() - 34.375).abs() < 1e-9);
}

#[test]
fn very_large_integers_are_accepted() {
    let video = raw(json!({"video_id": "big", "views": "123456789012345678901234567890"}));

    let metrics = MetricsNormalizer::new().normalize_metrics(&video).unwrap();

    assert!((metrics.views - 1.2345678901234568e29).abs() / 1e29 < 1e-9);
}

#[test]
fn missing_or_zero_views_are_invalid() {
    let normalizer = MetricsNormalizer::new();
    let cases = [
        json!({"video_id": "a", "likes": 3}),
        json!({"video_id": "b", "views": null}),
        json!({"video_id": "c", "views": "0"}),
        json!({"video_id": "d", "views": "   "}),
    ];

    for case in cases {
        let result = normalizer.normalize_metrics(&raw(case));
        assert!(matches!(result, Err(InsightsError::InvalidMetrics { .. })));
    }
}

#[test]
fn unusable_values_are_invalid() {
    let normalizer = MetricsNormalizer::new();
    let cases = [
        json!({"video_id": "neg", "views": 10, "likes": -1}),
        json!({"video_id": "text", "views": 10, "shares": "many"}),
        json!({"video_id": "bool", "views": 10, "comments": true}),
        json!({"video_id": "inf", "views": "inf"}),
        json!({"video_id": "  ", "views": 10}),
    ];

    for case in cases {
        let result = normalizer.normalize_metrics(&raw(case));
        assert!(matches!(result, Err(InsightsError::InvalidMetrics { .. })));
    }
}

#[test]
fn camel_case_fields_are_recognised() {
    let videos = parse_videos(
        r#"{
            "videoId": "cc",
            "viewCount": "2000",
            "subscribersGained": 4,
            "estimatedMinutesWatched": 120,
            "averageViewPercentage": 33.3,
            "cardClickRate": 0.4,
            "averageViewDuration": 95
        }"#,
    )
    .unwrap();

    let metrics = MetricsNormalizer::new().normalize_metrics(&videos[0]).unwrap();

    assert_eq!(metrics.video_id, "cc");
    assert_eq!(metrics.views, 2000.0);
    assert_eq!(metrics.subscribers_gained, 4.0);
    assert_eq!(metrics.watch_time_minutes, 120.0);
    assert_eq!(metrics.average_view_duration, 95.0);
}

#[test]
fn retention_points_keep_elapsed_time() {
    let video = raw(json!({
        "video_id": "r",
        "views": 10,
        "retention": [
            {"elapsed": 0.0, "ratio": "1.0"},
            {"elapsed": 0.01, "ratio": 0.95},
            {"elapsed": 0.02, "ratio": "bad"}
        ],
        "relative_retention": [0.5, "0.6"]
    }));

    let record = MetricsNormalizer::new().normalize(&video).unwrap();

    assert_eq!(record.retention.elapsed(), Some(&[0.0, 0.01, 0.02][..]));
    assert_eq!(record.retention.ratios()[..2], [1.0, 0.95]);
    assert!(record.retention.ratios()[2].is_nan());
    assert_eq!(record.relative_retention, vec![0.5, 0.6]);
}

#[test]
fn bare_retention_ratios_are_accepted() {
    let video = raw(json!({"video_id": "r", "views": 10, "retention": [0.9, "0.8", 0.7]}));

    let record = MetricsNormalizer::new().normalize(&video).unwrap();

    assert_eq!(record.retention.ratios(), &[0.9, 0.8, 0.7]);
    assert_eq!(record.retention.elapsed(), None);
}

#[test]
fn parse_videos_accepts_object_or_array() {
    let one = parse_videos(r#"{"video_id": "x", "views": 1}"#).unwrap();
    let many = parse_videos(r#"[{"video_id": "x"}, {"video_id": "y"}]"#).unwrap();

    assert_eq!(one.len(), 1);
    assert_eq!(many.len(), 2);
    assert!(parse_videos("not json").is_err());
}

#[test]
fn analyze_video_builds_full_report() {
    let mut retention: Vec<f64> = vec![0.5; 100];
    retention[0] = 0.95;
    let video = raw(json!({
        "video_id": "weak",
        "title": "My first upload",
        "views": 900,
        "likes": 20,
        "comments": 3,
        "average_view_percentage": 18.0,
        "card_click_rate": 3.0,
        "average_view_duration": 125,
        "retention": retention
    }));
    let mut config = InsightsConfig::default();
    config.advice.seed = Some(7);
    let catalog = Arc::new(AdviceCatalog::builtin());

    let report = analyze_video(&video, &config, catalog.clone()).unwrap();
    let again = analyze_video(&video, &config, catalog).unwrap();

    assert_eq!(report.display_title(), "My first upload");
    assert_eq!(report.engagement_count, 23.0);
    assert_eq!(report.retention.intro_decline, Some(true));
    assert_eq!(report.retention.sustained_decline, Some(false));
    assert_eq!(
        report.advice.categories(),
        vec![
            AdviceCategory::LowViewCount,
            AdviceCategory::LowEngagement,
            AdviceCategory::LowViewPercentage,
            AdviceCategory::IntroDecline,
        ]
    );
    assert_eq!(report.advice, again.advice);
    assert_eq!(report.score.value.to_bits(), again.score.value.to_bits());
    assert_eq!(format_duration(report.average_view_duration), "2:05");
}

#[test]
fn analyze_video_rejects_unscoreable_video() {
    let video = raw(json!({"video_id": "new", "views": 0}));

    let result = analyze_video(&video, &InsightsConfig::default(), Arc::new(AdviceCatalog::builtin()));

    assert!(matches!(result, Err(InsightsError::InvalidMetrics { .. })));
}

#[test]
fn numbers_format_with_separators() {
    assert_eq!(format_number(1234567.4), "1,234,567");
    assert_eq!(format_number(999.0), "999");
}

#[test]
fn wrongly_typed_record_is_kept_for_exclusion() {
    let videos = parse_videos(r#"[{"video_id": "ok", "views": 10}, {"id": 42, "title": 5}]"#).unwrap();

    assert_eq!(videos.len(), 2);
    assert!(videos[0].malformed.is_none());
    assert_eq!(videos[1].video_id, "42");
    assert!(videos[1].malformed.is_some());

    let result = MetricsNormalizer::new().normalize_metrics(&videos[1]);
    match result {
        Err(InsightsError::InvalidMetrics { video_id, reason }) => {
            assert_eq!(video_id, "42");
            assert!(reason.contains("unreadable record"));
        }
        other => panic!("expected InvalidMetrics, got {:?}", other),
    }
}
