use video_insights::analyze_retention;
use video_insights::retention::{MalformedCurve, RetentionAnalyzer, RetentionConfig, RetentionCurve};

fn flat(len: usize, value: f64) -> Vec<f64> {
    vec![value; len]
}

#[test]
fn empty_curve_is_not_applicable() {
    let signals = analyze_retention(&RetentionCurve::default());

    assert_eq!(signals.intro_decline, None);
    assert_eq!(signals.sustained_decline, None);
    assert!(signals.warnings.is_empty());
}

#[test]
fn flat_curve_has_no_declines() {
    let signals = analyze_retention(&RetentionCurve::new(flat(100, 0.8)));

    assert_eq!(signals.intro_decline, Some(false));
    assert_eq!(signals.sustained_decline, Some(false));
}

#[test]
fn intro_drop_at_threshold_triggers() {
    let mut ratios = flat(100, 0.4);
    ratios[0] = 0.7;

    let signals = analyze_retention(&RetentionCurve::new(ratios));

    assert_eq!(signals.intro_decline, Some(true));
    assert_eq!(signals.sustained_decline, Some(false));
}

#[test]
fn intro_drop_below_threshold_does_not_trigger() {
    let mut ratios = flat(100, 0.75);
    ratios[0] = 1.0;

    let signals = analyze_retention(&RetentionCurve::new(ratios));

    assert_eq!(signals.intro_decline, Some(false));
}

#[test]
fn sustained_drop_in_later_decile_triggers() {
    let mut ratios = flat(100, 0.6);
    for value in ratios.iter_mut().skip(59) {
        *value = 0.4;
    }

    let signals = analyze_retention(&RetentionCurve::new(ratios));

    assert_eq!(signals.intro_decline, Some(false));
    assert_eq!(signals.sustained_decline, Some(true));
}

#[test]
fn drop_across_decile_boundary_is_not_a_decline() {
    // Falls between sample 19 and 20, never inside one decile.
    let mut ratios = flat(100, 0.9);
    for value in ratios.iter_mut().skip(20) {
        *value = 0.3;
    }

    let signals = analyze_retention(&RetentionCurve::new(ratios));

    assert_eq!(signals.sustained_decline, Some(false));
}

#[test]
fn partial_trailing_decile_is_skipped() {
    let mut ratios = flat(25, 0.9);
    ratios[24] = 0.1;

    let signals = analyze_retention(&RetentionCurve::new(ratios));

    assert_eq!(signals.sustained_decline, Some(false));
}

#[test]
fn short_curves_are_not_applicable() {
    let tiny = analyze_retention(&RetentionCurve::new(flat(7, 0.5)));
    assert_eq!(tiny.intro_decline, None);
    assert_eq!(tiny.sustained_decline, None);

    let one_decile = analyze_retention(&RetentionCurve::new(flat(15, 0.5)));
    assert_eq!(one_decile.intro_decline, Some(false));
    assert_eq!(one_decile.sustained_decline, None);
}

#[test]
fn out_of_range_sample_skips_affected_check() {
    let mut ratios = flat(30, 0.8);
    ratios[9] = 1.7;
    ratios[20] = 0.9;
    ratios[29] = 0.5;

    let signals = analyze_retention(&RetentionCurve::new(ratios));

    assert_eq!(signals.intro_decline, None);
    assert_eq!(signals.sustained_decline, Some(true));
    assert_eq!(
        signals.warnings,
        vec![MalformedCurve::OutOfRange {
            index: 9,
            value: 1.7
        }]
    );
}

#[test]
fn unreadable_samples_are_reported() {
    let mut ratios = flat(20, 0.5);
    ratios[10] = f64::NAN;

    let signals = analyze_retention(&RetentionCurve::new(ratios));

    assert_eq!(signals.intro_decline, Some(false));
    assert_eq!(signals.sustained_decline, None);
    assert_eq!(signals.warnings.len(), 1);
}

#[test]
fn out_of_order_points_are_reordered() {
    let mut points: Vec<(f64, f64)> = (0..20).map(|i| (i as f64 / 20.0, 0.9)).collect();
    points[9].1 = 0.5;
    points.swap(9, 3);

    let signals = analyze_retention(&RetentionCurve::with_elapsed(points));

    assert_eq!(signals.intro_decline, Some(true));
    assert_eq!(signals.warnings, vec![MalformedCurve::OutOfOrder { index: 4 }]);
}

#[test]
fn custom_decile_length_and_thresholds() {
    let analyzer = RetentionAnalyzer::new(RetentionConfig {
        decile_len: 5,
        intro_drop: 0.5,
        sustained_drop: 0.1,
    });
    let ratios = vec![1.0, 0.9, 0.8, 0.7, 0.6, 0.6, 0.6, 0.55, 0.5, 0.5];

    let signals = analyzer.analyze(&RetentionCurve::new(ratios));

    assert_eq!(signals.intro_decline, Some(false));
    assert_eq!(signals.sustained_decline, Some(true));
}

#[test]
fn drop_just_short_of_threshold_does_not_trigger() {
    let mut ratios = flat(100, 0.4000000005);
    ratios[0] = 0.7;

    let signals = analyze_retention(&RetentionCurve::new(ratios));

    assert_eq!(signals.intro_decline, Some(false));
}

#[test]
fn out_of_range_index_refers_to_input_position() {
    let mut points: Vec<(f64, f64)> = (0..20).rev().map(|i| (i as f64 / 20.0, 0.9)).collect();
    points[2].1 = 1.4;

    let signals = analyze_retention(&RetentionCurve::with_elapsed(points));

    assert_eq!(
        signals.warnings,
        vec![
            MalformedCurve::OutOfOrder { index: 1 },
            MalformedCurve::OutOfRange {
                index: 2,
                value: 1.4
            },
        ]
    );
    assert_eq!(signals.intro_decline, Some(false));
    assert_eq!(signals.sustained_decline, Some(false));
}
