//! Common test fixtures for statistics scenarios.
//!
//! Every fixture is deterministic, so expected values can be asserted
//! exactly. Available in unit tests and, with the `test-utils` feature, to
//! integration tests and benchmarks.

use serde_json::{json, Value};

use crate::analyzers::{LabeledValue, Point, Series};

/// Ten evenly spaced values from 10 to 100.
pub fn evenly_spaced() -> Vec<f64> {
    (1..=10).map(|i| f64::from(i) * 10.0).collect()
}

/// Nine small values followed by one extreme spike at index 9.
pub fn spiked() -> Vec<f64> {
    vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0]
}

/// Hourly sensor readings with gaps, a NaN and two spikes.
///
/// Labels are `h00`..`h23`. Valid readings hover around 20; index 7 is a
/// low spike and index 18 a high one.
pub fn sensor_readings() -> Series {
    let values: Vec<Option<f64>> = (0..24)
        .map(|hour| match hour {
            3 | 11 => None,
            15 => Some(f64::NAN),
            7 => Some(-40.0),
            18 => Some(95.0),
            h => Some(20.0 + f64::from(h % 5) * 0.5),
        })
        .collect();
    Series::new(values).with_labels((0..24).map(|h| format!("h{h:02}")))
}

/// Three repeats of the cycle `[10, 15, 20, 5]`.
pub fn seasonal_cycle() -> Vec<f64> {
    [10.0, 15.0, 20.0, 5.0].repeat(3)
}

/// A weekly cycle riding on a linear trend, `weeks` cycles long.
pub fn trending_weekly(weeks: usize) -> Vec<f64> {
    const WEEK: [f64; 7] = [5.0, 7.0, 9.0, 8.0, 6.0, 2.0, 1.0];
    (0..weeks * 7)
        .map(|day| WEEK[day % 7] + day as f64 * 0.1)
        .collect()
}

/// Monthly expenses by category.
pub fn monthly_expenses() -> Vec<LabeledValue> {
    [
        ("rent", 1500.0),
        ("groceries", 420.0),
        ("utilities", 180.0),
        ("transport", 240.0),
        ("insurance", 310.0),
        ("dining", 260.0),
        ("refund", -120.0),
        ("subscriptions", 45.0),
    ]
    .into_iter()
    .map(LabeledValue::from)
    .collect()
}

/// Twelve months of revenue with a steady upward trend and mild noise.
pub fn revenue_points() -> Vec<Point> {
    const NOISE: [f64; 12] = [0.4, -0.3, 0.1, 0.6, -0.5, 0.2, -0.1, 0.3, -0.4, 0.5, -0.2, 0.0];
    NOISE
        .iter()
        .enumerate()
        .map(|(month, noise)| {
            let x = month as f64 + 1.0;
            Point::new(x, 100.0 + 2.5 * x + noise)
        })
        .collect()
}

/// A mixed dataset exercising every quality dimension.
///
/// 20 items: 14 distinct in-range numbers, one duplicate, one out-of-range
/// spike, two nulls, a string and a boolean.
pub fn mixed_quality_items() -> Vec<Value> {
    let mut items: Vec<Value> = (0..14).map(|i| json!(50 + i)).collect();
    items.extend([
        json!(55),
        json!(900),
        Value::Null,
        Value::Null,
        json!("sixty"),
        json!(true),
    ]);
    items
}
