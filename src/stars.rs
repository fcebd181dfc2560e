//! Star strings for review ratings
//!
//! A rating out of five reads as full, half and empty stars, e.g. `3.5` gives
//! `★ ★ ★ ✭ ☆ `.

use serde_json::Value;

pub const FULL_STAR: &str = "★ ";
pub const HALF_STAR: &str = "✭ ";
pub const EMPTY_STAR: &str = "☆ ";

/// Field added to each review by [`annotate`]
pub const STARS_FIELD: &str = "stars";

/// Render a rating as five stars
///
/// The rating is rounded to the nearest half and clamped to `0..=5`. A missing
/// rating counts as zero.
pub fn generate(rating: Option<f64>) -> String {
    let halves = rating
        .filter(|r| r.is_finite())
        .map(|r| (r * 2.0).round().clamp(0.0, 10.0) as usize)
        .unwrap_or(0);

    let full = halves / 2;
    let half = halves % 2;
    let empty = 5 - full - half;

    format!(
        "{}{}{}",
        FULL_STAR.repeat(full),
        HALF_STAR.repeat(half),
        EMPTY_STAR.repeat(empty)
    )
}

/// Numeric rating held by a JSON value, accepting numeric strings
pub fn rating_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Add a `stars` string to every review object, read from `rating_key`
///
/// Reviews that are not objects are left alone.
pub fn annotate(reviews: &mut [Value], rating_key: &str) {
    for review in reviews {
        let Value::Object(fields) = review else {
            continue;
        };
        let rating = fields.get(rating_key).and_then(rating_of);
        fields.insert(STARS_FIELD.to_string(), Value::String(generate(rating)));
    }
}
