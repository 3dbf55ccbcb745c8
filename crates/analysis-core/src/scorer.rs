//! Score formula.

use poise_signal_model::signal::AggregateSignal;

/// Lowest possible score.
pub const MIN_SCORE: f64 = 0.0;
/// Highest possible score.
pub const MAX_SCORE: f64 = 10.0;
/// Fixed offset added before clamping.
pub const SCORE_OFFSET: f64 = 3.0;

/// Map averaged signals to a score in `[0, 10]`.
///
/// `raw = 10 * (confidence + eye_contact) / 2 - 2 * nervousness`, then
/// `raw + 3` is clamped. Out-of-range inputs still land in range; a NaN
/// result collapses to 0.
pub fn score(aggregate: &AggregateSignal) -> f64 {
    let raw = 10.0 * (aggregate.confidence + aggregate.eye_contact) / 2.0
        - 2.0 * aggregate.nervousness;
    // max/min (not clamp) so NaN falls to MIN_SCORE instead of propagating.
    (raw + SCORE_OFFSET).max(MIN_SCORE).min(MAX_SCORE)
}
