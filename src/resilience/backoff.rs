//! Exponential cooldown with jitter.

use std::time::Duration;

use crate::config::CooldownConfig;
use crate::sources::RandomSource;

/// Calculate how long a target stays excluded after its `error_count`-th failure.
///
/// `base * factor^min(error_count - 1, max_exponent)`, scaled by a uniform
/// jitter in `[-jitter_ratio, +jitter_ratio)`, then capped at `max_secs`.
pub fn calculate_cooldown(
    error_count: u32,
    config: &CooldownConfig,
    random: &dyn RandomSource,
) -> Duration {
    if error_count == 0 {
        return Duration::ZERO;
    }

    let cap = Duration::from_secs(config.max_secs);
    let exponent = (error_count - 1).min(config.max_exponent);
    let multiplier = config.factor.powi(i32::try_from(exponent).unwrap_or(i32::MAX));
    let cooldown = config.base_secs as f64 * multiplier;

    let jitter = (random.next_f64() * 2.0 - 1.0) * config.jitter_ratio;
    let jittered = (cooldown * (1.0 + jitter)).max(0.0);

    // Infinite or out-of-range products saturate at the cap.
    Duration::try_from_secs_f64(jittered).map_or(cap, |d| d.min(cap))
}
