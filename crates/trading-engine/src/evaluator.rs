//! Buy-signal rule.

use relay_core::types::{Signal, TradingConfig};

/// Returns true when the signal clears every configured threshold:
/// `plusDI > diPlusThreshold`, `minusDI < diMinusThreshold` and
/// `adx > adxMinimum`. A missing value on either side fails its comparison.
pub fn evaluate(config: &TradingConfig, signal: &Signal) -> bool {
    exceeds(signal.plus_di, config.di_plus_threshold)
        && exceeds(config.di_minus_threshold, signal.minus_di)
        && exceeds(signal.adx, config.adx_minimum)
}

fn exceeds(value: Option<f64>, bound: Option<f64>) -> bool {
    matches!((value, bound), (Some(v), Some(b)) if v > b)
}
