//! Order record construction.

use chrono::{DateTime, Utc};
use relay_core::types::{iso_timestamp, OrderAction, OrderRecord, TradingConfig};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::executor::ExecutionError;

/// Derive the order record for a fill at `entry_price`.
///
/// Pure: the same inputs always produce the same record. Missing
/// take-profit/stop-loss percentages count as zero. Percentages that do not
/// fit a `Decimal`, or bracket prices that overflow, are an
/// [`ExecutionError::Order`].
pub fn build_order(
    config: &TradingConfig,
    entry_price: Decimal,
    now: DateTime<Utc>,
) -> Result<OrderRecord, ExecutionError> {
    let (take_profit, stop_loss) = bracket_percentages(config)?;

    let tp_price = bracket_price(entry_price, take_profit, false)
        .ok_or_else(|| out_of_range("take-profit", take_profit))?;
    let sl_price = bracket_price(entry_price, stop_loss, true)
        .ok_or_else(|| out_of_range("stop-loss", stop_loss))?;

    Ok(OrderRecord {
        symbol: config.symbol.clone().unwrap_or_default(),
        action: OrderAction::Buy,
        price_entry: entry_price,
        tp_price: round2(tp_price),
        sl_price: round2(sl_price),
        leverage: leverage_label(config.leverage),
        timeframe: config.timeframe.clone(),
        timestamp: iso_timestamp(now),
    })
}

/// Take-profit and stop-loss percentages as decimals.
///
/// Checked before any exchange call so unusable values never reach a fill.
pub fn bracket_percentages(config: &TradingConfig) -> Result<(Decimal, Decimal), ExecutionError> {
    Ok((
        percent("takeProfit", config.take_profit)?,
        percent("stopLoss", config.stop_loss)?,
    ))
}

/// Fixed two-decimal rendering, half away from zero.
pub fn round2(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

// entry * (1 ± pct / 100), None on overflow
fn bracket_price(entry_price: Decimal, pct: Decimal, below: bool) -> Option<Decimal> {
    let fraction = pct.checked_div(Decimal::ONE_HUNDRED)?;
    let factor = if below {
        Decimal::ONE.checked_sub(fraction)?
    } else {
        Decimal::ONE.checked_add(fraction)?
    };
    entry_price.checked_mul(factor)
}

fn percent(field: &str, value: Option<f64>) -> Result<Decimal, ExecutionError> {
    match value {
        None => Ok(Decimal::ZERO),
        Some(v) => Decimal::try_from(v)
            .map_err(|_| ExecutionError::Order(format!("{} {} is out of range", field, v))),
    }
}

fn out_of_range(label: &str, pct: Decimal) -> ExecutionError {
    ExecutionError::Order(format!("{} of {}% overflows the order price", label, pct))
}

fn leverage_label(leverage: Option<u32>) -> String {
    match leverage {
        Some(l) => format!("{}x", l),
        None => "x".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn config() -> TradingConfig {
        TradingConfig {
            symbol: Some("BTCUSDT".to_string()),
            leverage: Some(10),
            take_profit: Some(5.0),
            stop_loss: Some(2.0),
            timeframe: Some("15m".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_prices() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let order = build_order(&config(), dec("100"), now).unwrap();

        assert_eq!(order.tp_price, "105.00");
        assert_eq!(order.sl_price, "98.00");
        assert_eq!(order.leverage, "10x");
        assert_eq!(order.action, OrderAction::Buy);
        assert_eq!(order.symbol, "BTCUSDT");
        assert_eq!(order.timeframe.as_deref(), Some("15m"));
        assert_eq!(order.timestamp, "2024-01-02T03:04:05.000Z");
        assert_eq!(order.price_entry, dec("100"));
    }

    #[test]
    fn test_is_deterministic() {
        let now = Utc::now();
        let a = build_order(&config(), dec("64250.5"), now).unwrap();
        let b = build_order(&config(), dec("64250.5"), now).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.tp_price, "67463.03");
        assert_eq!(a.sl_price, "62965.49");
    }

    #[test]
    fn test_fractional_percentages() {
        let config = TradingConfig {
            take_profit: Some(1.5),
            stop_loss: Some(0.75),
            ..config()
        };
        let order = build_order(&config, dec("2000"), Utc::now()).unwrap();
        assert_eq!(order.tp_price, "2030.00");
        assert_eq!(order.sl_price, "1985.00");
    }

    #[test]
    fn test_missing_percentages_keep_entry() {
        let config = TradingConfig {
            take_profit: None,
            stop_loss: None,
            leverage: None,
            ..config()
        };
        let order = build_order(&config, dec("12.345"), Utc::now()).unwrap();
        assert_eq!(order.tp_price, "12.35");
        assert_eq!(order.sl_price, "12.35");
        assert_eq!(order.leverage, "x");
    }

    #[test]
    fn test_round2_pads_and_rounds_half_away() {
        assert_eq!(round2(dec("7")), "7.00");
        assert_eq!(round2(dec("0.125")), "0.13");
        assert_eq!(round2(dec("0.124")), "0.12");
        assert_eq!(round2(dec("-0.125")), "-0.13");
    }

    #[test]
    fn test_extreme_percentages_are_errors_not_panics() {
        for pct in [1e27, -1e27, 7.9e28, 1e300, f64::MAX, f64::NAN, f64::INFINITY] {
            let config = TradingConfig {
                take_profit: Some(pct),
                stop_loss: Some(pct),
                ..config()
            };
            let result = build_order(&config, dec("64250.5"), Utc::now());
            assert!(
                matches!(result, Err(ExecutionError::Order(_))),
                "percentage {pct} should be rejected"
            );
        }
    }

    #[test]
    fn test_large_but_representable_percentage() {
        let config = TradingConfig {
            take_profit: Some(1000.0),
            stop_loss: Some(150.0),
            ..config()
        };
        let order = build_order(&config, dec("10"), Utc::now()).unwrap();
        assert_eq!(order.tp_price, "110.00");
        assert_eq!(order.sl_price, "-5.00");
    }

    #[test]
    fn test_unrepresentable_percentage_rejected_up_front() {
        let bad = TradingConfig {
            stop_loss: Some(f64::INFINITY),
            ..config()
        };
        assert!(bracket_percentages(&bad).is_err());
        assert!(bracket_percentages(&config()).is_ok());
    }
}
