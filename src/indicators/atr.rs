/// Average True Range (ATR) indicator
///
/// Measures volatility as a Wilder-smoothed average of true ranges.
/// True Range is the greatest of:
/// - Current High - Current Low
/// - Abs(Current High - Previous Close)
/// - Abs(Current Low - Previous Close)
///
/// The first bar has no previous close, so its true range is high - low.
use super::moving_average::wilder_series;
use crate::models::Candle;

/// True range per bar, defined from bar 0
pub fn true_ranges(candles: &[Candle]) -> Vec<f64> {
    let mut out = Vec::with_capacity(candles.len());

    for (i, candle) in candles.iter().enumerate() {
        let range = candle.high - candle.low;
        let tr = if i == 0 {
            range
        } else {
            let prev_close = candles[i - 1].close;
            range
                .max((candle.high - prev_close).abs())
                .max((candle.low - prev_close).abs())
        };
        out.push(tr);
    }

    out
}

/// Wilder-smoothed ATR; None until `period` bars have been absorbed
pub fn atr_series(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let trs: Vec<Option<f64>> = true_ranges(candles).into_iter().map(Some).collect();
    wilder_series(&trs, period)
}
