/// Relative Strength Index (RSI)
///
/// Wilder-style smoothed average of gains versus losses over a period,
/// bounded [0, 100]:
/// - RSI > 70: overbought
/// - RSI < 30: oversold
///
/// The average loss is guarded with a small epsilon; when it is
/// effectively zero the RSI saturates at 100 instead of dividing by zero.
use super::moving_average::wilder_series;

const RS_EPSILON: f64 = 1e-10;

/// RSI over a close series
///
/// None until `period` price changes have been absorbed (the first bar
/// has no change).
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if closes.is_empty() {
        return Vec::new();
    }

    let mut gains: Vec<Option<f64>> = Vec::with_capacity(closes.len());
    let mut losses: Vec<Option<f64>> = Vec::with_capacity(closes.len());
    gains.push(None);
    losses.push(None);

    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(Some(change.max(0.0)));
        losses.push(Some((-change).max(0.0)));
    }

    let avg_gain = wilder_series(&gains, period);
    let avg_loss = wilder_series(&losses, period);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(gain), Some(loss)) => {
                if *loss <= RS_EPSILON {
                    Some(100.0)
                } else {
                    let rs = gain / loss;
                    Some(100.0 - 100.0 / (1.0 + rs))
                }
            }
            _ => None,
        })
        .collect()
}
