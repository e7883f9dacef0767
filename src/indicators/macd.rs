/// Moving Average Convergence Divergence (MACD)
///
/// MACD = EMA(close, fast) - EMA(close, slow); the signal line is an EMA
/// of the MACD itself and the histogram is their difference. The
/// histogram's bar-to-bar change and zero crossings drive momentum
/// confirmation in the entry rules.
use super::moving_average::ema_series;

/// MACD line, signal line and histogram, aligned with the input series
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub hist: Vec<f64>,
}

/// Compute MACD over a close series
///
/// Defined from bar 0 via exponential initialization; early values are
/// approximate until the slow span has been absorbed.
pub fn macd_series(
    closes: &[f64],
    fast_span: usize,
    slow_span: usize,
    signal_span: usize,
) -> MacdSeries {
    let fast = ema_series(closes, fast_span);
    let slow = ema_series(closes, slow_span);

    let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema_series(&macd, signal_span);
    let hist: Vec<f64> = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

    MacdSeries { macd, signal, hist }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_macd_flat_series_is_zero() {
        let closes = vec![100.0; 60];
        let macd = macd_series(&closes, 12, 26, 9);

        for i in 0..60 {
            assert_relative_eq!(macd.macd[i], 0.0);
            assert_relative_eq!(macd.signal[i], 0.0);
            assert_relative_eq!(macd.hist[i], 0.0);
        }
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let macd = macd_series(&closes, 12, 26, 9);

        // Fast EMA sits above slow EMA in a sustained uptrend
        assert!(macd.macd[99] > 0.0);
        assert!(macd.hist.len() == 100);
    }

    #[test]
    fn test_histogram_is_macd_minus_signal() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64).sin() * 5.0).collect();
        let macd = macd_series(&closes, 12, 26, 9);

        for i in 0..50 {
            assert_relative_eq!(macd.hist[i], macd.macd[i] - macd.signal[i]);
        }
    }

    #[test]
    fn test_histogram_flips_on_reversal() {
        // Long climb then sharp reversal drives the histogram negative
        let mut closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
        closes.extend((0..40).map(|i| 180.0 - i as f64 * 3.0));
        let macd = macd_series(&closes, 12, 26, 9);

        assert!(macd.hist[79] > 0.0);
        assert!(macd.hist[119] < 0.0);
    }
}
