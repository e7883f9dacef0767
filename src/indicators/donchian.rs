/// Donchian channel - rolling price extremes
///
/// The channel at bar t spans the trailing `window` bars *including* bar
/// t. A breakout is therefore detected by comparing the current close
/// against the previous bar's channel value, which is the extreme of the
/// prior `window` bars.
use crate::models::Candle;

/// Upper and lower channel values, aligned with the input candles
#[derive(Debug, Clone)]
pub struct DonchianSeries {
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
}

/// Rolling max of highs / min of lows; None until the window is full
pub fn donchian_series(candles: &[Candle], window: usize) -> DonchianSeries {
    let mut high = Vec::with_capacity(candles.len());
    let mut low = Vec::with_capacity(candles.len());

    for i in 0..candles.len() {
        if i + 1 < window {
            high.push(None);
            low.push(None);
            continue;
        }
        let slice = &candles[i + 1 - window..=i];
        let max = slice.iter().fold(f64::NEG_INFINITY, |acc, c| acc.max(c.high));
        let min = slice.iter().fold(f64::INFINITY, |acc, c| acc.min(c.low));
        high.push(Some(max));
        low.push(Some(min));
    }

    DonchianSeries { high, low }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Utc;

    fn create_test_candles(highs_lows: &[(f64, f64)]) -> Vec<Candle> {
        highs_lows
            .iter()
            .enumerate()
            .map(|(i, &(high, low))| Candle {
                token: "TEST".to_string(),
                timestamp: Utc::now() + chrono::Duration::minutes(i as i64 * 5),
                open: (high + low) / 2.0,
                high,
                low,
                close: (high + low) / 2.0,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn test_channel_warm_up_masked() {
        let candles = create_test_candles(&[(101.0, 99.0); 10]);
        let channel = donchian_series(&candles, 5);

        assert!(channel.high[3].is_none());
        assert!(channel.high[4].is_some());
        assert_eq!(channel.high.len(), 10);
    }

    #[test]
    fn test_channel_tracks_extremes() {
        let candles = create_test_candles(&[
            (101.0, 99.0),
            (103.0, 98.0),
            (102.0, 97.0),
            (105.0, 100.0),
            (104.0, 101.0),
        ]);
        let channel = donchian_series(&candles, 5);

        assert_relative_eq!(channel.high[4].unwrap(), 105.0);
        assert_relative_eq!(channel.low[4].unwrap(), 97.0);
    }

    #[test]
    fn test_channel_includes_current_bar() {
        let candles = create_test_candles(&[
            (101.0, 99.0),
            (101.0, 99.0),
            (110.0, 99.0), // current bar sets a new high
        ]);
        let channel = donchian_series(&candles, 3);

        assert_relative_eq!(channel.high[2].unwrap(), 110.0);
    }

    #[test]
    fn test_old_extremes_roll_out() {
        let mut bars = vec![(120.0, 80.0)];
        bars.extend(vec![(101.0, 99.0); 5]);
        let candles = create_test_candles(&bars);
        let channel = donchian_series(&candles, 3);

        // The spike at bar 0 is outside the trailing window by bar 5
        assert_relative_eq!(channel.high[5].unwrap(), 101.0);
        assert_relative_eq!(channel.low[5].unwrap(), 99.0);
    }
}
