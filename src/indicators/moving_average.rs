/// Moving-average primitives shared by the indicator modules.
///
/// EMAs use the span convention alpha = 2/(span+1) and are seeded at the
/// first sample, so a value exists from bar 0. Early values are
/// approximate in the exponential-smoothing sense; there is no
/// simple-average warm-up.

/// Exponential moving average over a value series
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    if values.is_empty() || span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = values[0];
    out.push(ema);

    for &value in &values[1..] {
        ema = alpha * value + (1.0 - alpha) * ema;
        out.push(ema);
    }

    out
}

/// Wilder smoothing (alpha = 1/period) over a series that may lead with
/// undefined samples
///
/// The recursion is seeded at the first defined sample, but outputs stay
/// None until `period` samples have been absorbed, matching the
/// min_periods convention: early smoothed values exist internally yet are
/// not exposed.
pub fn wilder_series(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let alpha = 1.0 / period as f64;
    let mut out = Vec::with_capacity(values.len());
    let mut state: Option<f64> = None;
    let mut seen = 0usize;

    for &value in values {
        match value {
            None => out.push(None),
            Some(sample) => {
                seen += 1;
                let smoothed = match state {
                    None => sample,
                    Some(prev) => alpha * sample + (1.0 - alpha) * prev,
                };
                state = Some(smoothed);
                out.push(if seen >= period { Some(smoothed) } else { None });
            }
        }
    }

    out
}

/// Rolling arithmetic mean over a trailing window including the current
/// sample; None until the window is full
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;

    for (i, &value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ema_constant_series_is_constant() {
        let values = vec![42.0; 50];
        let ema = ema_series(&values, 10);

        assert_eq!(ema.len(), 50);
        for value in ema {
            assert_relative_eq!(value, 42.0);
        }
    }

    #[test]
    fn test_ema_seeded_at_first_sample() {
        let values = vec![100.0, 110.0];
        let ema = ema_series(&values, 9);

        assert_eq!(ema[0], 100.0);
        // alpha = 2/10 = 0.2 -> 0.2 * 110 + 0.8 * 100
        assert_relative_eq!(ema[1], 102.0);
    }

    #[test]
    fn test_ema_tracks_trend() {
        let values: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let ema = ema_series(&values, 10);

        // EMA lags a rising series but follows it upward
        assert!(ema[99] < values[99]);
        assert!(ema[99] > ema[50]);
    }

    #[test]
    fn test_wilder_masks_warm_up() {
        let values: Vec<Option<f64>> = (0..10).map(|i| Some(i as f64)).collect();
        let smoothed = wilder_series(&values, 5);

        assert!(smoothed[3].is_none());
        assert!(smoothed[4].is_some());
        assert_eq!(smoothed.len(), 10);
    }

    #[test]
    fn test_wilder_skips_leading_none() {
        let mut values = vec![None, None];
        values.extend((0..6).map(|_| Some(10.0)));
        let smoothed = wilder_series(&values, 3);

        assert!(smoothed[0].is_none());
        assert!(smoothed[3].is_none()); // only two defined samples absorbed
        assert_relative_eq!(smoothed[4].unwrap(), 10.0);
    }

    #[test]
    fn test_rolling_mean_window() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let means = rolling_mean(&values, 3);

        assert!(means[0].is_none());
        assert!(means[1].is_none());
        assert_relative_eq!(means[2].unwrap(), 2.0);
        assert_relative_eq!(means[4].unwrap(), 4.0);
    }
}
