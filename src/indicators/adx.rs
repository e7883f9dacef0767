/// Average Directional Index (ADX) - trend strength magnitude
///
/// Wilder-smoothed +DM/-DM over smoothed True Range give +DI/-DI; their
/// normalized spread (DX) is smoothed once more into ADX. Used only as a
/// magnitude filter, never for direction:
/// - ADX > 25: strong trend
/// - ADX < 20: weak / choppy
use super::moving_average::wilder_series;
use crate::models::Candle;

/// ADX over a candle slice; None until two smoothing passes have been
/// absorbed (2 * period bars)
pub fn adx_series(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    if candles.len() < 2 {
        return vec![None; candles.len()];
    }

    let mut trs: Vec<Option<f64>> = Vec::with_capacity(candles.len());
    let mut plus_dms: Vec<Option<f64>> = Vec::with_capacity(candles.len());
    let mut minus_dms: Vec<Option<f64>> = Vec::with_capacity(candles.len());
    trs.push(None);
    plus_dms.push(None);
    minus_dms.push(None);

    for pair in candles.windows(2) {
        let prev = &pair[0];
        let curr = &pair[1];

        let tr = (curr.high - curr.low)
            .max((curr.high - prev.close).abs())
            .max((curr.low - prev.close).abs());
        trs.push(Some(tr));

        let up_move = curr.high - prev.high;
        let down_move = prev.low - curr.low;
        plus_dms.push(Some(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        }));
        minus_dms.push(Some(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        }));
    }

    let smoothed_tr = wilder_series(&trs, period);
    let smoothed_plus = wilder_series(&plus_dms, period);
    let smoothed_minus = wilder_series(&minus_dms, period);

    let dx: Vec<Option<f64>> = smoothed_tr
        .iter()
        .zip(smoothed_plus.iter().zip(&smoothed_minus))
        .map(|(tr, (plus, minus))| match (tr, plus, minus) {
            (Some(tr), Some(plus), Some(minus)) if *tr > 0.0 => {
                let plus_di = 100.0 * plus / tr;
                let minus_di = 100.0 * minus / tr;
                let di_sum = plus_di + minus_di;
                if di_sum > 0.0 {
                    Some(100.0 * (plus_di - minus_di).abs() / di_sum)
                } else {
                    Some(0.0)
                }
            }
            (Some(_), Some(_), Some(_)) => Some(0.0),
            _ => None,
        })
        .collect();

    wilder_series(&dx, period)
}
