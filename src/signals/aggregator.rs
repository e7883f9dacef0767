use crate::config::SignalWeights;
use crate::models::IndicatorSet;

/// Technical read-out of one bar in [-1, 1]
///
/// Mean of three bounded terms: trend alignment (ema50 vs ema200),
/// ATR-normalized MACD histogram, and centered RSI. Each term is already
/// produced by the indicator engine, so the read-out carries no state of
/// its own.
pub fn technical_score(ind: &IndicatorSet) -> f64 {
    let trend = if ind.ema50 > ind.ema200 {
        1.0
    } else if ind.ema50 < ind.ema200 {
        -1.0
    } else {
        0.0
    };

    let momentum = if ind.atr > 0.0 {
        (ind.macd_hist / ind.atr).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    let rsi_bias = ((ind.rsi - 50.0) / 50.0).clamp(-1.0, 1.0);

    (trend + momentum + rsi_bias) / 3.0
}

/// Weighted composite of the technical read-out and the available
/// external scores
///
/// Unavailable sources are excluded and the remaining weights rescaled to
/// sum to 1, so a missing source changes the blend rather than silently
/// dragging the composite toward zero. With every external source
/// unavailable the composite equals the technical component. Pure
/// function; providers are never touched here.
pub fn composite_score(
    technical: f64,
    onchain: Option<f64>,
    sentiment: Option<f64>,
    model: Option<f64>,
    weights: &SignalWeights,
) -> f64 {
    let mut weighted = technical * weights.technical;
    let mut total = weights.technical;

    for (score, weight) in [
        (onchain, weights.onchain),
        (sentiment, weights.sentiment),
        (model, weights.model),
    ] {
        if let Some(score) = score {
            weighted += score * weight;
            total += weight;
        }
    }

    if total <= 0.0 {
        // degenerate weighting (technical weight 0, nothing available)
        return technical.clamp(-1.0, 1.0);
    }

    (weighted / total).clamp(-1.0, 1.0)
}
