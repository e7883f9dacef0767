/// Indicator engine: derives the full IndicatorSet series for a candle
/// window and applies the fill policy.
///
/// Columns that cannot be computed yet (insufficient history) are
/// forward-filled then back-filled from the nearest valid neighbor,
/// exactly once per column. A non-finite value surviving that pass is a
/// data quality error - it is never masked a second time.
use super::adx::adx_series;
use super::atr::atr_series;
use super::donchian::donchian_series;
use super::macd::macd_series;
use super::moving_average::ema_series;
use super::rsi::rsi_series;
use super::volume::volume_fraction_series;
use crate::config::IndicatorConfig;
use crate::error::EngineError;
use crate::models::{Candle, IndicatorSet};

#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Derive one IndicatorSet per candle
    ///
    /// Deterministic: identical candle slices yield bit-identical output.
    pub fn compute(&self, candles: &[Candle]) -> Result<Vec<IndicatorSet>, EngineError> {
        if candles.is_empty() {
            return Ok(Vec::new());
        }

        let cfg = &self.config;
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();

        let macd = macd_series(
            &closes,
            cfg.ema_fast_span,
            cfg.ema_slow_span,
            cfg.macd_signal_span,
        );
        let ema_fast = ema_series(&closes, cfg.ema_fast_span);
        let ema_slow = ema_series(&closes, cfg.ema_slow_span);
        let ema50 = ema_series(&closes, cfg.trend_fast_span);
        let ema200 = ema_series(&closes, cfg.trend_slow_span);

        // EMA-derived columns are defined from bar 0; a non-finite value
        // here means the input itself was poisoned
        for (name, column) in [
            ("ema_fast", &ema_fast),
            ("ema_slow", &ema_slow),
            ("ema50", &ema50),
            ("ema200", &ema200),
            ("macd", &macd.macd),
            ("macd_signal", &macd.signal),
            ("macd_hist", &macd.hist),
        ] {
            ensure_finite(name, column)?;
        }

        let rsi = fill_column(rsi_series(&closes, cfg.rsi_period), "rsi")?;
        let atr = fill_column(atr_series(candles, cfg.atr_period), "atr")?;
        let adx = fill_column(adx_series(candles, cfg.adx_period), "adx")?;

        let donchian = donchian_series(candles, cfg.donchian_window);
        let donchian_high = fill_column(donchian.high, "donchian_high")?;
        let donchian_low = fill_column(donchian.low, "donchian_low")?;

        let volume_fraction = fill_column(
            volume_fraction_series(&volumes, cfg.volume_window),
            "volume_fraction",
        )?;

        let sets = (0..candles.len())
            .map(|i| {
                let close = closes[i];
                // defensive: a non-positive close can never be tradable
                let vol_ok = close > 0.0 && atr[i] / close > cfg.volatility_threshold;
                IndicatorSet {
                    ema_fast: ema_fast[i],
                    ema_slow: ema_slow[i],
                    macd: macd.macd[i],
                    macd_signal: macd.signal[i],
                    macd_hist: macd.hist[i],
                    ema50: ema50[i],
                    ema200: ema200[i],
                    rsi: rsi[i],
                    atr: atr[i],
                    adx: adx[i],
                    donchian_high: donchian_high[i],
                    donchian_low: donchian_low[i],
                    volume_fraction: volume_fraction[i],
                    vol_ok,
                }
            })
            .collect();

        Ok(sets)
    }
}

/// Forward-fill then back-fill a column, once
///
/// Only genuinely missing values (warm-up gaps) are filled. A computed
/// non-finite value is left in place so the final check rejects it.
fn fill_column(column: Vec<Option<f64>>, name: &str) -> Result<Vec<f64>, EngineError> {
    let mut filled: Vec<Option<f64>> = Vec::with_capacity(column.len());
    let mut last: Option<f64> = None;
    for value in column {
        if let Some(x) = value {
            if x.is_finite() {
                last = Some(x);
            }
        }
        filled.push(value.or(last));
    }

    let mut next: Option<f64> = None;
    for slot in filled.iter_mut().rev() {
        match slot {
            Some(x) if x.is_finite() => next = Some(*x),
            Some(_) => {}
            None => *slot = next,
        }
    }

    filled
        .into_iter()
        .enumerate()
        .map(|(i, value)| match value {
            Some(x) if x.is_finite() => Ok(x),
            _ => Err(EngineError::DataQuality(format!(
                "indicator column '{}' is non-finite at bar {} after fill",
                name, i
            ))),
        })
        .collect()
}

fn ensure_finite(name: &str, column: &[f64]) -> Result<(), EngineError> {
    for (i, value) in column.iter().enumerate() {
        if !value.is_finite() {
            return Err(EngineError::DataQuality(format!(
                "indicator column '{}' is non-finite at bar {}",
                name, i
            )));
        }
    }
    Ok(())
}
