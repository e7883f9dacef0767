use crate::config::EntryConfig;
use crate::error::EngineError;
use crate::models::{EntryMode, IndicatorSet};

/// Entry flags for one bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryFlags {
    pub enter_long: bool,
    pub enter_short: bool,
}

/// Mode-specific entry evaluation, selected once at configuration time
///
/// Both variants share the base gate - trend filter, tradable volatility
/// and the composite-score gate - and differ only in the
/// breakout/pullback clause. Modes are never blended: the variant is
/// fixed when the rule is built.
#[derive(Debug, Clone)]
pub enum EntryRule {
    Breakout {
        score_gate: f64,
    },
    Pullback {
        score_gate: f64,
        band: f64,
        rsi_long_floor: f64,
        rsi_short_ceiling: f64,
    },
}

impl EntryRule {
    pub fn from_config(mode: EntryMode, config: &EntryConfig) -> Self {
        match mode {
            EntryMode::Breakout => EntryRule::Breakout {
                score_gate: config.score_gate,
            },
            EntryMode::Pullback => EntryRule::Pullback {
                score_gate: config.score_gate,
                band: config.pullback_band,
                rsi_long_floor: config.rsi_pullback_long,
                rsi_short_ceiling: config.rsi_pullback_short,
            },
        }
    }

    /// Evaluate entry for the current bar
    ///
    /// `prev` is the immediately preceding bar's IndicatorSet: the only
    /// lookback, used for crossover and momentum-direction detection.
    pub fn evaluate(
        &self,
        prev: &IndicatorSet,
        curr: &IndicatorSet,
        close: f64,
        composite: f64,
    ) -> Result<EntryFlags, EngineError> {
        let gate = match self {
            EntryRule::Breakout { score_gate } => *score_gate,
            EntryRule::Pullback { score_gate, .. } => *score_gate,
        };

        // shared base gate; strict trend comparisons keep the sides
        // mutually exclusive
        let long_base = curr.ema50 > curr.ema200 && curr.vol_ok && composite >= gate;
        let short_base = curr.ema50 < curr.ema200 && curr.vol_ok && composite <= -gate;

        let (enter_long, enter_short) = match self {
            EntryRule::Breakout { .. } => {
                // strictly beyond the prior bar's channel, with the
                // histogram accelerating in the entry direction
                let long = long_base
                    && close > prev.donchian_high
                    && curr.macd_hist > prev.macd_hist;
                let short = short_base
                    && close < prev.donchian_low
                    && curr.macd_hist < prev.macd_hist;
                (long, short)
            }
            EntryRule::Pullback {
                band,
                rsi_long_floor,
                rsi_short_ceiling,
                ..
            } => {
                let near_ema =
                    curr.ema_fast > 0.0 && (close / curr.ema_fast - 1.0).abs() <= *band;
                let cross_up = prev.macd_hist <= 0.0 && curr.macd_hist > 0.0;
                let cross_down = prev.macd_hist >= 0.0 && curr.macd_hist < 0.0;

                let long = long_base && near_ema && cross_up && curr.rsi > *rsi_long_floor;
                let short =
                    short_base && near_ema && cross_down && curr.rsi < *rsi_short_ceiling;
                (long, short)
            }
        };

        resolve_flags(enter_long, enter_short)
    }
}

/// Suppress both sides rather than guess when a misconfiguration lets
/// them fire together
fn resolve_flags(enter_long: bool, enter_short: bool) -> Result<EntryFlags, EngineError> {
    if enter_long && enter_short {
        return Err(EngineError::DataQuality(
            "entry conditions true for both sides on the same bar".to_string(),
        ));
    }
    Ok(EntryFlags {
        enter_long,
        enter_short,
    })
}
