use crate::config::ExitConfig;
use crate::models::IndicatorSet;

/// Exit flags for one bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitFlags {
    pub exit_long: bool,
    pub exit_short: bool,
}

/// Per-side exit rules, independent of entry mode
///
/// Evaluated every bar whether or not a position is open; the caller acts
/// on a flag only when a matching position exists. A side exits on
/// momentum loss (MACD vs its signal line) or on RSI crossing its
/// threshold against the position.
#[derive(Debug, Clone)]
pub struct ExitRule {
    rsi_exit_long: f64,
    rsi_exit_short: f64,
}

impl ExitRule {
    pub fn from_config(config: &ExitConfig) -> Self {
        Self {
            rsi_exit_long: config.rsi_exit_long,
            rsi_exit_short: config.rsi_exit_short,
        }
    }

    pub fn evaluate(&self, ind: &IndicatorSet) -> ExitFlags {
        ExitFlags {
            exit_long: ind.macd < ind.macd_signal || ind.rsi < self.rsi_exit_long,
            exit_short: ind.macd > ind.macd_signal || ind.rsi > self.rsi_exit_short,
        }
    }
}
