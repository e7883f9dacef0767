use crate::error::EngineError;
use crate::models::{EntryMode, RoiTier};
use serde::{Deserialize, Serialize};

/// Tolerance for the signal-weight sum check
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Indicator periods and spans
///
/// All spans/periods are positive integers. EMAs use the span convention
/// alpha = 2/(span+1); RSI/ATR/ADX use Wilder smoothing alpha = 1/period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ema_fast_span: usize,
    pub ema_slow_span: usize,
    pub macd_signal_span: usize,
    pub trend_fast_span: usize,
    pub trend_slow_span: usize,
    pub rsi_period: usize,
    pub atr_period: usize,
    pub adx_period: usize,
    pub donchian_window: usize,
    pub volume_window: usize,
    /// Minimum atr/close ratio for a bar to count as tradable volatility
    pub volatility_threshold: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ema_fast_span: 12,
            ema_slow_span: 26,
            macd_signal_span: 9,
            trend_fast_span: 50,
            trend_slow_span: 200,
            rsi_period: 14,
            atr_period: 14,
            adx_period: 14,
            donchian_window: 20,
            volume_window: 20,
            volatility_threshold: 0.0015,
        }
    }
}

impl IndicatorConfig {
    /// Candles required before every indicator column holds at least one
    /// computed value, so the fill pass can succeed
    pub fn min_history(&self) -> usize {
        [
            self.rsi_period + 1,
            self.atr_period,
            2 * self.adx_period,
            self.donchian_window,
            self.volume_window,
            2, // one-bar lookback for crossover detection
        ]
        .into_iter()
        .max()
        .unwrap_or(2)
    }

    /// Trailing-window capacity: the longest look-back plus headroom so
    /// exponential values have settled by the time they are read
    pub fn window_capacity(&self) -> usize {
        let longest = [
            self.ema_slow_span,
            self.trend_slow_span,
            2 * self.adx_period,
            self.donchian_window,
            self.volume_window,
        ]
        .into_iter()
        .max()
        .unwrap_or(200);
        longest + 50
    }
}

/// Per-source weights of the composite score, summing to 1.0
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub technical: f64,
    pub onchain: f64,
    pub sentiment: f64,
    pub model: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            technical: 0.30,
            onchain: 0.40,
            sentiment: 0.15,
            model: 0.15,
        }
    }
}

impl SignalWeights {
    pub fn sum(&self) -> f64 {
        self.technical + self.onchain + self.sentiment + self.model
    }
}

/// Entry thresholds shared by both modes plus the pullback-specific band
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
    /// Composite score must reach +gate for longs, -gate for shorts
    pub score_gate: f64,
    /// Pullback longs require RSI above this floor
    pub rsi_pullback_long: f64,
    /// Pullback shorts require RSI below this ceiling
    pub rsi_pullback_short: f64,
    /// Max |close/ema_fast - 1| for a pullback touch
    pub pullback_band: f64,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            score_gate: 0.2,
            rsi_pullback_long: 45.0,
            rsi_pullback_short: 55.0,
            pullback_band: 0.002, // ±0.2% around ema_fast
        }
    }
}

/// Exit thresholds, independent per side
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitConfig {
    /// exit_long when RSI drops below this
    pub rsi_exit_long: f64,
    /// exit_short when RSI rises above this
    pub rsi_exit_short: f64,
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self {
            rsi_exit_long: 50.0,
            rsi_exit_short: 50.0,
        }
    }
}

/// Stop-loss, profit table and leverage bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Stop-loss as a negative fraction of entry price
    pub stop_fraction: f64,
    /// Volatility at which leverage scaling starts backing off
    pub reference_volatility: f64,
    pub min_leverage: f64,
    pub max_leverage: f64,
    /// Time-tiered minimum profit targets, ascending by minutes
    pub roi_table: Vec<RoiTier>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            stop_fraction: -0.05,
            reference_volatility: 0.004,
            min_leverage: 1.0,
            max_leverage: 10.0,
            roi_table: vec![
                RoiTier {
                    minutes: 0,
                    min_profit: 0.01,
                },
                RoiTier {
                    minutes: 30,
                    min_profit: 0.005,
                },
                RoiTier {
                    minutes: 90,
                    min_profit: 0.0,
                },
            ],
        }
    }
}

/// External score cache and refresh cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Cache entries older than this read as unavailable
    pub ttl_secs: u64,
    /// Background refresh cadence
    pub refresh_interval_secs: u64,
    /// Per-call provider timeout; the call is abandoned after this
    pub fetch_timeout_secs: u64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 900,
            refresh_interval_secs: 300,
            fetch_timeout_secs: 3,
        }
    }
}

/// Post-trade entry locks
///
/// Windows are wall-clock minutes so the locks are timeframe-independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionConfig {
    /// No new entries this long after any close
    pub cooldown_minutes: u32,
    /// Stop-loss closes counted over this trailing window
    pub stoploss_guard_window_minutes: u32,
    /// Lock entries once this many stop-loss closes fall in the window
    pub stoploss_guard_limit: u32,
    /// Cumulative-loss window
    pub drawdown_window_minutes: u32,
    /// Minimum trades in the window before the drawdown lock can trip
    pub drawdown_trade_limit: u32,
    /// Lock entries once cumulative loss in the window exceeds this
    pub max_allowed_drawdown: f64,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            cooldown_minutes: 25,                 // 5 bars at 5m
            stoploss_guard_window_minutes: 720,   // 144 bars at 5m
            stoploss_guard_limit: 2,
            drawdown_window_minutes: 1440,        // 288 bars at 5m
            drawdown_trade_limit: 10,
            max_allowed_drawdown: 0.08,
        }
    }
}

/// Complete, immutable strategy configuration
///
/// Passed into every component explicitly; nothing reads ambient settings.
/// `validate` runs once at engine construction and any violation is fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub entry_mode: EntryMode,
    pub indicators: IndicatorConfig,
    pub weights: SignalWeights,
    pub entry: EntryConfig,
    pub exit: ExitConfig,
    pub risk: RiskConfig,
    pub signals: SignalConfig,
    pub protections: ProtectionConfig,
}

impl StrategyConfig {
    /// Load from an optional config file plus PERPBOT__* environment
    /// overrides, then validate
    pub fn load(path: Option<&str>) -> Result<Self, EngineError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        let raw = builder
            .add_source(config::Environment::with_prefix("PERPBOT").separator("__"))
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        let loaded: Self = raw
            .try_deserialize()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject any configuration the engine cannot run with
    pub fn validate(&self) -> Result<(), EngineError> {
        self.validate_weights()?;
        self.validate_indicators()?;
        self.validate_entry_exit()?;
        self.validate_risk()?;
        self.validate_signals()?;
        Ok(())
    }

    fn validate_weights(&self) -> Result<(), EngineError> {
        let w = &self.weights;
        for (name, value) in [
            ("technical", w.technical),
            ("onchain", w.onchain),
            ("sentiment", w.sentiment),
            ("model", w.model),
        ] {
            if !(0.0..=1.0).contains(&value) || !value.is_finite() {
                return Err(EngineError::Config(format!(
                    "weight '{}' must be in [0, 1], got {}",
                    name, value
                )));
            }
        }
        let sum = w.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::Config(format!(
                "signal weights must sum to 1.0, got {}",
                sum
            )));
        }
        Ok(())
    }

    fn validate_indicators(&self) -> Result<(), EngineError> {
        let ind = &self.indicators;
        for (name, value) in [
            ("ema_fast_span", ind.ema_fast_span),
            ("ema_slow_span", ind.ema_slow_span),
            ("macd_signal_span", ind.macd_signal_span),
            ("trend_fast_span", ind.trend_fast_span),
            ("trend_slow_span", ind.trend_slow_span),
            ("rsi_period", ind.rsi_period),
            ("atr_period", ind.atr_period),
            ("adx_period", ind.adx_period),
            ("donchian_window", ind.donchian_window),
            ("volume_window", ind.volume_window),
        ] {
            if value == 0 {
                return Err(EngineError::Config(format!(
                    "indicator period '{}' must be positive",
                    name
                )));
            }
        }
        if ind.ema_fast_span >= ind.ema_slow_span {
            return Err(EngineError::Config(format!(
                "ema_fast_span ({}) must be shorter than ema_slow_span ({})",
                ind.ema_fast_span, ind.ema_slow_span
            )));
        }
        if ind.trend_fast_span >= ind.trend_slow_span {
            return Err(EngineError::Config(format!(
                "trend_fast_span ({}) must be shorter than trend_slow_span ({})",
                ind.trend_fast_span, ind.trend_slow_span
            )));
        }
        if ind.volatility_threshold <= 0.0 || !ind.volatility_threshold.is_finite() {
            return Err(EngineError::Config(format!(
                "volatility_threshold must be positive, got {}",
                ind.volatility_threshold
            )));
        }
        Ok(())
    }

    fn validate_entry_exit(&self) -> Result<(), EngineError> {
        let entry = &self.entry;
        if !(0.0..=1.0).contains(&entry.score_gate) {
            return Err(EngineError::Config(format!(
                "score_gate must be in [0, 1], got {}",
                entry.score_gate
            )));
        }
        if entry.pullback_band <= 0.0 || !entry.pullback_band.is_finite() {
            return Err(EngineError::Config(format!(
                "pullback_band must be positive, got {}",
                entry.pullback_band
            )));
        }
        for (name, value) in [
            ("rsi_pullback_long", entry.rsi_pullback_long),
            ("rsi_pullback_short", entry.rsi_pullback_short),
            ("rsi_exit_long", self.exit.rsi_exit_long),
            ("rsi_exit_short", self.exit.rsi_exit_short),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(EngineError::Config(format!(
                    "'{}' must be in [0, 100], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    fn validate_risk(&self) -> Result<(), EngineError> {
        let risk = &self.risk;
        if risk.stop_fraction >= 0.0 || !risk.stop_fraction.is_finite() {
            return Err(EngineError::Config(format!(
                "stop_fraction must be negative, got {}",
                risk.stop_fraction
            )));
        }
        if risk.reference_volatility <= 0.0 || !risk.reference_volatility.is_finite() {
            return Err(EngineError::Config(format!(
                "reference_volatility must be positive, got {}",
                risk.reference_volatility
            )));
        }
        if risk.min_leverage < 1.0 || risk.min_leverage > risk.max_leverage {
            return Err(EngineError::Config(format!(
                "leverage bounds must satisfy 1 <= min <= max, got [{}, {}]",
                risk.min_leverage, risk.max_leverage
            )));
        }
        if risk.roi_table.is_empty() {
            return Err(EngineError::Config("roi_table must not be empty".to_string()));
        }
        for pair in risk.roi_table.windows(2) {
            if pair[1].minutes <= pair[0].minutes {
                return Err(EngineError::Config(format!(
                    "roi_table minutes must be strictly ascending, got {} then {}",
                    pair[0].minutes, pair[1].minutes
                )));
            }
        }
        for tier in &risk.roi_table {
            if tier.min_profit < 0.0 || !tier.min_profit.is_finite() {
                return Err(EngineError::Config(format!(
                    "roi_table min_profit must be non-negative, got {}",
                    tier.min_profit
                )));
            }
        }
        Ok(())
    }

    fn validate_signals(&self) -> Result<(), EngineError> {
        let signals = &self.signals;
        for (name, value) in [
            ("ttl_secs", signals.ttl_secs),
            ("refresh_interval_secs", signals.refresh_interval_secs),
            ("fetch_timeout_secs", signals.fetch_timeout_secs),
        ] {
            if value == 0 {
                return Err(EngineError::Config(format!(
                    "'{}' must be positive",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = StrategyConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = SignalWeights::default();
        assert!((weights.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn test_bad_weight_sum_rejected() {
        let config = StrategyConfig {
            weights: SignalWeights {
                technical: 0.30,
                onchain: 0.40,
                sentiment: 0.15,
                model: 0.10, // sums to 0.95
            },
            ..Default::default()
        };

        let err = config.validate().unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_weight_sum_tolerance_accepted() {
        let config = StrategyConfig {
            weights: SignalWeights {
                technical: 0.30,
                onchain: 0.40,
                sentiment: 0.15,
                model: 0.15 + 5e-10, // inside the 1e-9 tolerance
            },
            ..Default::default()
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_period_rejected() {
        let mut config = StrategyConfig::default();
        config.indicators.rsi_period = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("rsi_period"));
    }

    #[test]
    fn test_inverted_leverage_bounds_rejected() {
        let mut config = StrategyConfig::default();
        config.risk.min_leverage = 5.0;
        config.risk.max_leverage = 2.0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_positive_stop_fraction_rejected() {
        let mut config = StrategyConfig::default();
        config.risk.stop_fraction = 0.05;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsorted_roi_table_rejected() {
        let mut config = StrategyConfig::default();
        config.risk.roi_table = vec![
            RoiTier {
                minutes: 30,
                min_profit: 0.005,
            },
            RoiTier {
                minutes: 0,
                min_profit: 0.01,
            },
        ];

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_history_covers_slowest_indicator() {
        let ind = IndicatorConfig::default();
        // ADX needs two smoothing passes: 2 * 14 = 28 bars
        assert_eq!(ind.min_history(), 28);
        assert!(ind.window_capacity() > ind.trend_slow_span);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = StrategyConfig::load(None).unwrap();
        assert_eq!(config.entry_mode, EntryMode::Breakout);
        assert_eq!(config.indicators.rsi_period, 14);
    }
}
