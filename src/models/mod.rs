use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV candlestick data, one per instrument per timeframe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub token: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Entry evaluation mode
///
/// Selected once at configuration time; modes are never blended within a
/// run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryMode {
    Breakout,
    Pullback,
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::Breakout
    }
}

/// External signal source identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    OnChain,
    Sentiment,
    Model,
}

impl std::fmt::Display for SignalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalSource::OnChain => write!(f, "onchain"),
            SignalSource::Sentiment => write!(f, "sentiment"),
            SignalSource::Model => write!(f, "model"),
        }
    }
}

/// Derived indicator values for a single bar
///
/// Every float is finite once the indicator engine's fill policy has run;
/// a non-finite value past that point is a data quality error, not a
/// value to be masked again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub ema50: f64,
    pub ema200: f64,
    pub rsi: f64,
    pub atr: f64,
    pub adx: f64,
    pub donchian_high: f64,
    pub donchian_low: f64,
    pub volume_fraction: f64,
    pub vol_ok: bool,
}

/// One tier of the time-based minimum-profit table: after `minutes` of
/// position age, take profit at `min_profit` or better
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiTier {
    pub minutes: u32,
    pub min_profit: f64,
}

/// Sizing parameters attached to every decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskParams {
    /// Stop-loss distance as a (negative) fraction of entry price
    pub stop_fraction: f64,
    pub leverage: f64,
    pub roi_table: Vec<RoiTier>,
}

/// Per-bar decision handed to the execution collaborator
///
/// Produced once per bar and never mutated afterward. The caller acts on
/// exit flags only when a matching position exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub token: String,
    pub timestamp: DateTime<Utc>,
    pub enter_long: bool,
    pub enter_short: bool,
    pub exit_long: bool,
    pub exit_short: bool,
    pub composite_score: f64,
    pub risk: RiskParams,
}

/// Closed-trade result reported back by the execution collaborator,
/// consumed by the protection locks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub token: String,
    pub closed_at: DateTime<Utc>,
    /// Realized profit as a fraction of entry notional (negative = loss)
    pub profit_ratio: f64,
    pub was_stoploss: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candle_creation() {
        let candle = Candle {
            token: "SOL".to_string(),
            timestamp: Utc::now(),
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.5,
            volume: 1000.0,
        };

        assert_eq!(candle.token, "SOL");
        assert!(candle.high >= candle.low);
    }

    #[test]
    fn test_entry_mode_deserializes_lowercase() {
        let mode: EntryMode = serde_json::from_str("\"breakout\"").unwrap();
        assert_eq!(mode, EntryMode::Breakout);

        let mode: EntryMode = serde_json::from_str("\"pullback\"").unwrap();
        assert_eq!(mode, EntryMode::Pullback);
    }

    #[test]
    fn test_signal_source_display() {
        assert_eq!(SignalSource::OnChain.to_string(), "onchain");
        assert_eq!(SignalSource::Sentiment.to_string(), "sentiment");
        assert_eq!(SignalSource::Model.to_string(), "model");
    }

    #[test]
    fn test_decision_record_roundtrip() {
        let record = DecisionRecord {
            token: "SOL".to_string(),
            timestamp: Utc::now(),
            enter_long: true,
            enter_short: false,
            exit_long: false,
            exit_short: false,
            composite_score: 0.42,
            risk: RiskParams {
                stop_fraction: -0.05,
                leverage: 3.0,
                roi_table: vec![RoiTier {
                    minutes: 0,
                    min_profit: 0.01,
                }],
            },
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: DecisionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.token, "SOL");
        assert!(back.enter_long);
        assert_eq!(back.risk.leverage, 3.0);
    }
}
