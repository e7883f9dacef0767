// Core modules
pub mod backtest;
pub mod config;
pub mod decision;
pub mod error;
pub mod indicators;
pub mod models;
pub mod risk;
pub mod signals;
pub mod strategy;

// Re-export commonly used types
pub use config::StrategyConfig;
pub use decision::DecisionEngine;
pub use error::{EngineError, ProviderError};
pub use models::*;
pub use signals::{ScoreCache, ScoreProvider, SignalRefresher};
