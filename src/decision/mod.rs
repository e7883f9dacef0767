// Per-instrument decision pipeline

use crate::config::StrategyConfig;
use crate::error::EngineError;
use crate::indicators::IndicatorEngine;
use crate::models::{Candle, DecisionRecord, SignalSource, TradeOutcome};
use crate::risk::{self, Protections};
use crate::signals::{composite_score, technical_score, ScoreCache};
use crate::strategy::{EntryFlags, EntryRule, ExitRule};
use std::collections::VecDeque;

/// Strictly ordered fold over one instrument's candle stream
///
/// Owns the trailing candle window and the entry/exit rules constructed
/// once from a validated config; reads external scores from the shared
/// cache without ever blocking on a fetch. One engine per instrument,
/// sharing no mutable state with other engines, so instruments can run on
/// independent workers.
pub struct DecisionEngine {
    config: StrategyConfig,
    indicator_engine: IndicatorEngine,
    entry_rule: EntryRule,
    exit_rule: ExitRule,
    protections: Protections,
    cache: ScoreCache,
    token: String,
    window: VecDeque<Candle>,
    capacity: usize,
    min_history: usize,
    outcomes: Vec<TradeOutcome>,
}

impl DecisionEngine {
    /// Build an engine for one instrument; any config violation is fatal
    /// here, before the first bar
    pub fn new(token: &str, config: StrategyConfig, cache: ScoreCache) -> Result<Self, EngineError> {
        config.validate()?;

        let entry_rule = EntryRule::from_config(config.entry_mode, &config.entry);
        let exit_rule = ExitRule::from_config(&config.exit);
        let protections = Protections::new(config.protections.clone());
        let indicator_engine = IndicatorEngine::new(config.indicators.clone());
        let capacity = config.indicators.window_capacity();
        let min_history = config.indicators.min_history();

        Ok(Self {
            config,
            indicator_engine,
            entry_rule,
            exit_rule,
            protections,
            cache,
            token: token.to_string(),
            window: VecDeque::with_capacity(capacity + 1),
            capacity,
            min_history,
            outcomes: Vec::new(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Candles required before decisions are emitted
    pub fn min_history(&self) -> usize {
        self.min_history
    }

    /// Report a closed trade so the protection locks can account for it
    pub fn record_outcome(&mut self, outcome: TradeOutcome) {
        let horizon = outcome.closed_at - self.protections.retention();
        self.outcomes.push(outcome);
        self.outcomes.retain(|t| t.closed_at >= horizon);
    }

    /// Evaluate the next candle
    ///
    /// Returns Ok(None) while the window is still warming up. A
    /// DataQuality error means this bar is skipped: log it and continue
    /// with the next candle; the engine state stays consistent.
    pub fn on_candle(&mut self, candle: Candle) -> Result<Option<DecisionRecord>, EngineError> {
        if candle.token != self.token {
            return Err(EngineError::DataQuality(format!(
                "candle for '{}' fed to '{}' engine",
                candle.token, self.token
            )));
        }
        if let Some(last) = self.window.back() {
            if candle.timestamp <= last.timestamp {
                return Err(EngineError::DataQuality(format!(
                    "out-of-order candle: {} after {}",
                    candle.timestamp, last.timestamp
                )));
            }
        }

        let timestamp = candle.timestamp;
        let close = candle.close;

        self.window.push_back(candle);
        while self.window.len() > self.capacity {
            self.window.pop_front();
        }

        if self.window.len() < self.min_history {
            tracing::debug!(
                "{}: warming up, {}/{} candles",
                self.token,
                self.window.len(),
                self.min_history
            );
            return Ok(None);
        }

        let sets = {
            let candles: &[Candle] = self.window.make_contiguous();
            self.indicator_engine.compute(candles)?
        };
        let [.., prev, curr] = sets.as_slice() else {
            return Err(EngineError::DataQuality(
                "indicator series shorter than two bars".to_string(),
            ));
        };

        let technical = technical_score(curr);
        let onchain = self.cache.get(&self.token, SignalSource::OnChain, timestamp);
        let sentiment = self.cache.get(&self.token, SignalSource::Sentiment, timestamp);
        let model = self.cache.get(&self.token, SignalSource::Model, timestamp);
        let score = composite_score(technical, onchain, sentiment, model, &self.config.weights);

        let mut entry = self.entry_rule.evaluate(prev, curr, close, score)?;
        if entry.enter_long || entry.enter_short {
            if let Err(lock) = self.protections.check(timestamp, &self.outcomes) {
                tracing::info!("{}: entry suppressed by {} lock", self.token, lock);
                entry = EntryFlags::default();
            }
        }

        let exit = self.exit_rule.evaluate(curr);

        let volatility = if close > 0.0 { curr.atr / close } else { 0.0 };
        let risk = risk::assess(volatility, score, &self.config.risk);

        tracing::debug!(
            "{} @ {}: score={:.3} entry=({}, {}) exit=({}, {}) leverage={:.1}",
            self.token,
            timestamp,
            score,
            entry.enter_long,
            entry.enter_short,
            exit.exit_long,
            exit.exit_short,
            risk.leverage
        );

        Ok(Some(DecisionRecord {
            token: self.token.clone(),
            timestamp,
            enter_long: entry.enter_long,
            enter_short: entry.enter_short,
            exit_long: exit.exit_long,
            exit_short: exit.exit_short,
            composite_score: score,
            risk,
        }))
    }
}
