use crate::config::ProtectionConfig;
use crate::models::TradeOutcome;
use chrono::{DateTime, Duration, Utc};

/// Why entries are currently locked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionLock {
    Cooldown,
    StoplossGuard,
    MaxDrawdown,
}

impl std::fmt::Display for ProtectionLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtectionLock::Cooldown => write!(f, "cooldown"),
            ProtectionLock::StoplossGuard => write!(f, "stoploss guard"),
            ProtectionLock::MaxDrawdown => write!(f, "max drawdown"),
        }
    }
}

/// Post-trade entry locks evaluated over recent closed trades
///
/// Three independent guards: a cooldown after any close, a stop-loss
/// counter over a trailing window, and a cumulative-drawdown guard. Only
/// new entries are suppressed while a lock is active; exits always pass.
#[derive(Debug, Clone)]
pub struct Protections {
    config: ProtectionConfig,
}

impl Protections {
    pub fn new(config: ProtectionConfig) -> Self {
        Self { config }
    }

    /// Longest window any guard looks back over; older outcomes can be
    /// discarded by the caller
    pub fn retention(&self) -> Duration {
        let minutes = self
            .config
            .cooldown_minutes
            .max(self.config.stoploss_guard_window_minutes)
            .max(self.config.drawdown_window_minutes);
        Duration::minutes(minutes as i64)
    }

    /// Check whether entries are allowed as of `now`
    pub fn check(
        &self,
        now: DateTime<Utc>,
        history: &[TradeOutcome],
    ) -> Result<(), ProtectionLock> {
        // Cooldown after the most recent close
        if let Some(last_close) = history.iter().map(|t| t.closed_at).max() {
            if now - last_close < Duration::minutes(self.config.cooldown_minutes as i64) {
                return Err(ProtectionLock::Cooldown);
            }
        }

        // Repeated stop-loss hits inside the guard window
        let guard_start =
            now - Duration::minutes(self.config.stoploss_guard_window_minutes as i64);
        let stoploss_hits = history
            .iter()
            .filter(|t| t.was_stoploss && t.closed_at >= guard_start)
            .count() as u32;
        if stoploss_hits >= self.config.stoploss_guard_limit {
            return Err(ProtectionLock::StoplossGuard);
        }

        // Cumulative loss over the drawdown window, once enough trades
        // have closed for the number to mean anything
        let drawdown_start = now - Duration::minutes(self.config.drawdown_window_minutes as i64);
        let recent: Vec<&TradeOutcome> = history
            .iter()
            .filter(|t| t.closed_at >= drawdown_start)
            .collect();
        if recent.len() as u32 >= self.config.drawdown_trade_limit {
            let cumulative: f64 = recent.iter().map(|t| t.profit_ratio).sum();
            if cumulative < -self.config.max_allowed_drawdown {
                return Err(ProtectionLock::MaxDrawdown);
            }
        }

        Ok(())
    }
}
