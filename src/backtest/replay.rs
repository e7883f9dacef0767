use crate::decision::DecisionEngine;
use crate::models::Candle;
use serde::Serialize;

/// Aggregate tally of one decision replay
///
/// Counts decisions, not trades: execution is the caller's concern, so
/// there is no PnL here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplaySummary {
    pub bars: usize,
    pub warmup: usize,
    pub skipped: usize,
    pub decisions: usize,
    pub long_entries: usize,
    pub short_entries: usize,
    pub long_exits: usize,
    pub short_exits: usize,
}

/// Fold a candle series through the engine
///
/// DataQuality bars are logged and skipped, exactly as a live caller
/// would handle them; the fold always continues with the next candle.
pub fn replay(engine: &mut DecisionEngine, candles: Vec<Candle>) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for candle in candles {
        summary.bars += 1;
        match engine.on_candle(candle) {
            Ok(None) => summary.warmup += 1,
            Ok(Some(record)) => {
                summary.decisions += 1;
                if record.enter_long {
                    summary.long_entries += 1;
                }
                if record.enter_short {
                    summary.short_entries += 1;
                }
                if record.exit_long {
                    summary.long_exits += 1;
                }
                if record.exit_short {
                    summary.short_exits += 1;
                }
            }
            Err(e) => {
                tracing::warn!("{}: bar skipped: {}", engine.token(), e);
                summary.skipped += 1;
            }
        }
    }

    summary
}
