// External signal layer: provider capability, TTL'd score cache and the
// composite aggregator

pub mod aggregator;
pub mod cache;
pub mod provider;

pub use aggregator::{composite_score, technical_score};
pub use cache::{ScoreCache, SignalRefresher};
pub use provider::{ScoreProvider, StaticScoreProvider};
