use crate::error::ProviderError;
use crate::models::SignalSource;
use async_trait::async_trait;

/// Capability interface for external score sources (on-chain activity,
/// news sentiment, model predictions)
///
/// Implementations are I/O- or compute-bound and run on a slower cadence
/// than bars; the decision path never calls them directly. It reads their
/// latest value from the score cache, which a background refresher keeps
/// warm. Scores express direction and confidence in [-1, 1].
#[async_trait]
pub trait ScoreProvider: Send + Sync {
    fn source(&self) -> SignalSource;

    /// Latest score for the instrument, or an error when no usable score
    /// exists right now
    async fn get_score(&self, instrument: &str) -> Result<f64, ProviderError>;
}

/// Fixed-score provider for tests and offline replay
pub struct StaticScoreProvider {
    source: SignalSource,
    score: f64,
}

impl StaticScoreProvider {
    pub fn new(source: SignalSource, score: f64) -> Self {
        Self { source, score }
    }
}

#[async_trait]
impl ScoreProvider for StaticScoreProvider {
    fn source(&self) -> SignalSource {
        self.source
    }

    async fn get_score(&self, _instrument: &str) -> Result<f64, ProviderError> {
        Ok(self.score)
    }
}
