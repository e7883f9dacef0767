use thiserror::Error;

/// Errors produced by the decision path.
///
/// `Config` is fatal at initialization: the engine refuses to start rather
/// than run with undefined weighting or sizing semantics. `DataQuality` is
/// per-bar: the caller logs it, skips the bar, and continues with the next
/// candle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid config: {0}")]
    Config(String),

    #[error("data quality: {0}")]
    DataQuality(String),
}

/// Errors from external score providers.
///
/// These never cross into the decision path: the signals layer resolves
/// every provider failure to "unavailable" and the aggregator renormalizes
/// the remaining weights.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("score unavailable: {0}")]
    Unavailable(String),

    #[error("provider request failed: {0}")]
    Request(String),
}
