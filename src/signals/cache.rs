use super::provider::ScoreProvider;
use crate::config::SignalConfig;
use crate::models::SignalSource;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A cached external score and the time it was fetched
#[derive(Debug, Clone, Copy)]
struct CachedScore {
    value: f64,
    fetched_at: DateTime<Utc>,
}

/// Thread-safe cache of the latest external scores, keyed by
/// (instrument, source)
///
/// Decision evaluation only ever takes a read lock and never waits on a
/// live fetch. Entries older than the TTL read as unavailable, which the
/// aggregator resolves by renormalizing the remaining weights.
#[derive(Clone)]
pub struct ScoreCache {
    data: Arc<RwLock<HashMap<(String, SignalSource), CachedScore>>>,
    ttl: Duration,
}

impl ScoreCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Store a score, clamping it into [-1, 1]
    pub fn insert(
        &self,
        instrument: &str,
        source: SignalSource,
        value: f64,
        fetched_at: DateTime<Utc>,
    ) {
        if !value.is_finite() {
            tracing::warn!(
                "{} score for {} is non-finite, dropping update",
                source,
                instrument
            );
            return;
        }

        let clamped = value.clamp(-1.0, 1.0);
        if clamped != value {
            tracing::warn!(
                "{} score {} for {} outside [-1, 1], clamped to {}",
                source,
                value,
                instrument,
                clamped
            );
        }

        match self.data.write() {
            Ok(mut data) => {
                data.insert(
                    (instrument.to_string(), source),
                    CachedScore {
                        value: clamped,
                        fetched_at,
                    },
                );
            }
            Err(e) => tracing::warn!("score cache write lock poisoned, dropping update: {}", e),
        }
    }

    /// Latest score for (instrument, source), or None when absent or
    /// older than the TTL as of `now`
    pub fn get(&self, instrument: &str, source: SignalSource, now: DateTime<Utc>) -> Option<f64> {
        let data = match self.data.read() {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("score cache read lock poisoned, treating as unavailable: {}", e);
                return None;
            }
        };

        let entry = data.get(&(instrument.to_string(), source))?;
        let age = now - entry.fetched_at;
        if age > self.ttl {
            tracing::debug!(
                "{} score for {} is stale ({}s old), treating as unavailable",
                source,
                instrument,
                age.num_seconds()
            );
            return None;
        }
        Some(entry.value)
    }
}

/// Background refresher: polls every provider on a fixed cadence and
/// keeps the cache warm
///
/// A failed or timed-out fetch is logged and leaves the previous entry in
/// place; the entry then ages out through the TTL. Nothing here ever
/// blocks or aborts bar evaluation.
pub struct SignalRefresher {
    cache: ScoreCache,
    providers: Vec<Arc<dyn ScoreProvider>>,
    instruments: Vec<String>,
    interval: std::time::Duration,
    fetch_timeout: std::time::Duration,
}

impl SignalRefresher {
    pub fn new(
        cache: ScoreCache,
        providers: Vec<Arc<dyn ScoreProvider>>,
        instruments: Vec<String>,
        config: &SignalConfig,
    ) -> Self {
        Self {
            cache,
            providers,
            instruments,
            interval: std::time::Duration::from_secs(config.refresh_interval_secs),
            fetch_timeout: std::time::Duration::from_secs(config.fetch_timeout_secs),
        }
    }

    /// Refresh every (instrument, provider) pair once
    pub async fn refresh_once(&self) {
        for instrument in &self.instruments {
            for provider in &self.providers {
                let source = provider.source();
                match tokio::time::timeout(self.fetch_timeout, provider.get_score(instrument)).await
                {
                    Ok(Ok(score)) => {
                        tracing::debug!("refreshed {} score for {}: {:.3}", source, instrument, score);
                        self.cache.insert(instrument, source, score, Utc::now());
                    }
                    Ok(Err(e)) => {
                        tracing::warn!("{} score fetch failed for {}: {}", source, instrument, e);
                    }
                    Err(_) => {
                        tracing::warn!(
                            "{} score fetch for {} abandoned after {:?}",
                            source,
                            instrument,
                            self.fetch_timeout
                        );
                    }
                }
            }
        }
    }

    /// Run forever on the configured cadence; spawn on its own task
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            self.refresh_once().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::signals::provider::StaticScoreProvider;
    use async_trait::async_trait;

    struct FailingProvider;

    #[async_trait]
    impl ScoreProvider for FailingProvider {
        fn source(&self) -> SignalSource {
            SignalSource::OnChain
        }

        async fn get_score(&self, _instrument: &str) -> Result<f64, ProviderError> {
            Err(ProviderError::Unavailable("upstream down".to_string()))
        }
    }

    struct StallingProvider;

    #[async_trait]
    impl ScoreProvider for StallingProvider {
        fn source(&self) -> SignalSource {
            SignalSource::Model
        }

        async fn get_score(&self, _instrument: &str) -> Result<f64, ProviderError> {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok(0.9)
        }
    }

    #[test]
    fn test_fresh_entry_is_returned() {
        let cache = ScoreCache::new(900);
        let now = Utc::now();
        cache.insert("SOL", SignalSource::OnChain, 0.5, now);

        assert_eq!(cache.get("SOL", SignalSource::OnChain, now), Some(0.5));
    }

    #[test]
    fn test_stale_entry_reads_unavailable() {
        let cache = ScoreCache::new(900);
        let fetched = Utc::now();
        cache.insert("SOL", SignalSource::Sentiment, 0.5, fetched);

        let later = fetched + Duration::seconds(901);
        assert_eq!(cache.get("SOL", SignalSource::Sentiment, later), None);
    }

    #[test]
    fn test_missing_entry_reads_unavailable() {
        let cache = ScoreCache::new(900);
        assert_eq!(cache.get("SOL", SignalSource::Model, Utc::now()), None);
    }

    #[test]
    fn test_out_of_range_score_clamped() {
        let cache = ScoreCache::new(900);
        let now = Utc::now();
        cache.insert("SOL", SignalSource::Model, 3.5, now);

        assert_eq!(cache.get("SOL", SignalSource::Model, now), Some(1.0));
    }

    #[test]
    fn test_non_finite_score_dropped() {
        let cache = ScoreCache::new(900);
        let now = Utc::now();
        cache.insert("SOL", SignalSource::Model, f64::NAN, now);

        assert_eq!(cache.get("SOL", SignalSource::Model, now), None);
    }

    #[test]
    fn test_entries_keyed_per_instrument() {
        let cache = ScoreCache::new(900);
        let now = Utc::now();
        cache.insert("SOL", SignalSource::OnChain, 0.5, now);
        cache.insert("JUP", SignalSource::OnChain, -0.3, now);

        assert_eq!(cache.get("SOL", SignalSource::OnChain, now), Some(0.5));
        assert_eq!(cache.get("JUP", SignalSource::OnChain, now), Some(-0.3));
    }

    #[tokio::test]
    async fn test_refresh_populates_cache() {
        let cache = ScoreCache::new(900);
        let refresher = SignalRefresher::new(
            cache.clone(),
            vec![Arc::new(StaticScoreProvider::new(SignalSource::Sentiment, 0.25))],
            vec!["SOL".to_string()],
            &SignalConfig::default(),
        );

        refresher.refresh_once().await;
        assert_eq!(
            cache.get("SOL", SignalSource::Sentiment, Utc::now()),
            Some(0.25)
        );
    }

    #[tokio::test]
    async fn test_failing_provider_leaves_cache_untouched() {
        let cache = ScoreCache::new(900);
        let now = Utc::now();
        cache.insert("SOL", SignalSource::OnChain, 0.7, now);

        let refresher = SignalRefresher::new(
            cache.clone(),
            vec![Arc::new(FailingProvider)],
            vec!["SOL".to_string()],
            &SignalConfig::default(),
        );
        refresher.refresh_once().await;

        // previous value survives a failed refresh
        assert_eq!(cache.get("SOL", SignalSource::OnChain, now), Some(0.7));
    }

    #[tokio::test]
    async fn test_stalling_provider_abandoned_after_timeout() {
        let cache = ScoreCache::new(900);
        let refresher = SignalRefresher::new(
            cache.clone(),
            vec![Arc::new(StallingProvider)],
            vec!["SOL".to_string()],
            &SignalConfig {
                fetch_timeout_secs: 1,
                ..Default::default()
            },
        );

        refresher.refresh_once().await;
        assert_eq!(cache.get("SOL", SignalSource::Model, Utc::now()), None);
    }
}
