use crate::models::Candle;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Market scenario types for synthetic data generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketScenario {
    /// Steady uptrend with noise (+2% daily average)
    Uptrend,
    /// Steady downtrend with noise (-2% daily average)
    Downtrend,
    /// Sideways market oscillating around the base price
    Sideways,
    /// High volatility (±5% swings)
    Volatile,
    /// Perfectly flat: open = high = low = close on every bar
    Flat,
}

/// Generates synthetic candle series for decision replay
///
/// Seeded for reproducibility: the same seed and scenario always produce
/// the same candles.
pub struct SyntheticDataGenerator {
    rng: StdRng,
    token: String,
    base_price: f64,
    base_volume: f64,
}

impl SyntheticDataGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            token: "SYNTH".to_string(),
            base_price: 150.0,
            base_volume: 1_000_000.0,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = token.to_string();
        self
    }

    /// Generate candles for a scenario
    ///
    /// # Arguments
    /// * `scenario` - The market shape to simulate
    /// * `num_candles` - Number of candles (recommend 300+ so the trend
    ///   EMAs settle)
    /// * `interval_minutes` - Minutes between candles
    pub fn generate(
        &mut self,
        scenario: MarketScenario,
        num_candles: usize,
        interval_minutes: i64,
    ) -> Vec<Candle> {
        let start_time = Utc::now() - Duration::minutes(num_candles as i64 * interval_minutes);

        if scenario == MarketScenario::Flat {
            return self.generate_flat(start_time, num_candles, interval_minutes);
        }

        // per-bar drift and noise amplitude per scenario, assuming 5m bars
        let (drift, noise) = match scenario {
            MarketScenario::Uptrend => (0.02 / 288.0, 0.002),
            MarketScenario::Downtrend => (-0.02 / 288.0, 0.002),
            MarketScenario::Sideways => (0.0, 0.003),
            MarketScenario::Volatile => (0.0, 0.02),
            MarketScenario::Flat => unreachable!(),
        };

        let mut candles = Vec::with_capacity(num_candles);
        let mut price = self.base_price;

        for i in 0..num_candles {
            let open = price;
            let step: f64 = self.rng.gen_range(-noise..noise);
            price *= 1.0 + drift + step;

            // Sideways mean-reverts toward the base price
            if scenario == MarketScenario::Sideways {
                price += (self.base_price - price) * 0.05;
            }

            let close = price;
            let wick: f64 = self.rng.gen_range(0.0..noise / 2.0);
            let high = open.max(close) * (1.0 + wick);
            let low = open.min(close) * (1.0 - wick);
            let volume = self.base_volume * self.rng.gen_range(0.5..1.5);

            candles.push(self.candle(start_time, i, interval_minutes, open, high, low, close, volume));
        }

        candles
    }

    fn generate_flat(
        &mut self,
        start_time: DateTime<Utc>,
        num_candles: usize,
        interval_minutes: i64,
    ) -> Vec<Candle> {
        (0..num_candles)
            .map(|i| {
                self.candle(
                    start_time,
                    i,
                    interval_minutes,
                    self.base_price,
                    self.base_price,
                    self.base_price,
                    self.base_price,
                    self.base_volume,
                )
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn candle(
        &self,
        start_time: DateTime<Utc>,
        index: usize,
        interval_minutes: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Candle {
        Candle {
            token: self.token.clone(),
            timestamp: start_time + Duration::minutes(index as i64 * interval_minutes),
            open,
            high,
            low,
            close,
            volume,
        }
    }
}
