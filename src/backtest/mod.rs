// Synthetic data generation and decision replay

pub mod replay;
pub mod synthetic;

pub use replay::{replay, ReplaySummary};
pub use synthetic::{MarketScenario, SyntheticDataGenerator};
