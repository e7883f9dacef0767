// Technical indicators module
// Implements EMA, MACD, RSI, ATR, ADX, Donchian and relative volume

pub mod adx;
pub mod atr;
pub mod donchian;
pub mod engine;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod volume;

pub use adx::adx_series;
pub use atr::{atr_series, true_ranges};
pub use donchian::{donchian_series, DonchianSeries};
pub use engine::IndicatorEngine;
pub use macd::{macd_series, MacdSeries};
pub use moving_average::{ema_series, rolling_mean, wilder_series};
pub use rsi::rsi_series;
pub use volume::volume_fraction_series;
