use anyhow::Result;
use clap::{Parser, ValueEnum};
use perpbot::backtest::{replay, MarketScenario, ReplaySummary, SyntheticDataGenerator};
use perpbot::models::SignalSource;
use perpbot::signals::{ScoreCache, ScoreProvider, SignalRefresher, StaticScoreProvider};
use perpbot::{DecisionEngine, StrategyConfig};
use std::sync::Arc;

const INSTRUMENT: &str = "SYNTH";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scenario {
    Uptrend,
    Downtrend,
    Sideways,
    Volatile,
    Flat,
}

impl From<Scenario> for MarketScenario {
    fn from(value: Scenario) -> Self {
        match value {
            Scenario::Uptrend => MarketScenario::Uptrend,
            Scenario::Downtrend => MarketScenario::Downtrend,
            Scenario::Sideways => MarketScenario::Sideways,
            Scenario::Volatile => MarketScenario::Volatile,
            Scenario::Flat => MarketScenario::Flat,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "perpbot",
    about = "Multi-signal leveraged trading decision engine"
)]
struct Args {
    /// Config file (TOML/YAML/JSON); PERPBOT__* env vars override it
    #[arg(short, long)]
    config: Option<String>,

    /// Market scenario to replay
    #[arg(short, long, value_enum, default_value_t = Scenario::Uptrend)]
    scenario: Scenario,

    /// Number of candles to generate
    #[arg(short = 'n', long, default_value_t = 500)]
    candles: usize,

    /// Minutes per candle
    #[arg(long, default_value_t = 5)]
    interval: i64,

    /// RNG seed for the synthetic series
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Emit the summary as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let args = Args::parse();
    let config = StrategyConfig::load(args.config.as_deref())?;

    tracing::info!(
        "🚀 perpbot decision replay starting ({:?} scenario, {:?} entry mode)",
        args.scenario,
        config.entry_mode
    );

    // Offline stand-ins for the on-chain / sentiment / model clients;
    // real providers plug in through the same trait
    let cache = ScoreCache::new(config.signals.ttl_secs);
    let providers: Vec<Arc<dyn ScoreProvider>> = vec![
        Arc::new(StaticScoreProvider::new(SignalSource::OnChain, 0.5)),
        Arc::new(StaticScoreProvider::new(SignalSource::Sentiment, 0.2)),
        Arc::new(StaticScoreProvider::new(SignalSource::Model, 0.1)),
    ];
    let refresher = SignalRefresher::new(
        cache.clone(),
        providers,
        vec![INSTRUMENT.to_string()],
        &config.signals,
    );
    refresher.refresh_once().await;

    let mut generator = SyntheticDataGenerator::new(args.seed).with_token(INSTRUMENT);
    let candles = generator.generate(args.scenario.into(), args.candles, args.interval);

    let mut engine = DecisionEngine::new(INSTRUMENT, config, cache)?;
    let summary = replay(&mut engine, candles);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &ReplaySummary) {
    println!("\n═══════════════ REPLAY SUMMARY ═══════════════");
    println!("{:<20} {:>10}", "Bars", summary.bars);
    println!("{:<20} {:>10}", "Warm-up", summary.warmup);
    println!("{:<20} {:>10}", "Skipped", summary.skipped);
    println!("{:<20} {:>10}", "Decisions", summary.decisions);
    println!("{}", "─".repeat(46));
    println!("{:<20} {:>10}", "Long entries", summary.long_entries);
    println!("{:<20} {:>10}", "Short entries", summary.short_entries);
    println!("{:<20} {:>10}", "Long exits", summary.long_exits);
    println!("{:<20} {:>10}", "Short exits", summary.short_exits);
    println!("══════════════════════════════════════════════\n");
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("perpbot=info")),
        )
        .init();
}
