//! Run a game without a UI and print its log as it plays back.
//!
//! Usage: `cargo run --example headless -- [config.json] [ticks]`
//! `RUST_LOG=faction_sim=debug` shows the engine's own diagnostics.

use std::env;
use std::fs;

use faction_sim::model::Severity;
use faction_sim::{DisplaySink, EngineConfig, GameConfig, LogEntry, LogPlayback, Session, run};
use tracing_subscriber::EnvFilter;

const DEMO_INTERVAL_MS: u64 = 50;

struct Stdout;

impl DisplaySink for Stdout {
    fn display(&mut self, entry: LogEntry) {
        let tag = match entry.severity {
            Severity::Info => "    ",
            Severity::Success => "  + ",
            Severity::Warning => "  ! ",
            Severity::Error => "  - ",
        };
        println!("{tag}{}", entry.message);
    }
}

/// Play back faster than the game UI unless the config picked its own pace.
fn speed_up_default_pacing(engine: &mut EngineConfig) {
    if engine.log_interval_ms == EngineConfig::default().log_interval_ms {
        engine.log_interval_ms = DEMO_INTERVAL_MS;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args().skip(1);
    let mut config = match args.next() {
        Some(path) => GameConfig::from_json(&fs::read_to_string(path)?)?,
        None => GameConfig::default(),
    };
    config.seed.get_or_insert(42);
    speed_up_default_pacing(&mut config.engine);
    let ticks: usize = args.next().map(|t| t.parse()).transpose()?.unwrap_or(10);

    let mut session = Session::from_config(&config)?;
    session.start_game()?;
    let playback = LogPlayback::spawn(Stdout, session.engine());
    session.attach_playback(playback.control());

    for report in run(&mut session, ticks) {
        playback.push(report.logs).await?;
    }
    playback.shutdown().await?;

    let snapshot = session.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
