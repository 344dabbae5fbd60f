use anyhow::Result;
use matchday::{init_tracing_with_level, BotConfig, Heartbeat, MatchdayApp, Shutdown};
use matchday_bot::bin_common::{load_config_from_env, ConfigType};
use std::time::Duration;
use tracing::info;

const HEARTBEAT_INTERVAL_SECS: u64 = 300;

#[tokio::main]
async fn main() -> Result<()> {
    // Load config first (before logging is initialized)
    let config_path = load_config_from_env(ConfigType::Bot);
    let config = BotConfig::load(&config_path)?;

    // Initialize logging with configured level
    init_tracing_with_level(&config.log_level);
    config.log();

    let app = MatchdayApp::from_config(&config);

    print_banner("Matchday Bot", config.tracker.live_interval_secs);

    let shutdown = Shutdown::new();
    shutdown.spawn_signal_handler();

    app.start();

    let mut heartbeat = Heartbeat::new(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
    while !shutdown.is_triggered() {
        if heartbeat.tick() {
            info!(loop_running = app.is_running(), "Heartbeat: bot alive");
        }
        shutdown.sleep(Duration::from_secs(1)).await;
    }

    app.stop();
    print_shutdown("Matchday Bot");
    Ok(())
}

fn print_banner(name: &str, live_interval_secs: u64) {
    info!("");
    info!("========================================");
    info!("Starting {}", name);
    info!("Live poll interval: {}s", live_interval_secs);
    info!("Press Ctrl+C to stop");
    info!("========================================");
    info!("");
}

fn print_shutdown(name: &str) {
    info!("");
    info!("========================================");
    info!("{} stopped gracefully", name);
    info!("========================================");
}
