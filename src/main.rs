//! Moltbook Heartbeat - Entry Point
//!
//! Runs a single heartbeat cycle and exits. Meant to be triggered by an
//! external scheduler (cron, CI schedule).

use moltbook_heartbeat::{Config, Heartbeat, HeartbeatConfig, MoltbookClient};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Parse args
    let args: Vec<String> = std::env::args().collect();
    let json_logs = args.iter().any(|a| a == "--json");
    let help_mode = args.iter().any(|a| a == "--help" || a == "-h");

    if help_mode {
        println!("Moltbook Heartbeat v{}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Usage: moltbook-heartbeat [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --json             Log JSON lines to stderr");
        println!("  --help, -h         Show this help");
        println!();
        println!("Environment variables:");
        println!("  MOLTBOOK_API_KEY             API key (required)");
        println!("  MOLTBOOK_BASE_URL            API root (default: https://www.moltbook.com/api/v1)");
        println!("  MOLTBOOK_AGENT_NAME          Own author name (default: Hamzaish)");
        println!("  MOLTBOOK_STATE_DIR           History and log directory (default: logs)");
        println!("  MOLTBOOK_MAX_COMMENTS        Comments per cycle (default: 12)");
        println!("  MOLTBOOK_MAX_UPVOTES         Upvotes per cycle (default: 15)");
        println!("  MOLTBOOK_MAX_POSTS           Posts per cycle (default: 1)");
        println!("  MOLTBOOK_COMMENT_THRESHOLD   Minimum score to comment (default: 10)");
        println!("  MOLTBOOK_POST_COOLDOWN_MINS  Minutes between posts (default: 35)");
        println!("  MOLTBOOK_SUBMOLTS            Comma-separated submolt feeds");
        println!("  MOLTBOOK_HTTP_TIMEOUT_SECS   Per-request timeout (default: 30)");
        println!("  MOLTBOOK_HISTORY_LIMIT       Ids kept per history set (default: 500)");
        return Ok(());
    }

    let log_level = std::env::var("RUST_LOG")
        .map(|s| match s.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        })
        .unwrap_or(Level::INFO);

    if json_logs {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_ansi(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    info!("Moltbook Heartbeat v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    let client = MoltbookClient::from_config(&config)?;
    let heartbeat = Heartbeat::new(client, HeartbeatConfig::from_config(&config));

    let summary = heartbeat.run().await?;
    println!("{}", summary);

    Ok(())
}
