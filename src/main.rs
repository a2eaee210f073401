use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use search_pulse::auth::{ServiceAccountKey, ServiceAccountTokenProvider};
use search_pulse::chart::QuickChartRenderer;
use search_pulse::config::Config;
use search_pulse::error::ReportResult;
use search_pulse::job::ReportJob;
use search_pulse::search_console::SearchConsoleClient;
use search_pulse::telegram::TelegramSink;

#[derive(Parser)]
#[command(
    name = "search-pulse",
    version,
    about = "Send a Search Console weekday trend report to Telegram"
)]
struct Cli {
    /// Directory holding config.toml (defaults to $SEARCH_PULSE_CONFIG_DIR
    /// or the user config dir)
    #[arg(short, long, value_name = "DIR")]
    config: Option<PathBuf>,

    /// Log at info level even without RUST_LOG set
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .try_init();

    if let Err(e) = run(cli.config.as_deref()).await {
        error!(kind = e.kind(), "report run failed: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(config_dir: Option<&std::path::Path>) -> ReportResult<()> {
    let config = match config_dir {
        Some(dir) => Config::load_from_dir(dir)?,
        None => Config::load()?,
    };

    let key = ServiceAccountKey::from_file(&config.service_account_key_path())?;
    let tokens = ServiceAccountTokenProvider::new(key);
    let metrics = SearchConsoleClient::with_base_url(&config.api_base_url);
    let renderer = QuickChartRenderer::with_base_url(&config.chart_base_url);
    let sink = TelegramSink::with_base_url(
        &config.telegram_base_url,
        &config.telegram_bot_token,
        &config.telegram_chat_id,
    );

    let job = ReportJob::new(&config, &tokens, &metrics, &renderer, &sink);
    let trend = job.run_notifying(Utc::now()).await?;

    info!(
        band = ?trend.band,
        percent_change = trend.percent_change,
        "run complete"
    );
    Ok(())
}
