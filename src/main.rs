use careshift::bootstrap::build_app;
use careshift::cli::{run, Cli};
use careshift::config::Config;
use careshift::infrastructure::observability;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = observability::init(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Load configuration
    let config = Config::from_env()?;
    tracing::debug!(
        "Configuration loaded (timezone {}, holiday policy {})",
        config.timezone,
        config.holiday_policy
    );

    let mut app = build_app(&config)?;
    run(cli, &mut app).await
}
