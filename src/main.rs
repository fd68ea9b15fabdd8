//! FeeFlow API server binary.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use feeflow::config::{load_config, AppConfig};
use feeflow::http::HttpServer;
use feeflow::observability::logging;

#[derive(Parser)]
#[command(name = "feeflow")]
#[command(about = "School fee management API over a spreadsheet backend", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "feeflow.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config: AppConfig = load_config(&cli.config)?;
    logging::init(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_path = %cli.config.display(),
        "feeflow starting"
    );
    tracing::info!(
        bind_address = %config.server.bind_address,
        spreadsheet_id = %config.sheets.spreadsheet_id,
        sms_configured = !config.sms.api_base.is_empty(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
