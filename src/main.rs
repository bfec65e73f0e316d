//! Main entry point for the token screener dashboard

use anyhow::Result;
use token_screener::dashboard::serve_dashboard;
use token_screener::screener::{ScreenerBuilder, ScreenerConfig};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting token screener");

    let config = ScreenerConfig::from_env()?;
    let screener = ScreenerBuilder::from_config(config).build()?;

    serve_dashboard(screener).await
}
