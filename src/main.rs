use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use glofwatch::{GlofConfig, Predictor, VERSION, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = GlofConfig::load_from_path(config_path)?;
    telemetry::init(&config.logging)?;

    // One client for the whole process; sources hold cheap clones of it
    let client = reqwest::Client::builder()
        .user_agent(format!("glofwatch/{VERSION}"))
        .build()
        .context("Failed to create HTTP client")?;

    let predictor = Arc::new(Predictor::from_config(client, &config));
    web::run(&config.server, predictor).await
}
