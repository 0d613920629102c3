use anyhow::Context;
use dri_bot::{logger, SystemClock, Workflow};
use dri_config::DriConfig;
use gh_client::{build_client, TokenResolver, WriteMode};
use log::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment, RUST_LOG included
    let dotenv = dotenvy::dotenv();
    logger::init();
    match dotenv {
        Ok(path) => debug!("Loaded .env file from: {:?}", path),
        Err(_) => debug!(".env file not found, relying on environment variables"),
    }

    let mut config = DriConfig::load()
        .with_env(|key| std::env::var(key).ok())
        .context("Invalid environment configuration")?;
    if std::env::args().skip(1).any(|arg| arg == "--dry-run") {
        config.dry_run = true;
    }
    config.validate().context("Invalid configuration")?;
    debug!("Configuration: {:?}", config);

    let mode = WriteMode::from_dry_run(config.dry_run);
    info!(
        "Starting dri-bot for {}/{} on {} ({:?})",
        config.owner, config.repo, config.host, mode
    );

    let token = TokenResolver::new()
        .get_token(&config.host)
        .await
        .context("GitHub token is required")?;
    let client = build_client(&config.host, token, mode)?;

    let report = Workflow::new(&client, &config, &SystemClock).run().await?;
    info!("Run complete: {}", report);

    Ok(())
}
