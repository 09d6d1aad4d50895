use clap::Parser;
use scoreboard::{AppState, Config, UserStore, api};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scoreboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    tracing::info!("Starting scoreboard");
    tracing::info!("Database: {}", config.database_url);

    let users = UserStore::connect(&config.database_url).await?;
    api::server::start_server(&config.bind_addr(), AppState::new(users)).await?;

    Ok(())
}
