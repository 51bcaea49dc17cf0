//! Gateway binary: loads configuration, serves liveness and polls Discord.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tutor_gateway::adapters::http::serve_liveness;
use tutor_gateway::bootstrap::build_discord_gateway;
use tutor_gateway::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));
    if config.server.json_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    let addr = config.server.socket_addr()?;
    tracing::info!(
        environment = config.server.environment.as_str(),
        "Starting tutor gateway"
    );
    let (_gateway, poller) = build_discord_gateway(&config).await?;

    tokio::spawn(async move {
        if let Err(e) = serve_liveness(addr).await {
            tracing::error!("Liveness endpoint failed: {}", e);
        }
    });

    poller
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}
