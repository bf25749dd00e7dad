use anyhow::Context;
use storage::Database;
use tokio::net::TcpListener;

mod app;
mod browser;
mod config;
mod error;
mod features;
mod state;

use config::Config;
use state::{AppState, Clock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;

    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting {}", config.site_name);
    for key in &config.ignored_dates {
        tracing::warn!("{} is not a valid YYYY-MM-DD date; the rule using it is disabled", key);
    }

    tracing::info!("Opening database at: {}", config.database_path.display());
    let db = Database::open(&config.database_path)
        .await
        .context("Failed to open database")?;

    match db.run_migrations().await {
        Ok(report) => tracing::info!(
            applied = report.applied.len(),
            skipped = report.skipped,
            "Database migrations completed"
        ),
        Err(e) => tracing::warn!("Database migrations failed, continuing: {}", e),
    }

    let bind_address = config.bind_address();
    let port = config.port;
    let open_browser = config.open_browser;

    let app = app::router(AppState::new(db, config, Clock::System));

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    tracing::info!("Listening on http://{}", bind_address);
    tracing::info!("OpenAPI document at http://{}/api-docs/openapi.json", bind_address);

    if open_browser {
        browser::open_after_startup(port);
    }

    axum::serve(listener, app).await?;

    Ok(())
}
