//! Courier server — process entry point.
//!
//! All handles (database, mailer, config) are constructed here and
//! injected; nothing downstream reads the environment or holds global
//! state.

use courier_db::DbManager;
use courier_mailer::SesMailer;
use courier_server::config::ServerConfig;
use courier_server::routes;
use courier_server::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,courier_server=debug,courier_send=debug")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let manager = DbManager::connect(&config.database).await?;
    courier_db::run_migrations(manager.db()).await?;

    let state = AppState::new(manager.db().clone(), config.auth.clone(), SesMailer::new());
    let app = routes::router(state);

    tracing::info!(addr = %config.listen_addr, "Courier listening");
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
