use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;

use studio_leads::{
    build_router, config::AppConfig, spawn_popup_sweeper, submission::ReqwestTransport, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = AppConfig::from_env()?;

    let _guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: Some(config.environment.clone().into()),
                ..Default::default()
            },
        ))
    });

    use tracing_subscriber::{fmt, EnvFilter};
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,studio_leads=debug"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::debug!(
        "Delivering leads in {:?} mode to {} and {}",
        config.delivery_mode,
        config.form_urls.consolidated,
        config.form_urls.demo_desk
    );

    let port = config.port;
    let transport = Arc::new(ReqwestTransport::new(config.delivery_mode));
    let state = Arc::new(AppState::new(config, transport));

    match state.offer.status() {
        Ok(status) => tracing::info!("Offer ends at {} ({} left)", status.ends_at, status.remaining),
        Err(e) => tracing::error!("Failed to initialize offer countdown: {}", e),
    }

    spawn_popup_sweeper(state.clone());
    let app = build_router(state);

    tracing::info!("Starting server on port {}", port);
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
