use smartfeedback::{AppState, app, config::Config, db};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let db_pool = db::connect(&config).await?;

    let scorer = config.scorer();
    tracing::info!(?scorer, "sentiment scorer ready");

    let app_state = AppState::new(db_pool, scorer);
    let app = app(app_state, config.session_inactivity);

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    tracing::info!("listening on {}", config.bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
