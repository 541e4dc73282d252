use anyhow::Context;

use todo_board::{
    config::{AppConfig, defaults::DEFAULT_RUST_LOG},
    db::connection,
    logging::init_tracing,
    routes::build_app,
    state::AppState,
};

#[tokio::main]
async fn main() {
    // The log level lives in the config, so a bad config is logged with the default one.
    let cfg = match AppConfig::from_env().context("failed to load config") {
        Ok(cfg) => cfg,
        Err(err) => {
            init_tracing(DEFAULT_RUST_LOG);
            tracing::error!("server failed: {err:?}");
            std::process::exit(1);
        }
    };
    init_tracing(&cfg.logging.rust_log);

    if let Err(err) = run(cfg).await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = connection::connect(&cfg.database).await?;
    let addr = cfg.bind_addr();
    let state = AppState::new(cfg, db.clone());
    let app = build_app(state)?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down, closing database pool");
    db.close().await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };
    #[cfg(unix)]
    let term = async {
        if let Ok(mut stream) = signal::unix::signal(signal::unix::SignalKind::terminate()) {
            stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let term = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = term => {},
    }
}
