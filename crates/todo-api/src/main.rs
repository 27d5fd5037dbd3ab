//! todo-api バイナリのエントリポイント

use anyhow::Context;
use infrastructure::TodoService;
use shared::{init_tracing, Config};
use todo_api::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format).map_err(|e| anyhow::anyhow!(e))?;

    let pool = infrastructure::connect(&config)
        .await
        .context("failed to open datastore")?;
    let router = app(TodoService::new(pool.clone()), config.request_timeout);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
