use tokio::net::TcpListener;

use crate::app::routes::{build_router, AppState};
use crate::config::AppConfig;
use crate::core::forwarder::Forwarder;
use crate::utils::error::Result;

/// Builds the forwarder from `config`, binds the configured address and
/// serves until Ctrl-C or SIGTERM.
pub async fn run(config: &AppConfig) -> Result<()> {
    let forwarder = Forwarder::from_config(config)?;
    let listener = TcpListener::bind(config.bind_addr()).await?;
    serve(listener, forwarder).await
}

pub async fn serve(listener: TcpListener, forwarder: Forwarder) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("Forwarding to upstream {}", forwarder.base_url());
    tracing::info!("🚀 Listening on http://{}", addr);

    let app = build_router(AppState::new(forwarder));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server on {} stopped", addr);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
