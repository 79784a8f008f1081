use std::future::{Future, IntoFuture};
use std::net::SocketAddr;

use configs::AppConfig;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::rpc;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Bound listeners of both transports.
pub struct Listeners {
    pub http: TcpListener,
    pub rpc: TcpListener,
}

impl Listeners {
    pub async fn bind(cfg: &AppConfig) -> anyhow::Result<Self> {
        let http = TcpListener::bind(cfg.server.bind_addr()).await?;
        let rpc = TcpListener::bind(cfg.rpc.bind_addr()).await?;
        Ok(Self { http, rpc })
    }

    pub fn local_addrs(&self) -> anyhow::Result<(SocketAddr, SocketAddr)> {
        Ok((self.http.local_addr()?, self.rpc.local_addr()?))
    }
}

/// Serve both transports over one shared board until `shutdown` resolves,
/// then drain in-flight requests on both.
pub async fn serve<F>(listeners: Listeners, state: ServerState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (http_addr, rpc_addr) = listeners.local_addrs()?;
    let http_app = routes::build_router(state.clone(), build_cors());
    let rpc_app = rpc::build_rpc_router(state);

    let (tx, rx) = watch::channel(false);
    let mut http_rx = rx.clone();
    let mut rpc_rx = rx;

    let http = axum::serve(listeners.http, http_app)
        .with_graceful_shutdown(async move { let _ = http_rx.changed().await; })
        .into_future();
    let rpc = axum::serve(listeners.rpc, rpc_app)
        .with_graceful_shutdown(async move { let _ = rpc_rx.changed().await; })
        .into_future();

    tokio::spawn(async move {
        shutdown.await;
        info!("shutdown requested, draining http and rpc servers");
        let _ = tx.send(true);
    });

    info!(%http_addr, %rpc_addr, "ads board listening");
    tokio::try_join!(http, rpc)?;
    info!("servers were successfully shut down");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => { sig.recv().await; }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C"),
        _ = terminate => info!("received SIGTERM"),
    }
}

/// Public entry: bind from config and run both servers until a shutdown signal.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let listeners = Listeners::bind(&cfg).await?;
    serve(listeners, ServerState::in_memory(), shutdown_signal()).await
}
