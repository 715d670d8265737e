//! Static HTTP server for the host directory

use axum::Router;
use corekit_core::Result;
use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

/// Serve the files of `dir` on all interfaces until `shutdown` resolves
pub async fn serve_directory<F>(dir: &Path, port: u16, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(addr).await?;
    serve_listener(listener, dir, shutdown).await
}

/// Serve the files of `dir` on an already bound listener
pub async fn serve_listener<F>(listener: TcpListener, dir: &Path, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = Router::new().fallback_service(ServeDir::new(dir));

    info!("Serving {} on http://{}", dir.display(), listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Server stopped");
    Ok(())
}
