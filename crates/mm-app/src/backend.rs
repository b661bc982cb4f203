pub mod config;
mod routes;
pub mod schemas;
pub mod state;

use std::sync::Arc;
use std::time::Duration;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};
use crate::backend::config::ServerConfig;
use crate::backend::routes::api_routes;
use crate::backend::state::AppState;
use crate::generator::Generator;

/// Router with every page and API route bound to `state`
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api_routes())
        .with_state(Arc::new(state))
}

/// Bind the listener and serve until Ctrl-C
pub async fn serve(conf: ServerConfig) -> anyhow::Result<()> {
    let generator = Generator::new(conf.coordinator.clone());
    info!(
        "Generating on {} with {} {}",
        generator.device().name(),
        conf.coordinator.interpreter,
        conf.coordinator.script.display()
    );

    if let Some(max_age) = conf.retention.max_age() {
        spawn_sweeper(generator.clone(), max_age, conf.sweep_interval);
    } else {
        info!("Run directories are kept indefinitely");
    }

    let app = app(AppState::new(generator));
    let addr = conf.socket_addr();
    let listener = TcpListener::bind(addr).await?;

    info!("Starting server on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn spawn_sweeper(generator: Generator, max_age: Duration, every: Duration) {
    info!("Removing run directories older than {}s every {}s", max_age.as_secs(), every.as_secs());

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match generator.sweep(max_age).await {
                Ok(0) => {}
                Ok(removed) => info!("Retention sweep removed {} runs", removed),
                Err(e) => warn!("Retention sweep failed: {}", e),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
