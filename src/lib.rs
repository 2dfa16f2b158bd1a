mod classify;
mod config;
mod index;
mod ingest;
mod logging;
mod readiness;
mod service;

pub mod source;

use std::{error::Error, sync::Arc};

use tokio::{net::TcpListener, sync::watch};
use tracing::info;

pub use classify::{is_junction_point, is_relevant_way, reference};
pub use config::{Command, Config};
pub use index::{
    Accumulator, AccumulatorRecord, Coordinate, Index, IngestError, JunctionMap, LookupError,
    accumulate, compact,
};
pub use ingest::build_index;
pub use logging::{init_logging, log_with_elapsed};
pub use readiness::ReadinessGate;
pub use service::{serve_lookup_with_shutdown, serve_status_with_shutdown};

use source::Source;

/// Open the configured source and build the index on a blocking worker.
async fn load_index(config: &Config) -> Result<Index, Box<dyn Error + Send + Sync>> {
    let source = open_source(config).await?;
    let index = tokio::task::spawn_blocking(move || build_index(source)).await??;
    Ok(index)
}

async fn open_source(config: &Config) -> Result<Source, Box<dyn Error + Send + Sync>> {
    let location = config.location();
    let format = config.format;
    let source = tokio::task::spawn_blocking(move || Source::open(location, format)).await??;
    Ok(source)
}

/// Resolve once `shutdown` flips to `true`. A dropped sender never resolves.
async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) -> Result<(), std::io::Error> {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
    Ok(())
}

/// Run the service until Ctrl-C.
///
/// The status listener answers "not ready" while the index is built; the
/// lookup listener is bound and the readiness gate opened only once it is.
pub async fn serve(config: &Config) -> Result<(), Box<dyn Error + Send + Sync>> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            let _ = shutdown_tx.send(true);
        }
    });

    serve_with_shutdown(config, ReadinessGate::new(), shutdown_rx).await
}

/// [`serve`] with an explicit readiness gate and shutdown signal.
pub async fn serve_with_shutdown(
    config: &Config,
    readiness: ReadinessGate,
    shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let source = open_source(config).await?;

    let status_listener = TcpListener::bind(&config.ready_address).await?;
    let status = tokio::spawn(serve_status_with_shutdown(
        status_listener,
        readiness.clone(),
        wait_for_shutdown(shutdown.clone()),
    ));

    let ingestion = tokio::task::spawn_blocking(move || build_index(source));

    let index = tokio::select! {
        built = ingestion => built??,
        _ = wait_for_shutdown(shutdown.clone()) => {
            info!("shutdown before the index was ready");
            return Ok(());
        }
    };

    let listener = TcpListener::bind(&config.address).await?;
    readiness.mark_ready();
    info!(address = %config.address, "index ready");

    serve_lookup_with_shutdown(listener, Arc::new(index), wait_for_shutdown(shutdown)).await?;
    status.await??;

    Ok(())
}

/// Build the index and return the JSON coordinates of one junction.
pub async fn query(
    config: &Config,
    road: &str,
    junction: &str,
) -> Result<String, Box<dyn Error + Send + Sync>> {
    let index = load_index(config).await?;
    let coordinates = index.lookup(road, junction)?;
    Ok(service::json_coordinates(coordinates)?)
}
