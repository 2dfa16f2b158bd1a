use serde::Serialize;
use serde_json::json;
use std::{error::Error, future::Future, sync::Arc, time::Instant};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};
use tracing::{info, warn};

use crate::{Coordinate, Index, ReadinessGate};

mod lookup;
mod status;

use lookup::LookupRoutes;
use status::StatusRoutes;

/// Only the request line is inspected; a longer one is answered with 414.
const MAX_REQUEST_LINE: usize = 1024;

/// Minimal response wrapper for handler results.
pub(crate) struct Response {
    status_code: u16,
    body: String,
}

impl Response {
    /// Construct a response with status code and serialized JSON body.
    pub(crate) fn new(status_code: u16, body: String) -> Self {
        Self { status_code, body }
    }
}

/// A set of GET endpoints served by one listener.
pub(crate) trait Routes: Send + Sync + 'static {
    /// Name used in request logs.
    const NAME: &'static str;

    fn route(&self, path: &str, query: &str) -> Response;
}

/// Serve junction lookups from a finished index until `shutdown` resolves.
pub async fn serve_lookup_with_shutdown<F>(
    listener: TcpListener,
    index: Arc<Index>,
    shutdown: F,
) -> Result<(), Box<dyn Error + Send + Sync>>
where
    F: Future<Output = Result<(), std::io::Error>> + Send + 'static,
{
    info!(
        address = %listener.local_addr()?,
        roads = index.road_count(),
        "serving lookups"
    );

    serve_with_shutdown(listener, Arc::new(LookupRoutes::new(index)), shutdown).await
}

/// Serve readiness and liveness probes until `shutdown` resolves.
pub async fn serve_status_with_shutdown<F>(
    listener: TcpListener,
    readiness: ReadinessGate,
    shutdown: F,
) -> Result<(), Box<dyn Error + Send + Sync>>
where
    F: Future<Output = Result<(), std::io::Error>> + Send + 'static,
{
    info!(address = %listener.local_addr()?, "serving status probes");

    serve_with_shutdown(listener, Arc::new(StatusRoutes::new(readiness)), shutdown).await
}

async fn serve_with_shutdown<R, F>(
    listener: TcpListener,
    routes: Arc<R>,
    shutdown: F,
) -> Result<(), Box<dyn Error + Send + Sync>>
where
    R: Routes,
    F: Future<Output = Result<(), std::io::Error>> + Send + 'static,
{
    let mut shutdown = Box::pin(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accept = listener.accept() => {
                let (stream, _) = accept?;
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut stream = stream;
                    if let Err(err) = handle_connection(&mut stream, routes.as_ref()).await {
                        let _ = write_response::<R>(
                            &mut stream,
                            500,
                            &json_error(&err.to_string()),
                            None,
                        )
                        .await;
                    }
                });
            }
        }
    }

    info!(service = R::NAME, "server stopped");

    Ok(())
}

/// Handle a single HTTP connection and route to the correct handler.
async fn handle_connection<R: Routes>(
    stream: &mut tokio::net::TcpStream,
    routes: &R,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let start = Instant::now();
    let mut buffer = [0u8; MAX_REQUEST_LINE];
    let mut total_read = 0usize;
    let mut line_complete = false;

    while total_read < MAX_REQUEST_LINE {
        let read = stream.read(&mut buffer[total_read..]).await?;
        if read == 0 {
            break;
        }
        total_read += read;
        // detect end
        if buffer[..total_read].contains(&b'\n') {
            line_complete = true;
            break;
        }
    }

    let request = String::from_utf8_lossy(&buffer[..total_read]);

    let mut lines = request.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default();
    let target = parts.next().unwrap_or_default();

    let response = if !line_complete && total_read == MAX_REQUEST_LINE {
        Response::new(414, json_error("request line too long"))
    } else if method != "GET" {
        Response::new(405, json_error("method not allowed"))
    } else {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        routes.route(path, query)
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        service = R::NAME,
        method,
        target,
        status = response.status_code,
        duration_ms,
        "handled request"
    );

    write_response::<R>(stream, response.status_code, &response.body, Some(duration_ms)).await?;
    Ok(())
}

/// Write the HTTP response with JSON body and close the connection.
async fn write_response<R: Routes>(
    stream: &mut tokio::net::TcpStream,
    status_code: u16,
    body: &str,
    duration_ms: Option<u64>,
) -> std::io::Result<()> {
    let status_text = match status_code {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        414 => "URI Too Long",
        422 => "Unprocessable Entity",
        503 => "Service Unavailable",
        _ => "Internal Server Error",
    };

    if status_code >= 500 && status_code != 503 {
        warn!(service = R::NAME, status_code, ?duration_ms, body, "request failed");
    }

    let header = format!(
        "HTTP/1.1 {status_code} {status_text}\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );

    stream.write_all(header.as_bytes()).await?;
    stream.write_all(body.as_bytes()).await?;
    stream.shutdown().await
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CoordinateList<'a> {
    coordinates: &'a [Coordinate],
}

/// JSON for a successful lookup response.
pub(crate) fn json_coordinates(coordinates: &[Coordinate]) -> serde_json::Result<String> {
    serde_json::to_string(&CoordinateList { coordinates })
}

/// JSON for an error response.
pub(crate) fn json_error(message: &str) -> String {
    json!({ "error": message }).to_string()
}

/// JSON for a probe response.
pub(crate) fn json_status(status: &str) -> String {
    json!({ "status": status }).to_string()
}
