use crate::ReadinessGate;

use super::{Response, Routes, json_error, json_status};

/// Orchestration probes; answers from process start, before the index exists.
pub(crate) struct StatusRoutes {
    readiness: ReadinessGate,
}

impl StatusRoutes {
    pub(crate) fn new(readiness: ReadinessGate) -> Self {
        Self { readiness }
    }
}

impl Routes for StatusRoutes {
    const NAME: &'static str = "status";

    fn route(&self, path: &str, _query: &str) -> Response {
        match path {
            "/ready" if self.readiness.is_ready() => Response::new(200, json_status("ready")),
            "/ready" => Response::new(503, json_status("not ready")),
            "/live" => Response::new(200, json_status("alive")),
            _ => Response::new(404, json_error("not found")),
        }
    }
}
