use thiserror::Error;

/// Fatal errors raised while turning a data source into an [`Index`](super::Index).
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source {location} unavailable: {source}")]
    SourceUnavailable {
        location: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("could not decode primitive: {0}")]
    Decode(String),
}

impl IngestError {
    pub(crate) fn unavailable<E>(location: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        IngestError::SourceUnavailable {
            location: location.into(),
            source: source.into(),
        }
    }
}

/// Per-request lookup failures. Both map to "not found" at the protocol level.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("road not in index")]
    RoadNotFound,
    #[error("road in index, but junction not in index")]
    JunctionNotFound,
}
