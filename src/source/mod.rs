mod pbf;

#[cfg(feature = "xml")]
mod xml;

use std::{collections::HashMap, fs::File, io::Read, path::Path};

use tracing::info;

use crate::{Coordinate, IngestError};

pub use pbf::pbf_primitives;

#[cfg(feature = "xml")]
pub use xml::XmlPrimitives;

pub type Tags = HashMap<String, String>;

/// A single decoded element of the source dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Point {
        id: i64,
        coordinate: Coordinate,
        tags: Tags,
    },
    Way {
        tags: Tags,
        node_ids: Vec<i64>,
    },
    Relation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Detect from the file name or URL.
    Auto,
    Pbf,
    Xml,
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Local(String),
    Remote(String),
}

impl Location {
    fn as_str(&self) -> &str {
        match self {
            Location::Local(path) => path,
            Location::Remote(url) => url,
        }
    }
}

/// An opened, not yet decoded, data source.
///
/// Dropping it closes the underlying file or HTTP body.
pub struct Source {
    pub location: Location,
    pub format: Format,
    pub(crate) reader: Box<dyn Read + Send>,
}

impl Source {
    /// Open the dataset for streaming. Fails with `SourceUnavailable`.
    pub fn open(location: Location, format: Format) -> Result<Source, IngestError> {
        let format = match format {
            Format::Auto => detect_format(location.as_str()),
            explicit => explicit,
        };

        let reader: Box<dyn Read + Send> = match &location {
            Location::Local(path) => {
                let file = File::open(Path::new(path))
                    .map_err(|err| IngestError::unavailable(path.as_str(), err))?;
                Box::new(file)
            }
            Location::Remote(url) => fetch(url)?,
        };

        info!(location = location.as_str(), ?format, "opened source");

        Ok(Source {
            location,
            format,
            reader,
        })
    }

    /// Wrap an arbitrary reader, e.g. an in-memory fixture.
    pub fn from_reader<R: Read + Send + 'static>(
        location: Location,
        format: Format,
        reader: R,
    ) -> Self {
        let format = match format {
            Format::Auto => detect_format(location.as_str()),
            explicit => explicit,
        };
        Source {
            location,
            format,
            reader: Box::new(reader),
        }
    }

    pub(crate) fn is_gzip(&self) -> bool {
        self.location.as_str().ends_with(".gz")
    }
}

fn detect_format(location: &str) -> Format {
    let name = location.strip_suffix(".gz").unwrap_or(location);
    if name.ends_with(".osm") || name.ends_with(".xml") {
        Format::Xml
    } else {
        Format::Pbf
    }
}

#[cfg(feature = "remote")]
fn fetch(url: &str) -> Result<Box<dyn Read + Send>, IngestError> {
    info!(url, "reading content from URL");

    let response =
        reqwest::blocking::get(url).map_err(|err| IngestError::unavailable(url, err))?;

    let status = response.status();
    if !status.is_success() {
        return Err(IngestError::unavailable(
            url,
            format!("http status error: {}", status.as_u16()),
        ));
    }

    Ok(Box::new(response))
}

#[cfg(not(feature = "remote"))]
fn fetch(url: &str) -> Result<Box<dyn Read + Send>, IngestError> {
    Err(IngestError::unavailable(
        url,
        "remote sources require the `remote` feature",
    ))
}
