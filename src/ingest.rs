use std::time::Instant;

use osmpbfreader::OsmPbfReader;
use tracing::debug;

use crate::{
    Accumulator, Index, IngestError, accumulate, compact, log_with_elapsed,
    source::{Format, Source, pbf_primitives},
};

/// Run the full ingestion pipeline over an opened source.
///
/// The source is consumed and closed before compaction starts, whether or
/// not decoding succeeded.
pub fn build_index(source: Source) -> Result<Index, IngestError> {
    let start = Instant::now();

    log_with_elapsed(start, "Reading and sorting primitives...");

    let accumulator = accumulate_source(source)?;

    log_with_elapsed(
        start,
        &format!("Accumulated {} node records.", accumulator.len()),
    );

    let index = compact(accumulator);

    log_with_elapsed(
        start,
        &format!(
            "Built index: {} roads, {} junctions, {} coordinates.",
            index.road_count(),
            index.junction_count(),
            index.coordinate_count()
        ),
    );

    Ok(index)
}

fn accumulate_source(source: Source) -> Result<Accumulator, IngestError> {
    let location = source.location.clone();

    let result = match source.format {
        Format::Xml => accumulate_xml(source),
        Format::Pbf | Format::Auto => {
            let mut reader = OsmPbfReader::new(source.reader);
            accumulate(pbf_primitives(&mut reader))
        }
    };

    debug!(?location, ok = result.is_ok(), "closed source");
    result
}

#[cfg(feature = "xml")]
fn accumulate_xml(source: Source) -> Result<Accumulator, IngestError> {
    use std::io::{BufReader, Read};

    use flate2::read::MultiGzDecoder;

    use crate::source::XmlPrimitives;

    let reader: Box<dyn Read + Send> = if source.is_gzip() {
        Box::new(MultiGzDecoder::new(source.reader))
    } else {
        source.reader
    };

    accumulate(XmlPrimitives::new(BufReader::new(reader)))
}

#[cfg(not(feature = "xml"))]
fn accumulate_xml(source: Source) -> Result<Accumulator, IngestError> {
    Err(IngestError::unavailable(
        format!("{:?}", source.location),
        "OSM XML sources require the `xml` feature",
    ))
}
