use std::io::Read;

use osmpbfreader::{OsmObj, OsmPbfReader};

use super::{Primitive, Tags};
use crate::{Coordinate, IngestError};

/// Decode a `.osm.pbf` stream.
///
/// Blocks are decompressed on a worker pool, but elements are yielded one at
/// a time in file order.
pub fn pbf_primitives<R: Read>(
    reader: &mut OsmPbfReader<R>,
) -> impl Iterator<Item = Result<Primitive, IngestError>> + '_ {
    reader.par_iter().map(|obj| {
        obj.map(to_primitive)
            .map_err(|err| IngestError::Decode(err.to_string()))
    })
}

fn to_primitive(obj: OsmObj) -> Primitive {
    match obj {
        OsmObj::Node(node) => Primitive::Point {
            id: node.id.0,
            coordinate: Coordinate {
                lat: node.lat(),
                lon: node.lon(),
            },
            tags: to_tags(&node.tags),
        },
        OsmObj::Way(way) => Primitive::Way {
            tags: to_tags(&way.tags),
            node_ids: way.nodes.iter().map(|node_id| node_id.0).collect(),
        },
        OsmObj::Relation(_) => Primitive::Relation,
    }
}

fn to_tags(tags: &osmpbfreader::Tags) -> Tags {
    tags.iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
