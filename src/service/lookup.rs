use std::sync::Arc;

use tracing::error;
use url::form_urlencoded;

use crate::Index;

use super::{Response, Routes, json_coordinates, json_error};

const USAGE: &str = "Keys are in this format: road=M1&junc=1";

pub(crate) struct LookupRoutes {
    index: Arc<Index>,
}

impl LookupRoutes {
    pub(crate) fn new(index: Arc<Index>) -> Self {
        Self { index }
    }
}

impl Routes for LookupRoutes {
    const NAME: &'static str = "lookup";

    fn route(&self, path: &str, query: &str) -> Response {
        match path {
            "/" | "/lookup" => handle_lookup(&self.index, query),
            _ => Response::new(404, json_error("not found")),
        }
    }
}

/// Handle the `/lookup` endpoint using `road` and `junc`. A repeated key
/// resolves to its first value.
pub(crate) fn handle_lookup(index: &Index, query: &str) -> Response {
    let mut road = None;
    let mut junction = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "road" if road.is_none() => road = Some(value.into_owned()),
            "junc" if junction.is_none() => junction = Some(value.into_owned()),
            _ => {}
        }
    }

    let road = road.filter(|value| !value.is_empty());
    let junction = junction.filter(|value| !value.is_empty());

    let (Some(road), Some(junction)) = (road, junction) else {
        return Response::new(400, json_error(USAGE));
    };

    let coordinates = match index.lookup(&road, &junction) {
        Ok(coordinates) => coordinates,
        Err(err) => return Response::new(404, json_error(&err.to_string())),
    };

    match json_coordinates(coordinates) {
        Ok(body) => Response::new(200, body),
        Err(err) => {
            error!(%err, %road, %junction, "could not serialize coordinates");
            Response::new(422, json_error("could not serialize coordinates"))
        }
    }
}
