use std::{io::BufRead, str::FromStr};

use quick_xml::{
    escape::unescape,
    events::{BytesStart, Event},
    reader::Reader,
};

use super::{Primitive, Tags};
use crate::{Coordinate, IngestError};

const NODE_TAG: &[u8] = b"node";
const WAY_TAG: &[u8] = b"way";
const RELATION_TAG: &[u8] = b"relation";
const ND_TAG: &[u8] = b"nd";
const TAG_TAG: &[u8] = b"tag";

/// Streaming decoder for OSM XML (`.osm`) documents.
pub struct XmlPrimitives<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> XmlPrimitives<R> {
    pub fn new(reader: R) -> Self {
        let mut reader = Reader::from_reader(reader);
        reader.config_mut().trim_text(true);

        XmlPrimitives {
            reader,
            buf: Vec::new(),
            done: false,
        }
    }

    fn read_primitive(&mut self) -> Result<Option<Primitive>, IngestError> {
        loop {
            self.buf.clear();
            let (element, has_children) = match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => (Element::from_start(&e)?, true),
                Ok(Event::Empty(e)) => (Element::from_start(&e)?, false),
                Ok(Event::Eof) => return Ok(None),
                Ok(_) => continue,
                Err(err) => return Err(decode_error(err)),
            };

            let primitive = match element {
                Element::Node { id, coordinate } => {
                    let (tags, _) = self.read_members(NODE_TAG, has_children)?;
                    Primitive::Point {
                        id,
                        coordinate,
                        tags,
                    }
                }
                Element::Way => {
                    let (tags, node_ids) = self.read_members(WAY_TAG, has_children)?;
                    Primitive::Way { tags, node_ids }
                }
                Element::Relation => {
                    self.read_members(RELATION_TAG, has_children)?;
                    Primitive::Relation
                }
                Element::Other => continue,
            };

            return Ok(Some(primitive));
        }
    }

    /// Collect `<tag>` and `<nd>` children up to the closing `end` element.
    fn read_members(
        &mut self,
        end: &[u8],
        has_children: bool,
    ) -> Result<(Tags, Vec<i64>), IngestError> {
        let mut tags = Tags::new();
        let mut node_ids = Vec::new();

        if !has_children {
            return Ok((tags, node_ids));
        }

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                    TAG_TAG => {
                        if let (Some(key), Some(value)) =
                            (attribute(&e, "k")?, attribute(&e, "v")?)
                        {
                            tags.insert(key, value);
                        }
                    }
                    ND_TAG => node_ids.push(required_attribute(&e, "ref")?),
                    _ => {}
                },
                Ok(Event::End(e)) if e.name().as_ref() == end => break,
                Ok(Event::Eof) => {
                    return Err(IngestError::Decode(format!(
                        "unexpected end of document inside <{}>",
                        String::from_utf8_lossy(end)
                    )));
                }
                Ok(_) => {}
                Err(err) => return Err(decode_error(err)),
            }
        }

        Ok((tags, node_ids))
    }
}

impl<R: BufRead> Iterator for XmlPrimitives<R> {
    type Item = Result<Primitive, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.read_primitive().transpose();
        if !matches!(result, Some(Ok(_))) {
            self.done = true;
        }
        result
    }
}

enum Element {
    Node { id: i64, coordinate: Coordinate },
    Way,
    Relation,
    Other,
}

impl Element {
    fn from_start(e: &BytesStart<'_>) -> Result<Self, IngestError> {
        let element = match e.name().as_ref() {
            NODE_TAG => Element::Node {
                id: required_attribute(e, "id")?,
                coordinate: Coordinate {
                    lat: required_attribute(e, "lat")?,
                    lon: required_attribute(e, "lon")?,
                },
            },
            WAY_TAG => Element::Way,
            RELATION_TAG => Element::Relation,
            _ => Element::Other,
        };
        Ok(element)
    }
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, IngestError> {
    let Some(attr) = e.try_get_attribute(name).map_err(decode_error)? else {
        return Ok(None);
    };
    let raw = std::str::from_utf8(&attr.value).map_err(decode_error)?;
    let value = unescape(raw).map_err(decode_error)?;
    Ok(Some(value.into_owned()))
}

fn required_attribute<T: FromStr>(e: &BytesStart<'_>, name: &str) -> Result<T, IngestError> {
    let element = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let value = attribute(e, name)?.ok_or_else(|| {
        IngestError::Decode(format!("<{element}> is missing attribute `{name}`"))
    })?;
    value.parse().map_err(|_| {
        IngestError::Decode(format!("<{element}> has invalid `{name}` value {value:?}"))
    })
}

fn decode_error<E: std::fmt::Display>(err: E) -> IngestError {
    IngestError::Decode(err.to_string())
}
