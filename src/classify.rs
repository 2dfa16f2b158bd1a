use crate::source::Tags;

pub const REF_TAG: &str = "ref";
pub const HIGHWAY_TAG: &str = "highway";
pub const MOTORWAY_JUNCTION: &str = "motorway_junction";

/// Highway classes whose ways name the roads we index.
pub const RELEVANT_HIGHWAYS: [&str; 6] = [
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
];

/// The non-empty `ref` tag value, if any.
pub fn reference(tags: &Tags) -> Option<&str> {
    tags.get(REF_TAG)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

/// `highway=motorway_junction` with a non-empty `ref`.
pub fn is_junction_point(tags: &Tags) -> bool {
    tags.get(HIGHWAY_TAG).map(String::as_str) == Some(MOTORWAY_JUNCTION)
        && reference(tags).is_some()
}

/// A motorway, trunk or primary way (or link) with a non-empty `ref`.
pub fn is_relevant_way(tags: &Tags) -> bool {
    tags.get(HIGHWAY_TAG)
        .is_some_and(|highway| RELEVANT_HIGHWAYS.contains(&highway.as_str()))
        && reference(tags).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn junction_point_needs_highway_and_ref() {
        assert!(is_junction_point(&tags(&[
            ("highway", "motorway_junction"),
            ("ref", "10")
        ])));
        assert!(!is_junction_point(&tags(&[("highway", "motorway_junction")])));
        assert!(!is_junction_point(&tags(&[
            ("highway", "motorway_junction"),
            ("ref", "")
        ])));
        assert!(!is_junction_point(&tags(&[("highway", "motorway"), ("ref", "10")])));
        assert!(!is_junction_point(&Tags::new()));
    }

    #[test]
    fn relevant_way_accepts_every_listed_class() {
        for highway in RELEVANT_HIGHWAYS {
            assert!(
                is_relevant_way(&tags(&[("highway", highway), ("ref", "A1")])),
                "{highway}"
            );
        }
    }

    #[test]
    fn relevant_way_rejects_other_classes_and_missing_ref() {
        assert!(!is_relevant_way(&tags(&[("highway", "tertiary"), ("ref", "M200")])));
        assert!(!is_relevant_way(&tags(&[("highway", "motorway")])));
        assert!(!is_relevant_way(&tags(&[("highway", "motorway"), ("ref", "")])));
        assert!(!is_relevant_way(&tags(&[("ref", "M1")])));
    }
}
