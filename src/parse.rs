use std::sync::LazyLock;

use geostore::StreetKind;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Way type named in an address; the same closed set as gazetteer kinds.
pub type WayType = StreetKind;

/// Separator between the two way names of a corner query.
const CORNER_SEPARATOR: &str = " y ";

/// Largest number of digits accepted as a height.
const MAX_HEIGHT_DIGITS: usize = 5;

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// Structured reading of a normalized address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAddress {
    pub way_type: Option<WayType>,
    pub way_name: String,
    pub way_name2: Option<String>, // Set only for corner queries
    pub height: Option<u32>,       // 1..=99999
}

impl ParsedAddress {
    #[inline] pub fn is_corner(&self) -> bool { self.way_name2.is_some() }
}

/// Split normalized text (see `normalize`) into way type, way name(s) and height.
///
/// The height is the leftmost run of one to five digits not adjacent to other
/// digits; longer runs are ignored. A way name that itself begins with a
/// number ("3 de febrero 1200") therefore yields its own number as height.
pub fn parse(normalized: &str) -> ParsedAddress {
    let run = DIGIT_RUN.find_iter(normalized).find(|m| m.len() <= MAX_HEIGHT_DIGITS);
    let (height, base) = match run {
        Some(m) => {
            let height = m.as_str().parse::<u32>().ok().filter(|&h| h > 0);
            let rest = format!("{} {}", &normalized[..m.start()], &normalized[m.end()..]);
            (height, rest.split_whitespace().collect::<Vec<_>>().join(" "))
        }
        None => (None, normalized.trim().to_string()),
    };

    if let Some((first, second)) = base.split_once(CORNER_SEPARATOR) {
        return ParsedAddress {
            way_type: None,
            way_name: first.trim().to_string(),
            way_name2: Some(second.trim().to_string()),
            height,
        };
    }

    for way_type in [StreetKind::Avenue, StreetKind::Street] {
        if let Some(name) = base.strip_prefix(way_type.prefix()).and_then(|rest| rest.strip_prefix(' ')) {
            return ParsedAddress {
                way_type: Some(way_type),
                way_name: name.trim().to_string(),
                way_name2: None,
                height,
            };
        }
    }

    ParsedAddress { way_type: None, way_name: base, way_name2: None, height }
}
