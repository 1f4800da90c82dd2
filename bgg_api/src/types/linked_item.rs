use serde::{Deserialize, Serialize};

use super::lenient::{required_text_or_number, text_or_number};

/// One page of the `linkeditems` listing.
#[derive(Serialize, Deserialize, Debug)]
pub struct LinkedItemsResponse {
    #[serde(default)]
    pub items: Vec<LinkedItem>,
}

/// Minimal descriptor of a game as returned by the listing endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinkedItem {
    #[serde(deserialize_with = "required_text_or_number")]
    pub objectid: String,
    pub name: String,
    /// Site-relative link, e.g. `/boardgame/162886/spirit-island`.
    #[serde(default)]
    pub href: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub yearpublished: Option<String>,
}
