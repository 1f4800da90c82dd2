use std::fmt;

use url::Url;

use super::common::{Query, QueryCommon};

/// Query for the `linkeditems` listing: every game linked to one property
/// (a mechanic, category, family...), paged and sorted server side.
///
/// The defaults select board games with the "Cooperative Game" mechanic
/// (property 2023) sorted by overall rank.
#[derive(Clone, Debug)]
pub struct LinkedItemsQuery {
    pub common: QueryCommon,
    pub object_id: u64,
    pub object_type: String,
    pub subtype: String,
    pub linkdata_index: String,
    pub sort: LinkedItemsSort,
}

impl Default for LinkedItemsQuery {
    fn default() -> Self {
        Self {
            common: QueryCommon::default(),
            object_id: 2023,
            object_type: "property".to_string(),
            subtype: "boardgamemechanic".to_string(),
            linkdata_index: "boardgame".to_string(),
            sort: LinkedItemsSort::default(),
        }
    }
}

impl Query for LinkedItemsQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("ajax", "1")
            .append_pair("linkdata_index", &self.linkdata_index)
            .append_pair("nosession", "1")
            .append_pair("objectid", &self.object_id.to_string())
            .append_pair("objecttype", &self.object_type);
        let mut url = self.common.add_to_url(&url);
        url.query_pairs_mut()
            .append_pair("sort", &self.sort.to_string())
            .append_pair("subtype", &self.subtype);
        url
    }
}

impl LinkedItemsQuery {
    /// Selects the property whose linked items are listed.
    pub fn with_object_id(mut self, object_id: u64) -> Self {
        self.object_id = object_id;
        self
    }

    pub fn with_sort(mut self, sort: LinkedItemsSort) -> Self {
        self.sort = sort;
        self
    }
}

/// Server-side ordering of the listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkedItemsSort {
    #[default]
    Rank,
    Name,
    YearPublished,
}

impl fmt::Display for LinkedItemsSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkedItemsSort::Rank => "rank",
            LinkedItemsSort::Name => "name",
            LinkedItemsSort::YearPublished => "yearpublished",
        };
        write!(f, "{}", s)
    }
}
