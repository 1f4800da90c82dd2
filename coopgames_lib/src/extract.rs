//! Extraction of the item data BoardGameGeek embeds in every game page.
//!
//! The page carries a script line of the form
//! `GEEK.geekitemPreload = {"item":{...}, ...};`. Everything the curator
//! needs is inside `item`; the rest of the page is ignored.

use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::record::{ItemRecord, RankEntry};

/// Start of the line holding the embedded data, after trimming.
pub const PRELOAD_MARKER: &str = "GEEK.geekitemPreload";

/// Projects a detail page onto an [`ItemRecord`].
///
/// Only the fields read below are kept. Fields the page does not carry come
/// out as `None`; nothing is defaulted.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetailExtractor;

impl DetailExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parses raw page markup into a record.
    pub fn extract(&self, markup: &str) -> Result<ItemRecord, ParseError> {
        let payload = find_payload(markup).ok_or(ParseError::MissingMarker)?;
        let root: Value = serde_json::from_str(payload)?;
        let item = root
            .get("item")
            .and_then(Value::as_object)
            .ok_or(ParseError::MissingItem)?;
        Ok(project(item))
    }
}

/// Returns the JSON text of the first marker line, without the assignment
/// and the trailing `;`.
fn find_payload(markup: &str) -> Option<&str> {
    markup.lines().map(str::trim).find_map(|line| {
        let rest = line.strip_prefix(PRELOAD_MARKER)?;
        let rest = rest.trim_start().strip_prefix('=')?.trim();
        Some(rest.strip_suffix(';').unwrap_or(rest))
    })
}

fn project(item: &Map<String, Value>) -> ItemRecord {
    ItemRecord {
        name: text(item.get("name")),
        year_published: text(item.get("yearpublished")),
        href: text(item.get("href")),
        min_players: text(item.get("minplayers")),
        max_players: text(item.get("maxplayers")),
        min_playtime: text(item.get("minplaytime")),
        max_playtime: text(item.get("maxplaytime")),
        min_age: text(item.get("minage")),
        rank_info: item
            .get("rankinfo")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(rank_entry).collect()),
        complexity: number(
            item.get("polls")
                .and_then(|polls| polls.pointer("/boardgameweight/averageweight")),
        ),
        rating: number(item.get("stats").and_then(|stats| stats.get("average"))),
        short_description: text(item.get("short_description")),
        description: text(item.get("description")),
        image_url: text(item.get("imageurl")),
    }
}

fn rank_entry(value: &Value) -> Option<RankEntry> {
    let obj = value.as_object()?;
    Some(RankEntry {
        rank: text(obj.get("rank")),
        prettyname: text(obj.get("prettyname")),
        veryshortprettyname: text(obj.get("veryshortprettyname")),
        baverage: text(obj.get("baverage")),
    })
}

/// Strings pass through, numbers become their decimal text.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbers pass through, numeric strings are parsed.
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
<script>
    var GEEK = GEEK || {};
    GEEK.geekitemPreload = {"item":{"name":"Spirit Island","yearpublished":"2017","href":"\/boardgame\/162886\/spirit-island","minplayers":"1","maxplayers":"4","minplaytime":"90","maxplaytime":"120","minage":"13","rankinfo":[{"prettyname":"Board Game Rank","veryshortprettyname":"Overall","rank":"12","baverage":"8.0"},{"prettyname":"Strategy Game Rank","rank":"9"}],"polls":{"boardgameweight":{"averageweight":4.07,"votes":"2000"}},"stats":{"average":"8.33"},"short_description":"Island spirits repel colonizers.","description":"Long &amp; rich.","imageurl":"https:\/\/cf.geekdo-images.com\/x.jpg","secret":"dropped"}};
    GEEK.geekitemSettings = {"x":1};
</script>
</head></html>"#;

    #[test]
    fn extracts_allow_listed_fields() {
        let record = DetailExtractor::new().extract(PAGE).unwrap();
        assert_eq!(record.name.as_deref(), Some("Spirit Island"));
        assert_eq!(record.href.as_deref(), Some("/boardgame/162886/spirit-island"));
        assert_eq!(record.max_players.as_deref(), Some("4"));
        assert_eq!(record.min_age.as_deref(), Some("13"));
        assert_eq!(record.complexity, Some(4.07));
        assert_eq!(record.rating, Some(8.33));
        let ranks = record.rank_info.as_ref().unwrap();
        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks[0].rank.as_deref(), Some("12"));
        assert_eq!(ranks[1].baverage, None);
        assert_eq!(record.image_url.as_deref(), Some("https://cf.geekdo-images.com/x.jpg"));
    }

    #[test]
    fn unknown_fields_are_not_carried() {
        let record = DetailExtractor::new().extract(PAGE).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("secret").is_none());
    }

    #[test]
    fn missing_fields_stay_absent() {
        let page = r#"GEEK.geekitemPreload = {"item":{"name":"Bare","maxplayers":5}};"#;
        let record = DetailExtractor::new().extract(page).unwrap();
        assert_eq!(record.max_players.as_deref(), Some("5"));
        assert_eq!(record.complexity, None);
        assert_eq!(record.rating, None);
        assert_eq!(record.rank_info, None);
        assert_eq!(record.description, None);
    }

    #[test]
    fn scores_are_read_from_nested_objects() {
        let page = r#"GEEK.geekitemPreload = {"item":{"maxplayers":"6","polls":{"boardgameweight":{"averageweight":"3.25"}},"stats":{"average":7.5}}};"#;
        let record = DetailExtractor::new().extract(page).unwrap();
        assert_eq!(record.complexity, Some(3.25));
        assert_eq!(record.rating, Some(7.5));

        let page = r#"GEEK.geekitemPreload = {"item":{"polls":{"userplayers":{}},"stats":{}}};"#;
        let record = DetailExtractor::new().extract(page).unwrap();
        assert_eq!(record.complexity, None);
        assert_eq!(record.rating, None);
    }

    #[test]
    fn missing_marker_is_a_parse_error() {
        let result = DetailExtractor::new().extract("<html><body>Not found</body></html>");
        assert!(matches!(result, Err(ParseError::MissingMarker)));
    }

    #[test]
    fn garbled_payload_is_a_parse_error() {
        let result = DetailExtractor::new().extract("GEEK.geekitemPreload = {\"item\":;");
        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn payload_without_item_is_a_parse_error() {
        let result = DetailExtractor::new().extract("GEEK.geekitemPreload = {\"other\":1};");
        assert!(matches!(result, Err(ParseError::MissingItem)));
    }

    #[test]
    fn terminator_is_optional() {
        let page = "  GEEK.geekitemPreload={\"item\":{\"name\":\"NoSemi\"}}  ";
        let record = DetailExtractor::new().extract(page).unwrap();
        assert_eq!(record.name.as_deref(), Some("NoSemi"));
    }

    #[test]
    fn similarly_named_lines_are_skipped() {
        let page = "GEEK.geekitemPreloadSettings = {};\nGEEK.geekitemPreload = {\"item\":{\"name\":\"Real\"}};";
        let record = DetailExtractor::new().extract(page).unwrap();
        assert_eq!(record.name.as_deref(), Some("Real"));
    }
}
