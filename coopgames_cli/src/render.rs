//! HTML document rendering for the curated list.
//!
//! Plain-text fields are escaped. The long description arrives as an HTML
//! fragment and goes through [`Sanitizer`], which keeps a small set of
//! formatting tags and drops everything else.

use anyhow::{anyhow, bail, Result};
use coopgames_lib::ItemRecord;
use quick_xml::escape::escape;
use regex::{Captures, Regex};

use crate::output::{format_range, format_score};

/// Placeholder in the template replaced by the rendered items.
pub const CONTENT_PLACEHOLDER: &str = "$CONTENT$";

/// Used when no template file exists.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/default.html");

const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "div", "em", "h3", "h4", "h5", "h6", "hr", "i", "li",
    "ol", "p", "pre", "span", "strong", "sub", "sup", "u", "ul",
];

const SAFE_LINK_PREFIXES: &[&str] = &["http://", "https://", "/", "#", "mailto:"];

/// Allow-list HTML sanitizer for description fragments.
pub struct Sanitizer {
    comment_re: Regex,
    dropped_re: Regex,
    tag_re: Regex,
    href_re: Regex,
}

impl Sanitizer {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| anyhow!("regex compile error: {}", e))
        };
        Ok(Self {
            comment_re: compile(r"(?s)<!--.*?-->")?,
            dropped_re: compile(
                r"(?is)<(?:script|style|iframe|object|embed|textarea|noscript)\b[^>]*>.*?</(?:script|style|iframe|object|embed|textarea|noscript)\s*>",
            )?,
            tag_re: compile(r"(?s)<\s*(/)?\s*([a-zA-Z][a-zA-Z0-9]*)([^>]*)>")?,
            href_re: compile(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)?,
        })
    }

    /// Removes disallowed tags (keeping their text), every attribute except a
    /// safe `href` on links, comments, and script-like elements with their content.
    pub fn sanitize(&self, fragment: &str) -> String {
        let without_comments = self.comment_re.replace_all(fragment, "");
        let without_scripts = self.dropped_re.replace_all(&without_comments, "");
        self.tag_re
            .replace_all(&without_scripts, |caps: &Captures| self.rebuild_tag(caps))
            .into_owned()
    }

    fn rebuild_tag(&self, caps: &Captures) -> String {
        let closing = caps.get(1).is_some();
        let name = caps[2].to_ascii_lowercase();
        if !ALLOWED_TAGS.contains(&name.as_str()) {
            return String::new();
        }
        if closing {
            return format!("</{}>", name);
        }
        if name == "a" {
            if let Some(href) = self.safe_href(&caps[3]) {
                return format!("<a href=\"{}\">", href.replace('"', "&quot;"));
            }
        }
        format!("<{}>", name)
    }

    fn safe_href<'a>(&self, attrs: &'a str) -> Option<&'a str> {
        let caps = self.href_re.captures(attrs)?;
        let value = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))?
            .as_str()
            .trim();
        let lower = value.to_ascii_lowercase();
        SAFE_LINK_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix))
            .then_some(value)
    }
}

/// Renders curated records into an HTML document.
pub struct Renderer {
    sanitizer: Sanitizer,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            sanitizer: Sanitizer::new()?,
        })
    }

    /// Substitutes one block per record, in order, for the template's
    /// placeholder. `full_link` turns a site-relative href into a URL.
    pub fn render_document(
        &self,
        template: &str,
        records: &[ItemRecord],
        full_link: impl Fn(&str) -> String,
    ) -> Result<String> {
        if !template.contains(CONTENT_PLACEHOLDER) {
            bail!("template has no {} placeholder", CONTENT_PLACEHOLDER);
        }
        let rows = records
            .iter()
            .map(|record| {
                let link = record.href.as_deref().map(&full_link).unwrap_or_default();
                self.render_item(record, &link)
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(template.replacen(CONTENT_PLACEHOLDER, &rows, 1))
    }

    fn render_item(&self, record: &ItemRecord, link: &str) -> String {
        let mut stats = format!(
            "Players: {} | Playtime: {} mins | Complexity: {}",
            format_range(record.min_players.as_deref(), record.max_players.as_deref()),
            format_range(record.min_playtime.as_deref(), record.max_playtime.as_deref()),
            format_score(record.complexity),
        );
        if record.rating.is_some() {
            stats.push_str(&format!(" | Rating: {}", format_score(record.rating)));
        }
        let description = record
            .description
            .as_deref()
            .map(|d| self.sanitizer.sanitize(d))
            .unwrap_or_default();

        format!(
            "<div>\n\
             \t<h4><a href=\"{link}\">{name} ({year})</a></h4>\n\
             \t<div>{stats}</div>\n\
             \t<p><i>{short}</i></p>\n\
             \t<img src=\"{image}\">\n\
             \t<section>\n\
             \t\t{description}\n\
             \t</section>\n\
             \t<hr>\n\
             </div>",
            link = escape(link),
            name = escape(record.display_name()),
            year = escape(record.year_published.as_deref().unwrap_or("?")),
            stats = escape(stats.as_str()),
            short = escape(record.short_description.as_deref().unwrap_or_default()),
            image = escape(record.image_url.as_deref().unwrap_or_default()),
            description = description,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitizer() -> Sanitizer {
        Sanitizer::new().unwrap()
    }

    #[test]
    fn keeps_allowed_formatting() {
        let out = sanitizer().sanitize("<p>Hello <b>there</b><br/>friend</p>");
        assert_eq!(out, "<p>Hello <b>there</b><br>friend</p>");
    }

    #[test]
    fn strips_scripts_with_content() {
        let out = sanitizer().sanitize("a<script type=\"x\">alert(1)</script>b<style>p{}</style>c");
        assert_eq!(out, "abc");
    }

    #[test]
    fn strips_unknown_tags_but_keeps_text() {
        let out = sanitizer().sanitize("<font color=red>big</font> <img src=x onerror=alert(1)>");
        assert_eq!(out, "big ");
    }

    #[test]
    fn strips_attributes_and_unsafe_links() {
        let s = sanitizer();
        assert_eq!(
            s.sanitize("<p class=\"x\" onclick=\"y\">t</p>"),
            "<p>t</p>"
        );
        assert_eq!(
            s.sanitize("<a href=\"https://bgg.test/x\" target=\"_blank\">x</a>"),
            "<a href=\"https://bgg.test/x\">x</a>"
        );
        assert_eq!(s.sanitize("<a href='javascript:alert(1)'>x</a>"), "<a>x</a>");
    }

    #[test]
    fn keeps_entities_untouched() {
        let out = sanitizer().sanitize("Tom &amp; Jerry&#10;&quot;quoted&quot;");
        assert_eq!(out, "Tom &amp; Jerry&#10;&quot;quoted&quot;");
    }

    #[test]
    fn removes_comments() {
        assert_eq!(sanitizer().sanitize("a<!-- <b>x</b> -->b"), "ab");
    }

    #[test]
    fn renders_items_in_order_with_escaping() {
        let renderer = Renderer::new().unwrap();
        let records = vec![
            ItemRecord {
                name: Some("Pandemic <Legacy>".into()),
                year_published: Some("2020".into()),
                href: Some("/boardgame/1/pandemic".into()),
                min_players: Some("2".into()),
                max_players: Some("6".into()),
                min_playtime: Some("60".into()),
                max_playtime: Some("60".into()),
                complexity: Some(2.8333),
                rating: Some(8.1),
                short_description: Some("Save \"the\" world".into()),
                description: Some("<p>Cure <script>x</script>diseases</p>".into()),
                image_url: Some("https://img.test/p.jpg".into()),
                ..Default::default()
            },
            ItemRecord {
                name: Some("Second".into()),
                ..Default::default()
            },
        ];
        let doc = renderer
            .render_document("<body>$CONTENT$</body>", &records, |href| {
                format!("https://bgg.test{}", href)
            })
            .unwrap();

        assert!(doc.starts_with("<body><div>\n\t<h4><a href=\"https://bgg.test/boardgame/1/pandemic\">Pandemic &lt;Legacy&gt; (2020)</a></h4>"));
        assert!(doc.contains("<div>Players: 2-6 | Playtime: 60 mins | Complexity: 2.83 | Rating: 8.10</div>"));
        assert!(doc.contains("<p><i>Save &quot;the&quot; world</i></p>"));
        assert!(doc.contains("\t\t<p>Cure diseases</p>\n"));
        assert!(doc.contains("<a href=\"\">Second (?)</a>"));
        assert!(doc.find("Pandemic").unwrap() < doc.find("Second").unwrap());
        assert!(doc.ends_with("</div></body>"));
    }

    #[test]
    fn template_without_placeholder_is_an_error() {
        let renderer = Renderer::new().unwrap();
        assert!(renderer.render_document("<body></body>", &[], |h| h.to_string()).is_err());
    }

    #[test]
    fn default_template_has_placeholder() {
        assert!(DEFAULT_TEMPLATE.contains(CONTENT_PLACEHOLDER));
    }
}
