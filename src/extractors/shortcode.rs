// src/extractors/shortcode.rs

// --- Imports ---
use crate::extractors::attributes::Attributes;
use crate::wordpress::models::Document;
use once_cell::sync::Lazy;
use regex::Regex;

// --- Regex Patterns (Lazy Static) ---
// Opening bracket, name, optional space, then everything up to `]` or a line break.
// Group 1 = name, group 2 = raw attribute fragment.
static SHORTCODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([a-zA-Z0-9_-]+) ?([^\]\r\n]+)?").expect("Failed to compile SHORTCODE_RE")
});

// --- Data Structures ---
/// A bracket match before attribute parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawShortcode<'a> {
    pub name: &'a str,
    pub fragment: &'a str,
}

/// One shortcode found in one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcode {
    pub post_id: i64,
    pub post_name: String,
    pub name: String,
    pub attributes: Attributes,
}

// --- Main Extractor Structure ---
#[derive(Debug, Default)]
pub struct ShortcodeExtractor;

impl ShortcodeExtractor {
    pub fn new() -> Self {
        Self {}
    }

    /// Finds shortcode-like matches in `body`, in text order, with spurious ones removed.
    pub fn find<'a>(&self, body: &'a str) -> Vec<RawShortcode<'a>> {
        if body.is_empty() {
            return Vec::new();
        }

        SHORTCODE_RE
            .captures_iter(body)
            .filter_map(|caps| {
                let name = caps.get(1)?.as_str();
                let fragment = caps.get(2).map_or("", |m| m.as_str());
                if is_spurious(name, fragment) {
                    tracing::trace!("Skipping non-shortcode match [{} {}", name, fragment);
                    return None;
                }
                Some(RawShortcode { name, fragment })
            })
            .collect()
    }

    /// Extracts and parses every shortcode in a post.
    pub fn extract(&self, document: &Document) -> Vec<Shortcode> {
        let found = self.find(&document.body);
        if !found.is_empty() {
            tracing::debug!("Post {} ({}): {} shortcodes", document.id, document.slug, found.len());
        }

        found
            .into_iter()
            .map(|raw| Shortcode {
                post_id: document.id,
                post_name: document.slug.clone(),
                name: raw.name.to_string(),
                attributes: if raw.fragment.is_empty() {
                    Attributes::new()
                } else {
                    Attributes::parse(raw.fragment)
                },
            })
            .collect()
    }
}

/// Bracketed text that is not a shortcode call: a fragment with no `=` (`[note here]`)
/// or a purely numeric name (`[1]` footnote markers).
fn is_spurious(name: &str, fragment: &str) -> bool {
    if !fragment.is_empty() && !fragment.contains('=') {
        return true;
    }
    name.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(id: i64, slug: &str, body: &str) -> Document {
        Document { id, slug: slug.to_string(), body: body.to_string() }
    }

    #[test]
    fn empty_body_yields_nothing() {
        let extractor = ShortcodeExtractor::new();
        assert!(extractor.find("").is_empty());
        assert!(extractor.extract(&doc(1, "empty", "")).is_empty());
    }

    #[test]
    fn bare_shortcodes_are_kept() {
        let found = ShortcodeExtractor::new().find("Intro [gallery] and [contact-form_7]");
        assert_eq!(
            found,
            vec![
                RawShortcode { name: "gallery", fragment: "" },
                RawShortcode { name: "contact-form_7", fragment: "" },
            ]
        );
    }

    #[test]
    fn footnotes_and_prose_brackets_are_dropped() {
        let codes = ShortcodeExtractor::new()
            .extract(&doc(2, "notes", "[3] is a footnote, [note here] too. [info foo=bar]"));
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].name, "info");
        assert_eq!(codes[0].attributes.get("foo"), Some("bar"));
    }

    #[test]
    fn all_spurious_yields_nothing() {
        let found = ShortcodeExtractor::new().find("See [1] and [2], plus [citation needed].");
        assert!(found.is_empty());
    }

    #[test]
    fn closing_tags_do_not_match() {
        let found = ShortcodeExtractor::new().find(r#"[caption id="a1"]<img src="x.png">Text[/caption]"#);
        assert_eq!(found, vec![RawShortcode { name: "caption", fragment: r#"id="a1""# }]);
    }

    #[test]
    fn fragment_stops_at_line_break() {
        let found = ShortcodeExtractor::new().find("[video src=a.mp4\nwidth=640]");
        assert_eq!(found, vec![RawShortcode { name: "video", fragment: "src=a.mp4" }]);
    }

    #[test]
    fn adjacent_shortcodes_keep_encounter_order() {
        let codes = ShortcodeExtractor::new()
            .extract(&doc(5, "home", r#"[button url="/x" text="Click"][button url="/y"]"#));
        assert_eq!(codes.len(), 2);
        assert!(codes.iter().all(|c| c.name == "button" && c.post_id == 5 && c.post_name == "home"));
        assert_eq!(codes[0].attributes.get("text"), Some("Click"));
        assert_eq!(codes[1].attributes.get("url"), Some("/y"));
        assert_eq!(codes[1].attributes.len(), 1);
    }

    #[test]
    fn bare_shortcode_has_empty_attributes() {
        let codes = ShortcodeExtractor::new().extract(&doc(9, "p", "[toc]"));
        assert_eq!(codes.len(), 1);
        assert!(codes[0].attributes.is_empty());
    }
}
