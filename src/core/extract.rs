use crate::domain::model::{HandleSet, MimeHint, RawExportDocument, Role};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use url::Url;

/// Instagram navigation paths that show up inside profile-shaped URLs but
/// must never be treated as handles.
const RESERVED: &[&str] = &[
    "accounts",
    "about",
    "explore",
    "developer",
    "developers",
    "legal",
    "directory",
    "subscriptions",
    "privacy",
    "terms",
    "blog",
    "press",
    "api",
    "p",
    "stories",
    "reels",
    "reel",
    "tv",
    "igtv",
    "challenge",
    "session",
    "ads",
    "help",
    "meta",
    "web",
    "oauth",
    "graphql",
    "notifications",
    "accountscenter",
    "download",
    "locations",
    "emails",
    "n",
    "policies",
    "settings",
];

fn handle_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9._]{1,30}$").unwrap())
}

fn anchor_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)href=["']https?://(?:www\.)?instagram\.com/(?:_u/)?([^/"'?#]+)[^"']*["']"#)
            .unwrap()
    })
}

fn mention_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@([A-Za-z0-9._]+)").unwrap())
}

/// Entry shape shared by both known export schema variants.
#[derive(Debug, Deserialize)]
struct ExportEntry {
    #[serde(default)]
    string_list_data: Vec<StringListItem>,
}

#[derive(Debug, Deserialize)]
struct StringListItem {
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    href: Option<String>,
}

/// The two JSON shapes Instagram has emitted over time, resolved by a
/// schema-sniffing step instead of speculative field access. Unknown
/// shapes fall through to "no data".
#[derive(Debug)]
enum ExportSchema {
    /// Top-level array of entries (`followers_1.json` style).
    EntryArray(Vec<ExportEntry>),
    /// Object wrapping a `relationships_<role>` array (`following.json`
    /// style).
    Relationships(Vec<ExportEntry>),
}

fn sniff_schema(role: Role, content: &str) -> Option<ExportSchema> {
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)
            .ok()
            .map(ExportSchema::EntryArray),
        serde_json::Value::Object(mut map) => {
            let entries = map.remove(&role.relationships_key())?;
            serde_json::from_value(entries)
                .ok()
                .map(ExportSchema::Relationships)
        }
        _ => None,
    }
}

/// Named extraction strategies, tried in the order of [`STRATEGY_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    JsonStructured,
    HtmlAnchor,
    HtmlMention,
}

pub const STRATEGY_ORDER: [ExtractionStrategy; 3] = [
    ExtractionStrategy::JsonStructured,
    ExtractionStrategy::HtmlAnchor,
    ExtractionStrategy::HtmlMention,
];

/// Lowercase, validate against the handle grammar and drop reserved
/// navigation words. `@` prefixes are stripped first.
pub fn normalize_candidate(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('@');
    if trimmed.is_empty() {
        return None;
    }
    let candidate = trimmed.to_lowercase();
    if handle_regex().is_match(&candidate) && !RESERVED.contains(&candidate.as_str()) {
        Some(candidate)
    } else {
        None
    }
}

/// Pull a handle out of a profile URL like
/// `https://www.instagram.com/janedoe/` or
/// `https://instagram.com/_u/janedoe`.
fn handle_from_href(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    match url.host_str() {
        Some("instagram.com") | Some("www.instagram.com") => {}
        _ => return None,
    }
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let first = segments.next()?;
    let segment = if first == "_u" { segments.next()? } else { first };
    normalize_candidate(segment)
}

/// Common export shape puts the profile URL in `href` and the handle in
/// `value`; either alone is enough.
fn handle_from_entry(item: &StringListItem) -> Option<String> {
    if let Some(href) = item.href.as_deref() {
        if let Some(handle) = handle_from_href(href) {
            return Some(handle);
        }
    }
    item.value.as_deref().and_then(normalize_candidate)
}

/// Run one strategy against one document. Never errors: a document that
/// fails to parse or contains no recognizable patterns yields an empty
/// set.
pub fn apply_strategy(
    strategy: ExtractionStrategy,
    role: Role,
    document: &RawExportDocument,
) -> HandleSet {
    let mut out = HandleSet::new();
    match strategy {
        ExtractionStrategy::JsonStructured => {
            let entries = match sniff_schema(role, &document.content) {
                Some(ExportSchema::EntryArray(entries))
                | Some(ExportSchema::Relationships(entries)) => entries,
                None => return out,
            };
            for entry in &entries {
                for item in &entry.string_list_data {
                    if let Some(handle) = handle_from_entry(item) {
                        out.insert(handle);
                    }
                }
            }
        }
        ExtractionStrategy::HtmlAnchor => {
            for capture in anchor_regex().captures_iter(&document.content) {
                if let Some(handle) = capture.get(1).and_then(|m| normalize_candidate(m.as_str())) {
                    out.insert(handle);
                }
            }
        }
        ExtractionStrategy::HtmlMention => {
            for capture in mention_regex().captures_iter(&document.content) {
                if let Some(handle) = capture.get(1).and_then(|m| normalize_candidate(m.as_str())) {
                    out.insert(handle);
                }
            }
        }
    }
    out
}

/// Extract the handle set for one role from the loaded export documents.
///
/// The JSON path takes the first matching document that yields a non-empty
/// set; later parts are not merged in, so a partial or duplicate schema
/// cannot contaminate the result. The HTML fallback unions anchors and
/// `@handle` mentions across every matching document.
pub fn extract(role: Role, documents: &[RawExportDocument]) -> HandleSet {
    for document in documents.iter().filter(|d| d.matches_role(role)) {
        if !matches!(document.mime_hint, MimeHint::Json | MimeHint::Unknown) {
            continue;
        }
        let set = apply_strategy(ExtractionStrategy::JsonStructured, role, document);
        if !set.is_empty() {
            tracing::debug!(
                "Extracted {} {} handles from '{}' (JSON)",
                set.len(),
                role.keyword(),
                document.name
            );
            return set;
        }
    }

    let mut merged = HandleSet::new();
    for document in documents.iter().filter(|d| d.matches_role(role)) {
        if !matches!(document.mime_hint, MimeHint::Html | MimeHint::Unknown) {
            continue;
        }
        merged.extend(apply_strategy(ExtractionStrategy::HtmlAnchor, role, document));
        merged.extend(apply_strategy(ExtractionStrategy::HtmlMention, role, document));
    }
    if !merged.is_empty() {
        tracing::debug!(
            "Extracted {} {} handles via HTML fallback",
            merged.len(),
            role.keyword()
        );
    }
    merged
}
