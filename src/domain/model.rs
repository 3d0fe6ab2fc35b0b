use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Ordered set of normalized handles. Handles are lowercase and match
/// `[a-z0-9._]{1,30}`, so byte order equals case-insensitive order.
pub type HandleSet = BTreeSet<String>;

/// Which side of the relationship an export file describes. The keyword is
/// load-bearing: extraction matches it against filenames to pick candidate
/// documents for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Followers,
    Following,
}

impl Role {
    pub fn keyword(&self) -> &'static str {
        match self {
            Role::Followers => "followers",
            Role::Following => "following",
        }
    }

    /// Key used by the wrapped-object export schema, e.g.
    /// `relationships_following`.
    pub fn relationships_key(&self) -> String {
        format!("relationships_{}", self.keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeHint {
    Json,
    Html,
    Unknown,
}

impl MimeHint {
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".json") {
            MimeHint::Json
        } else if lower.ends_with(".html") || lower.ends_with(".htm") {
            MimeHint::Html
        } else {
            MimeHint::Unknown
        }
    }
}

/// One export file as loaded from disk (or a ZIP entry, or a fetched
/// sample). Immutable once created; discarded after extraction.
#[derive(Debug, Clone)]
pub struct RawExportDocument {
    pub name: String,
    pub mime_hint: MimeHint,
    pub content: String,
}

impl RawExportDocument {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into().to_lowercase();
        let mime_hint = MimeHint::from_name(&name);
        Self {
            name,
            mime_hint,
            content: content.into(),
        }
    }

    pub fn matches_role(&self, role: Role) -> bool {
        self.name.contains(role.keyword())
    }
}

/// Classification input. Only `handle` is guaranteed when derived from
/// export files; the rest are optional enrichments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    pub handle: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub is_private: Option<bool>,
    pub is_verified: Option<bool>,
    pub follower_count: Option<u64>,
    pub following_count: Option<u64>,
}

impl Account {
    pub fn from_handle(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Brand,
    Creator,
    Spam,
    Friend,
    Celebrity,
    Unknown,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tag::Brand => "brand",
            Tag::Creator => "creator",
            Tag::Spam => "spam",
            Tag::Friend => "friend",
            Tag::Celebrity => "celebrity",
            Tag::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Pure function of the two input sets; recomputed whenever either set
/// changes, never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// `following \ followers`, ascending.
    pub non_followers: Vec<String>,
    /// `followers \ following`, ascending.
    pub not_following_back: Vec<String>,
    /// Raw input set sizes, not difference sizes.
    pub follower_count: usize,
    pub following_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub followers: usize,
    pub following: usize,
}

/// The only mutable, session-local entity. Created when reconciliation
/// completes, mutated through marking, destroyed with the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub handle: String,
    pub tags: BTreeSet<Tag>,
    pub marked: bool,
}

/// Transform output carried between the pipeline stages: projected record
/// lists for both directions, the stats, and the rendered export payloads.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub records: Vec<ResultRecord>,
    pub reverse_records: Vec<ResultRecord>,
    pub stats: SessionStats,
    pub csv_output: String,
    pub txt_output: String,
}
