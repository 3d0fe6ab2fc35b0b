use crate::domain::model::{Account, Tag};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

const BRAND_TOKENS: &[&str] = &[
    "official", "store", "shop", "brand", "inc", "llc", "ltd", "studio", "co", "company", "app",
    "io", "ai", "hq", "global", "wear", "labs", "media", "records", "club",
];

const CREATOR_TOKENS: &[&str] = &[
    "creator",
    "artist",
    "musician",
    "producer",
    "filmmaker",
    "photographer",
    "writer",
    "designer",
    "coach",
    "athlete",
    "gamer",
    "streamer",
    "youtuber",
    "tiktoker",
    "blogger",
];

const SPAM_TOKENS: &[&str] = &[
    "free", "win", "followers", "giveaway", "forex", "crypto", "bet", "xxx", "nsfw", "loan",
    "trader", "earn", "profits", "promo", "discount", "code", "coupon",
];

const CELEBRITY_TOKENS: &[&str] = &[
    "celeb",
    "celebrity",
    "actor",
    "actress",
    "singer",
    "rapper",
    "nba",
    "nfl",
    "mlb",
    "ufc",
    "fifa",
    "olympic",
    "verified",
];

const BRAND_THRESHOLD: u32 = 2;
const CREATOR_THRESHOLD: u32 = 2;
const LARGE_AUDIENCE: u64 = 10_000;
const SMALL_AUDIENCE: u64 = 2_000;

fn personal_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Letters, optional separator, letters, optional short digit suffix.
    RE.get_or_init(|| Regex::new(r"^[a-z]+[._-]?[a-z]+\d{0,3}$").unwrap())
}

fn numeric_tail_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4,}$").unwrap())
}

fn has_token(text: &str, vocabulary: &[&str]) -> bool {
    !text.is_empty() && vocabulary.iter().any(|token| text.contains(token))
}

/// Best-effort, fuzzy category tagging. Every check is evaluated
/// independently against the same account, so an account can carry several
/// tags at once; an account matching nothing is tagged `unknown`. Missing
/// optional fields simply make the corresponding checks evaluate false.
pub fn classify(account: &Account) -> BTreeSet<Tag> {
    let handle = account.handle.to_lowercase();
    let bio = account.bio.as_deref().unwrap_or("").to_lowercase();

    let mut tags = BTreeSet::new();

    let brand_score = if has_token(&handle, BRAND_TOKENS) { 2 } else { 0 }
        + if has_token(&bio, BRAND_TOKENS) { 2 } else { 0 }
        + if account.is_verified == Some(true) { 1 } else { 0 };
    if brand_score >= BRAND_THRESHOLD {
        tags.insert(Tag::Brand);
    }

    let large_audience = account.follower_count.unwrap_or(0) > LARGE_AUDIENCE;
    let creator_score = if has_token(&handle, CREATOR_TOKENS) { 1 } else { 0 }
        + if has_token(&bio, CREATOR_TOKENS) { 2 } else { 0 }
        + if large_audience { 1 } else { 0 };
    if creator_score >= CREATOR_THRESHOLD {
        tags.insert(Tag::Creator);
    }

    // Spam is unweighted: a single vocabulary hit or a long numeric tail
    // is enough.
    if has_token(&handle, SPAM_TOKENS)
        || has_token(&bio, SPAM_TOKENS)
        || numeric_tail_regex().is_match(&handle)
    {
        tags.insert(Tag::Spam);
    }

    let personal_name = personal_name_regex().is_match(&handle);
    let small_audience = account.follower_count.unwrap_or(0) < SMALL_AUDIENCE
        && account.following_count.unwrap_or(0) < SMALL_AUDIENCE;
    if (personal_name && small_audience) || account.is_private == Some(true) {
        tags.insert(Tag::Friend);
    }

    if has_token(&handle, CELEBRITY_TOKENS) || has_token(&bio, CELEBRITY_TOKENS) {
        tags.insert(Tag::Celebrity);
    }

    if tags.is_empty() {
        tags.insert(Tag::Unknown);
    }
    tags
}
