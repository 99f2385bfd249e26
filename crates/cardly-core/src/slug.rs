//! URL slugs derived from business names.
//!
//! [`generate_slug`] is pure: the same name always yields the same base slug.
//! Uniqueness depends on registry state and is handled separately by
//! [`ensure_unique_slug`].

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

/// Slug used when a name contains no usable characters.
pub const FALLBACK_SLUG: &str = "business-card";

/// Maximum length of a generated base slug (before any `-N` suffix).
pub const MAX_SLUG_LEN: usize = 30;

/// Minimum length accepted for a requested vanity slug.
pub const MIN_VANITY_SLUG_LEN: usize = 3;

/// Words that cannot be claimed as vanity slugs.
const RESERVED_SLUGS: &[&str] = &[
    "admin",
    "api",
    "www",
    "app",
    "mail",
    "ftp",
    "localhost",
    "test",
    "dev",
    "staging",
    "production",
    "beta",
    "alpha",
    "demo",
    "support",
    "help",
    "about",
    "contact",
    "privacy",
    "terms",
    "login",
    "signup",
    "register",
    "dashboard",
    "profile",
    "settings",
    "account",
    "billing",
    "payment",
];

/// Most suggestions offered for a taken vanity slug.
pub const MAX_SUGGESTIONS: usize = 5;

const SUGGESTION_SUFFIXES: &[&str] = &[
    "co", "inc", "official", "team", "studio", "group", "pro", "biz",
];

static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid slug regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static HYPHENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("valid hyphen regex"));

/// Derive a URL-safe slug from a business name.
///
/// Lowercases, drops everything outside `[a-z0-9\s-]`, turns whitespace runs
/// into single hyphens, collapses repeated hyphens, trims edge hyphens and
/// truncates to [`MAX_SLUG_LEN`]. Returns [`FALLBACK_SLUG`] when nothing
/// usable remains.
pub fn generate_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = DISALLOWED_RE.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RE.replace_all(&stripped, "-");
    let collapsed = HYPHENS_RE.replace_all(&hyphenated, "-");
    let trimmed = collapsed.trim_matches('-');

    // Only ASCII survives the filter above, so byte truncation is safe.
    let truncated = &trimmed[..trimmed.len().min(MAX_SLUG_LEN)];
    let slug = truncated.trim_end_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Find the first unused slug among `base`, `base-1`, `base-2`, ...
///
/// `exists` is consulted against the caller's current state for every candidate.
pub fn ensure_unique_slug<E>(
    base: &str,
    mut exists: impl FnMut(&str) -> std::result::Result<bool, E>,
) -> std::result::Result<String, E> {
    let mut candidate = base.to_string();
    let mut suffix: u64 = 1;

    while exists(&candidate)? {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }

    Ok(candidate)
}

/// Validate a user-requested vanity slug.
pub fn validate_slug(slug: &str) -> Result<()> {
    let slug = slug.trim();
    let invalid = |reason: &str| {
        Err(Error::InvalidSlug {
            slug: slug.to_string(),
            reason: reason.to_string(),
        })
    };

    if slug.is_empty() {
        return invalid("slug cannot be empty");
    }
    if slug.len() < MIN_VANITY_SLUG_LEN {
        return invalid("slug must be at least 3 characters long");
    }
    if slug.len() > MAX_SLUG_LEN {
        return invalid("slug must be 30 characters or less");
    }
    if !slug
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return invalid("slug can only contain lowercase letters, numbers, and hyphens");
    }
    if slug.contains("--") {
        return invalid("slug cannot contain consecutive hyphens");
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return invalid("slug cannot start or end with a hyphen");
    }
    if RESERVED_SLUGS.contains(&slug) {
        return invalid("slug is reserved");
    }

    Ok(())
}

/// Free vanity slugs for `name`, at most [`MAX_SUGGESTIONS`].
///
/// Offers the base slug, then suffixed variants (`-co`, `-inc`, ...), then
/// numbered ones when fewer than three were found. Every suggestion passes
/// [`validate_slug`]. A blank name gets none.
pub fn suggest_slugs(name: &str, is_taken: impl Fn(&str) -> bool) -> Vec<String> {
    if name.trim().is_empty() {
        return Vec::new();
    }
    let base = generate_slug(name);
    let usable = |candidate: &str| validate_slug(candidate).is_ok() && !is_taken(candidate);

    let mut suggestions = Vec::new();
    let named = std::iter::once(base.clone())
        .chain(SUGGESTION_SUFFIXES.iter().map(|suffix| format!("{base}-{suffix}")));
    for candidate in named {
        if suggestions.len() == MAX_SUGGESTIONS {
            return suggestions;
        }
        if usable(&candidate) {
            suggestions.push(candidate);
        }
    }

    if suggestions.len() < 3 {
        for n in 1..=10 {
            let candidate = format!("{base}-{n}");
            if suggestions.len() < MAX_SUGGESTIONS && usable(&candidate) {
                suggestions.push(candidate);
            }
        }
    }
    suggestions
}
