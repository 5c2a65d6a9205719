// src/resolver.rs
//! Finds where an answer should be posted by scanning the page text.
//!
//! Resolution walks [`RULES`] in order. The first rule that yields any candidate
//! decides the target; later rules are never consulted and candidates are never
//! merged across rules.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Relative paths that commonly host a quiz submission handler, most generic first.
pub const KNOWN_SUBMIT_PATHS: [&str; 4] = [
    "/submit",
    "/quiz/submit",
    "/api/submit",
    "/api/submit-answer",
];

static ABSOLUTE_SUBMIT_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)https?://[^\s"']*submit[^\s"']*"#).expect("valid regex"));

static FORM_ACTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<form\b[^>]*?\baction\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionRule {
    /// Any absolute `http(s)://...submit...` URL in the text.
    AbsoluteUrl,
    /// `<form action="...">` whose action mentions "submit".
    FormAction,
    /// A known relative submission path appearing literally in the text.
    KnownPath,
}

/// Priority order used by [`resolve_submit_url`].
pub const RULES: [ResolutionRule; 3] = [
    ResolutionRule::AbsoluteUrl,
    ResolutionRule::FormAction,
    ResolutionRule::KnownPath,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTarget {
    pub url: String,
    pub rule: ResolutionRule,
}

impl ResolutionRule {
    /// All candidates this rule finds, de-duplicated in first-seen order.
    pub fn candidates(&self, page: &str, request_url: &Url) -> Vec<String> {
        let found = match self {
            ResolutionRule::AbsoluteUrl => ABSOLUTE_SUBMIT_URL
                .find_iter(page)
                .map(|m| m.as_str().to_string())
                .collect(),
            ResolutionRule::FormAction => FORM_ACTION
                .captures_iter(page)
                .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
                .map(|m| m.as_str().trim())
                .filter(|action| action.to_ascii_lowercase().contains("submit"))
                .filter_map(|action| resolve_against_origin(action, request_url))
                .collect(),
            ResolutionRule::KnownPath => KNOWN_SUBMIT_PATHS
                .iter()
                .filter(|path| page.contains(*path))
                .filter_map(|path| resolve_against_origin(path, request_url))
                .collect(),
        };
        dedup_preserving_order(found)
    }
}

/// Picks the submission endpoint for `page`, or `None` if no rule matches.
pub fn resolve_submit_url(page: &str, request_url: &Url) -> Option<SubmissionTarget> {
    RULES.iter().find_map(|rule| {
        rule.candidates(page, request_url)
            .into_iter()
            .next()
            .map(|url| SubmissionTarget { url, rule: *rule })
    })
}

/// Absolute references are kept verbatim; anything else is joined onto the
/// request's origin (scheme, host and port, with path and query dropped).
fn resolve_against_origin(reference: &str, request_url: &Url) -> Option<String> {
    match Url::parse(reference) {
        Ok(absolute) if matches!(absolute.scheme(), "http" | "https") => {
            return Some(reference.to_string());
        }
        Ok(_) => return None,
        Err(_) => {}
    }

    let origin = request_url.origin();
    if !origin.is_tuple() {
        return None;
    }
    let base = Url::parse(&origin.ascii_serialization()).ok()?;
    base.join(reference).ok().map(String::from)
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
