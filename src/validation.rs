//! Request input checks that run before any SQL is issued.

use std::str::FromStr;

use crate::errors::{AppError, Result};
use crate::models::{ListingStatus, Page, SkillCategory};

pub const DEFAULT_LIMIT: i64 = 5;

/// Drops every character outside `[A-Za-z0-9 _-]`.
pub fn sanitize_query(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect()
}

/// Percent-decodes a raw path segment. Invalid UTF-8 becomes U+FFFD, which
/// `sanitize_query` then drops.
pub fn decode_path_segment(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

pub fn split_words(sanitized: &str) -> Vec<String> {
    sanitized.split_whitespace().map(str::to_string).collect()
}

fn parse_filter_list<T>(raw: Option<&str>, dimension: &str) -> Result<Vec<T>>
where
    T: FromStr + PartialEq,
{
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(Vec::new()),
    };

    let mut parsed = Vec::new();
    for token in raw.split(',') {
        let value = token
            .parse::<T>()
            .map_err(|_| AppError::InvalidFilter(format!("query {} is not valid", dimension)))?;
        if !parsed.contains(&value) {
            parsed.push(value);
        }
    }
    Ok(parsed)
}

pub fn parse_status_list(raw: Option<&str>) -> Result<Vec<ListingStatus>> {
    parse_filter_list(raw, "status")
}

pub fn parse_skill_list(raw: Option<&str>) -> Result<Vec<SkillCategory>> {
    parse_filter_list(raw, "skills")
}

/// Unparseable or non-positive limits fall back to the default; limits above
/// `max_limit` are clamped. Unparseable or negative offsets are dropped.
pub fn parse_page(limit: Option<&str>, offset: Option<&str>, max_limit: i64) -> Page {
    let limit = limit
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|&l| l > 0)
        .unwrap_or(DEFAULT_LIMIT)
        .min(max_limit);

    let offset = offset
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|&o| o >= 0);

    Page { limit, offset }
}
