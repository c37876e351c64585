//! HTTP cacheability heuristics
//!
//! Pure functions deciding whether a response can be cached and for how
//! long, from its response headers, URL and status code. Modelled on the
//! freshness rules of RFC 2616 §13 as applied by browser caches:
//!
//! - `max-age` in Cache-Control wins over Expires
//! - a missing or unparseable Date header means no freshness at all
//! - without explicit expiration, URLs with a query string and
//!   non-cacheable status codes are treated as uncacheable
//!
//! Malformed dates and numbers never raise; they read as "no freshness
//! information".

use crate::headers::HeaderMap;
use crate::resource_type::ResourceType;
use chrono::{DateTime, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Thirty days, the unit the freshness rules reason in
pub const MS_IN_A_MONTH: f64 = 1000.0 * 60.0 * 60.0 * 24.0 * 30.0;

fn max_age_regex() -> &'static Regex {
    static MAX_AGE: OnceLock<Regex> = OnceLock::new();
    MAX_AGE.get_or_init(|| Regex::new(r"(?i)max-age=(\d+)").expect("static regex"))
}

/// Whether a response with this status code is cacheable without explicit headers
///
/// 304 counts: the resource behind a Not Modified response is cacheable even
/// though the 304 itself is not.
pub fn is_cacheable_response_code(code: i32) -> bool {
    matches!(code, 200 | 203 | 206 | 300 | 301 | 304 | 410)
}

pub fn is_cacheable_resource_type(kind: ResourceType) -> bool {
    matches!(
        kind,
        ResourceType::Stylesheet | ResourceType::Script | ResourceType::Image | ResourceType::Media
    )
}

pub fn is_non_cacheable_resource_type(kind: ResourceType) -> bool {
    matches!(
        kind,
        ResourceType::Document | ResourceType::Iframe | ResourceType::Other
    )
}

/// Text-based types that benefit from gzip
pub fn is_compressible_resource_type(kind: ResourceType) -> bool {
    matches!(
        kind,
        ResourceType::Document
            | ResourceType::Stylesheet
            | ResourceType::Script
            | ResourceType::Iframe
    )
}

/// Date header present and either Expires or a `max-age` directive
///
/// The values are not validated: invalid dates count as "already expired",
/// which [`freshness_lifetime_greater_than`] handles.
pub fn has_explicit_expiration(headers: &HeaderMap) -> bool {
    headers.has_header("Date")
        && (headers.has_header("Expires") || headers.header_contains("Cache-Control", "max-age"))
}

/// Parse an HTTP date into milliseconds since the epoch
///
/// Accepts RFC 1123 (and general RFC 2822), RFC 850 and asctime forms.
pub fn parse_http_date(value: &str) -> Option<f64> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.timestamp_millis() as f64);
    }
    const NAIVE_FORMATS: [&str; 2] = ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"];
    NAIVE_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(value, fmt)
            .ok()
            .map(|naive| naive.and_utc().timestamp_millis() as f64)
    })
}

/// Freshness lifetime of a response in milliseconds
///
/// `None` when there is no reference Date or no numeric lifetime.
pub fn freshness_lifetime_ms(headers: &HeaderMap) -> Option<f64> {
    let date_ms = parse_http_date(headers.get("Date")?)?;

    let max_age = headers
        .get("Cache-Control")
        .and_then(|cc| max_age_regex().captures(cc))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    if let Some(seconds) = max_age {
        return seconds
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite())
            .map(|s| s * 1000.0);
    }

    let expires_ms = parse_http_date(headers.get("Expires")?)?;
    Some(expires_ms - date_ms)
}

/// Whether the response stays fresh for longer than `threshold_ms`
pub fn freshness_lifetime_greater_than(headers: &HeaderMap, threshold_ms: f64) -> bool {
    freshness_lifetime_ms(headers)
        .map(|lifetime| lifetime > threshold_ms)
        .unwrap_or(false)
}

/// Whether the response explicitly opts out of caching
pub fn is_explicitly_non_cacheable(headers: &HeaderMap, url: &str, status_code: i32) -> bool {
    let explicit = has_explicit_expiration(headers);
    headers.header_contains("Cache-Control", "no-cache")
        || headers.header_contains("Cache-Control", "no-store")
        || headers.header_contains("Cache-Control", "must-revalidate")
        || headers.header_contains("Pragma", "no-cache")
        // Expiration in the past is the HTTP/1.0 spelling of no-cache
        || (explicit && !freshness_lifetime_greater_than(headers, 0.0))
        || (!explicit && url.contains('?'))
        || (!explicit && !is_cacheable_response_code(status_code))
}

/// Whether shared proxies may cache the response
pub fn is_publicly_cacheable(headers: &HeaderMap, url: &str, status_code: i32) -> bool {
    if is_explicitly_non_cacheable(headers, url, status_code) {
        return false;
    }
    if headers.header_contains("Cache-Control", "public") {
        return true;
    }
    // Most proxies cache query-less responses not marked private
    !url.contains('?') && !headers.header_contains("Cache-Control", "private")
}
