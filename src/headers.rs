//! HTTP header sets with case-insensitive lookup
//!
//! Header names are lower-cased once, when the map is built or
//! deserialized, so every lookup is a plain map access. Values are kept
//! verbatim.

use regex::RegexBuilder;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Content-Encoding values that indicate a compressed body
const COMPRESSION_ENCODINGS: [&str; 6] = [
    "compress",
    "deflate",
    "gzip",
    "pack200-gzip", // Java archives
    "bzip2",
    "sdch",
];

/// Header name → value, keyed by lower-cased name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeaderMap {
    entries: BTreeMap<String, String>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header; a name differing only in case replaces the old value
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Value of a header, matched case-insensitively on the name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether the header exists and its value matches `pattern`
    ///
    /// `pattern` is a regular expression searched case-insensitively and in
    /// multi-line mode over the whole value. A pattern that does not compile
    /// is searched as a literal substring instead.
    pub fn header_contains(&self, name: &str, pattern: &str) -> bool {
        let Some(value) = self.get(name) else {
            return false;
        };
        match RegexBuilder::new(pattern)
            .case_insensitive(true)
            .multi_line(true)
            .build()
        {
            Ok(re) => re.is_match(value),
            Err(_) => value
                .to_ascii_lowercase()
                .contains(&pattern.to_ascii_lowercase()),
        }
    }

    /// Whether Content-Encoding names a compression scheme
    pub fn is_compressed(&self) -> bool {
        self.get("Content-Encoding")
            .map(|enc| {
                let enc = enc.trim().to_ascii_lowercase();
                COMPRESSION_ENCODINGS.contains(&enc.as_str())
            })
            .unwrap_or(false)
    }

    /// Non-empty Set-Cookie value, falling back to a non-empty Cookie value
    pub fn cookie(&self) -> Option<&str> {
        self.get("Set-Cookie")
            .filter(|c| !c.is_empty())
            .or_else(|| self.get("Cookie").filter(|c| !c.is_empty()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(lower-cased name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HeaderMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl<'de> Deserialize<'de> for HeaderMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Hosts occasionally send non-string values (numbers for Content-Length)
        let raw: BTreeMap<String, serde_json::Value> = BTreeMap::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                (name, value)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_has_header_case_insensitive() {
        let h = headers(&[("Content-Type", "text/html")]);
        assert!(h.has_header("content-type"));
        assert!(h.has_header("CONTENT-TYPE"));
        assert!(h.has_header("Content-Type"));
        assert!(!h.has_header("Content-Length"));
        assert_eq!(h.get("CoNtEnT-tYpE"), Some("text/html"));
    }

    #[test]
    fn test_header_contains_case_insensitive_value() {
        let h = headers(&[("Cache-Control", "Private, MAX-AGE=0")]);
        assert!(h.header_contains("cache-control", "max-age"));
        assert!(h.header_contains("Cache-Control", "private"));
        assert!(!h.header_contains("Cache-Control", "public"));
    }

    #[test]
    fn test_header_contains_absent_header() {
        let h = headers(&[("Date", "Thu, 14 Jul 2011 21:07:34 GMT")]);
        assert!(!h.header_contains("Cache-Control", ""));
        assert!(!h.header_contains("Cache-Control", "no-cache"));
        assert!(!HeaderMap::new().header_contains("Pragma", "anything"));
    }

    #[test]
    fn test_header_contains_invalid_pattern_falls_back_to_substring() {
        let h = headers(&[("Vary", "Accept-Encoding (legacy")]);
        assert!(h.header_contains("Vary", "(LEGACY"));
        assert!(!h.header_contains("Vary", "(modern"));
    }

    #[test]
    fn test_header_contains_multiline_value() {
        let h = headers(&[("Cache-Control", "public\nmax-age=60")]);
        assert!(h.header_contains("Cache-Control", "^max-age"));
    }

    #[test]
    fn test_is_compressed() {
        assert!(headers(&[("Content-Encoding", "gzip")]).is_compressed());
        assert!(headers(&[("content-encoding", "GZIP")]).is_compressed());
        assert!(headers(&[("Content-Encoding", "bzip2")]).is_compressed());
        assert!(!headers(&[("Content-Encoding", "identity")]).is_compressed());
        assert!(!HeaderMap::new().is_compressed());
    }

    #[test]
    fn test_cookie_prefers_set_cookie() {
        let h = headers(&[("Set-Cookie", "a=1"), ("Cookie", "b=2")]);
        assert_eq!(h.cookie(), Some("a=1"));
        let h = headers(&[("Set-Cookie", ""), ("Cookie", "b=2")]);
        assert_eq!(h.cookie(), Some("b=2"));
        assert_eq!(headers(&[("Cookie", "")]).cookie(), None);
    }

    #[test]
    fn test_deserialize_normalizes_names() {
        let h: HeaderMap =
            serde_json::from_str(r#"{"Content-Length": 2755, "ETag": "abc", "X-Null": null}"#)
                .unwrap();
        assert_eq!(h.get("content-length"), Some("2755"));
        assert_eq!(h.get("etag"), Some("abc"));
        assert_eq!(h.get("x-null"), Some(""));
        assert!(h.iter().all(|(k, _)| k == k.to_ascii_lowercase()));
    }
}
