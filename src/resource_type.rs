//! Resource type classification from Content-Type and URL

use crate::headers::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// MIME types served for document-like responses
const DOCUMENT_MIME_TYPES: [&str; 5] = [
    "text/plain",
    "text/html",
    "text/xml",
    "application/xml",
    "application/json",
];

const FAVICON_MIME_TYPE: &str = "image/vnd.microsoft.icon";

/// Semantic category of a network resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Document,
    Stylesheet,
    Image,
    Font,
    Script,
    XmlHttpRequest,
    Media,
    Iframe,
    Favicon,
    Other,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceType::Document => "document",
            ResourceType::Stylesheet => "stylesheet",
            ResourceType::Image => "image",
            ResourceType::Font => "font",
            ResourceType::Script => "script",
            ResourceType::XmlHttpRequest => "xhr",
            ResourceType::Media => "media",
            ResourceType::Iframe => "iframe",
            ResourceType::Favicon => "favicon",
            ResourceType::Other => "other",
        };
        f.write_str(name)
    }
}

/// Extract the `type/subtype` prefix of a Content-Type value, lower-cased
///
/// Parameters after `;` and anything past a second `/` are ignored.
/// Returns `None` when the value does not start with a `type/subtype` pair.
pub fn mime_type(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim();
    let (main, rest) = essence.split_once('/')?;
    let sub = rest.split('/').next().unwrap_or_default().trim_end();
    if main.is_empty() || sub.is_empty() {
        return None;
    }
    Some(format!("{}/{}", main, sub).to_ascii_lowercase())
}

/// Classify a response by its Content-Type header, then its URL
///
/// Precedence, first match wins: missing Content-Type, document types,
/// stylesheet, script, favicon (icon MIME type or a `/favicon.ico` URL),
/// any `image/*`, everything else.
pub fn classify(url: Option<&str>, headers: &HeaderMap) -> ResourceType {
    let Some(content_type) = headers.get("Content-Type") else {
        return ResourceType::Other;
    };
    let Some(mime) = mime_type(content_type) else {
        return ResourceType::Other;
    };

    if DOCUMENT_MIME_TYPES.contains(&mime.as_str()) {
        return ResourceType::Document;
    }
    if mime == "text/css" {
        return ResourceType::Stylesheet;
    }
    if mime == "text/javascript" {
        return ResourceType::Script;
    }
    // A favicon URL wins over the generic image classification
    let favicon_url = url
        .map(|u| u.to_ascii_lowercase().ends_with("/favicon.ico"))
        .unwrap_or(false);
    if mime == FAVICON_MIME_TYPE || favicon_url {
        return ResourceType::Favicon;
    }
    if mime.starts_with("image/") {
        return ResourceType::Image;
    }
    ResourceType::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_type(value: &str) -> HeaderMap {
        [("Content-Type", value)].into_iter().collect()
    }

    #[test]
    fn test_absent_content_type_is_other() {
        assert_eq!(
            classify(Some("http://a.com/x.css"), &HeaderMap::new()),
            ResourceType::Other
        );
    }

    #[test]
    fn test_document_types() {
        for mime in DOCUMENT_MIME_TYPES {
            assert_eq!(classify(None, &content_type(mime)), ResourceType::Document);
        }
        assert_eq!(
            classify(None, &content_type("text/html; charset=UTF-8")),
            ResourceType::Document
        );
    }

    #[test]
    fn test_stylesheet_and_script() {
        assert_eq!(
            classify(None, &content_type("text/css")),
            ResourceType::Stylesheet
        );
        assert_eq!(
            classify(None, &content_type("text/javascript;charset=utf-8")),
            ResourceType::Script
        );
    }

    #[test]
    fn test_favicon_url_overrides_image() {
        assert_eq!(
            classify(
                Some("http://example.com/favicon.ico"),
                &content_type("image/png")
            ),
            ResourceType::Favicon
        );
        assert_eq!(
            classify(None, &content_type("image/vnd.microsoft.icon")),
            ResourceType::Favicon
        );
    }

    #[test]
    fn test_image() {
        assert_eq!(
            classify(Some("http://example.com/logo.png"), &content_type("image/png")),
            ResourceType::Image
        );
        // Only the leading type/subtype pair counts
        assert_eq!(classify(None, &content_type("image/png/x")), ResourceType::Image);
        assert_eq!(
            classify(None, &content_type("text/css/extra; charset=utf-8")),
            ResourceType::Stylesheet
        );
    }

    #[test]
    fn test_other_types() {
        assert_eq!(
            classify(None, &content_type("application/octet-stream")),
            ResourceType::Other
        );
        assert_eq!(classify(None, &content_type("garbage")), ResourceType::Other);
        assert_eq!(classify(None, &content_type("")), ResourceType::Other);
    }

    #[test]
    fn test_content_type_case_insensitive() {
        let headers: HeaderMap = [("content-type", "TEXT/CSS")].into_iter().collect();
        assert_eq!(classify(None, &headers), ResourceType::Stylesheet);
    }

    #[test]
    fn test_mime_type_extraction() {
        assert_eq!(mime_type("Text/HTML; q=1").as_deref(), Some("text/html"));
        assert_eq!(mime_type("a/b/c").as_deref(), Some("a/b"));
        assert_eq!(mime_type("a//c"), None);
        assert_eq!(mime_type("/x"), None);
    }
}
