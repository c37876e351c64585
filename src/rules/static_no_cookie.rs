// Static Resource served from domains with cookies

use super::finished_resource;
use crate::cache_policy::is_cacheable_resource_type;
use crate::engine::{HintletRule, RuleContext, RuleError};
use crate::hint::Severity;
use crate::record::Record;

const RULE_NAME: &str = "Static Resource served from domains with cookies";

/// Bytes the `Cookie: ` request prefix adds on top of the value
const COOKIE_HEADER_OVERHEAD: usize = 8;

/// Flags static content served with cookies
#[derive(Debug, Default)]
pub struct StaticNoCookieRule;

impl StaticNoCookieRule {
    pub fn new() -> Self {
        Self
    }
}

impl HintletRule for StaticNoCookieRule {
    fn name(&self) -> &str {
        RULE_NAME
    }

    fn on_record(&mut self, record: &Record, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let Some(resource) = finished_resource(record, ctx) else {
            return Ok(());
        };
        // Static means stylesheet, script, image or media
        if !is_cacheable_resource_type(resource.resource_type()) {
            return Ok(());
        }
        let Some(cookie) = resource.response_headers_or_empty().cookie() else {
            return Ok(());
        };

        let description = format!(
            "URL {} is static content that should be served from a domain that does not set \
             cookies.  Found {} extra bytes from cookie.",
            resource.url,
            cookie.len() + COOKIE_HEADER_OVERHEAD
        );
        ctx.add_hint(
            RULE_NAME,
            resource.response_received_time.unwrap_or(record.time),
            description,
            record.sequence.unwrap_or_default(),
            Severity::Info,
        )?;
        Ok(())
    }
}
