// Resource Caching: expiration, Vary and freshness checks on finished resources

use super::finished_resource;
use crate::cache_policy::{
    freshness_lifetime_greater_than, has_explicit_expiration, is_cacheable_resource_type,
    is_explicitly_non_cacheable,
};
use crate::config::CacheControlConfig;
use crate::engine::{HintletRule, RuleContext, RuleError};
use crate::headers::HeaderMap;
use crate::hint::Severity;
use crate::record::Record;
use crate::resources::ResourceState;
use regex::Regex;
use std::sync::OnceLock;

const RULE_NAME: &str = "Resource Caching";

/// Vary values Internet Explorer still caches
fn ie_cacheable_vary() -> &'static Regex {
    static VARY: OnceLock<Regex> = OnceLock::new();
    VARY.get_or_init(|| Regex::new(r"(?i)user-agent|accept-encoding").expect("static regex"))
}

/// One finding the rule can raise for a finished resource
struct Finding {
    severity: Severity,
    message: String,
}

pub struct CacheControlRule {
    config: CacheControlConfig,
}

impl CacheControlRule {
    pub fn new(config: CacheControlConfig) -> Self {
        Self { config }
    }

    /// Cacheable resources need an explicit expiration
    fn missing_expiration(resource: &ResourceState, headers: &HeaderMap) -> Option<Finding> {
        if !is_cacheable_resource_type(resource.resource_type())
            || headers.cookie().is_some()
            || is_explicitly_non_cacheable(headers, &resource.url, resource.status_or_unknown())
            || has_explicit_expiration(headers)
        {
            return None;
        }
        Some(Finding {
            severity: Severity::Critical,
            message: format!(
                "The following resources are missing a cache expiration. Resources that do \
                 not specify an expiration may not be cached by browsers. Specify an \
                 expiration at least one month in the future for resources that should be \
                 cached, and an expiration in the past for resources that should not be \
                 cached: {}",
                resource.url
            ),
        })
    }

    /// Internet Explorer skips caching for any Vary other than Accept-Encoding/User-Agent
    fn problematic_vary(resource: &ResourceState, headers: &HeaderMap) -> Option<Finding> {
        let vary = headers.get("Vary")?;
        if !is_cacheable_resource_type(resource.resource_type())
            || !freshness_lifetime_greater_than(headers, 0.0)
        {
            return None;
        }
        let remainder: String = ie_cacheable_vary()
            .replace_all(vary, "")
            .chars()
            .filter(|c| *c != ',' && *c != ' ')
            .collect();
        if remainder.is_empty() {
            return None;
        }
        Some(Finding {
            severity: Severity::Critical,
            message: format!(
                "The following resources specify a 'Vary' header that disables caching in \
                 most versions of Internet Explorer. Fix or remove the 'Vary' header for the \
                 following resources: {}",
                resource.url
            ),
        })
    }

    fn short_freshness(&self, resource: &ResourceState, headers: &HeaderMap) -> Option<Finding> {
        if !is_cacheable_resource_type(resource.resource_type())
            || headers.cookie().is_some()
            || !freshness_lifetime_greater_than(headers, 0.0)
        {
            return None;
        }
        if !freshness_lifetime_greater_than(headers, self.config.min_freshness_ms) {
            return Some(Finding {
                severity: Severity::Warning,
                message: format!(
                    "The following cacheable resources have a short freshness lifetime. \
                     Specify an expiration at least one month in the future for the \
                     following resources: {}",
                    resource.url
                ),
            });
        }
        if !freshness_lifetime_greater_than(headers, self.config.preferred_freshness_ms) {
            return Some(Finding {
                severity: Severity::Info,
                message: format!(
                    "To further improve cache hit rate, specify an expiration one year in the \
                     future for the following cacheable resources: {}",
                    resource.url
                ),
            });
        }
        None
    }
}

impl HintletRule for CacheControlRule {
    fn name(&self) -> &str {
        RULE_NAME
    }

    fn on_record(&mut self, record: &Record, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let Some(resource) = finished_resource(record, ctx) else {
            return Ok(());
        };
        let Some(headers) = resource.response_headers.as_ref() else {
            return Ok(());
        };
        let sequence = record.sequence.unwrap_or_default();

        let findings = [
            Self::missing_expiration(resource, headers),
            Self::problematic_vary(resource, headers),
            self.short_freshness(resource, headers),
        ];
        for finding in findings.into_iter().flatten() {
            ctx.add_hint(
                RULE_NAME,
                record.time,
                finding.message,
                sequence,
                finding.severity,
            )?;
        }
        Ok(())
    }
}
