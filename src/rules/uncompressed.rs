// Uncompressed Resource

use super::finished_resource;
use crate::cache_policy::is_compressible_resource_type;
use crate::config::UncompressedConfig;
use crate::engine::{HintletRule, RuleContext, RuleError};
use crate::hint::Severity;
use crate::record::Record;

const RULE_NAME: &str = "Uncompressed Resource";

/// Flags text resources served without a Content-Encoding
pub struct UncompressedRule {
    config: UncompressedConfig,
}

impl UncompressedRule {
    pub fn new(config: UncompressedConfig) -> Self {
        Self { config }
    }
}

impl HintletRule for UncompressedRule {
    fn name(&self) -> &str {
        RULE_NAME
    }

    fn on_record(&mut self, record: &Record, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let Some(resource) = finished_resource(record, ctx) else {
            return Ok(());
        };
        // Compression does not pay off for tiny bodies
        match resource.size() {
            Some(size) if size >= self.config.min_size_bytes => {}
            _ => return Ok(()),
        }
        if !is_compressible_resource_type(resource.resource_type()) {
            return Ok(());
        }
        if resource.response_headers_or_empty().is_compressed() {
            return Ok(());
        }

        ctx.add_hint(
            RULE_NAME,
            resource.response_received_time.unwrap_or(record.time),
            format!("URL {} was not compressed with gzip or bzip2", resource.url),
            record.sequence.unwrap_or_default(),
            Severity::Info,
        )?;
        Ok(())
    }
}
