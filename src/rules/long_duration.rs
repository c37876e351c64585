// Long Duration Events

use crate::config::LongDurationConfig;
use crate::engine::{HintletRule, RuleContext, RuleError};
use crate::hint::Severity;
use crate::record::Record;
use crate::time_format::format_milliseconds;

const RULE_NAME: &str = "Long Duration Events";

/// Flags UI events that block the page for too long
pub struct LongDurationRule {
    config: LongDurationConfig,
}

impl LongDurationRule {
    pub fn new(config: LongDurationConfig) -> Self {
        Self { config }
    }
}

impl HintletRule for LongDurationRule {
    fn name(&self) -> &str {
        RULE_NAME
    }

    fn on_record(&mut self, record: &Record, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        if !record.is_ui_event() {
            return Ok(());
        }
        let Some(duration) = record.duration else {
            return Ok(());
        };

        let (severity, threshold) = if duration > self.config.warning_threshold_ms {
            (Severity::Warning, self.config.warning_threshold_ms)
        } else if duration > self.config.info_threshold_ms {
            (Severity::Info, self.config.info_threshold_ms)
        } else {
            return Ok(());
        };

        ctx.add_hint(
            RULE_NAME,
            record.time,
            format!(
                "Event lasted: {}.  Exceeded threshold: {}ms",
                format_milliseconds(duration),
                threshold
            ),
            record.sequence.unwrap_or_default(),
            severity,
        )?;
        Ok(())
    }
}
