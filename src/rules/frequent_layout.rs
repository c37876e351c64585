// Frequent Layout activity

use crate::config::FrequentLayoutConfig;
use crate::engine::{HintletRule, RuleContext, RuleError};
use crate::hint::Severity;
use crate::record::Record;
use crate::record_type::RecordType;
use crate::time_format::format_milliseconds;

const RULE_NAME: &str = "Frequent Layout activity";

/// Layout descendants of one event
#[derive(Debug, Default, PartialEq)]
struct LayoutStats {
    count: usize,
    self_time: f64,
}

impl LayoutStats {
    fn collect(children: &[Record], stats: &mut LayoutStats) {
        for child in children {
            if child.kind == RecordType::Layout {
                stats.count += 1;
                stats.self_time += child.self_duration.unwrap_or(0.0);
            }
            Self::collect(&child.children, stats);
        }
    }
}

/// Flags UI events that trigger repeated layouts
pub struct FrequentLayoutRule {
    config: FrequentLayoutConfig,
}

impl FrequentLayoutRule {
    pub fn new(config: FrequentLayoutConfig) -> Self {
        Self { config }
    }
}

impl HintletRule for FrequentLayoutRule {
    fn name(&self) -> &str {
        RULE_NAME
    }

    fn on_record(&mut self, record: &Record, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        if !record.is_ui_event() || record.children.is_empty() {
            return Ok(());
        }

        let mut stats = LayoutStats::default();
        LayoutStats::collect(&record.children, &mut stats);
        if stats.count < self.config.min_layouts || stats.self_time < self.config.min_layout_time_ms
        {
            return Ok(());
        }

        ctx.add_hint(
            RULE_NAME,
            record.time,
            format!(
                "Event triggered {} layouts taking {}.",
                stats.count,
                format_milliseconds(stats.self_time)
            ),
            record.sequence.unwrap_or_default(),
            Severity::Warning,
        )?;
        Ok(())
    }
}
