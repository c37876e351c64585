// Total Bytes Downloaded: running page weight with escalating alarms

use super::finished_resource;
use crate::config::TotalBytesConfig;
use crate::engine::{HintletRule, RuleContext, RuleError};
use crate::hint::Severity;
use crate::record::{Record, RecordData};

const RULE_NAME: &str = "Total Bytes Downloaded";

/// Sums finished resource sizes per page
///
/// Each alarm level fires at most once per page, and a level is only
/// considered once the level below it has fired. Navigating to a new URL
/// starts a fresh page.
#[derive(Debug)]
pub struct TotalBytesRule {
    config: TotalBytesConfig,
    total: u64,
    info_emitted: bool,
    warning_emitted: bool,
    critical_emitted: bool,
    previous_url: Option<String>,
}

impl TotalBytesRule {
    pub fn new(config: TotalBytesConfig) -> Self {
        Self {
            config,
            total: 0,
            info_emitted: false,
            warning_emitted: false,
            critical_emitted: false,
            previous_url: None,
        }
    }

    /// Bytes counted for the current page
    pub fn total(&self) -> u64 {
        self.total
    }

    fn reset(&mut self) {
        self.total = 0;
        self.info_emitted = false;
        self.warning_emitted = false;
        self.critical_emitted = false;
    }

    /// Next alarm due for the current total, if any
    fn next_alarm(&mut self) -> Option<(Severity, u64)> {
        let c = &self.config;
        if !self.info_emitted {
            if self.total > c.info_bytes {
                self.info_emitted = true;
                return Some((Severity::Info, c.info_bytes));
            }
        } else if !self.warning_emitted {
            if self.total > c.warning_bytes {
                self.warning_emitted = true;
                return Some((Severity::Warning, c.warning_bytes));
            }
        } else if !self.critical_emitted && self.total > c.critical_bytes {
            self.critical_emitted = true;
            return Some((Severity::Critical, c.critical_bytes));
        }
        None
    }
}

impl HintletRule for TotalBytesRule {
    fn name(&self) -> &str {
        RULE_NAME
    }

    fn on_record(&mut self, record: &Record, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        if let RecordData::TabChanged(tab) = &record.data {
            if self.previous_url != tab.url {
                self.reset();
                self.previous_url = tab.url.clone();
            }
            return Ok(());
        }

        let Some(resource) = finished_resource(record, ctx) else {
            return Ok(());
        };
        let Some(size) = resource.size() else {
            return Ok(());
        };
        self.total = self.total.saturating_add(size as u64);

        if let Some((severity, threshold)) = self.next_alarm() {
            ctx.add_hint(
                RULE_NAME,
                record.time,
                format!("More than {} bytes downloaded.", threshold),
                record.sequence.unwrap_or_default(),
                severity,
            )?;
        }
        Ok(())
    }
}
