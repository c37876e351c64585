//! JSON output format for hint reports
//!
//! `--format json` collects every hint and prints one document at the end,
//! with a summary of the replay.

use crate::hint::{Hint, HintError, HintSink, HintSummary};
use crate::replay::ReplayStats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary block of the JSON report
#[derive(Debug, Clone, Default, Serialize)]
pub struct JsonSummary {
    /// Records dispatched
    pub total_records: u64,
    /// Malformed input lines skipped
    pub skipped_records: u64,
    pub total_hints: u64,
    pub critical: u64,
    pub warning: u64,
    pub info: u64,
    /// Hint count per rule name
    pub by_rule: BTreeMap<String, u64>,
    pub rule_failures: u64,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Crate version that produced the report
    pub version: String,
    pub format: String,
    pub hints: Vec<Hint>,
    pub summary: JsonSummary,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "hintlet-json-v1".to_string(),
            hints: Vec::new(),
            summary: JsonSummary::default(),
        }
    }

    pub fn add_hint(&mut self, hint: Hint) {
        self.hints.push(hint);
    }

    /// Fill in the summary from the replay counters
    pub fn set_stats(&mut self, stats: &ReplayStats) {
        let mut counts = HintSummary::new();
        for hint in &self.hints {
            counts.add(hint);
        }
        self.summary = JsonSummary {
            total_records: stats.records,
            skipped_records: stats.skipped,
            total_hints: counts.total(),
            critical: counts.critical,
            warning: counts.warning,
            info: counts.info,
            by_rule: counts.by_rule,
            rule_failures: stats.rule_failures,
        };
    }

    /// Serialize to a pretty-printed JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl HintSink for JsonOutput {
    fn emit(&mut self, hint: Hint) -> Result<(), HintError> {
        self.add_hint(hint);
        Ok(())
    }
}
