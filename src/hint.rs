//! Hints and the sinks that receive them
//!
//! A hint is one finding produced by a rule: which rule raised it, when,
//! against which record, how severe, and a human-readable description.
//! The engine never stores hints; each one is handed to a [`HintSink`] as
//! soon as it is raised.

use crate::time_format::format_time;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use thiserror::Error;

/// Errors raised while building or emitting a hint
#[derive(Debug, Error)]
pub enum HintError {
    #[error("Hint timestamp must be finite, got {0}")]
    InvalidTimestamp(f64),

    #[error("Unknown severity level {0} (expected 1, 2 or 3)")]
    InvalidSeverity(u8),

    #[error("Failed to write hint: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize hint: {0}")]
    Json(#[from] serde_json::Error),
}

/// Hint severity; lower values are more severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Severity {
    /// Definite defect with a large performance cost
    Critical = 1,
    /// Likely defect worth fixing
    Warning = 2,
    /// Improvement opportunity
    Info = 3,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Warning, Severity::Info];

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }

    /// The more severe of two levels
    pub fn most_severe(self, other: Severity) -> Severity {
        self.min(other)
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity.level()
    }
}

impl TryFrom<u8> for Severity {
    type Error = HintError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Severity::Critical),
            2 => Ok(Severity::Warning),
            3 => Ok(Severity::Info),
            other => Err(HintError::InvalidSeverity(other)),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One finding raised by a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    /// Name of the rule that raised the hint
    pub rule_name: String,
    /// Host time the finding refers to
    pub timestamp: f64,
    pub description: String,
    /// Sequence number of the record that triggered the hint
    pub ref_record: u64,
    pub severity: Severity,
}

impl Hint {
    pub fn new(
        rule_name: impl Into<String>,
        timestamp: f64,
        description: impl Into<String>,
        ref_record: u64,
        severity: Severity,
    ) -> Result<Self, HintError> {
        if !timestamp.is_finite() {
            return Err(HintError::InvalidTimestamp(timestamp));
        }
        Ok(Self {
            rule_name: rule_name.into(),
            timestamp,
            description: description.into(),
            ref_record,
            severity,
        })
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} @ {} (record #{}): {}",
            self.severity,
            self.rule_name,
            format_time(self.timestamp),
            self.ref_record,
            self.description
        )
    }
}

/// Destination for hints as they are raised
pub trait HintSink {
    fn emit(&mut self, hint: Hint) -> Result<(), HintError>;

    /// Flush buffered output; called once the record stream ends
    fn flush(&mut self) -> Result<(), HintError> {
        Ok(())
    }
}

/// In-memory collector
impl HintSink for Vec<Hint> {
    fn emit(&mut self, hint: Hint) -> Result<(), HintError> {
        self.push(hint);
        Ok(())
    }
}

impl<S: HintSink + ?Sized> HintSink for Box<S> {
    fn emit(&mut self, hint: Hint) -> Result<(), HintError> {
        (**self).emit(hint)
    }

    fn flush(&mut self) -> Result<(), HintError> {
        (**self).flush()
    }
}

impl<S: HintSink + ?Sized> HintSink for &mut S {
    fn emit(&mut self, hint: Hint) -> Result<(), HintError> {
        (**self).emit(hint)
    }

    fn flush(&mut self) -> Result<(), HintError> {
        (**self).flush()
    }
}

/// Writes one human-readable line per hint
#[derive(Debug)]
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> HintSink for TextSink<W> {
    fn emit(&mut self, hint: Hint) -> Result<(), HintError> {
        writeln!(self.writer, "{}", hint)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), HintError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Hint counts per severity and per rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HintSummary {
    pub critical: u64,
    pub warning: u64,
    pub info: u64,
    pub by_rule: BTreeMap<String, u64>,
}

impl HintSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, hint: &Hint) {
        match hint.severity {
            Severity::Critical => self.critical += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
        *self.by_rule.entry(hint.rule_name.clone()).or_insert(0) += 1;
    }

    pub fn count(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Critical => self.critical,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
        }
    }

    pub fn total(&self) -> u64 {
        self.critical + self.warning + self.info
    }

    /// Most severe level seen, if any hint was counted
    pub fn most_severe(&self) -> Option<Severity> {
        Severity::ALL.into_iter().find(|s| self.count(*s) > 0)
    }
}

impl fmt::Display for HintSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} hints: {} critical, {} warning, {} info",
            self.total(),
            self.critical,
            self.warning,
            self.info
        )?;
        for (rule, count) in &self.by_rule {
            writeln!(f, "  {:<50} {:>6}", rule, count)?;
        }
        Ok(())
    }
}

/// Counts hints on their way to an inner sink
#[derive(Debug)]
pub struct SummarySink<S> {
    inner: S,
    summary: HintSummary,
}

impl<S: HintSink> SummarySink<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            summary: HintSummary::new(),
        }
    }

    pub fn summary(&self) -> &HintSummary {
        &self.summary
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_parts(self) -> (S, HintSummary) {
        (self.inner, self.summary)
    }
}

impl<S: HintSink> HintSink for SummarySink<S> {
    fn emit(&mut self, hint: Hint) -> Result<(), HintError> {
        // Only hints the inner sink accepted are counted
        let counted = hint.clone();
        self.inner.emit(hint)?;
        self.summary.add(&counted);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), HintError> {
        self.inner.flush()
    }
}
