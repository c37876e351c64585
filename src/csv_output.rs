//! CSV output format for hint reports
//!
//! One row per hint, for spreadsheet analysis and machine parsing.

use crate::hint::{Hint, HintError, HintSink};

const HEADER: &str = "record,severity,rule,timestamp,description";

/// CSV output formatter
#[derive(Debug, Default)]
pub struct CsvOutput {
    hints: Vec<Hint>,
}

impl CsvOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hint(&mut self, hint: Hint) {
        self.hints.push(hint);
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains([',', '"', '\n', '\r']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_hint(hint: &Hint) -> String {
        [
            hint.ref_record.to_string(),
            hint.severity.label().to_string(),
            Self::escape_field(&hint.rule_name),
            hint.timestamp.to_string(),
            Self::escape_field(&hint.description),
        ]
        .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str(HEADER);
        output.push('\n');

        for hint in &self.hints {
            output.push_str(&Self::format_hint(hint));
            output.push('\n');
        }

        output
    }
}

impl HintSink for CsvOutput {
    fn emit(&mut self, hint: Hint) -> Result<(), HintError> {
        self.add_hint(hint);
        Ok(())
    }
}
