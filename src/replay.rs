//! Replay a recorded trace through an engine
//!
//! Traces are stored as JSON lines: one record object per line, in the
//! order the host produced them. Blank lines are ignored. A line that
//! fails to parse is logged and skipped so one corrupt record does not
//! abort the whole replay.

use crate::engine::{DispatchOutcome, HintletEngine};
use crate::hint::HintSink;
use crate::record::Record;
use serde::Serialize;
use std::io::BufRead;
use tracing::{debug, warn};

/// Counters for one replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    /// Records parsed and dispatched
    pub records: u64,
    /// Records the rules saw
    pub forwarded: u64,
    /// Lines skipped because they did not parse
    pub skipped: u64,
    pub hints: u64,
    pub rule_failures: u64,
}

impl ReplayStats {
    pub fn record(&mut self, outcome: &DispatchOutcome) {
        self.records += 1;
        if outcome.forwarded {
            self.forwarded += 1;
        }
        self.hints += outcome.hints_emitted as u64;
        self.rule_failures += outcome.rule_failures as u64;
    }
}

/// Dispatch every record in a JSON-lines stream
///
/// Only read errors are fatal; malformed lines are counted in
/// [`ReplayStats::skipped`].
pub fn replay<R: BufRead, S: HintSink>(
    reader: R,
    engine: &mut HintletEngine<S>,
) -> std::io::Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match Record::from_json(line) {
            Ok(mut record) => {
                let outcome = engine.dispatch(&mut record);
                stats.record(&outcome);
            }
            Err(e) => {
                stats.skipped += 1;
                warn!(line = index + 1, "Skipping malformed record: {}", e);
            }
        }
    }

    debug!(
        records = stats.records,
        skipped = stats.skipped,
        hints = stats.hints,
        "Replay finished"
    );
    Ok(stats)
}
