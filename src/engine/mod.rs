//! Rule registry and record dispatch
//!
//! The engine owns the registered rules, the resource snapshots and the
//! hint sink. Each record goes through the same fixed pipeline:
//!
//! 1. a sequence number is assigned if the host did not provide one
//! 2. self durations are computed over the record tree
//! 3. resource-update fragments are merged into the snapshots and stop
//!    here; they are bookkeeping, not events rules react to
//! 4. resource request/response/finish records update the snapshots
//! 5. every rule sees the record, in registration order
//!
//! A rule that errors or panics is logged and skipped for that record
//! only; the remaining rules still run and the rule stays registered.
//!
//! # Example
//!
//! ```
//! use hintlet::engine::{HintletEngine, RuleError};
//! use hintlet::hint::{Hint, Severity};
//! use hintlet::record::Record;
//! use hintlet::record_type::RecordType;
//!
//! let mut engine = HintletEngine::new(Vec::<Hint>::new());
//! engine.register_fn("Paint counter", |record, ctx| {
//!     if record.kind == RecordType::Paint {
//!         let seq = record.sequence.unwrap_or_default();
//!         ctx.add_hint("Paint counter", record.time, "paint", seq, Severity::Info)?;
//!     }
//!     Ok::<(), RuleError>(())
//! });
//!
//! let mut record = Record::new(RecordType::Paint, 12.0).with_duration(3.0);
//! let outcome = engine.dispatch(&mut record);
//! assert_eq!(outcome.hints_emitted, 1);
//! assert_eq!(engine.sink().len(), 1);
//! ```

mod rule;

pub use rule::{FnRule, HintletRule, RuleContext, RuleError};

use crate::hint::{HintError, HintSink};
use crate::record::{Record, RecordData, RecordError};
use crate::record_type::RecordType;
use crate::resources::ResourceStore;
use crate::self_duration::compute_self_duration;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, trace, warn};

/// First sequence number handed out by a fresh engine
pub const FIRST_SEQUENCE: u64 = 1;

/// What happened to one dispatched record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Sequence number the record carries after dispatch
    pub sequence: u64,
    /// Whether rules saw the record
    pub forwarded: bool,
    pub hints_emitted: usize,
    /// Rules that returned an error or panicked on this record
    pub rule_failures: usize,
}

/// Hintlet engine: rules, resource snapshots and a hint sink
pub struct HintletEngine<S: HintSink> {
    rules: Vec<Box<dyn HintletRule>>,
    resources: ResourceStore,
    sink: S,
    next_sequence: u64,
}

impl<S: HintSink> HintletEngine<S> {
    pub fn new(sink: S) -> Self {
        Self {
            rules: Vec::new(),
            resources: ResourceStore::new(),
            sink,
            next_sequence: FIRST_SEQUENCE,
        }
    }

    /// Append a rule; rules run in registration order
    ///
    /// Names are not required to be unique: two rules with the same name
    /// both run.
    pub fn register(&mut self, rule: Box<dyn HintletRule>) {
        debug!("Registered hintlet: {}", rule.name());
        self.rules.push(rule);
    }

    /// Register a closure as a rule
    pub fn register_fn<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: FnMut(&Record, &mut RuleContext<'_>) -> Result<(), RuleError> + 'static,
    {
        self.register(Box::new(FnRule::new(name, callback)));
    }

    /// Run one record through the pipeline
    pub fn dispatch(&mut self, record: &mut Record) -> DispatchOutcome {
        let sequence = self.assign_sequence(record);
        trace!(sequence, kind = %record.kind, "Dispatching record");

        compute_self_duration(record);

        if let RecordData::ResourceUpdate(update) = &record.data {
            self.resources.apply_update(update);
            self.resources.maybe_evict(update);
            return DispatchOutcome {
                sequence,
                forwarded: false,
                hints_emitted: 0,
                rule_failures: 0,
            };
        }

        match record.kind {
            RecordType::ResourceSendRequest => self.resources.on_request_start(record),
            RecordType::ResourceReceiveResponse => self.resources.on_response(record),
            RecordType::ResourceFinish => self.resources.on_finish(record),
            _ => {}
        }

        let record: &Record = record;
        let mut hints_emitted = 0;
        let mut rule_failures = 0;
        for rule in self.rules.iter_mut() {
            let mut ctx = RuleContext::new(&self.resources, &mut self.sink);
            let result = catch_unwind(AssertUnwindSafe(|| rule.on_record(record, &mut ctx)));
            hints_emitted += ctx.emitted();

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    rule_failures += 1;
                    warn!(rule = rule.name(), sequence, "Hintlet failed: {}", e);
                }
                Err(payload) => {
                    rule_failures += 1;
                    warn!(
                        rule = rule.name(),
                        sequence,
                        "Hintlet panicked: {}",
                        panic_message(payload.as_ref())
                    );
                }
            }
        }

        // Finish-triggered rules have seen the snapshot; nothing reads it later
        if let RecordData::ResourceFinish(finish) = &record.data {
            self.resources.forget(&finish.identifier);
        }

        DispatchOutcome {
            sequence,
            forwarded: true,
            hints_emitted,
            rule_failures,
        }
    }

    /// Parse one JSON record and dispatch it
    pub fn dispatch_json(&mut self, json: &str) -> Result<DispatchOutcome, RecordError> {
        let mut record = Record::from_json(json)?;
        Ok(self.dispatch(&mut record))
    }

    /// Flush the sink; call once the record stream has ended
    pub fn flush(&mut self) -> Result<(), HintError> {
        self.sink.flush()
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn resources(&self) -> &ResourceStore {
        &self.resources
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Host-provided numbers are kept; the counter moves past them
    fn assign_sequence(&mut self, record: &mut Record) -> u64 {
        match record.sequence {
            Some(sequence) => {
                self.next_sequence = self.next_sequence.max(sequence.saturating_add(1));
                sequence
            }
            None => {
                let sequence = self.next_sequence;
                self.next_sequence = self.next_sequence.saturating_add(1);
                record.sequence = Some(sequence);
                sequence
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
