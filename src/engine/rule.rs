// Rule trait and the context rules see while handling a record

use crate::hint::{Hint, HintError, HintSink, Severity};
use crate::record::Record;
use crate::resources::{ResourceState, ResourceStore};
use thiserror::Error;

/// Failure reported by a rule while handling one record
#[derive(Debug, Error)]
pub enum RuleError {
    #[error(transparent)]
    Hint(#[from] HintError),

    #[error("{0}")]
    Custom(String),
}

/// A diagnostic rule subscribed to the record stream
///
/// Rules see every record except resource-update fragments, in arrival
/// order, after self durations are filled in and the resource snapshots
/// are up to date. Any state a rule needs across records lives in the
/// rule itself.
pub trait HintletRule {
    /// Name used as the origin tag of the rule's hints
    fn name(&self) -> &str;

    fn on_record(&mut self, record: &Record, ctx: &mut RuleContext<'_>) -> Result<(), RuleError>;
}

/// Engine state exposed to a rule for the duration of one callback
pub struct RuleContext<'a> {
    resources: &'a ResourceStore,
    sink: &'a mut dyn HintSink,
    emitted: usize,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(resources: &'a ResourceStore, sink: &'a mut dyn HintSink) -> Self {
        Self {
            resources,
            sink,
            emitted: 0,
        }
    }

    /// Accumulated snapshot for a resource identifier
    pub fn resource(&self, identifier: &str) -> Option<&'a ResourceState> {
        self.resources.get(identifier)
    }

    pub fn resources(&self) -> &'a ResourceStore {
        self.resources
    }

    /// Build a hint and hand it straight to the sink
    pub fn add_hint(
        &mut self,
        rule_name: &str,
        timestamp: f64,
        description: impl Into<String>,
        ref_record: u64,
        severity: Severity,
    ) -> Result<(), HintError> {
        let hint = Hint::new(rule_name, timestamp, description, ref_record, severity)?;
        self.sink.emit(hint)?;
        self.emitted += 1;
        Ok(())
    }

    pub(crate) fn emitted(&self) -> usize {
        self.emitted
    }
}

/// Adapter turning a closure into a rule
pub struct FnRule<F> {
    name: String,
    callback: F,
}

impl<F> FnRule<F>
where
    F: FnMut(&Record, &mut RuleContext<'_>) -> Result<(), RuleError>,
{
    pub fn new(name: impl Into<String>, callback: F) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }
}

impl<F> HintletRule for FnRule<F>
where
    F: FnMut(&Record, &mut RuleContext<'_>) -> Result<(), RuleError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_record(&mut self, record: &Record, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        (self.callback)(record, ctx)
    }
}
