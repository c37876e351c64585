//! Self-duration: time spent in a record excluding its descendants
//!
//! A record's self duration is its own duration minus the effective time
//! of its children, computed bottom-up in one pass over the tree. The
//! effective time of a child is its duration, except for an aggregate
//! record, which folds many small events into one and counts the summed
//! time of the folded events instead.

use crate::record::{Record, RecordData};
use crate::record_type::RecordType;
use tracing::warn;

/// Fill in `self_duration` for `record` and every timed descendant
///
/// Returns the time this record accounts for in its parent's budget:
/// its duration, or for an aggregate record its computed self duration.
/// A record without a duration is left untouched and contributes 0.
pub fn compute_self_duration(record: &mut Record) -> f64 {
    let Some(duration) = record.duration else {
        return 0.0;
    };

    if record.kind == RecordType::AggregatedEvents {
        let folded: f64 = match &record.data {
            RecordData::AggregatedEvents(events) => events.iter().map(|e| e.time_spent()).sum(),
            _ => 0.0,
        };
        record.self_duration = Some(folded);
        return folded;
    }

    let children_time: f64 = record
        .children
        .iter_mut()
        .map(compute_self_duration)
        .sum();

    let mut self_duration = duration - children_time;
    if self_duration < 0.0 {
        // Children overran the parent; host clocks are not always consistent
        warn!(
            kind = %record.kind,
            time = record.time,
            duration,
            children_time,
            "Negative self duration clamped to 0"
        );
        self_duration = 0.0;
    }
    record.self_duration = Some(self_duration);
    duration
}
