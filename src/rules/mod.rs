//! Built-in diagnostic rules
//!
//! | id | hint origin | trigger |
//! |---|---|---|
//! | `cache_control` | Resource Caching | resource finish |
//! | `static_no_cookie` | Static Resource served from domains with cookies | resource finish |
//! | `uncompressed` | Uncompressed Resource | resource finish |
//! | `total_bytes` | Total Bytes Downloaded | resource finish, tab change |
//! | `long_duration` | Long Duration Events | any UI event |
//! | `frequent_layout` | Frequent Layout activity | any UI event with children |
//!
//! Network rules read the accumulated snapshot of the finished resource,
//! so everything learned from earlier fragments is available to them.

mod cache_control;
mod frequent_layout;
mod long_duration;
mod static_no_cookie;
mod total_bytes;
mod uncompressed;

pub use cache_control::CacheControlRule;
pub use frequent_layout::FrequentLayoutRule;
pub use long_duration::LongDurationRule;
pub use static_no_cookie::StaticNoCookieRule;
pub use total_bytes::TotalBytesRule;
pub use uncompressed::UncompressedRule;

use crate::config::HintletConfig;
use crate::engine::{HintletEngine, HintletRule, RuleContext};
use crate::hint::HintSink;
use crate::record::{Record, RecordData};
use crate::resources::ResourceState;

/// Identifiers accepted by `enabled_rules` and `--rules`, in registration order
pub const BUILTIN_RULE_IDS: [&str; 6] = [
    "cache_control",
    "static_no_cookie",
    "uncompressed",
    "total_bytes",
    "long_duration",
    "frequent_layout",
];

/// Instantiate one built-in rule by identifier
pub fn builtin_rule(id: &str, config: &HintletConfig) -> Option<Box<dyn HintletRule>> {
    let rule: Box<dyn HintletRule> = match id {
        "cache_control" => Box::new(CacheControlRule::new(config.cache_control.clone())),
        "static_no_cookie" => Box::new(StaticNoCookieRule::new()),
        "uncompressed" => Box::new(UncompressedRule::new(config.uncompressed.clone())),
        "total_bytes" => Box::new(TotalBytesRule::new(config.total_bytes.clone())),
        "long_duration" => Box::new(LongDurationRule::new(config.long_duration.clone())),
        "frequent_layout" => Box::new(FrequentLayoutRule::new(config.frequent_layout.clone())),
        _ => return None,
    };
    Some(rule)
}

/// Every built-in rule the configuration enables
pub fn builtin_rules(config: &HintletConfig) -> Vec<Box<dyn HintletRule>> {
    BUILTIN_RULE_IDS
        .iter()
        .filter(|id| config.is_enabled(id))
        .filter_map(|id| builtin_rule(id, config))
        .collect()
}

/// Register the enabled built-in rules on an engine
pub fn register_builtin_rules<S: HintSink>(engine: &mut HintletEngine<S>, config: &HintletConfig) {
    for rule in builtin_rules(config) {
        engine.register(rule);
    }
}

/// Snapshot of the resource a finish record refers to
fn finished_resource<'a>(record: &Record, ctx: &RuleContext<'a>) -> Option<&'a ResourceState> {
    match &record.data {
        RecordData::ResourceFinish(finish) => ctx.resource(&finish.identifier),
        _ => None,
    }
}
