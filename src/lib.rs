//! Hintlet - rule engine that turns browser performance traces into hints
//!
//! This library replays timeline and network records, reconstructs each
//! network resource from its partial updates, and runs diagnostic rules
//! (caching, compression, page weight, long and layout-heavy events) that
//! report findings with a severity.

pub mod cache_policy;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod engine;
pub mod headers;
pub mod hint;
pub mod json_output;
pub mod record;
pub mod record_type;
pub mod replay;
pub mod resource_type;
pub mod resources;
pub mod rules;
pub mod self_duration;
pub mod time_format;
