// Partial update fragment for one network resource

use crate::headers::HeaderMap;
use serde::{Deserialize, Serialize};

/// One partial update for a network resource
///
/// The `did_*_change` flags say which attribute groups the fragment
/// carries; fields outside the flagged groups are ignored when merging
/// into an existing snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceUpdate {
    #[serde(deserialize_with = "crate::record::identifier::deserialize")]
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    // Request group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_path_component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<HeaderMap>,
    pub cached: bool,
    pub main_resource: bool,

    // Response group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<HeaderMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    // Length group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<i64>,

    // Timing group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_received_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,

    pub did_request_change: bool,
    pub did_response_change: bool,
    pub did_length_change: bool,
    pub did_timing_change: bool,
    pub did_completion_change: bool,
    pub failed: bool,
    pub finished: bool,
}

impl ResourceUpdate {
    /// Fragment for `identifier` with no groups flagged
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// Whether this fragment ends the resource's lifecycle
    pub fn is_completion(&self) -> bool {
        self.did_completion_change && (self.failed || self.finished)
    }
}
