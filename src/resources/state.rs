// Accumulated snapshot of one network resource

use crate::headers::HeaderMap;
use crate::record::{ResourceFinish, ResourceResponse, ResourceStart};
use crate::resource_type::{classify, ResourceType};
use crate::resources::ResourceUpdate;
use serde::Serialize;

/// Everything known so far about one network resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceState {
    pub identifier: String,
    pub url: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub last_path_component: Option<String>,
    pub request_method: Option<String>,
    pub request_headers: HeaderMap,
    /// `None` until a response group has been seen
    pub response_headers: Option<HeaderMap>,
    pub status_code: Option<i32>,
    pub mime_type: Option<String>,
    pub content_length: Option<i64>,
    pub expected_content_length: Option<i64>,
    pub cached: bool,
    pub main_resource: bool,
    pub start_time: Option<f64>,
    pub response_received_time: Option<f64>,
    pub end_time: Option<f64>,
    pub failed: bool,
}

impl ResourceState {
    /// Snapshot anchored on `url` with nothing else known
    pub fn new(identifier: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            url: url.into(),
            domain: None,
            path: None,
            last_path_component: None,
            request_method: None,
            request_headers: HeaderMap::new(),
            response_headers: None,
            status_code: None,
            mime_type: None,
            content_length: None,
            expected_content_length: None,
            cached: false,
            main_resource: false,
            start_time: None,
            response_received_time: None,
            end_time: None,
            failed: false,
        }
    }

    /// First sighting: the whole fragment becomes the snapshot, flags or not
    pub(crate) fn from_update(url: &str, update: &ResourceUpdate) -> Self {
        Self {
            identifier: update.identifier.clone(),
            url: url.to_string(),
            domain: update.host.clone(),
            path: update.path.clone(),
            last_path_component: update.last_path_component.clone(),
            request_method: update.request_method.clone(),
            request_headers: update.request_headers.clone().unwrap_or_default(),
            response_headers: update.response_headers.clone(),
            status_code: update.status_code,
            mime_type: update.mime_type.clone(),
            content_length: update.content_length,
            expected_content_length: None,
            cached: update.cached,
            main_resource: update.main_resource,
            start_time: update.start_time,
            response_received_time: update.response_received_time,
            end_time: update.end_time,
            failed: update.failed,
        }
    }

    pub(crate) fn from_start(start: &ResourceStart, time: f64) -> Self {
        let mut state = Self::new(start.identifier.clone(), start.url.clone());
        state.request_method = start.request_method.clone();
        state.main_resource = start.is_main_resource;
        state.start_time = Some(time);
        state
    }

    /// Overwrite only the attribute groups the fragment flags
    pub(crate) fn merge(&mut self, update: &ResourceUpdate) {
        if update.did_request_change {
            self.domain = update.host.clone();
            self.path = update.path.clone();
            self.last_path_component = update.last_path_component.clone();
            self.request_headers = update.request_headers.clone().unwrap_or_default();
            self.cached = update.cached;
            self.request_method = update.request_method.clone();
            self.main_resource = update.main_resource;
        }

        if update.did_response_change {
            self.response_headers = update.response_headers.clone();
            self.status_code = update.status_code;
            self.mime_type = update.mime_type.clone();
        }

        if update.did_length_change {
            self.content_length = update.content_length;
        }

        if update.did_timing_change {
            // Zero or negative timings mean "not known yet"
            if let Some(t) = update.start_time.filter(|t| *t > 0.0) {
                self.start_time = Some(t);
            }
            if let Some(t) = update.response_received_time.filter(|t| *t > 0.0) {
                self.response_received_time = Some(t);
            }
            if let Some(t) = update.end_time.filter(|t| *t > 0.0) {
                self.end_time = Some(t);
            }
        }
    }

    pub(crate) fn apply_response(&mut self, response: &ResourceResponse, time: f64) {
        self.response_received_time = Some(time);
        if response.status_code.is_some() {
            self.status_code = response.status_code;
        }
        if response.mime_type.is_some() {
            self.mime_type = response.mime_type.clone();
        }
        self.expected_content_length = response.expected_content_length;
    }

    pub(crate) fn apply_finish(&mut self, finish: &ResourceFinish, time: f64) {
        self.end_time = Some(time);
        self.failed = finish.did_fail;
    }

    /// Semantic category from the response headers and URL
    pub fn resource_type(&self) -> ResourceType {
        match &self.response_headers {
            Some(headers) => classify(Some(&self.url), headers),
            None => ResourceType::Other,
        }
    }

    /// Response headers, or an empty set when no response has been seen
    pub fn response_headers_or_empty(&self) -> &HeaderMap {
        static EMPTY: std::sync::OnceLock<HeaderMap> = std::sync::OnceLock::new();
        self.response_headers
            .as_ref()
            .unwrap_or_else(|| EMPTY.get_or_init(HeaderMap::new))
    }

    /// Content length if known, else the length announced by the response
    pub fn size(&self) -> Option<i64> {
        self.content_length
            .or(self.expected_content_length)
            .filter(|len| *len >= 0)
    }

    /// Status code, or -1 when no response has been seen
    pub fn status_or_unknown(&self) -> i32 {
        self.status_code.unwrap_or(-1)
    }
}
