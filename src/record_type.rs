//! Record kind catalogue
//!
//! Numeric kind codes carried by trace records. Timeline kinds occupy the
//! low range (0..=17); bookkeeping kinds injected by the tracing host count
//! down from `i32::MAX`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Code of the first bookkeeping kind. Bookkeeping codes count down from here.
const BOOKKEEPING_BASE: i64 = 0x7FFF_FFFF;

/// Kind of a trace record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum RecordType {
    DomEvent,
    Layout,
    RecalcStyle,
    Paint,
    ParseHtml,
    TimerInstalled,
    TimerCleared,
    TimerFired,
    XhrReadyStateChange,
    XhrLoad,
    EvalScript,
    LogMessage,
    ResourceSendRequest,
    ResourceReceiveResponse,
    ResourceFinish,
    JavaScriptExecution,
    ResourceDataReceived,
    GarbageCollection,

    /// Many short events folded into one record
    AggregatedEvents,
    /// Page title or location changed
    TabChanged,
    /// Partial update fragment for a network resource
    ResourceUpdated,
    /// Raw JavaScript profiler payload
    ProfileData,

    /// Code not present in the catalogue; preserved verbatim
    Unknown(i64),
}

const TIMELINE_KINDS: [RecordType; 18] = [
    RecordType::DomEvent,
    RecordType::Layout,
    RecordType::RecalcStyle,
    RecordType::Paint,
    RecordType::ParseHtml,
    RecordType::TimerInstalled,
    RecordType::TimerCleared,
    RecordType::TimerFired,
    RecordType::XhrReadyStateChange,
    RecordType::XhrLoad,
    RecordType::EvalScript,
    RecordType::LogMessage,
    RecordType::ResourceSendRequest,
    RecordType::ResourceReceiveResponse,
    RecordType::ResourceFinish,
    RecordType::JavaScriptExecution,
    RecordType::ResourceDataReceived,
    RecordType::GarbageCollection,
];

const BOOKKEEPING_KINDS: [RecordType; 4] = [
    RecordType::AggregatedEvents,
    RecordType::TabChanged,
    RecordType::ResourceUpdated,
    RecordType::ProfileData,
];

impl RecordType {
    /// Map a wire code to a kind
    pub fn from_code(code: i64) -> Self {
        if let Ok(idx) = usize::try_from(code) {
            if let Some(kind) = TIMELINE_KINDS.get(idx) {
                return *kind;
            }
        }
        if let Ok(idx) = usize::try_from(BOOKKEEPING_BASE - code) {
            if let Some(kind) = BOOKKEEPING_KINDS.get(idx) {
                return *kind;
            }
        }
        RecordType::Unknown(code)
    }

    /// Wire code of this kind
    pub fn code(self) -> i64 {
        if let RecordType::Unknown(code) = self {
            return code;
        }
        if let Some(idx) = TIMELINE_KINDS.iter().position(|k| *k == self) {
            return idx as i64;
        }
        let idx = BOOKKEEPING_KINDS
            .iter()
            .position(|k| *k == self)
            .unwrap_or_default();
        BOOKKEEPING_BASE - idx as i64
    }

    /// Display name shown next to hints
    pub fn name(self) -> &'static str {
        match self {
            RecordType::DomEvent => "Dom Event",
            RecordType::Layout => "Layout",
            RecordType::RecalcStyle => "Style Recalculation",
            RecordType::Paint => "Paint",
            RecordType::ParseHtml => "Parse HTML",
            RecordType::TimerInstalled => "Timer Installed",
            RecordType::TimerCleared => "Timer Cleared",
            RecordType::TimerFired => "Timer Fire",
            RecordType::XhrReadyStateChange => "XMLHttpRequest",
            RecordType::XhrLoad => "XHR Load",
            RecordType::EvalScript => "Script Evaluation",
            RecordType::LogMessage => "Log Message",
            RecordType::ResourceSendRequest => "Resource Request",
            RecordType::ResourceReceiveResponse => "Resource Response",
            RecordType::ResourceFinish => "Resource Finish",
            RecordType::JavaScriptExecution => "JavaScript Callback",
            RecordType::ResourceDataReceived => "Resource Data Received",
            RecordType::GarbageCollection => "Garbage Collection",
            RecordType::AggregatedEvents => "AGGREGATED Events",
            RecordType::TabChanged => "Tab Changed",
            RecordType::ResourceUpdated => "Resource Updated",
            RecordType::ProfileData => "JavaScript CPU profile data",
            RecordType::Unknown(_) => "Unknown Event Type",
        }
    }

    /// One-line explanation of the kind
    pub fn help(self) -> &'static str {
        match self {
            RecordType::DomEvent => {
                "A top level DOM event fired, such as mousemove or DOMContentLoaded fired."
            }
            RecordType::Layout => "The browser's rendering engine performed layout calculations.",
            RecordType::RecalcStyle => "The renderer recalculated CSS styles.",
            RecordType::Paint => "The browser's rendering engine updated the screen.",
            RecordType::ParseHtml => "A block of HTML was parsed.",
            RecordType::TimerInstalled => "A new JavaScript timer was created.",
            RecordType::TimerCleared => "A JavaScript timer was cancelled.",
            RecordType::TimerFired => {
                "A block of JavaScript was executed due to a JavaScript timer firing."
            }
            RecordType::XhrReadyStateChange => "The handler for an XMLHttpRequest ran.",
            RecordType::XhrLoad => "The onload handler for an XMLHttpRequest ran.",
            RecordType::EvalScript => {
                "A block of JavaScript was parsed/compiled and executed from a <script> tag."
            }
            RecordType::LogMessage => "A log message written using console.markTimeline.",
            RecordType::ResourceSendRequest => "A network request was queued up to send.",
            RecordType::ResourceReceiveResponse => {
                "A network resource load began to receive data from the server."
            }
            RecordType::ResourceFinish => "A new request for a network resource completed.",
            RecordType::JavaScriptExecution => "JavaScript was run in an event dispatch.",
            RecordType::ResourceDataReceived => {
                "Processing a file received by the resource loader."
            }
            RecordType::GarbageCollection => {
                "The JavaScript engine ran its garbage collector to reclaim memory."
            }
            RecordType::AggregatedEvents => {
                "Many short events aggregated to reduce the amount of data displayed."
            }
            RecordType::TabChanged => "The title or location of the page in the tab changed.",
            RecordType::ResourceUpdated => "Details about a Network Resource were updated.",
            RecordType::ProfileData => "Raw data from the JavaScript engine profiler.",
            RecordType::Unknown(_) => "Unrecognized record kind.",
        }
    }

    /// Whether records of this kind describe work on the UI thread
    pub fn is_ui_event(self) -> bool {
        !matches!(
            self,
            RecordType::ResourceSendRequest
                | RecordType::ResourceReceiveResponse
                | RecordType::ResourceFinish
                | RecordType::TabChanged
                | RecordType::ResourceUpdated
                | RecordType::ProfileData
                | RecordType::Unknown(_)
        )
    }
}

impl From<i64> for RecordType {
    fn from(code: i64) -> Self {
        RecordType::from_code(code)
    }
}

impl From<RecordType> for i64 {
    fn from(kind: RecordType) -> Self {
        kind.code()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Unknown(code) => write!(f, "(Unknown Event Type: {})", code),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_codes() {
        assert_eq!(RecordType::from_code(0), RecordType::DomEvent);
        assert_eq!(RecordType::from_code(1), RecordType::Layout);
        assert_eq!(RecordType::from_code(14), RecordType::ResourceFinish);
        assert_eq!(RecordType::from_code(17), RecordType::GarbageCollection);
    }

    #[test]
    fn test_bookkeeping_codes() {
        assert_eq!(
            RecordType::from_code(0x7FFF_FFFF),
            RecordType::AggregatedEvents
        );
        assert_eq!(RecordType::from_code(0x7FFF_FFFE), RecordType::TabChanged);
        assert_eq!(
            RecordType::from_code(0x7FFF_FFFD),
            RecordType::ResourceUpdated
        );
        assert_eq!(RecordType::from_code(0x7FFF_FFFC), RecordType::ProfileData);
    }

    #[test]
    fn test_unknown_code_preserved() {
        assert_eq!(RecordType::from_code(18), RecordType::Unknown(18));
        assert_eq!(RecordType::from_code(-1), RecordType::Unknown(-1));
        assert_eq!(RecordType::Unknown(99).code(), 99);
        assert_eq!(
            RecordType::Unknown(99).to_string(),
            "(Unknown Event Type: 99)"
        );
    }

    #[test]
    fn test_code_round_trips_for_catalogue() {
        for kind in TIMELINE_KINDS.iter().chain(BOOKKEEPING_KINDS.iter()) {
            assert_eq!(RecordType::from_code(kind.code()), *kind);
        }
    }

    #[test]
    fn test_ui_event_classification() {
        assert!(RecordType::Layout.is_ui_event());
        assert!(RecordType::AggregatedEvents.is_ui_event());
        assert!(!RecordType::ResourceFinish.is_ui_event());
        assert!(!RecordType::ResourceUpdated.is_ui_event());
    }

    #[test]
    fn test_serde_uses_numeric_code() {
        let json = serde_json::to_string(&RecordType::ResourceFinish).unwrap();
        assert_eq!(json, "14");
        let kind: RecordType = serde_json::from_str("2147483645").unwrap();
        assert_eq!(kind, RecordType::ResourceUpdated);
    }
}
