/// Effect system for the search component
/// The reducer returns (State, Vec<Effect>) where Effects describe side effects to perform;
/// the controller executes them (timers, placement requests, notifications)
use std::time::Duration;

use serde::Serialize;

use crate::placement::PlacementRequest;
use crate::record::Record;

/// Notifications emitted to the embedding context
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "detail")]
pub enum Notification {
    /// Query text after the debounce window elapsed
    #[serde(rename = "search-input")]
    InputChanged(String),

    /// A result was committed (Enter on the highlighted row or a pointer activation)
    #[serde(rename = "result-selected")]
    ResultSelected(Record),
}

/// Effects that the reducer can request to be performed
#[derive(Debug, Clone)]
pub enum Effect {
    /// (Re)start the debounce timer, superseding any pending one
    ScheduleDebounce { generation: u64, delay: Duration },

    /// Drop the pending debounce timer
    CancelDebounce,

    /// Start the blur grace timer, superseding any pending one
    ScheduleBlurClose { generation: u64, delay: Duration },

    /// Drop the pending blur grace timer
    CancelBlurClose,

    /// Ask the placement engine for a new overlay position
    Reposition(PlacementRequest),

    /// Emit a notification to the embedder
    Notify(Notification),
}
