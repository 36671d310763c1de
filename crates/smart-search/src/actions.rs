use crate::navigation::Key;
use crate::placement::{ComputedPosition, PlacementError, Rect, Size};
use crate::record::{FieldPath, Record};

/// Action enum - every event the search component reacts to
/// Actions are dispatched to the reducer to update state
#[derive(Debug, Clone)]
pub enum Action {
    // Lifecycle
    Mount {
        anchor: Rect,
        overlay: Size,
        viewport: Rect,
    },

    // User-initiated actions
    Input(String),
    Focus,
    Blur,
    KeyPress(Key),
    ResultPointerDown, // Pointer pressed on a result row, activation follows
    ResultPointerCancel, // Pointer released away from the pressed row
    ResultActivate(Record),
    Clear,

    // Geometry updates from the embedder
    Resize {
        viewport: Rect,
        anchor: Rect,
    },
    Scroll {
        anchor: Rect,
    },
    OverlayResized(Size),

    // Data and configuration replaced by the embedder
    ReplaceCollection(Vec<Record>),
    ReplaceFieldPaths(Vec<FieldPath>),
    SetMaxResults(i64),
    SetLoading(bool),
    SetDisabled(bool),

    // Deferred completions (dispatched internally, carry a generation)
    DebounceElapsed(u64),
    BlurGraceElapsed(u64),
    PlacementResolved {
        generation: u64,
        result: Result<ComputedPosition, PlacementError>,
    },

    None,
}
