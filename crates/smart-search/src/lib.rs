//! Framework-agnostic autocomplete / search-input core
//!
//! This crate provides the interaction state machine behind a search box with
//! a dropdown of matches:
//! - Case-insensitive substring filtering over nested JSON records
//! - Debounced input with cancelable timers
//! - Keyboard navigation of the result list
//! - Overlay placement through a pluggable placement engine
//! - A Redux-style controller that owns all state and emits notifications
//!
//! Rendering is left to the embedder: subscribe to [`Snapshot`]s and draw them.
//!
//! # Example
//!
//! ```rust,ignore
//! use smart_search::{Notification, Record, SearchConfig, SearchController};
//! use serde_json::json;
//!
//! let config = SearchConfig {
//!     filterable_keys: vec!["name".into(), "email".into()],
//!     display_key: "name".into(),
//!     ..SearchConfig::default()
//! };
//! let people = vec![Record::new(json!({"name": "Jane Smith", "email": "j.smith@example.com"}))];
//! let (mut controller, mut notifications) = SearchController::new(config, people);
//!
//! controller.on_input("smith");
//! controller.run_for(std::time::Duration::from_millis(1)).await;
//! assert_eq!(controller.snapshot().results.len(), 1);
//! assert!(matches!(notifications.try_recv(), Ok(Notification::InputChanged(_))));
//! ```

mod actions;
mod config;
mod controller;
mod debounce;
mod effect;
mod filter;
mod matcher;
mod navigation;
mod placement;
mod record;
mod reducer;
mod state;
mod store;

pub use actions::Action;
pub use config::{ConfigError, SearchConfig, ThemeToken};
pub use controller::SearchController;
pub use debounce::Debouncer;
pub use effect::{Effect, Notification};
pub use filter::{ResultCap, filter};
pub use matcher::matches;
pub use navigation::{Key, NavCommand, Navigation, Transition};
pub use placement::{
    ComputedPosition, FlipShiftEngine, Geometry, OverlayPositioner, Placement, PlacementEngine,
    PlacementError, PlacementOptions, PlacementRequest, Rect, Side, Size, Strategy,
};
pub use record::{FieldPath, Record, RecordError, display_value, records_from_json};
pub use reducer::reduce;
pub use state::{SearchState, Snapshot};
pub use store::Store;
