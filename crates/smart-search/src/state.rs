use std::sync::Arc;

use crate::config::{SearchConfig, ThemeToken};
use crate::navigation::Navigation;
use crate::placement::{OverlayPositioner, Placement, PlacementOptions};
use crate::record::{FieldPath, Record, display_value};

/// Root component state following the Redux pattern
///
/// `config` holds the live public configuration (field paths, cap, loading,
/// disabled are replaced through actions). Everything else except `query`
/// and `collection` is derived and recomputable.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub config: SearchConfig,
    pub query: String,
    pub collection: Arc<[Record]>,
    pub results: Vec<Record>,
    pub navigation: Navigation,
    pub positioner: OverlayPositioner,
    pub clearable: bool,
    pub focused: bool,
    /// A pointer press on a result row is waiting for its activation
    pub pointer_armed: bool,
    pub debounce_generation: u64,
    pub blur_generation: u64,
}

impl SearchState {
    pub fn new(config: SearchConfig, collection: Vec<Record>) -> Self {
        let query = config.value.clone();
        Self {
            clearable: !query.is_empty(),
            query,
            config,
            collection: collection.into(),
            results: Vec::new(),
            navigation: Navigation::default(),
            positioner: OverlayPositioner::new(PlacementOptions::default()),
            focused: false,
            pointer_armed: false,
            debounce_generation: 0,
            blur_generation: 0,
        }
    }

    /// Dropdown visibility: opened explicitly and the query is non-empty
    pub fn visible(&self) -> bool {
        self.navigation.is_open() && !self.query.is_empty()
    }

    pub fn snapshot(&self) -> Snapshot {
        let visible = self.visible();
        Snapshot {
            query: self.query.clone(),
            results: self.results.clone(),
            highlighted: self.navigation.highlighted(),
            visible,
            placement: self
                .positioner
                .last_placement()
                .filter(|_| visible),
            loading: self.config.loading,
            disabled: self.config.disabled,
            clearable: self.clearable,
            focused: self.focused,
            no_results: self.results.is_empty() && !self.query.is_empty(),
            placeholder: self.config.placeholder.clone(),
            theme: self.config.theme_token(),
            no_results_text: self.config.no_results_text.clone(),
            display_key: self.config.display_key.clone(),
        }
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(SearchConfig::default(), Vec::new())
    }
}

/// Everything the rendering layer needs, taken after every transition
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub query: String,
    pub results: Vec<Record>,
    pub highlighted: Option<usize>,
    pub visible: bool,
    /// Only present while visible
    pub placement: Option<Placement>,
    pub loading: bool,
    pub disabled: bool,
    pub clearable: bool,
    pub focused: bool,
    /// Show the no-results label instead of rows
    pub no_results: bool,
    pub placeholder: String,
    pub theme: ThemeToken,
    pub no_results_text: String,
    pub display_key: FieldPath,
}

impl Snapshot {
    /// Display text for the result at `index`
    pub fn label(&self, index: usize) -> Option<String> {
        self.results
            .get(index)
            .map(|record| display_value(record, &self.display_key))
    }

    pub fn highlighted_record(&self) -> Option<&Record> {
        self.highlighted.and_then(|index| self.results.get(index))
    }
}
