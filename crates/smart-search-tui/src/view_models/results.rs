use ratatui::style::Color;
use smart_search::{FieldPath, Record, Size, Snapshot, display_value};

use crate::theme::Theme;

/// Maximum number of result rows shown at once
pub const MAX_VISIBLE_ROWS: usize = 8;

/// View model for the dropdown - all presentation data pre-computed
#[derive(Debug, Clone)]
pub struct ResultsViewModel {
    pub total_results: usize,
    pub visible_rows: Vec<ResultRow>,
    pub scroll_offset: usize,
    /// Shown instead of rows when nothing matched
    pub empty_text: Option<String>,
}

/// A single row in the dropdown
#[derive(Debug, Clone)]
pub struct ResultRow {
    /// Position in the full result list
    pub index: usize,
    pub is_highlighted: bool,
    /// Selection indicator: "> " or "  "
    pub indicator: String,
    pub icon: Option<String>,
    pub label: String,
    pub description: Option<String>,
    pub fg_color: Color,
    pub bg_color: Color,
}

impl ResultsViewModel {
    /// Build view model from a component snapshot
    pub fn from_snapshot(snapshot: &Snapshot, visible_height: usize, theme: &Theme) -> Self {
        let total_results = snapshot.results.len();
        let scroll_offset = scroll_offset(snapshot.highlighted, total_results, visible_height);

        let icon_path = FieldPath::new("icon");
        let description_path = FieldPath::new("description");

        let visible_rows = snapshot
            .results
            .iter()
            .enumerate()
            .skip(scroll_offset)
            .take(visible_height)
            .map(|(index, record)| {
                let is_highlighted = snapshot.highlighted == Some(index);
                let (fg_color, bg_color) = if is_highlighted {
                    (theme.selected_fg, theme.selected_bg)
                } else {
                    (theme.text_primary, theme.bg_panel)
                };

                ResultRow {
                    index,
                    is_highlighted,
                    indicator: if is_highlighted { "> " } else { "  " }.to_string(),
                    icon: non_empty(record, &icon_path),
                    label: display_value(record, &snapshot.display_key),
                    description: non_empty(record, &description_path),
                    fg_color,
                    bg_color,
                }
            })
            .collect();

        let empty_text = snapshot
            .no_results
            .then(|| snapshot.no_results_text.clone());

        Self {
            total_results,
            visible_rows,
            scroll_offset,
            empty_text,
        }
    }
}

fn non_empty(record: &Record, path: &FieldPath) -> Option<String> {
    Some(display_value(record, path)).filter(|text| !text.is_empty())
}

/// Keep the highlighted row near the middle of the visible window
fn scroll_offset(highlighted: Option<usize>, total: usize, visible_height: usize) -> usize {
    let Some(selected) = highlighted else {
        return 0;
    };
    if total == 0 || selected < visible_height / 2 {
        0
    } else if selected >= total.saturating_sub(visible_height / 2) {
        total.saturating_sub(visible_height)
    } else {
        selected.saturating_sub(visible_height / 2)
    }
}

/// Number of rows the dropdown needs: results up to the cap, or the no-results line
pub fn dropdown_rows(snapshot: &Snapshot) -> usize {
    if snapshot.no_results {
        1
    } else {
        snapshot.results.len().clamp(1, MAX_VISIBLE_ROWS)
    }
}

/// Overlay size for the current snapshot; one border row on the side away from the input
pub fn dropdown_size(snapshot: &Snapshot, width: u16) -> Size {
    Size::new(f32::from(width), (dropdown_rows(snapshot) + 1) as f32)
}
