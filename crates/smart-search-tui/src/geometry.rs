use ratatui::layout::{Constraint, Direction, Layout, Rect};
use smart_search::{Placement, Rect as SearchRect, Size as SearchSize};

/// Screen regions, recomputed whenever the terminal size changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub area: Rect,
    pub title: Rect,
    /// The search input, anchor of the dropdown
    pub input: Rect,
    pub body: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(3), // Input box
                Constraint::Min(0),    // Free area for the dropdown
                Constraint::Length(1), // Status line
            ])
            .split(area);

        Self {
            area,
            title: chunks[0],
            input: chunks[1],
            body: chunks[2],
            status: chunks[3],
        }
    }

    pub fn anchor(&self) -> SearchRect {
        to_search_rect(self.input)
    }

    pub fn viewport(&self) -> SearchRect {
        to_search_rect(self.area)
    }
}

pub fn to_search_rect(area: Rect) -> SearchRect {
    SearchRect::new(
        f32::from(area.x),
        f32::from(area.y),
        f32::from(area.width),
        f32::from(area.height),
    )
}

/// Terminal cells covered by an overlay at `placement`, clipped to `bounds`
pub fn overlay_area(placement: Placement, size: SearchSize, bounds: Rect) -> Rect {
    let x = cell(placement.x).clamp(bounds.x, bounds.right());
    let y = cell(placement.y).clamp(bounds.y, bounds.bottom());
    Rect {
        x,
        y,
        width: cell(size.width).min(bounds.right() - x),
        height: cell(size.height).min(bounds.bottom() - y),
    }
}

fn cell(value: f32) -> u16 {
    value.round().clamp(0.0, f32::from(u16::MAX)) as u16
}
