use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::*,
};
use smart_search::Snapshot;

use crate::geometry::overlay_area;
use crate::theme::Theme;
use crate::view_models::results::{ResultsViewModel, dropdown_size};

const SPINNER_FRAMES: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

/// Where the dropdown rows ended up on screen, used for mouse hit testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropdownHitArea {
    pub rows: Rect,
    pub scroll_offset: usize,
    pub row_count: usize,
}

impl DropdownHitArea {
    /// Result index under the given cell, if any
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        if !self.rows.contains(Position::new(column, row)) {
            return None;
        }
        let offset = usize::from(row - self.rows.y);
        (offset < self.row_count).then_some(self.scroll_offset + offset)
    }
}

pub fn render_title(f: &mut Frame, area: Rect, theme: &Theme) {
    let title = Line::from(vec![
        Span::styled(" smart-search ", theme.panel_border()),
        Span::styled("type to filter", theme.muted()),
    ]);
    f.render_widget(
        Paragraph::new(title).style(Style::default().bg(theme.bg_primary)),
        area,
    );
}

/// Render the search input; the box doubles as the dropdown anchor
pub fn render_input(f: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme, tick: usize) {
    let border_style = if snapshot.disabled {
        theme.disabled()
    } else if snapshot.focused {
        theme.panel_border()
    } else {
        theme.muted()
    };

    let mut title = vec![Span::raw(" Search ")];
    if snapshot.loading {
        title.push(Span::styled(
            format!("{} loading ", SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]),
            Style::default().fg(theme.status_info),
        ));
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(title))
        .border_style(border_style)
        .style(Style::default().bg(theme.bg_input));
    if snapshot.clearable && !snapshot.disabled {
        block = block.title(
            Line::from(Span::styled(" × ", theme.key_hint())).alignment(Alignment::Right),
        );
    }

    let content = if snapshot.query.is_empty() {
        Span::styled(snapshot.placeholder.clone(), theme.muted())
    } else if snapshot.disabled {
        Span::styled(snapshot.query.clone(), theme.disabled())
    } else {
        Span::styled(snapshot.query.clone(), theme.text())
    };

    f.render_widget(Paragraph::new(Line::from(content)).block(block), area);

    if snapshot.focused && !snapshot.disabled {
        let cursor_x = area.x + 1 + snapshot.query.chars().count() as u16;
        f.set_cursor_position(Position::new(
            cursor_x.min(area.right().saturating_sub(2)),
            area.y + 1,
        ));
    }
}

/// Render the dropdown at the last resolved placement
///
/// The border is left open on the side touching the input. Returns the row
/// area for mouse handling, or `None` when nothing was drawn.
pub fn render_dropdown(
    f: &mut Frame,
    anchor: Rect,
    snapshot: &Snapshot,
    theme: &Theme,
) -> Option<DropdownHitArea> {
    if !snapshot.visible {
        return None;
    }
    // Hidden until the first placement resolves
    let placement = snapshot.placement?;

    let area = overlay_area(placement, dropdown_size(snapshot, anchor.width), f.area());
    if area.is_empty() {
        return None;
    }

    let borders = if placement.flipped {
        Borders::ALL - Borders::BOTTOM
    } else {
        Borders::ALL - Borders::TOP
    };
    let block = Block::default()
        .borders(borders)
        .border_style(theme.panel_border())
        .style(Style::default().bg(theme.bg_panel));
    let rows_area = block.inner(area);

    let vm = ResultsViewModel::from_snapshot(snapshot, usize::from(rows_area.height), theme);

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    if let Some(ref text) = vm.empty_text {
        f.render_widget(
            Paragraph::new(text.clone())
                .style(theme.muted())
                .alignment(Alignment::Center),
            rows_area,
        );
        return None;
    }

    let lines: Vec<Line> = vm
        .visible_rows
        .iter()
        .map(|row| {
            let row_style = if row.is_highlighted {
                theme.selected()
            } else {
                Style::default().fg(row.fg_color).bg(row.bg_color)
            };

            let mut spans = vec![Span::styled(row.indicator.clone(), row_style)];
            if let Some(ref icon) = row.icon {
                spans.push(Span::styled(format!("{} ", icon), row_style));
            }
            spans.push(Span::styled(row.label.clone(), row_style));
            if let Some(ref description) = row.description {
                spans.push(Span::styled(
                    format!("  {}", description),
                    Style::default()
                        .fg(if row.is_highlighted {
                            theme.selected_fg
                        } else {
                            theme.text_secondary
                        })
                        .bg(row.bg_color)
                        .add_modifier(Modifier::ITALIC),
                ));
            }
            Line::from(spans).style(Style::default().bg(row.bg_color))
        })
        .collect();

    let row_count = lines.len();
    f.render_widget(Paragraph::new(lines), rows_area);

    Some(DropdownHitArea {
        rows: rows_area,
        scroll_offset: vm.scroll_offset,
        row_count,
    })
}

/// Status line: last notification on the left, key hints on the right
pub fn render_status(f: &mut Frame, area: Rect, status: &str, theme: &Theme) {
    let hints = Line::from(vec![
        Span::styled("↑↓", theme.key_hint()),
        Span::styled(" navigate  ", theme.muted()),
        Span::styled("Enter", theme.key_hint()),
        Span::styled(" select  ", theme.muted()),
        Span::styled("^U", theme.key_hint()),
        Span::styled(" clear  ", theme.muted()),
        Span::styled("F5", theme.key_hint()),
        Span::styled(" reload  ", theme.muted()),
        Span::styled("F12", theme.key_hint()),
        Span::styled(" log  ", theme.muted()),
        Span::styled("^C", theme.key_hint()),
        Span::styled(" quit ", theme.muted()),
    ])
    .alignment(Alignment::Right);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(hints.width() as u16)])
        .split(area);

    let background = Style::default().bg(theme.bg_primary);
    f.render_widget(
        Paragraph::new(Span::styled(format!(" {}", status), theme.text())).style(background),
        chunks[0],
    );
    f.render_widget(Paragraph::new(hints).style(background), chunks[1]);
}
