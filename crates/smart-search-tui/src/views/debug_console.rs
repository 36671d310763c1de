use ratatui::{prelude::*, widgets::*};

use crate::log_capture::LogBuffer;
use crate::theme::Theme;

/// Render the debug console as a Quake-style drop-down panel
///
/// Always follows the most recent entries.
pub fn render_debug_console(
    f: &mut Frame,
    area: Rect,
    logs: &LogBuffer,
    height_percent: u16,
    theme: &Theme,
) {
    let console_height = (area.height * height_percent) / 100;
    let console_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: console_height.min(area.height),
    };

    f.render_widget(Clear, console_area);

    let visible_height = console_height.saturating_sub(2) as usize;
    let (items, total_logs) = match logs.lock() {
        Ok(logs) => {
            let skip = logs.len().saturating_sub(visible_height);
            let items: Vec<ListItem> = logs
                .iter()
                .skip(skip)
                .map(|entry| {
                    use ::log::Level;

                    let level_color = match entry.level {
                        Level::Error => theme.status_error,
                        Level::Warn => theme.status_warning,
                        Level::Info => theme.text_primary,
                        Level::Debug => theme.text_secondary,
                        Level::Trace => theme.text_muted,
                    };

                    let timestamp = entry.timestamp.format("%H:%M:%S%.3f");
                    let level_str = format!("{:5}", entry.level.to_string().to_uppercase());
                    let target_short = if entry.target.len() > 24 {
                        format!("{}...", &entry.target[..21])
                    } else {
                        format!("{:24}", entry.target)
                    };

                    ListItem::new(format!(
                        "{} {} {} {}",
                        timestamp, level_str, target_short, entry.message
                    ))
                    .style(Style::default().fg(level_color))
                })
                .collect();
            (items, logs.len())
        }
        // A panic while logging poisons the buffer; show an empty console
        Err(_) => (Vec::new(), 0),
    };

    let logs_list = List::new(items).block(
        Block::bordered()
            .title(format!(" Debug Console ({}) ", total_logs))
            .title_bottom(" F12 Close ")
            .border_style(Style::default().fg(theme.accent_primary))
            .style(Style::default().bg(theme.bg_panel)),
    );

    f.render_widget(logs_list, console_area);
}
