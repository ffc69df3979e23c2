use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Row, Table};

use crate::app::SortMode;
use crate::format::{format_megabytes, truncate_unicode};
use crate::system::history::ProcessRow;
use crate::ui::theme::Theme;

const NAME_WIDTH: usize = 32;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    rows: &[ProcessRow],
    scroll: usize,
    sort_mode: SortMode,
    theme: &Theme,
) {
    let header = Row::new(["PID", "Name", "CPU (%)", "Memory (MB)"]).style(
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    );

    let body = rows.iter().skip(scroll).map(|row| {
        let record = &row.record;
        let style = if row.annotation.is_changed() {
            Style::default().fg(theme.changed_fg).bg(theme.changed_bg)
        } else {
            Style::default().fg(theme.text_primary)
        };
        Row::new([
            record.pid.to_string(),
            truncate_unicode(&record.name, NAME_WIDTH),
            format!("{:.1}", record.cpu_percent),
            format_megabytes(record.memory_mb()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Min(16),
        Constraint::Length(9),
        Constraint::Length(12),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            format!(" Processes \u{b7} sort: {} ", sort_mode.label()),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let table = Table::new(body, widths).header(header).block(block);
    frame.render_widget(table, area);
}
