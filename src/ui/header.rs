use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};

use crate::app::View;
use crate::format::format_percent;
use crate::system::sampler::SeriesView;
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    view: View,
    series: &SeriesView,
    process_count: usize,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(40)])
        .split(inner);

    let titles = View::ALL
        .iter()
        .map(|v| format!("{} {}", v.index() + 1, v.title()));
    let tabs = Tabs::new(titles)
        .select(view.index())
        .style(Style::default().fg(theme.text_secondary))
        .highlight_style(
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    let (cpu, memory) = series
        .latest()
        .map(|(cpu, memory)| (format_percent(cpu), format_percent(memory)))
        .unwrap_or_else(|| ("--".to_string(), "--".to_string()));
    let summary = Line::from(vec![
        Span::styled("CPU ", Style::default().fg(theme.cpu_line)),
        Span::styled(cpu, Style::default().fg(theme.text_primary)),
        Span::raw("  "),
        Span::styled("MEM ", Style::default().fg(theme.memory_line)),
        Span::styled(memory, Style::default().fg(theme.text_primary)),
        Span::raw("  "),
        Span::styled(
            format!("Procs: {process_count}"),
            Style::default().fg(theme.text_secondary),
        ),
    ]);
    frame.render_widget(Paragraph::new(summary), chunks[1]);
}
