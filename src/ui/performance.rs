use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType};

use crate::system::sampler::SeriesView;
use crate::ui::theme::Theme;

/// Pairs each sample with its absolute tick index for the x axis.
pub fn points(first_index: u64, values: &[f32]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| ((first_index + i as u64) as f64, f64::from(*v)))
        .collect()
}

pub fn render(frame: &mut Frame, area: Rect, series: &SeriesView, theme: &Theme) {
    let cpu_points = points(series.first_index, &series.cpu);
    let memory_points = points(series.first_index, &series.memory);

    let x_min = series.first_index as f64;
    let x_max = (x_min + series.cpu.len().saturating_sub(1) as f64).max(x_min + 1.0);

    let datasets = vec![
        Dataset::default()
            .name("CPU (%)")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.cpu_line))
            .data(&cpu_points),
        Dataset::default()
            .name("Memory (%)")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.memory_line))
            .data(&memory_points),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            " CPU and memory usage ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Samples")
                .style(Style::default().fg(theme.text_secondary))
                .bounds([x_min, x_max])
                .labels([format!("{x_min:.0}"), format!("{x_max:.0}")]),
        )
        .y_axis(
            Axis::default()
                .title("Usage (%)")
                .style(Style::default().fg(theme.text_secondary))
                .bounds([0.0, 100.0])
                .labels(["0", "50", "100"]),
        );

    frame.render_widget(chart, area);
}
