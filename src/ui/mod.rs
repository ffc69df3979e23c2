pub mod header;
pub mod performance;
pub mod process_table;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, View};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], app.view, &app.series, app.rows.len(), &app.theme);

    match app.view {
        View::Processes => process_table::render(
            frame,
            chunks[1],
            &app.rows,
            app.scroll,
            app.sort_mode,
            &app.theme,
        ),
        View::Performance => performance::render(frame, chunks[1], &app.series, &app.theme),
    }

    statusbar::render(frame, chunks[2], app.view, app.sort_mode, app.changed_count(), &app.theme);
}
