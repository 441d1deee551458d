pub mod confirm_dialog;
pub mod edit_dialog;
pub mod gallery;
mod heatmap;
pub mod journal;
mod status_bar;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, AppMode, View};

pub use heatmap::available_years;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Main layout: content area + status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    match app.view {
        View::Gallery => gallery::render(frame, app, main_chunks[0]),
        View::Journal => journal::render(frame, app, main_chunks[0]),
        View::Heatmap => heatmap::render(frame, app, main_chunks[0]),
    }

    status_bar::render(frame, app, main_chunks[1]);

    match app.mode {
        AppMode::Help => render_help(frame, area),
        AppMode::Editing => {
            if let Some(ref dialog) = app.edit_dialog {
                edit_dialog::render(frame, dialog, area);
            }
        }
        AppMode::Confirming => {
            if let Some(ref dialog) = app.confirm_dialog {
                confirm_dialog::render(frame, dialog, area);
            }
        }
        _ => {}
    }
}

fn render_help(frame: &mut Frame, area: Rect) {
    let dialog_width = 52.min(area.width.saturating_sub(4));
    let dialog_height = 20.min(area.height.saturating_sub(2));

    let x = (area.width.saturating_sub(dialog_width)) / 2;
    let y = (area.height.saturating_sub(dialog_height)) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let help_text = vec![
        Line::from(Span::styled(
            "Lifelist",
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from("  1/2/3, Tab      Gallery / Journal / Heatmap"),
        Line::from("  j/k, arrows     Move selection"),
        Line::from("  /               Search (Esc clears)"),
        Line::from("  o               Toggle has-coordinates filter"),
        Line::from("  n               Toggle has-notes filter"),
        Line::from("  c               Clear search and filters"),
        Line::from("  s               Cycle gallery sort"),
        Line::from("  a               Add sighting"),
        Line::from("  e               Edit selected sighting"),
        Line::from("  d               Delete selected sighting"),
        Line::from("  Enter           Toggle day (journal)"),
        Line::from("  E / C           Expand / collapse all days"),
        Line::from("  Left/Right      Change year (heatmap)"),
        Line::from("  i               Import photos from current directory"),
        Line::from("  x               Export sightings to CSV"),
        Line::from("  r               Reload from storage"),
        Line::from("  q               Quit"),
    ];

    let paragraph = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help "),
    );
    frame.render_widget(paragraph, dialog_area);
}
