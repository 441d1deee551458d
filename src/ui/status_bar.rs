use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::{App, AppMode};
use crate::query::stats;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // A transient status message takes over the whole bar.
    if let Some(ref message) = app.status_message {
        let line = Line::from(Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let mut spans = Vec::new();

    spans.push(Span::styled(
        format!(" {} ", app.view.label()),
        Style::default().fg(Color::Black).bg(Color::Cyan),
    ));

    spans.push(Span::styled(
        format!(
            " {}/{} sightings, {} species ",
            app.filtered.len(),
            app.all_sightings.len(),
            stats::unique_species(&app.all_sightings).len()
        ),
        Style::default().fg(Color::White).bg(Color::DarkGray),
    ));

    if app.mode == AppMode::Searching || !app.search_term.is_empty() {
        let marker = if app.mode == AppMode::Searching { "_" } else { "" };
        spans.push(Span::styled(
            format!(" /{}{} ", app.search_term, marker),
            Style::default().fg(Color::Yellow),
        ));
    }
    if app.filters.is_active() {
        spans.push(Span::styled(
            " [filtered] ",
            Style::default().fg(Color::Magenta),
        ));
    }

    spans.push(Span::styled(
        format!(" db:{} ", app.db.backend_name()),
        Style::default().fg(Color::Gray),
    ));

    let help_text = " /:search a:add e:edit d:delete ?:help q:quit ".to_string();
    let content_len: usize = spans.iter().map(|s| s.content.len()).sum();
    let available = area.width as usize;
    if available > content_len + help_text.len() {
        spans.push(Span::raw(" ".repeat(available - content_len - help_text.len())));
    }
    spans.push(Span::styled(
        help_text,
        Style::default().fg(Color::White).bg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
