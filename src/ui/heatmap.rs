//! Yearly activity heatmap, one colored cell per calendar day.

use chrono::{Datelike, Duration, Local, NaiveDate};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::query::stats::{self, Intensity};

const WEEKS: i64 = 53;

fn intensity_color(intensity: Intensity) -> Color {
    match intensity {
        Intensity::Empty => Color::Rgb(45, 51, 59),
        Intensity::Low => Color::Rgb(14, 68, 41),
        Intensity::Medium => Color::Rgb(0, 109, 50),
        Intensity::High => Color::Rgb(38, 166, 65),
        Intensity::Highest => Color::Rgb(57, 211, 83),
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let counts = stats::daily_counts(&app.filtered);
    let year_stats = stats::compute(&app.filtered);
    let year = app.heatmap_year;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Header
            Constraint::Length(1),  // Stats
            Constraint::Length(10), // Grid (weekday rows + month labels)
            Constraint::Length(1),  // Legend
            Constraint::Min(0),
        ])
        .split(area);

    let header = format!(" Birding Activity — {} (←/→ to change year)", year);
    frame.render_widget(
        Paragraph::new(header).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        chunks[0],
    );

    let best = match year_stats.best_day {
        Some((day, count)) => format!("{} ({})", day.format("%b %-d"), count),
        None => "-".to_string(),
    };
    let stats_line = format!(
        " {} sightings | {} active days | best day: {}",
        year_stats.total, year_stats.active_days, best
    );
    frame.render_widget(
        Paragraph::new(stats_line).style(Style::default().fg(Color::Gray)),
        chunks[1],
    );

    frame.render_widget(grid_paragraph(year, &counts), chunks[2]);

    let mut legend = vec![Span::styled(" Less ", Style::default().fg(Color::Gray))];
    for intensity in [
        Intensity::Empty,
        Intensity::Low,
        Intensity::Medium,
        Intensity::High,
        Intensity::Highest,
    ] {
        legend.push(Span::styled(
            "■ ",
            Style::default().fg(intensity_color(intensity)),
        ));
    }
    legend.push(Span::styled("More", Style::default().fg(Color::Gray)));
    frame.render_widget(Paragraph::new(Line::from(legend)), chunks[3]);
}

/// Build the 7-row week grid: rows are weekdays, columns are weeks,
/// starting from the Sunday on or before January 1st.
fn grid_paragraph(
    year: i32,
    counts: &std::collections::BTreeMap<NaiveDate, usize>,
) -> Paragraph<'static> {
    let Some(jan_first) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return Paragraph::new("");
    };
    let first_sunday =
        jan_first - Duration::days(jan_first.weekday().num_days_from_sunday() as i64);

    let mut lines = vec![month_labels(first_sunday, year)];
    for weekday in 0..7 {
        let label = match weekday {
            0 => "Sun ",
            2 => "Tue ",
            4 => "Thu ",
            6 => "Sat ",
            _ => "    ",
        };
        let mut spans = vec![Span::styled(
            format!(" {}", label),
            Style::default().fg(Color::Gray),
        )];
        for week in 0..WEEKS {
            let date = first_sunday + Duration::days(week * 7 + weekday);
            if date.year() != year {
                spans.push(Span::raw("  "));
                continue;
            }
            let count = counts.get(&date).copied().unwrap_or(0);
            let mut style = Style::default().fg(intensity_color(Intensity::from_count(count)));
            if date == Local::now().date_naive() {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            spans.push(Span::styled("■ ", style));
        }
        lines.push(Line::from(spans));
    }
    Paragraph::new(lines)
}

/// A label above the first week of each month.
fn month_labels(first_sunday: NaiveDate, year: i32) -> Line<'static> {
    let mut text = String::new();
    let mut last_month = 0;
    for week in 0..WEEKS {
        let date = first_sunday + Duration::days(week * 7);
        if date.year() != year || date.month() == last_month {
            continue;
        }
        last_month = date.month();
        // Week columns are two characters wide, after the 5-char gutter.
        let column = 5 + week as usize * 2;
        if text.len() <= column {
            text.push_str(&" ".repeat(column - text.len()));
            text.push_str(&date.format("%b").to_string());
        }
    }
    Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
}

/// Years that have at least one dated sighting, used to bound ←/→
/// navigation.
pub fn available_years(app: &App) -> (i32, i32) {
    let current = Local::now().year();
    let mut min = current;
    let mut max = current;
    for day in stats::daily_counts(&app.all_sightings).keys() {
        min = min.min(day.year());
        max = max.max(day.year());
    }
    (min, max)
}
