//! Gallery view: the flat, sortable table of sightings.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::query::stats;
use crate::sighting::{parse_datetime, Sighting};

/// Sort options for the gallery list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    #[default]
    Newest,
    Oldest,
    Species,
}

impl SortOption {
    pub fn cycle(&self) -> Self {
        match self {
            SortOption::Newest => SortOption::Oldest,
            SortOption::Oldest => SortOption::Species,
            SortOption::Species => SortOption::Newest,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOption::Newest => "Newest",
            SortOption::Oldest => "Oldest",
            SortOption::Species => "Species",
        }
    }

    /// Order a filtered result set in place.
    pub fn sort(&self, sightings: &mut [Sighting]) {
        match self {
            SortOption::Newest => sightings.sort_by_key(|s| {
                let dt = parse_datetime(&s.datetime);
                (dt.is_none(), std::cmp::Reverse(dt))
            }),
            SortOption::Oldest => {
                sightings.sort_by_key(|s| parse_datetime(&s.datetime));
            }
            SortOption::Species => {
                sightings.sort_by_key(|s| s.species.to_lowercase());
            }
        }
    }
}

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Rows
            Constraint::Length(1), // Selection info
        ])
        .split(area);

    let header = format!(
        " Gallery | {} sightings | Sort: {} (s to cycle)",
        app.filtered.len(),
        app.sort_by.label()
    );
    frame.render_widget(
        Paragraph::new(header).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        chunks[0],
    );

    let list_area = chunks[1];
    let visible = list_area.height.saturating_sub(3) as usize; // borders + column header
    app.ensure_gallery_visible(visible.max(1));

    let mut lines = vec![Line::from(Span::styled(
        format!(
            " {:<16} {:<24} {:<21} {}",
            "Date", "Species", "Location", "Notes"
        ),
        Style::default().fg(Color::Gray).add_modifier(Modifier::UNDERLINED),
    ))];

    for (idx, sighting) in app
        .filtered
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(visible.max(1))
    {
        let selected = idx == app.selected_index;
        let style = if selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(row_text(sighting, list_area.width), style)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(lines).block(block), list_area);

    let info = match app.filtered.get(app.selected_index) {
        Some(s) => {
            let mut info = format!(
                " {} | {}/{}",
                s.file_path,
                app.selected_index + 1,
                app.filtered.len()
            );
            if !s.species.trim().is_empty() {
                info.push_str(&species_info(&app.all_sightings, s.species.trim()));
            }
            info
        }
        None => " No sightings match".to_string(),
    };
    frame.render_widget(
        Paragraph::new(info).style(Style::default().fg(Color::Yellow)),
        chunks[2],
    );
}

fn row_text(sighting: &Sighting, width: u16) -> String {
    let date = display_datetime(&sighting.datetime);
    let species = if sighting.species.is_empty() {
        "(unknown species)"
    } else {
        &sighting.species
    };
    let location = match (sighting.latitude, sighting.longitude) {
        (Some(lat), Some(lon)) => format!("{:.4}, {:.4}", lat, lon),
        _ => String::new(),
    };
    let row = format!(
        " {:<16} {:<24} {:<21} {}",
        truncate(&date, 16),
        truncate(species, 24),
        truncate(&location, 21),
        sighting.notes.replace('\n', " ")
    );
    truncate(&row, width.saturating_sub(2) as usize).to_string()
}

/// Summary of the whole collection's records for one species, shown
/// when a sighting of it is selected.
fn species_info(all: &[Sighting], species: &str) -> String {
    let summary = stats::species_summary(all, species);
    let mut info = format!(" | {}x {}", summary.total, species);
    if let (Some(first), Some(last)) = (summary.first_seen, summary.last_seen) {
        if first == last {
            info.push_str(&format!(", seen {}", first.format("%Y-%m-%d")));
        } else {
            info.push_str(&format!(
                ", {} to {}",
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            ));
        }
    }
    if summary.unique_locations > 0 {
        info.push_str(&format!(", {} location(s)", summary.unique_locations));
    }
    info
}

fn display_datetime(raw: &str) -> String {
    match parse_datetime(raw) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sighting(species: &str, datetime: &str) -> Sighting {
        Sighting {
            id: 0,
            file_path: "p.jpg".to_string(),
            species: species.to_string(),
            datetime: datetime.to_string(),
            latitude: None,
            longitude: None,
            notes: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_sort_newest_puts_undated_last() {
        let mut sightings = vec![
            sighting("A", ""),
            sighting("B", "2024-01-10T08:00:00"),
            sighting("C", "2024-02-01T08:00:00"),
        ];
        SortOption::Newest.sort(&mut sightings);
        let order: Vec<&str> = sightings.iter().map(|s| s.species.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_sort_species_is_case_insensitive() {
        let mut sightings = vec![
            sighting("wren", ""),
            sighting("Blue Jay", ""),
            sighting("american Crow", ""),
        ];
        SortOption::Species.sort(&mut sightings);
        let order: Vec<&str> = sightings.iter().map(|s| s.species.as_str()).collect();
        assert_eq!(order, vec!["american Crow", "Blue Jay", "wren"]);
    }
}
