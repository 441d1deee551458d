//! Journal view: sightings grouped by day, newest day first.

use chrono::NaiveDate;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use std::collections::HashSet;

use crate::app::App;
use crate::query::group::{day_label, group_by_day, DayGroup};
use crate::sighting::{parse_datetime, Sighting};

/// One selectable line of the journal: a day header or an entry under an
/// expanded day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalRow {
    Header(usize),
    Entry(usize, usize),
}

/// Journal state: the day groups for the current filtered set, which
/// days are expanded, and the cursor.
#[derive(Default)]
pub struct JournalView {
    pub groups: Vec<DayGroup>,
    pub expanded: HashSet<Option<NaiveDate>>,
    pub rows: Vec<JournalRow>,
    pub selected: usize,
    pub scroll_offset: usize,
}

impl JournalView {
    /// Rebuild groups and rows from a freshly filtered collection,
    /// keeping day-expansion state and clamping the cursor.
    pub fn rebuild(&mut self, sightings: &[Sighting]) {
        self.groups = group_by_day(sightings);
        self.rebuild_rows();
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    fn rebuild_rows(&mut self) {
        self.rows.clear();
        for (group_idx, group) in self.groups.iter().enumerate() {
            self.rows.push(JournalRow::Header(group_idx));
            if self.expanded.contains(&group.day) {
                for entry_idx in 0..group.sightings.len() {
                    self.rows.push(JournalRow::Entry(group_idx, entry_idx));
                }
            }
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    /// Toggle expansion of the day under the cursor (or of the day the
    /// selected entry belongs to).
    pub fn toggle_selected(&mut self) {
        let Some(row) = self.rows.get(self.selected) else {
            return;
        };
        let group_idx = match row {
            JournalRow::Header(g) | JournalRow::Entry(g, _) => *g,
        };
        let day = self.groups[group_idx].day;
        if !self.expanded.remove(&day) {
            self.expanded.insert(day);
        }
        self.rebuild_rows();
        // Land back on the toggled header.
        self.selected = self
            .rows
            .iter()
            .position(|r| *r == JournalRow::Header(group_idx))
            .unwrap_or(0);
    }

    pub fn expand_all(&mut self) {
        self.expanded = self.groups.iter().map(|g| g.day).collect();
        self.rebuild_rows();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.rebuild_rows();
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    /// The sighting under the cursor, when an entry row is selected.
    pub fn selected_sighting(&self) -> Option<&Sighting> {
        match self.rows.get(self.selected)? {
            JournalRow::Entry(g, e) => self.groups.get(*g)?.sightings.get(*e),
            JournalRow::Header(_) => None,
        }
    }

    fn ensure_visible(&mut self, visible: usize) {
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        }
        if self.selected >= self.scroll_offset + visible {
            self.scroll_offset = self.selected + 1 - visible;
        }
    }
}

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    let header = format!(
        " Journal | {} entries across {} days",
        app.filtered.len(),
        app.journal.groups.len()
    );
    frame.render_widget(
        Paragraph::new(header).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        chunks[0],
    );

    let list_area = chunks[1];
    let visible = list_area.height.saturating_sub(2) as usize;
    app.journal.ensure_visible(visible.max(1));

    let journal = &app.journal;
    let mut lines = Vec::new();
    for (idx, row) in journal
        .rows
        .iter()
        .enumerate()
        .skip(journal.scroll_offset)
        .take(visible.max(1))
    {
        let selected = idx == journal.selected;
        lines.push(match row {
            JournalRow::Header(g) => header_line(&journal.groups[*g], journal, selected),
            JournalRow::Entry(g, e) => entry_line(&journal.groups[*g].sightings[*e], selected),
        });
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " No journal entries. Import photos or press a to add a sighting.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Enter:toggle day | E:expand all | C:collapse all ");
    frame.render_widget(Paragraph::new(lines).block(block), list_area);
}

fn header_line(group: &DayGroup, journal: &JournalView, selected: bool) -> Line<'static> {
    let marker = if journal.expanded.contains(&group.day) {
        "▼"
    } else {
        "▶"
    };
    let count = group.sightings.len();
    let noun = if count == 1 { "sighting" } else { "sightings" };
    let text = format!(" {} {} — {} {}", marker, day_label(group.day), count, noun);

    let style = if selected {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    Line::from(Span::styled(text, style))
}

fn entry_line(sighting: &Sighting, selected: bool) -> Line<'static> {
    let time = parse_datetime(&sighting.datetime)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string());
    let species = if sighting.species.is_empty() {
        "(unknown species)"
    } else {
        &sighting.species
    };
    let location = match (sighting.latitude, sighting.longitude) {
        (Some(lat), Some(lon)) => format!("  @ {:.4}, {:.4}", lat, lon),
        _ => String::new(),
    };
    let notes = if sighting.notes.trim().is_empty() {
        String::new()
    } else {
        format!("  — {}", sighting.notes.replace('\n', " "))
    };
    let text = format!("     {}  {}{}{}", time, species, location, notes);

    let style = if selected {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default()
    };
    Line::from(Span::styled(text, style))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sighting(id: i64, datetime: &str) -> Sighting {
        Sighting {
            id,
            file_path: format!("photo-{id}.jpg"),
            species: "Osprey".to_string(),
            datetime: datetime.to_string(),
            latitude: None,
            longitude: None,
            notes: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_rows_follow_expansion_state() {
        let mut view = JournalView::default();
        let sightings = vec![
            sighting(1, "2024-01-15T08:00:00"),
            sighting(2, "2024-01-15T09:00:00"),
            sighting(3, "2024-01-16T10:00:00"),
        ];
        view.rebuild(&sightings);
        // Collapsed: one header per day.
        assert_eq!(view.rows.len(), 2);

        view.expand_all();
        assert_eq!(view.rows.len(), 5);

        view.collapse_all();
        assert_eq!(view.rows.len(), 2);
    }

    #[test]
    fn test_toggle_keeps_cursor_on_header() {
        let mut view = JournalView::default();
        view.rebuild(&[
            sighting(1, "2024-01-15T08:00:00"),
            sighting(2, "2024-01-16T10:00:00"),
        ]);
        view.selected = 1;
        view.toggle_selected();
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.rows[view.selected], JournalRow::Header(1));
    }

    #[test]
    fn test_selected_sighting_only_on_entry_rows() {
        let mut view = JournalView::default();
        view.rebuild(&[sighting(1, "2024-01-15T08:00:00")]);
        assert!(view.selected_sighting().is_none());

        view.toggle_selected();
        view.move_down();
        assert_eq!(view.selected_sighting().map(|s| s.id), Some(1));
    }
}
