//! Dialog for adding or editing a sighting.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::sighting::{normalize_coordinate, Sighting, SightingInput};

const FILE_PATH: usize = 0;
const SPECIES: usize = 1;
const DATETIME: usize = 2;
const LATITUDE: usize = 3;
const LONGITUDE: usize = 4;
const NOTES: usize = 5;

/// One editable line of the form.
pub struct Field {
    pub label: &'static str,
    pub value: String,
    pub cursor: usize,
}

impl Field {
    fn new(label: &'static str, value: String) -> Self {
        let cursor = value.len();
        Self { label, value, cursor }
    }
}

/// Dialog state for the add/edit sighting form.
pub struct EditSightingDialog {
    /// `None` when adding a new sighting.
    pub id: Option<i64>,
    pub fields: Vec<Field>,
    pub focus: usize,
    /// Validation errors from the last failed save attempt.
    pub errors: Vec<String>,
}

impl EditSightingDialog {
    pub fn for_new(prefill: SightingInput) -> Self {
        Self {
            id: None,
            fields: Self::build_fields(&prefill),
            focus: 0,
            errors: Vec::new(),
        }
    }

    pub fn for_existing(sighting: &Sighting) -> Self {
        Self {
            id: Some(sighting.id),
            fields: Self::build_fields(&sighting.to_input()),
            focus: 0,
            errors: Vec::new(),
        }
    }

    fn build_fields(input: &SightingInput) -> Vec<Field> {
        vec![
            Field::new("File path", input.file_path.clone()),
            Field::new("Species", input.species.clone()),
            Field::new("Date/time", input.datetime.clone()),
            Field::new(
                "Latitude",
                input.latitude.map(|v| v.to_string()).unwrap_or_default(),
            ),
            Field::new(
                "Longitude",
                input.longitude.map(|v| v.to_string()).unwrap_or_default(),
            ),
            Field::new("Notes", input.notes.clone()),
        ]
    }

    pub fn title(&self) -> &'static str {
        if self.id.is_some() {
            " Edit Sighting "
        } else {
            " Add Sighting "
        }
    }

    /// Convert the form text into a storage input.
    ///
    /// Coordinates are normalized here; a non-blank coordinate that does
    /// not parse is reported as an error instead of being silently
    /// dropped to `None`.
    pub fn build_input(&self) -> (SightingInput, Vec<String>) {
        let mut errors = Vec::new();

        let latitude = normalize_coordinate(&self.fields[LATITUDE].value);
        if latitude.is_none() && !self.fields[LATITUDE].value.trim().is_empty() {
            errors.push("latitude must be a number".to_string());
        }
        let longitude = normalize_coordinate(&self.fields[LONGITUDE].value);
        if longitude.is_none() && !self.fields[LONGITUDE].value.trim().is_empty() {
            errors.push("longitude must be a number".to_string());
        }

        let input = SightingInput {
            file_path: self.fields[FILE_PATH].value.trim().to_string(),
            species: self.fields[SPECIES].value.trim().to_string(),
            datetime: self.fields[DATETIME].value.trim().to_string(),
            latitude,
            longitude,
            notes: self.fields[NOTES].value.clone(),
        };
        (input, errors)
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    fn focused(&mut self) -> &mut Field {
        &mut self.fields[self.focus]
    }

    pub fn handle_char(&mut self, c: char) {
        let field = self.focused();
        field.value.insert(field.cursor, c);
        field.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        let field = self.focused();
        if field.cursor > 0 {
            let prev = field.value[..field.cursor]
                .chars()
                .next_back()
                .map(|c| c.len_utf8())
                .unwrap_or(1);
            field.cursor -= prev;
            field.value.remove(field.cursor);
        }
    }

    pub fn delete(&mut self) {
        let field = self.focused();
        if field.cursor < field.value.len() {
            field.value.remove(field.cursor);
        }
    }

    pub fn move_cursor_left(&mut self) {
        let field = self.focused();
        if field.cursor > 0 {
            let prev = field.value[..field.cursor]
                .chars()
                .next_back()
                .map(|c| c.len_utf8())
                .unwrap_or(1);
            field.cursor -= prev;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let field = self.focused();
        if field.cursor < field.value.len() {
            let next = field.value[field.cursor..]
                .chars()
                .next()
                .map(|c| c.len_utf8())
                .unwrap_or(1);
            field.cursor += next;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.focused().cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        let field = self.focused();
        field.cursor = field.value.len();
    }
}

pub fn render(frame: &mut Frame, dialog: &EditSightingDialog, area: Rect) {
    let dialog_width = 72.min(area.width.saturating_sub(4));
    let dialog_height = 20.min(area.height.saturating_sub(2));

    let x = (area.width.saturating_sub(dialog_width)) / 2;
    let y = (area.height.saturating_sub(dialog_height)) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(dialog.title());
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(dialog.fields.len() as u16), // Form rows
            Constraint::Min(2),                             // Errors
            Constraint::Length(2),                          // Help
        ])
        .margin(1)
        .split(dialog_area);

    let rows: Vec<Line> = dialog
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| field_line(field, i == dialog.focus))
        .collect();
    frame.render_widget(Paragraph::new(rows), chunks[0]);

    if !dialog.errors.is_empty() {
        let errors: Vec<Line> = dialog
            .errors
            .iter()
            .map(|e| Line::from(Span::styled(format!("  ! {}", e), Style::default().fg(Color::Red))))
            .collect();
        frame.render_widget(Paragraph::new(errors), chunks[1]);
    }

    let help = Paragraph::new(vec![
        Line::from("Tab/Down=next field | Shift+Tab/Up=previous"),
        Line::from("Ctrl+S=save | Esc=cancel"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[2]);
}

fn field_line<'a>(field: &'a Field, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut spans = vec![Span::styled(format!("{:<11}", field.label), label_style)];

    if focused {
        // Show the cursor as an inverted cell.
        if field.cursor < field.value.len() {
            let (before, after) = field.value.split_at(field.cursor);
            let cursor_char = after.chars().next().unwrap_or(' ');
            let rest = &after[cursor_char.len_utf8()..];
            spans.push(Span::raw(before));
            spans.push(Span::styled(
                cursor_char.to_string(),
                Style::default().bg(Color::White).fg(Color::Black),
            ));
            spans.push(Span::raw(rest));
        } else {
            spans.push(Span::raw(field.value.as_str()));
            spans.push(Span::styled(" ", Style::default().bg(Color::White)));
        }
    } else {
        spans.push(Span::raw(field.value.as_str()));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_input_normalizes_coordinates() {
        let mut dialog = EditSightingDialog::for_new(SightingInput::default());
        dialog.fields[FILE_PATH].value = "owl.jpg".to_string();
        dialog.fields[LATITUDE].value = " 40.7128 ".to_string();
        dialog.fields[LONGITUDE].value = "".to_string();

        let (input, errors) = dialog.build_input();
        assert!(errors.is_empty());
        assert_eq!(input.latitude, Some(40.7128));
        assert_eq!(input.longitude, None);
    }

    #[test]
    fn test_build_input_flags_unparseable_coordinates() {
        let mut dialog = EditSightingDialog::for_new(SightingInput::default());
        dialog.fields[LATITUDE].value = "north-ish".to_string();

        let (input, errors) = dialog.build_input();
        assert_eq!(input.latitude, None);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("latitude"));
    }

    #[test]
    fn test_field_editing() {
        let mut dialog = EditSightingDialog::for_new(SightingInput::default());
        dialog.handle_char('a');
        dialog.handle_char('b');
        dialog.move_cursor_left();
        dialog.handle_char('x');
        assert_eq!(dialog.fields[0].value, "axb");

        dialog.backspace();
        assert_eq!(dialog.fields[0].value, "ab");

        dialog.next_field();
        assert_eq!(dialog.focus, 1);
        dialog.prev_field();
        dialog.prev_field();
        assert_eq!(dialog.focus, 5);
    }
}
