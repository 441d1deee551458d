use anyhow::Result;
use chrono::{Datelike, Local};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::collections::HashSet;
use std::time::Duration;
use tracing::error;

use crate::config::Config;
use crate::db::Database;
use crate::export::{self, ExportFormat};
use crate::import;
use crate::query::filter::{self, Filters};
use crate::sighting::{self, Sighting, SightingInput};
use crate::ui;
use crate::ui::confirm_dialog::{ConfirmDialog, PendingAction};
use crate::ui::edit_dialog::EditSightingDialog;
use crate::ui::gallery::SortOption;
use crate::ui::journal::JournalView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Gallery,
    Journal,
    Heatmap,
}

impl View {
    pub fn label(&self) -> &'static str {
        match self {
            View::Gallery => "Gallery",
            View::Journal => "Journal",
            View::Heatmap => "Heatmap",
        }
    }

    fn cycle(&self) -> Self {
        match self {
            View::Gallery => View::Journal,
            View::Journal => View::Heatmap,
            View::Heatmap => View::Gallery,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Searching,
    Editing,
    Confirming,
    Help,
}

pub struct App {
    pub config: Config,
    pub db: Database,
    pub view: View,
    pub mode: AppMode,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Everything currently in the store, in backend order.
    pub all_sightings: Vec<Sighting>,
    /// The records passing the current search term and filters.
    pub filtered: Vec<Sighting>,
    pub search_term: String,
    pub filters: Filters,
    // Gallery state
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub sort_by: SortOption,
    // Journal state
    pub journal: JournalView,
    // Heatmap state
    pub heatmap_year: i32,
    // Dialogs
    pub edit_dialog: Option<EditSightingDialog>,
    pub confirm_dialog: Option<ConfirmDialog>,
}

impl App {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let mut app = Self {
            config,
            db,
            view: View::Gallery,
            mode: AppMode::Normal,
            should_quit: false,
            status_message: None,
            all_sightings: Vec::new(),
            filtered: Vec::new(),
            search_term: String::new(),
            filters: Filters::default(),
            selected_index: 0,
            scroll_offset: 0,
            sort_by: SortOption::default(),
            journal: JournalView::default(),
            heatmap_year: Local::now().year(),
            edit_dialog: None,
            confirm_dialog: None,
        };
        app.refresh();
        Ok(app)
    }

    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) if key.kind != event::KeyEventKind::Release => {
                        self.handle_key(key)
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Reload the collection from storage and re-derive the view models.
    pub fn refresh(&mut self) {
        match self.db.get_all_sightings() {
            Ok(sightings) => {
                self.all_sightings = sightings;
                self.apply_filters();
            }
            Err(e) => {
                error!(error = %e, "failed to load sightings");
                self.status_message = Some(format!("Load failed: {}", e));
            }
        }
    }

    /// Re-run the pure query pipeline over the in-memory collection.
    fn apply_filters(&mut self) {
        self.filtered = filter::apply(&self.all_sightings, &self.search_term, &self.filters);
        self.sort_by.sort(&mut self.filtered);
        self.journal.rebuild(&self.filtered);
        self.selected_index = self
            .selected_index
            .min(self.filtered.len().saturating_sub(1));
    }

    pub fn ensure_gallery_visible(&mut self, visible: usize) {
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        }
        if self.selected_index >= self.scroll_offset + visible {
            self.scroll_offset = self.selected_index + 1 - visible;
        }
    }

    fn selected_sighting(&self) -> Option<&Sighting> {
        match self.view {
            View::Gallery => self.filtered.get(self.selected_index),
            View::Journal => self.journal.selected_sighting(),
            View::Heatmap => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;
        match self.mode {
            AppMode::Normal => self.handle_normal_key(key),
            AppMode::Searching => self.handle_search_key(key),
            AppMode::Editing => self.handle_edit_key(key),
            AppMode::Confirming => self.handle_confirm_key(key),
            AppMode::Help => self.mode = AppMode::Normal,
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Tab => self.view = self.view.cycle(),
            KeyCode::Char('1') => self.view = View::Gallery,
            KeyCode::Char('2') => self.view = View::Journal,
            KeyCode::Char('3') => self.view = View::Heatmap,
            KeyCode::Char('/') => self.mode = AppMode::Searching,
            KeyCode::Char('r') => {
                self.refresh();
                self.status_message = Some("Reloaded from storage".to_string());
            }
            KeyCode::Char('c') => {
                self.search_term.clear();
                self.filters.clear();
                self.apply_filters();
            }
            KeyCode::Char('o') => {
                self.filters.has_coordinates = !self.filters.has_coordinates;
                self.apply_filters();
            }
            KeyCode::Char('n') => {
                self.filters.has_notes = !self.filters.has_notes;
                self.apply_filters();
            }
            KeyCode::Char('a') => {
                self.edit_dialog = Some(EditSightingDialog::for_new(SightingInput::default()));
                self.mode = AppMode::Editing;
            }
            KeyCode::Char('e') => self.open_edit_dialog(),
            KeyCode::Char('d') => self.open_delete_confirm(),
            KeyCode::Char('i') => self.import_from_cwd(),
            KeyCode::Char('x') => self.export_csv(),
            KeyCode::Char('s') if self.view == View::Gallery => {
                self.sort_by = self.sort_by.cycle();
                self.apply_filters();
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Char('g') if self.view == View::Gallery => self.selected_index = 0,
            KeyCode::Char('G') if self.view == View::Gallery => {
                self.selected_index = self.filtered.len().saturating_sub(1);
            }
            KeyCode::Enter if self.view == View::Journal => self.journal.toggle_selected(),
            KeyCode::Char('E') if self.view == View::Journal => self.journal.expand_all(),
            KeyCode::Char('C') if self.view == View::Journal => self.journal.collapse_all(),
            KeyCode::Left if self.view == View::Heatmap => self.change_year(-1),
            KeyCode::Right if self.view == View::Heatmap => self.change_year(1),
            _ => {}
        }
    }

    fn move_down(&mut self) {
        match self.view {
            View::Gallery => {
                if self.selected_index + 1 < self.filtered.len() {
                    self.selected_index += 1;
                }
            }
            View::Journal => self.journal.move_down(),
            View::Heatmap => {}
        }
    }

    fn move_up(&mut self) {
        match self.view {
            View::Gallery => self.selected_index = self.selected_index.saturating_sub(1),
            View::Journal => self.journal.move_up(),
            View::Heatmap => {}
        }
    }

    fn change_year(&mut self, delta: i32) {
        let (min, max) = ui::available_years(self);
        self.heatmap_year = (self.heatmap_year + delta).clamp(min, max);
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.search_term.clear();
                self.apply_filters();
                self.mode = AppMode::Normal;
            }
            KeyCode::Enter => {
                self.commit_search();
                self.mode = AppMode::Normal;
            }
            KeyCode::Backspace => {
                self.search_term.pop();
                self.apply_filters();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search_term.push(c);
                self.apply_filters();
            }
            _ => {}
        }
    }

    /// On commit, let the backend answer the plain-term search so its
    /// species/notes matching is exercised end to end; combined field
    /// filters stay on the in-memory engine.
    fn commit_search(&mut self) {
        if self.filters.is_active() || self.search_term.trim().is_empty() {
            return;
        }
        match self.db.search_sightings(&self.search_term) {
            Ok(mut results) => {
                self.sort_by.sort(&mut results);
                self.status_message = Some(format!("{} match(es)", results.len()));
                self.filtered = results;
                self.journal.rebuild(&self.filtered);
                self.selected_index = 0;
            }
            Err(e) => {
                error!(error = %e, "search failed");
                self.status_message = Some(format!("Search failed: {}", e));
            }
        }
    }

    fn open_edit_dialog(&mut self) {
        match self.selected_sighting() {
            Some(sighting) => {
                self.edit_dialog = Some(EditSightingDialog::for_existing(sighting));
                self.mode = AppMode::Editing;
            }
            None => self.status_message = Some("Nothing selected to edit".to_string()),
        }
    }

    fn open_delete_confirm(&mut self) {
        match self.selected_sighting() {
            Some(sighting) => {
                self.confirm_dialog = Some(ConfirmDialog::delete(sighting.id, &sighting.species));
                self.mode = AppMode::Confirming;
            }
            None => self.status_message = Some("Nothing selected to delete".to_string()),
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.edit_dialog = None;
                self.mode = AppMode::Normal;
                return;
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.save_edit_dialog();
                return;
            }
            _ => {}
        }
        let Some(dialog) = self.edit_dialog.as_mut() else {
            self.mode = AppMode::Normal;
            return;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => dialog.next_field(),
            KeyCode::BackTab | KeyCode::Up => dialog.prev_field(),
            KeyCode::Backspace => dialog.backspace(),
            KeyCode::Delete => dialog.delete(),
            KeyCode::Left => dialog.move_cursor_left(),
            KeyCode::Right => dialog.move_cursor_right(),
            KeyCode::Home => dialog.move_cursor_home(),
            KeyCode::End => dialog.move_cursor_end(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                dialog.handle_char(c);
            }
            _ => {}
        }
    }

    /// Validate the form and write it to storage. Validation failures
    /// keep the dialog open with the full error list; storage failures
    /// leave the prior state untouched and report the error.
    fn save_edit_dialog(&mut self) {
        let Some(dialog) = self.edit_dialog.as_mut() else {
            return;
        };
        let (input, mut errors) = dialog.build_input();
        errors.extend(sighting::validate(&input).errors);
        if !errors.is_empty() {
            dialog.errors = errors;
            return;
        }

        let outcome = match dialog.id {
            Some(id) => self.db.update_sighting(id, &input).map(|changes| {
                if changes == 0 {
                    "Sighting no longer exists".to_string()
                } else {
                    "Sighting updated".to_string()
                }
            }),
            None => self
                .db
                .insert_sighting(&input)
                .map(|_| "Sighting added".to_string()),
        };

        match outcome {
            Ok(message) => {
                self.status_message = Some(message);
                self.edit_dialog = None;
                self.mode = AppMode::Normal;
                self.refresh();
            }
            Err(e) => {
                error!(error = %e, "failed to save sighting");
                dialog.errors = vec![format!("Storage error: {}", e)];
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(dialog) = self.confirm_dialog.take() {
                    match dialog.action {
                        PendingAction::DeleteSighting(id) => self.delete_sighting(id),
                    }
                }
                self.mode = AppMode::Normal;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.confirm_dialog = None;
                self.mode = AppMode::Normal;
            }
            _ => {}
        }
    }

    fn delete_sighting(&mut self, id: i64) {
        match self.db.delete_sighting(id) {
            Ok(0) => self.status_message = Some("Sighting was already gone".to_string()),
            Ok(_) => self.status_message = Some("Sighting deleted".to_string()),
            Err(e) => {
                error!(error = %e, "failed to delete sighting");
                self.status_message = Some(format!("Delete failed: {}", e));
                return;
            }
        }
        self.refresh();
    }

    /// Import photos from the working directory as new sightings,
    /// prefilled from EXIF. Photos whose path is already recorded are
    /// skipped so repeat imports do not duplicate records.
    fn import_from_cwd(&mut self) {
        let dir = match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                self.status_message = Some(format!("Import failed: {}", e));
                return;
            }
        };
        let images = match import::discover_images(&dir, &self.config.import.image_extensions) {
            Ok(images) => images,
            Err(e) => {
                error!(error = %e, "photo discovery failed");
                self.status_message = Some(format!("Import failed: {}", e));
                return;
            }
        };

        let known: HashSet<&str> = self
            .all_sightings
            .iter()
            .map(|s| s.file_path.as_str())
            .collect();
        let mut imported = 0usize;
        for path in &images {
            let input = import::sighting_from_photo(path);
            if known.contains(input.file_path.as_str())
                || !sighting::validate(&input).is_valid()
            {
                continue;
            }
            match self.db.insert_sighting(&input) {
                Ok(_) => imported += 1,
                Err(e) => {
                    error!(error = %e, "import insert failed");
                    self.refresh();
                    self.status_message = Some(format!("Import failed: {}", e));
                    return;
                }
            }
        }
        self.refresh();
        self.status_message = Some(format!(
            "Imported {} new photos from {}",
            imported,
            dir.display()
        ));
    }

    fn export_csv(&mut self) {
        let path = match std::env::current_dir() {
            Ok(dir) => dir.join("sightings.csv"),
            Err(e) => {
                self.status_message = Some(format!("Export failed: {}", e));
                return;
            }
        };
        match export::export_sightings(&self.db, &path, ExportFormat::Csv) {
            Ok(count) => {
                self.status_message =
                    Some(format!("Exported {} sightings to {}", count, path.display()));
            }
            Err(e) => {
                error!(error = %e, "export failed");
                self.status_message = Some(format!("Export failed: {}", e));
            }
        }
    }
}
