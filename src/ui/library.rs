//! Library page: browse notes by grade and subject

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use eframe::egui;

use super::{pickers, theme, upload::format_size};
use crate::app::{NotesHubApp, Page, Status};
use crate::core::catalog::{Grade, NoteKey, Subject};
use crate::core::store::{NoteRecord, NoteStore};

/// Grade and subject being browsed, plus records already read for it
#[derive(Debug, Clone, Default)]
pub struct LibraryState {
    pub grade: Grade,
    pub subject: Subject,
    records: HashMap<NoteKey, Rc<NoteRecord>>,
}

impl LibraryState {
    pub fn new(grade: Grade, subject: Subject) -> Self {
        Self {
            grade,
            subject,
            records: HashMap::new(),
        }
    }

    /// Record for `key`, read from the store once per library state.
    /// The state is rebuilt whenever the selection changes or a note is uploaded.
    pub fn record(&mut self, store: &dyn NoteStore, key: &NoteKey) -> Rc<NoteRecord> {
        self.records
            .entry(key.clone())
            .or_insert_with(|| Rc::new(store.get(key)))
            .clone()
    }

    /// Banner text for a listing of `count` notes
    pub fn summary(&self, count: usize) -> String {
        if count == 0 {
            format!("No notes found for Grade {} {}", self.grade, self.subject)
        } else {
            format!("Found {} notes.", count)
        }
    }
}

/// Write a note's bytes to `path`
pub fn export_payload(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write file: {}", path.display()))?;
    tracing::info!("Exported note to: {}", path.display());
    Ok(())
}

/// Where "Open" puts a copy of the note before handing it to the system viewer
fn preview_path(key: &NoteKey) -> PathBuf {
    std::env::temp_dir()
        .join("NotesHub")
        .join(key.grade.as_str())
        .join(key.subject.as_str())
        .join(&key.filename)
}

/// Library page
pub struct LibraryPanel;

impl LibraryPanel {
    /// Show the library page
    pub fn show(ui: &mut egui::Ui, app: &mut NotesHubApp) {
        ui.heading("Available Study Materials");
        ui.add_space(8.0);

        let (mut grade, mut subject) = (app.library.grade, app.library.subject);
        if pickers::grade_subject(ui, "library", &mut grade, &mut subject) {
            app.remember_selection(grade, subject);
        }
        ui.add_space(12.0);

        let filenames = app.store.list_keys(grade, subject);
        let summary = app.library.summary(filenames.len());
        if filenames.is_empty() {
            ui.colored_label(theme::WARNING, summary);
        } else {
            ui.colored_label(theme::SUCCESS, summary);
            for filename in filenames {
                let key = NoteKey::new(grade, subject, filename);
                Self::show_note(ui, app, &key);
            }
        }

        ui.add_space(12.0);
        if ui.button("Back to Home").clicked() {
            app.navigate_to(Page::Home);
        }
    }

    /// Show one note as a collapsible card. The record is read the first
    /// time the entry is opened.
    fn show_note(ui: &mut egui::Ui, app: &mut NotesHubApp, key: &NoteKey) {
        egui::CollapsingHeader::new(format!("\u{1F4C4} {}", key.filename))
            .id_salt(key.storage_key())
            .show(ui, |ui| {
                let record = app.library.record(&*app.store, key);

                theme::card(ui).show(ui, |ui| {
                    ui.heading(key.filename.as_str());
                    ui.horizontal_wrapped(|ui| {
                        ui.strong("Description:");
                        if record.description.is_empty() {
                            ui.weak("(none)");
                        } else {
                            ui.label(record.description.as_str());
                        }
                    });
                });

                let Some(bytes) = record.payload.as_ref() else {
                    ui.weak("File content is not available.");
                    return;
                };

                ui.horizontal(|ui| {
                    ui.label(format_size(bytes.len()));
                    if ui.button("Download").clicked() {
                        Self::download(app, key, bytes);
                    }
                    if ui.button("Open").clicked() {
                        Self::open_in_viewer(app, key, bytes);
                    }
                });
            });
    }

    fn download(app: &mut NotesHubApp, key: &NoteKey, bytes: &[u8]) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&key.filename)
            .add_filter("PDF", &["pdf"])
            .save_file()
        else {
            return;
        };

        app.status = Some(match export_payload(&path, bytes) {
            Ok(()) => Status::Success(format!("Saved {}", path.display())),
            Err(e) => {
                tracing::error!("Download failed: {:#}", e);
                Status::Error(format!("Download failed: {:#}", e))
            }
        });
    }

    fn open_in_viewer(app: &mut NotesHubApp, key: &NoteKey, bytes: &[u8]) {
        let path = preview_path(key);
        let result = export_payload(&path, bytes).and_then(|()| {
            open::that(&path).with_context(|| format!("Failed to open {}", path.display()))
        });

        if let Err(e) = result {
            tracing::error!("{:#}", e);
            app.status = Some(Status::Error(format!("{:#}", e)));
        }
    }
}
