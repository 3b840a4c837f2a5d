//! Upload page: pick a PDF, describe it, store it

use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui;

use super::{pickers, theme};
use crate::app::{NotesHubApp, Page, Status};
use crate::core::catalog::{Grade, NoteKey, Subject};
use crate::core::store::{disk::is_pdf, NoteStore};

/// A file chosen for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk. Only PDFs are accepted.
    pub fn load(path: &Path) -> Result<Self> {
        if !is_pdf(path) {
            anyhow::bail!("Only PDF files can be uploaded: {}", path.display());
        }
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| anyhow::anyhow!("Not a file: {}", path.display()))?;
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(Self::new(name, bytes))
    }
}

/// Upload form state
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub grade: Grade,
    pub subject: Subject,
    pub file: Option<PickedFile>,
    pub description: String,
}

impl UploadForm {
    pub fn new(grade: Grade, subject: Subject) -> Self {
        Self {
            grade,
            subject,
            ..Default::default()
        }
    }

    /// Store the picked file under the selected grade and subject. The file
    /// and description are cleared on success and kept on failure.
    pub fn submit(&mut self, store: &mut dyn NoteStore) -> Result<NoteKey> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Choose a PDF file first"))?;
        if !is_pdf(Path::new(&file.name)) {
            anyhow::bail!("Only PDF files can be uploaded: {}", file.name);
        }

        let key = NoteKey::new(self.grade, self.subject, file.name.clone());
        store.put(key.clone(), self.description.clone(), Some(file.bytes.clone()))?;

        tracing::info!("Uploaded {} ({} bytes)", key, file.bytes.len());
        self.file = None;
        self.description.clear();
        Ok(key)
    }
}

/// Human readable byte count
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f < KB {
        format!("{} B", bytes)
    } else if bytes_f < KB * KB {
        format!("{:.1} KB", bytes_f / KB)
    } else {
        format!("{:.1} MB", bytes_f / (KB * KB))
    }
}

/// Upload page
pub struct UploadPanel;

impl UploadPanel {
    /// Show the upload page
    pub fn show(ui: &mut egui::Ui, app: &mut NotesHubApp) {
        ui.heading("Upload Study Materials");
        ui.add_space(8.0);

        let mut submit = false;
        theme::card(ui).show(ui, |ui| {
            pickers::grade_subject(ui, "upload", &mut app.upload.grade, &mut app.upload.subject);
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                if ui.button("Choose a PDF file").clicked() {
                    Self::pick_file(app);
                }
                match &app.upload.file {
                    Some(file) => ui.label(format!("{} ({})", file.name, format_size(file.bytes.len()))),
                    None => ui.weak("No file selected"),
                };
            });
            ui.add_space(12.0);

            ui.label("Note Description");
            ui.add(
                egui::TextEdit::multiline(&mut app.upload.description)
                    .hint_text("Enter a brief description...")
                    .desired_width(f32::INFINITY)
                    .desired_rows(4),
            );
            ui.add_space(12.0);

            let ready = app.upload.file.is_some();
            if ui.add_enabled(ready, egui::Button::new("Upload Note")).clicked() {
                submit = true;
            }
        });

        if submit {
            app.submit_upload();
        }

        ui.add_space(8.0);
        if ui.button("Back to Home").clicked() {
            app.navigate_to(Page::Home);
        }
    }

    fn pick_file(app: &mut NotesHubApp) {
        let Some(path) = rfd::FileDialog::new().add_filter("PDF", &["pdf"]).pick_file() else {
            return;
        };

        match PickedFile::load(&path) {
            Ok(file) => app.upload.file = Some(file),
            Err(e) => {
                tracing::warn!("Rejected upload: {:#}", e);
                app.status = Some(Status::Warning(format!("{:#}", e)));
            }
        }
    }
}
