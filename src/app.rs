//! Main application state and page routing

use eframe::egui;

use crate::core::catalog::{Grade, Subject};
use crate::core::config::{AppConfig, Theme};
use crate::core::store::NoteStore;
use crate::ui::{
    home::HomePanel,
    library::{LibraryPanel, LibraryState},
    theme,
    upload::{UploadForm, UploadPanel},
};

/// Page currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Upload,
    Library,
}

/// One-line message shown under the navigation bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Success(String),
    Warning(String),
    Error(String),
}

/// Main application state
pub struct NotesHubApp {
    /// Note storage, owned for the lifetime of the session
    pub store: Box<dyn NoteStore>,
    /// Application configuration
    pub config: AppConfig,
    /// Current page
    pub page: Page,
    /// Upload form state
    pub upload: UploadForm,
    /// Library filter state
    pub library: LibraryState,
    /// Last status message
    pub status: Option<Status>,
    /// Write config changes back to disk
    persist_config: bool,
}

impl NotesHubApp {
    /// Create the application for an eframe window
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, store: Box<dyn NoteStore>) -> Self {
        theme::apply(&cc.egui_ctx, config.ui.theme);
        let mut app = Self::with_store(config, store);
        app.persist_config = true;
        app
    }

    /// Create the application state around an existing store. Config
    /// changes stay in memory.
    pub fn with_store(config: AppConfig, store: Box<dyn NoteStore>) -> Self {
        let upload = UploadForm::new(config.ui.last_grade, config.ui.last_subject);
        let library = LibraryState::new(config.ui.last_grade, config.ui.last_subject);

        Self {
            store,
            config,
            page: Page::Home,
            upload,
            library,
            status: None,
            persist_config: false,
        }
    }

    /// Switch pages
    pub fn navigate_to(&mut self, page: Page) {
        if self.page != page {
            tracing::debug!("Navigating to {:?}", page);
        }
        self.page = page;
    }

    /// Submit the upload form. On success the app returns to the home page.
    pub fn submit_upload(&mut self) {
        match self.upload.submit(self.store.as_mut()) {
            Ok(key) => {
                self.status = Some(Status::Success(format!(
                    "File uploaded to Grade {} - {} successfully!",
                    key.grade, key.subject
                )));
                self.remember_selection(key.grade, key.subject);
                self.navigate_to(Page::Home);
            }
            Err(e) => {
                tracing::error!("Upload failed: {:#}", e);
                self.status = Some(Status::Error(format!("Upload failed: {:#}", e)));
            }
        }
    }

    /// Switch between dark and light mode and persist the choice
    pub fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.config.ui.theme = match self.config.ui.theme {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
        theme::apply(ctx, self.config.ui.theme);
        self.save_config();
    }

    /// Preselect the last used grade and subject next time
    pub fn remember_selection(&mut self, grade: Grade, subject: Subject) {
        self.config.ui.last_grade = grade;
        self.config.ui.last_subject = subject;
        self.library = LibraryState::new(grade, subject);
        self.save_config();
    }

    fn save_config(&self) {
        if !self.persist_config {
            return;
        }
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to save config: {:#}", e);
        }
    }

    /// Render the top navigation bar
    fn render_nav_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("nav_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(egui::RichText::new("NotesHub").color(theme::PRIMARY));
                ui.separator();
                for (page, label) in [
                    (Page::Home, "Home"),
                    (Page::Upload, "Upload"),
                    (Page::Library, "Browse Notes"),
                ] {
                    if ui.selectable_label(self.page == page, label).clicked() {
                        self.navigate_to(page);
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let icon = match self.config.ui.theme {
                        Theme::Dark => "\u{2600}",
                        Theme::Light => "\u{1F319}",
                    };
                    if ui.button(icon).on_hover_text("Toggle dark/light mode").clicked() {
                        self.toggle_theme(ctx);
                    }
                    ui.label(format!("{} storage", self.store.backend()));
                });
            });
        });
    }

    /// Render the status line, if any
    fn render_status(&mut self, ctx: &egui::Context) {
        let Some(status) = self.status.clone() else {
            return;
        };

        egui::TopBottomPanel::top("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match &status {
                    Status::Success(msg) => ui.colored_label(theme::SUCCESS, msg.as_str()),
                    Status::Warning(msg) => ui.colored_label(theme::WARNING, msg.as_str()),
                    Status::Error(msg) => ui.colored_label(theme::SECONDARY, msg.as_str()),
                };
                if ui.small_button("\u{2715}").clicked() {
                    self.status = None;
                }
            });
        });
    }
}

impl eframe::App for NotesHubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_nav_bar(ctx);
        self.render_status(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("page_scroll")
                .show(ui, |ui| match self.page {
                    Page::Home => HomePanel::show(ui, self),
                    Page::Upload => UploadPanel::show(ui, self),
                    Page::Library => LibraryPanel::show(ui, self),
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::NoteKey;
    use crate::core::store::MemoryStore;
    use crate::ui::upload::PickedFile;

    fn app() -> NotesHubApp {
        NotesHubApp::with_store(AppConfig::default(), Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_starts_on_home() {
        let app = app();
        assert_eq!(app.page, Page::Home);
        assert!(app.status.is_none());
    }

    #[test]
    fn test_navigate_to() {
        let mut app = app();
        app.navigate_to(Page::Library);
        assert_eq!(app.page, Page::Library);
        app.navigate_to(Page::Upload);
        assert_eq!(app.page, Page::Upload);
    }

    #[test]
    fn test_upload_without_file_stays_on_form() {
        let mut app = app();
        app.navigate_to(Page::Upload);

        app.submit_upload();

        assert_eq!(app.page, Page::Upload);
        assert!(matches!(app.status, Some(Status::Error(_))));
    }

    #[test]
    fn test_successful_upload_returns_home() {
        let mut app = app();
        app.navigate_to(Page::Upload);
        app.upload.grade = Grade::Ten;
        app.upload.subject = Subject::Physics;
        app.upload.description = "chapter on waves".to_string();
        app.upload.file = Some(PickedFile::new("waves.pdf", b"<pdf-bytes>".to_vec()));

        app.submit_upload();

        assert_eq!(app.page, Page::Home);
        assert_eq!(
            app.status,
            Some(Status::Success(
                "File uploaded to Grade 10 - Physics successfully!".to_string()
            ))
        );
        assert_eq!(app.library.grade, Grade::Ten);
        assert_eq!(app.library.subject, Subject::Physics);
        let record = app
            .store
            .get(&NoteKey::new(Grade::Ten, Subject::Physics, "waves.pdf"));
        assert_eq!(record.description, "chapter on waves");
    }
}
