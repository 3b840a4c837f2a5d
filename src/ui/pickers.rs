//! Grade and subject selectors shared by the upload and library pages

use eframe::egui;

use crate::core::catalog::{Grade, Subject};

/// Show grade and subject combo boxes side by side. Returns true when
/// either selection changed.
pub fn grade_subject(ui: &mut egui::Ui, id_salt: &str, grade: &mut Grade, subject: &mut Subject) -> bool {
    let before = (*grade, *subject);

    ui.horizontal(|ui| {
        egui::ComboBox::new(format!("{id_salt}_grade"), "Select Grade")
            .selected_text(grade.as_str())
            .show_ui(ui, |ui| {
                for option in Grade::ALL {
                    ui.selectable_value(grade, option, option.as_str());
                }
            });

        ui.add_space(16.0);

        egui::ComboBox::new(format!("{id_salt}_subject"), "Select Subject")
            .selected_text(subject.as_str())
            .show_ui(ui, |ui| {
                for option in Subject::ALL {
                    ui.selectable_value(subject, option, option.as_str());
                }
            });
    });

    before != (*grade, *subject)
}
