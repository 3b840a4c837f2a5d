//! Home page with the introduction and entry points

use eframe::egui;

use super::theme;
use crate::app::{NotesHubApp, Page};

const FEATURES: [(&str, &str); 3] = [
    ("\u{1F4E4} Easy Upload", "Upload PDF files seamlessly using a clean interface."),
    ("\u{1F4C2} Organized Library", "Notes categorized by grade and subject for easy navigation."),
    ("\u{1F313} Dark/Light Mode", "Comfortable reading experience at all times."),
];

/// Home page
pub struct HomePanel;

impl HomePanel {
    /// Show the home page
    pub fn show(ui: &mut egui::Ui, app: &mut NotesHubApp) {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("NotesHub")
                    .size(48.0)
                    .strong()
                    .color(theme::PRIMARY),
            );
            ui.label(
                "A Community Connect initiative by SRM IST, Ramapuram - IT Department \
                 supporting St. Joseph's Higher Secondary School, Cuddalore",
            );
            ui.add_space(20.0);
        });

        ui.columns(2, |columns| {
            Self::partner_card(
                &mut columns[0],
                "SRM IST - Ramapuram (IT Department)",
                "Developed by second-year IT students under the Community Connect program. \
                 The goal is to enhance digital learning accessibility for students in Tamil Nadu.",
            );
            Self::partner_card(
                &mut columns[1],
                "St. Joseph's HSS - Cuddalore",
                "Partner institution benefiting from a centralized digital notes repository \
                 designed for Grade 9-12 students across multiple subjects.",
            );
        });

        theme::card(ui).show(ui, |ui| {
            ui.heading("\u{1F4D8} About NotesHub");
            ui.label(
                "NotesHub is a simplified and modern platform for uploading and accessing study materials. \
                 It bridges the gap between educators and learners, ensuring structured academic support.",
            );
        });

        ui.add_space(12.0);
        ui.heading("Key Features");
        for (title, text) in FEATURES {
            ui.add_space(6.0);
            ui.strong(title);
            ui.label(text);
            ui.separator();
        }

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("Get Started \u{2192}").clicked() {
                app.navigate_to(Page::Upload);
            }
            if ui.button("Browse Notes").clicked() {
                app.navigate_to(Page::Library);
            }
        });
    }

    fn partner_card(ui: &mut egui::Ui, title: &str, text: &str) {
        theme::card(ui).show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.strong(title);
                ui.add_space(8.0);
                ui.label(text);
            });
        });
    }
}
