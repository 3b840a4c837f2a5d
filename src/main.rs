//! NotesHub - study notes organized by grade and subject
//!
//! A desktop app for uploading PDF notes and browsing them by grade and subject.

mod app;
mod core;
mod ui;

use anyhow::Context;
use app::NotesHubApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::{config::AppConfig, store};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting NotesHub...");

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Using default config: {:#}", e);
        AppConfig::default()
    });
    let store = store::open_store(&config.storage)?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([720.0, 560.0])
            .with_title("NotesHub"),
        ..Default::default()
    };

    eframe::run_native(
        "NotesHub",
        native_options,
        Box::new(move |cc| Ok(Box::new(NotesHubApp::new(cc, config, store)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("Failed to run the NotesHub window")
}
