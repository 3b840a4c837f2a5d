//! Core functionality: the note catalog, note storage, and configuration

pub mod catalog;
pub mod config;
pub mod store;
