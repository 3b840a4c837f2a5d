//! UI pages for NotesHub

pub mod home;
pub mod library;
pub mod pickers;
pub mod theme;
pub mod upload;
