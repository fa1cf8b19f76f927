//! Core module: document model, layout, diagrams and rendering

pub mod catalog;
pub mod config;
pub mod diagram;
pub mod layout;
pub mod models;
pub mod report;

/// Returns the current version of the `docpress` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
