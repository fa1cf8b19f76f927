//! CLI command handlers for `docpress`.
//!
//! Each command is implemented in its own submodule and returns a printable
//! `✗` message on failure.

pub mod config;
pub mod diagram;
pub mod generate;
pub mod list;
