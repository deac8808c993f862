//! Airport facilities directory
//!
//! Browse airports, their facility categories and facilities from the terminal.
//! Every read goes through a fetch cache with a freshness window, so views that
//! ask for the same resource again within the window are served from memory.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod directory;
pub mod listing;
pub mod logging;
pub mod toast;
pub mod ui;
