//! Filtered, annotated directory tree viewer
//!
//! The binary in `main.rs` wires these modules into a terminal session; the
//! library surface is what the integration tests drive.

pub mod app;
pub mod async_task;
pub mod cli;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod cursor;
pub mod error;
pub mod event;
pub mod executor;
pub mod filter;
pub mod git_utils;
pub mod main_lib;
pub mod render;
pub mod screenshot;
pub mod store;
pub mod theme;
pub mod tree;
pub mod ui;
pub mod updater;
pub mod walker;
