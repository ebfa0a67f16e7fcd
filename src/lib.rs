//! Library crate for g.
//!
//! The shipped application is the `g` binary (`src/main.rs`).
//!
//! This library exists to share code between targets (binary, tests) and to keep modules organized.
//! The pipeline is [app::run]: [core] collects and sorts, [layout] renders.

pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod layout;
pub mod ui;
pub mod utils;

pub use error::ListError;
