//! Miscellaneous utilities for g.
//!
//! - [cli]: the clap command line.
//! - [helpers]: color parsing, home directory, terminal width, file URLs.
//! - [interrupt]: the shared stop flag behind Ctrl-C.
//! - [logging]: the tracing subscriber.
//! - [shell]: shell integration scripts.

pub mod cli;
pub mod helpers;
pub mod interrupt;
pub mod logging;
pub mod shell;

pub use helpers::{expand_tilde, file_url, get_home, parse_color, terminal_width};
pub use interrupt::Interrupt;
