//! Configuration for g.
//!
//! - [load]: reading `g.toml` into [Config].
//! - [general], [display]: the `[general]` and `[display]` tables.
//! - [theme]: the JSON theme with per-classifier styles.
//! - [request]: the [ListingRequest] built from flags layered over the config.

pub mod display;
pub mod general;
pub mod load;
pub mod request;
pub mod theme;

pub use display::Display;
pub use general::{General, InternalGeneral};
pub use load::Config;
pub use request::ListingRequest;
pub use theme::{Style, Theme};
