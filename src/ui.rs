//! Presentation helpers for g.
//!
//! - [paint]: [paint::Cell] and the [paint::Painter] that styles names and columns.
//! - [icons]: Nerd Font icon lookup.

pub mod icons;
pub mod paint;
