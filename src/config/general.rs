//! The general configuration settings for g.
//!
//! This module defines the [General] struct for deserializing the `[general]` table of
//! `g.toml` and the [InternalGeneral] struct with validated values.

use crate::core::SortKey;

use serde::Deserialize;

/// Upper bound for the configured worker count.
pub const MAX_THREADS: usize = 64;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct General {
    dirs_first: bool,
    show_hidden: bool,
    case_insensitive: bool,
    sort: SortKey,
    reverse: bool,
    threads: Option<usize>,
}

impl Default for General {
    fn default() -> Self {
        General {
            dirs_first: true,
            show_hidden: false,
            case_insensitive: true,
            sort: SortKey::Name,
            reverse: false,
            threads: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InternalGeneral {
    dirs_first: bool,
    show_hidden: bool,
    case_insensitive: bool,
    sort: SortKey,
    reverse: bool,
    threads: Option<usize>,
}

impl From<General> for InternalGeneral {
    fn from(g: General) -> Self {
        Self {
            dirs_first: g.dirs_first,
            show_hidden: g.show_hidden,
            case_insensitive: g.case_insensitive,
            sort: g.sort,
            reverse: g.reverse,
            threads: g.threads.map(clamp_threads),
        }
    }
}

impl Default for InternalGeneral {
    fn default() -> Self {
        InternalGeneral::from(General::default())
    }
}

impl InternalGeneral {
    #[inline]
    pub fn dirs_first(&self) -> bool {
        self.dirs_first
    }

    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    #[inline]
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    #[inline]
    pub fn sort(&self) -> SortKey {
        self.sort
    }

    #[inline]
    pub fn reverse(&self) -> bool {
        self.reverse
    }

    #[inline]
    pub fn threads(&self) -> Option<usize> {
        self.threads
    }
}

/// Keeps the worker count within `1..=MAX_THREADS`.
pub fn clamp_threads(value: usize) -> usize {
    let clamped = value.clamp(1, MAX_THREADS);
    if clamped != value {
        tracing::warn!(
            "threads={} out of range (1..={}), clamped to {}",
            value,
            MAX_THREADS,
            clamped
        );
    }
    clamped
}
