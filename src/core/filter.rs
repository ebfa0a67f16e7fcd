//! Entry filtering for g.
//!
//! Name based rules (hidden files, `--ignore`) are checked on the raw directory entry
//! before any metadata is read, so rejected entries are never built and rejected
//! directories are never descended into. Kind based rules need metadata and run
//! right after the entry is inspected.

use crate::core::entry::{Entry, is_hidden_name};
use crate::error::ListError;

use glob::Pattern;

#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    show_hidden: bool,
    ignore: Vec<Pattern>,
    matches: Vec<Pattern>,
    only_dirs: bool,
    no_dirs: bool,
}

impl EntryFilter {
    pub fn new(show_hidden: bool) -> Self {
        EntryFilter {
            show_hidden,
            ..EntryFilter::default()
        }
    }

    /// Names matching any of these globs are skipped.
    pub fn ignore<S: AsRef<str>>(mut self, globs: &[S]) -> Result<Self, ListError> {
        self.ignore = compile(globs)?;
        Ok(self)
    }

    /// When set, only non-directories matching one of these globs are kept.
    pub fn matching<S: AsRef<str>>(mut self, globs: &[S]) -> Result<Self, ListError> {
        self.matches = compile(globs)?;
        Ok(self)
    }

    pub fn only_dirs(mut self, only_dirs: bool) -> Self {
        self.only_dirs = only_dirs;
        self
    }

    pub fn no_dirs(mut self, no_dirs: bool) -> Self {
        self.no_dirs = no_dirs;
        self
    }

    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    /// Cheap check on the bare name. Rejected names are neither listed nor walked.
    pub fn admits_name(&self, name: &str) -> bool {
        if !self.show_hidden && is_hidden_name(name) {
            return false;
        }
        !self.ignore.iter().any(|p| p.matches(name))
    }

    /// Check that needs the entry kind. The collector does not descend into rejected directories.
    pub fn admits_entry(&self, entry: &Entry) -> bool {
        let dir = entry.is_dir_like();
        if self.only_dirs && !dir {
            return false;
        }
        if self.no_dirs && dir {
            return false;
        }
        if !dir && !self.matches.is_empty() {
            return self.matches.iter().any(|p| p.matches(entry.name()));
        }
        true
    }
}

fn compile<S: AsRef<str>>(globs: &[S]) -> Result<Vec<Pattern>, ListError> {
    globs
        .iter()
        .map(|g| {
            Pattern::new(g.as_ref()).map_err(|e| ListError::InvalidPattern {
                pattern: g.as_ref().to_string(),
                reason: e.msg.to_string(),
            })
        })
        .collect()
}
