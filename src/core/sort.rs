//! Sorting of entries for g.
//!
//! The [Sorter] orders entries by a [SortSpec]. The resulting order is total: every key
//! falls back to the full path, so sorting is deterministic and idempotent no matter how
//! the collector produced the entries.

use crate::core::entry::Entry;

use clap::ValueEnum;
use serde::Deserialize;

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    /// Version aware name sort, `file2` before `file10`.
    #[value(alias = "version")]
    #[serde(alias = "version")]
    Natural,
    Size,
    #[value(aliases = ["time", "mtime"])]
    #[serde(alias = "time")]
    Modified,
    #[value(alias = "ext")]
    #[serde(alias = "ext")]
    Extension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub reverse: bool,
    pub dirs_first: bool,
    pub case_insensitive: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec {
            key: SortKey::Name,
            reverse: false,
            dirs_first: true,
            case_insensitive: true,
        }
    }
}

/// Comparator over [Entry] built from a [SortSpec].
#[derive(Debug, Clone, Copy)]
pub struct Sorter {
    spec: SortSpec,
}

impl Sorter {
    pub fn new(spec: SortSpec) -> Self {
        Sorter { spec }
    }

    /// Sorts the given entries in place.
    pub fn sort_entries(&self, entries: &mut [Entry]) {
        entries.sort_by(|a, b| self.compare(a, b));
    }

    pub fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
        if self.spec.dirs_first {
            match (a.is_dir_like(), b.is_dir_like()) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
        }

        let by_key = self.compare_key(a, b);
        let by_key = if self.spec.reverse {
            by_key.reverse()
        } else {
            by_key
        };
        by_key.then_with(|| a.path().cmp(b.path()))
    }

    fn compare_key(&self, a: &Entry, b: &Entry) -> Ordering {
        let ci = self.spec.case_insensitive;
        match self.spec.key {
            SortKey::Name => compare_names(a.name(), b.name(), ci),
            SortKey::Natural => natural_cmp(a.name(), b.name(), ci),
            SortKey::Size => a.size().cmp(&b.size()),
            SortKey::Modified => a.modified().cmp(&b.modified()),
            SortKey::Extension => a
                .extension()
                .cmp(&b.extension())
                .then_with(|| compare_names(a.name(), b.name(), ci)),
        }
    }
}

/// Plain name comparison. Case insensitive compares lowercased first and raw text second.
pub fn compare_names(a: &str, b: &str, case_insensitive: bool) -> Ordering {
    if case_insensitive {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    } else {
        a.cmp(b)
    }
}

/// Natural (version) comparison.
///
/// Names are split into alternating text and digit runs. Digit runs compare by numeric
/// value without parsing, so arbitrarily long runs work. Equal values with more leading
/// zeros sort later. A digit run sorts before a text run at the same position.
pub fn natural_cmp(a: &str, b: &str, case_insensitive: bool) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => {
                let ord = match (ca.is_ascii_digit(), cb.is_ascii_digit()) {
                    (true, true) => {
                        compare_digit_runs(&take_run(&mut ai, true), &take_run(&mut bi, true))
                    }
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    (false, false) => compare_names(
                        &take_run(&mut ai, false),
                        &take_run(&mut bi, false),
                        case_insensitive,
                    ),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }

    // same runs modulo case or zeros, fall back to a plain comparison
    compare_names(a, b, case_insensitive)
}

fn take_run(chars: &mut Peekable<Chars<'_>>, digits: bool) -> String {
    let mut run = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() != digits {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
        .then_with(|| a.len().cmp(&b.len()))
}
