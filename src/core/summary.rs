//! Listing summaries for g: entry statistics, the total size line and recursive
//! directory sizes.

use crate::core::entry::Entry;
use crate::utils::Interrupt;

use serde::{Deserialize, Serialize};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Counts of the listed entries by kind. Links count as links whatever they point at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub files: u64,
    pub dirs: u64,
    pub links: u64,
}

impl Statistics {
    pub fn count<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut stats = Statistics::default();
        for entry in entries {
            if entry.is_symlink() {
                stats.links += 1;
            } else if entry.is_dir() {
                stats.dirs += 1;
            } else {
                stats.files += 1;
            }
        }
        stats
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s), {} dir(s), {} link(s)",
            self.files, self.dirs, self.links
        )
    }
}

/// Lines printed after the listing. Each part is only present when asked for.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub total_size: Option<u64>,
    pub statistic: Option<Statistics>,
    pub elapsed: Option<Duration>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.total_size.is_none() && self.statistic.is_none()
    }
}

/// Sum of the listed sizes. Directories count only when `with_dirs` is set and their
/// recursive size was measured, so nested listings do not count files twice.
pub fn total_size<'a>(entries: impl IntoIterator<Item = &'a Entry>, with_dirs: bool) -> u64 {
    entries
        .into_iter()
        .filter(|e| !e.is_dir() || (with_dirs && e.has_measured_size()))
        .map(Entry::size)
        .sum()
}

/// Everything below `dir` in bytes. Links are not followed, unreadable directories
/// are skipped.
pub fn dir_size(dir: &Path, interrupt: &Interrupt) -> u64 {
    let mut total = 0;
    let mut stack: Vec<PathBuf> = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        if interrupt.is_set() {
            break;
        }
        let read = match fs::read_dir(&current) {
            Ok(read) => read,
            Err(e) => {
                tracing::debug!("skipping {} while measuring: {}", current.display(), e);
                continue;
            }
        };
        for dent in read.flatten() {
            let Ok(md) = dent.metadata() else {
                continue;
            };
            if md.is_dir() {
                stack.push(dent.path());
            } else {
                total += md.len();
            }
        }
    }
    total
}

/// Gives every directory entry its recursive size.
pub fn measure_dirs(entries: Vec<Entry>, interrupt: &Interrupt) -> Vec<Entry> {
    entries
        .into_iter()
        .map(|entry| {
            if entry.is_dir() && !interrupt.is_set() {
                let size = dir_size(entry.path(), interrupt);
                entry.with_dir_size(size)
            } else {
                entry
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntryKind;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn statistics_by_kind() {
        let entries = [
            Entry::new("a", EntryKind::File, 1),
            Entry::new("b", EntryKind::File, 2),
            Entry::new("d", EntryKind::Directory, 0),
        ];
        let stats = Statistics::count(&entries);
        assert_eq!(stats.to_string(), "2 file(s), 1 dir(s), 0 link(s)");
    }

    #[test]
    fn recursive_size_adds_nested_files() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("a/b"))?;
        File::create(dir.path().join("a/one"))?.write_all(b"123")?;
        File::create(dir.path().join("a/b/two"))?.write_all(b"12345")?;

        assert_eq!(dir_size(&dir.path().join("a"), &Interrupt::new()), 8);

        let measured = measure_dirs(
            vec![Entry::new(dir.path().join("a"), EntryKind::Directory, 4096)],
            &Interrupt::new(),
        );
        assert_eq!(measured[0].size(), 8);
        assert!(measured[0].has_measured_size());
        assert_eq!(total_size(&measured, true), 8);
        assert_eq!(total_size(&measured, false), 0);
        Ok(())
    }
}
