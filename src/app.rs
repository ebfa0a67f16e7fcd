//! The listing pipeline of g.
//!
//! One call to [run] is one pass: collect metadata while git is queried on a second
//! thread, attach git status and repository heads, measure directories, sort, render,
//! then report per-path errors on stderr. An interrupt ends the pass early with
//! whatever was already rendered.

use crate::config::{ListingRequest, Theme};
use crate::core::summary::{self, Statistics, Summary};
use crate::core::git::annotate_repos;
use crate::core::{Collection, GitIndex, Section, Sorter, collect};
use crate::layout::{LayoutKind, Listing, RenderContext, layout_for};
use crate::utils::terminal_width;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

/// Everything was listed.
pub const EXIT_OK: u8 = 0;
/// Something below a listed directory could not be read.
pub const EXIT_MINOR: u8 = 1;
/// A command line path could not be accessed, or startup failed.
pub const EXIT_FATAL: u8 = 2;
/// The pass was stopped by SIGINT or SIGTERM.
pub const EXIT_INTERRUPTED: u8 = 130;

/// Runs one listing pass and returns the exit code.
///
/// Listing output goes to `out`, error messages to `err`. Only write failures are
/// returned as errors, unreadable paths are reported and reflected in the exit code.
pub fn run(
    request: &ListingRequest,
    theme: &Theme,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<u8> {
    let started = Instant::now();
    let opts = request.collect_options();
    let repos = request.columns.repo_status || request.columns.repo_branch;

    let (collection, git) = thread::scope(|scope| {
        let git = request.columns.git.then(|| {
            let dirs = git_dirs(&request.paths);
            scope.spawn(move || GitIndex::query(&dirs))
        });
        let collection = collect(&request.paths, &opts);
        let git = match git.map(|handle| handle.join()) {
            Some(Ok(index)) => index,
            Some(Err(_)) => {
                tracing::warn!("git status query failed, continuing without it");
                GitIndex::default()
            }
            None => GitIndex::default(),
        };
        (collection, git)
    });

    let Collection { sections, failures } = collection;
    let sorter = Sorter::new(request.sort);
    let mut sections: Vec<Section> = sections
        .into_iter()
        .map(|mut section| {
            let mut entries = git.augment(std::mem::take(section.entries_mut()));
            if repos {
                entries = annotate_repos(entries);
            }
            if request.recursive_size {
                entries = summary::measure_dirs(entries, &request.interrupt);
            }
            *section.entries_mut() = entries;
            sorter.sort_entries(section.entries_mut());
            section
        })
        .collect();

    let split = request.is_recursive() && request.layout.splits_sections();
    if split {
        sections = sections
            .into_iter()
            .flat_map(Section::into_directory_sections)
            .collect();
    }

    let listed = || sections.iter().flat_map(|s| s.entries().iter());
    let totals = Summary {
        // nested entries are listed themselves, so measured directories would count twice
        total_size: request
            .total_size
            .then(|| summary::total_size(listed(), !request.is_recursive())),
        statistic: request.statistic.then(|| Statistics::count(listed())),
        elapsed: request.statistic.then(|| started.elapsed()),
    };

    let exit = if failures.iter().any(|f| f.argument) {
        EXIT_FATAL
    } else if failures.is_empty() {
        EXIT_OK
    } else {
        EXIT_MINOR
    };
    let errors: Vec<String> = failures.iter().map(|f| f.error.to_string()).collect();

    let mut ctx = RenderContext::new(theme, terminal_width(request.width));
    ctx.columns = request.columns;
    ctx.decorations = request.decorations;
    ctx.time_format = request.time_format.clone();
    ctx.tree_style = request.tree_style;
    ctx.table_style = request.table_style;
    ctx.titles = request.layout != LayoutKind::Tree && (split || sections.len() > 1);
    ctx.header = request.header;
    ctx.footer = request.footer;
    ctx.interrupt = request.interrupt.clone();

    let listing = Listing {
        sections,
        errors,
        summary: totals,
    };
    tracing::debug!(
        "rendering {} sections with {:?}",
        listing.sections.len(),
        request.layout
    );
    let layout = layout_for(request.layout);
    layout.render(&listing, &ctx, out)?;
    let interrupted = request.interrupt.is_set();
    if interrupted {
        tracing::debug!("interrupted, listing cut short");
    } else {
        layout.render_summary(&listing.summary, &ctx, out)?;
    }
    out.flush()?;

    for message in &listing.errors {
        writeln!(err, "g: {message}")?;
    }
    Ok(if interrupted { EXIT_INTERRUPTED } else { exit })
}

/// Directories whose repositories must be queried: directory arguments themselves,
/// the parent of everything else.
fn git_dirs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = paths
        .iter()
        .map(|p| {
            if p.is_dir() {
                p.clone()
            } else {
                match p.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => Path::new(".").to_path_buf(),
                }
            }
        })
        .collect();
    dirs.sort();
    dirs.dedup();
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn git_dirs_use_parents_of_files() {
        let dirs = git_dirs(&[PathBuf::from("Cargo.toml"), PathBuf::from("src/lib.rs")]);
        assert_eq!(dirs, vec![PathBuf::from("."), PathBuf::from("src")]);
    }
}
