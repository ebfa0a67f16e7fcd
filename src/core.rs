//! Listing engine for g.
//!
//! This module contains the pieces that do not care how the result is printed:
//! - [entry]: the [Entry] model and [inspect] which reads it from the filesystem.
//! - [collect]: walking roots with a worker pool into [Section]s.
//! - [filter]: hidden, glob and kind filters.
//! - [git]: git status query and the augmenter.
//! - [sort]: the sort engine, including natural ordering.
//! - [formatter]: attribute, size and time formatting.
//! - [summary]: statistics, total size and recursive directory sizes.
//! - [owner], [mime]: optional metadata lookups.

pub mod collect;
pub mod entry;
pub mod filter;
pub mod formatter;
pub mod git;
pub mod mime;
pub mod owner;
pub mod sort;
pub mod summary;

pub use collect::{CollectOptions, Collection, PathFailure, Section, collect};
pub use entry::{Entry, EntryKind, InspectOptions, LinkInfo, Placement, TimeType, inspect};
pub use filter::EntryFilter;
pub use git::{GitIndex, GitStatus, RepoHead};
pub use sort::{SortKey, SortSpec, Sorter};
pub use summary::{Statistics, Summary};
