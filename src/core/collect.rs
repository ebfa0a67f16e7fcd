//! Metadata collection for g.
//!
//! Walks the requested roots and turns them into [Section]s of [Entry] values.
//! Recursive walks run on a small pool of worker threads: every directory is a
//! [DirTask] sent over a channel and every worker answers with a [DirResult].
//! The coordinating thread owns the bookkeeping (outstanding tasks, visited
//! directories, errors) so workers never share mutable state.
//!
//! Collection order is whatever the workers produce; the sort engine restores order later.
//! Once the [Interrupt] is set no further directory is read, the entries gathered so far
//! are returned as they are.

use crate::core::entry::{Entry, InspectOptions, Placement, inspect};
use crate::core::filter::EntryFilter;
use crate::core::owner::OwnerNames;
use crate::error::ListError;
use crate::utils::Interrupt;

use crossbeam_channel::{Receiver, Sender, unbounded};

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

/// Upper bound for the default worker count.
const MAX_DEFAULT_THREADS: usize = 8;

/// Default worker count: the available parallelism, capped.
pub fn default_threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get().min(MAX_DEFAULT_THREADS))
        .unwrap_or(4)
}

/// How the collector walks and what it keeps.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub filter: EntryFilter,
    /// Number of directory levels to list, `1` lists direct children only.
    pub max_levels: usize,
    /// List directory arguments themselves instead of their contents.
    pub list_dirs: bool,
    pub inspect: InspectOptions,
    pub threads: usize,
    pub interrupt: Interrupt,
}

impl Default for CollectOptions {
    fn default() -> Self {
        CollectOptions {
            filter: EntryFilter::default(),
            max_levels: 1,
            list_dirs: false,
            inspect: InspectOptions::default(),
            threads: default_threads(),
            interrupt: Interrupt::new(),
        }
    }
}

/// A group of entries listed together. `root` is `None` for the group of file arguments.
#[derive(Debug, Clone)]
pub struct Section {
    root: Option<PathBuf>,
    entries: Vec<Entry>,
}

impl Section {
    pub fn new(root: Option<PathBuf>, entries: Vec<Entry>) -> Self {
        Section { root, entries }
    }

    #[inline]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    pub fn entries_mut(&mut self) -> &mut Vec<Entry> {
        &mut self.entries
    }

    /// Splits a recursive section into one section per directory, depth first, the way
    /// `ls -R` prints them. Entries must already be sorted, their order is kept.
    pub fn into_directory_sections(self) -> Vec<Section> {
        let Some(root) = self.root else {
            return vec![Section::new(None, self.entries)];
        };

        let mut children: HashMap<PathBuf, Vec<Entry>> = HashMap::new();
        let mut order: Vec<PathBuf> = Vec::new();
        for entry in self.entries {
            let parent = entry
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.clone());
            if !children.contains_key(&parent) {
                order.push(parent.clone());
            }
            children.entry(parent).or_default().push(entry);
        }

        let mut out = Vec::with_capacity(children.len().max(1));
        let mut stack = vec![root];
        while let Some(dir) = stack.pop() {
            let entries = children.remove(&dir).unwrap_or_default();
            let subdirs: Vec<PathBuf> = entries
                .iter()
                .filter(|e| e.is_dir() && children.contains_key(e.path()))
                .map(|e| e.path().to_path_buf())
                .collect();
            out.push(Section::new(Some(dir), entries));
            // reversed so the first subdirectory is popped first
            stack.extend(subdirs.into_iter().rev());
        }

        // directories whose own entry was filtered out
        for dir in order {
            if let Some(entries) = children.remove(&dir) {
                out.push(Section::new(Some(dir), entries));
            }
        }
        out
    }
}

/// A per-path failure. `argument` marks paths given on the command line.
#[derive(Debug)]
pub struct PathFailure {
    pub error: ListError,
    pub argument: bool,
}

/// Everything one collection pass produced.
#[derive(Debug, Default)]
pub struct Collection {
    pub sections: Vec<Section>,
    pub failures: Vec<PathFailure>,
}

/// One directory to read.
struct DirTask {
    dir: PathBuf,
    depth: usize,
}

/// Entries of one directory, plus the subdirectories that should be walked next.
struct DirResult {
    dir: PathBuf,
    entries: Vec<Entry>,
    subdirs: Vec<PathBuf>,
    depth: usize,
    errors: Vec<ListError>,
}

/// Collects the given roots.
///
/// Never fails as a whole: unreadable paths end up in [Collection::failures] and
/// the remaining roots are still listed.
pub fn collect(roots: &[PathBuf], opts: &CollectOptions) -> Collection {
    let owners = OwnerNames::new();
    let mut collection = Collection::default();
    let mut files = Vec::new();

    for root in roots {
        if opts.interrupt.is_set() {
            tracing::debug!("interrupted, {} skipped", root.display());
            break;
        }
        let display = root.display().to_string();
        let md = match fs::symlink_metadata(root) {
            Ok(md) => md,
            Err(e) => {
                collection.failures.push(PathFailure {
                    error: ListError::from_io(root, e),
                    argument: true,
                });
                continue;
            }
        };

        // arguments that are links to directories are listed through, like ls does
        let is_dir = md.is_dir()
            || (md.file_type().is_symlink() && fs::metadata(root).is_ok_and(|m| m.is_dir()));

        if is_dir && !opts.list_dirs {
            let (entries, failures) = walk(root, opts, &owners);
            collection.failures.extend(failures);
            collection
                .sections
                .push(Section::new(Some(root.clone()), entries));
            continue;
        }

        match inspect(root, display, Placement::default(), &opts.inspect, &owners) {
            Ok(entry) => files.push(entry),
            Err(e) => collection.failures.push(PathFailure {
                error: ListError::from_io(root, e),
                argument: true,
            }),
        }
    }

    if !files.is_empty() {
        collection.sections.insert(0, Section::new(None, files));
    }
    collection
}

/// Walks one directory root. Flat listings are read inline, recursive ones go through the pool.
fn walk(root: &Path, opts: &CollectOptions, owners: &OwnerNames) -> (Vec<Entry>, Vec<PathFailure>) {
    let first = DirTask {
        dir: root.to_path_buf(),
        depth: 0,
    };

    if opts.max_levels <= 1 || opts.threads <= 1 {
        return walk_inline(root, first, opts, owners);
    }

    let (task_tx, task_rx) = unbounded::<DirTask>();
    let (res_tx, res_rx) = unbounded::<DirResult>();

    thread::scope(|scope| {
        for _ in 0..opts.threads {
            let task_rx = task_rx.clone();
            let res_tx = res_tx.clone();
            scope.spawn(move || start_dir_worker(task_rx, res_tx, opts, owners));
        }
        drop(task_rx);
        drop(res_tx);

        let mut state = WalkState::new(root, opts);
        let mut outstanding = 0usize;
        if task_tx.send(first).is_ok() {
            outstanding += 1;
        }

        while outstanding > 0 {
            let Ok(result) = res_rx.recv() else {
                break;
            };
            outstanding -= 1;
            let tasks = state.absorb(result);
            if opts.interrupt.is_set() {
                continue;
            }
            for task in tasks {
                if task_tx.send(task).is_ok() {
                    outstanding += 1;
                }
            }
        }

        // closing the task channel lets the workers exit before the scope joins them
        drop(task_tx);
        state.finish()
    })
}

fn walk_inline(
    root: &Path,
    first: DirTask,
    opts: &CollectOptions,
    owners: &OwnerNames,
) -> (Vec<Entry>, Vec<PathFailure>) {
    let mut state = WalkState::new(root, opts);
    let mut queue = vec![first];
    while let Some(task) = queue.pop() {
        if opts.interrupt.is_set() {
            break;
        }
        let result = read_dir_task(task, opts, owners);
        queue.extend(state.absorb(result));
    }
    state.finish()
}

/// Worker loop: reads directories until the task channel closes.
fn start_dir_worker(
    task_rx: Receiver<DirTask>,
    res_tx: Sender<DirResult>,
    opts: &CollectOptions,
    owners: &OwnerNames,
) {
    while let Ok(task) = task_rx.recv() {
        let result = read_dir_task(task, opts, owners);
        if res_tx.send(result).is_err() {
            break;
        }
    }
}

/// Coordinator bookkeeping for one root.
struct WalkState<'a> {
    root: &'a Path,
    opts: &'a CollectOptions,
    entries: Vec<Entry>,
    failures: Vec<PathFailure>,
    visited: HashSet<PathBuf>,
}

impl<'a> WalkState<'a> {
    fn new(root: &'a Path, opts: &'a CollectOptions) -> Self {
        let mut visited = HashSet::new();
        if let Ok(canonical) = root.canonicalize() {
            visited.insert(canonical);
        }
        WalkState {
            root,
            opts,
            entries: Vec::new(),
            failures: Vec::new(),
            visited,
        }
    }

    /// Merges a result and returns the follow-up tasks.
    fn absorb(&mut self, result: DirResult) -> Vec<DirTask> {
        let argument = result.dir == self.root;
        self.failures
            .extend(result.errors.into_iter().map(|error| PathFailure { error, argument }));
        self.entries.extend(result.entries);

        let mut tasks = Vec::with_capacity(result.subdirs.len());
        for dir in result.subdirs {
            // followed links can loop back to a directory that was already walked
            if self.opts.inspect.dereference
                && let Ok(canonical) = dir.canonicalize()
                && !self.visited.insert(canonical)
            {
                tracing::debug!("skipping already visited {}", dir.display());
                continue;
            }
            tasks.push(DirTask {
                dir,
                depth: result.depth + 1,
            });
        }
        tasks
    }

    fn finish(self) -> (Vec<Entry>, Vec<PathFailure>) {
        (self.entries, self.failures)
    }
}

/// Reads one directory. Name filters run before any metadata is read.
fn read_dir_task(task: DirTask, opts: &CollectOptions, owners: &OwnerNames) -> DirResult {
    let mut result = DirResult {
        dir: task.dir,
        entries: Vec::new(),
        subdirs: Vec::new(),
        depth: task.depth,
        errors: Vec::new(),
    };

    if opts.interrupt.is_set() {
        return result;
    }

    let read = match fs::read_dir(&result.dir) {
        Ok(read) => read,
        Err(e) => {
            result.errors.push(ListError::from_io(&result.dir, e));
            return result;
        }
    };

    for dent in read {
        let dent = match dent {
            Ok(d) => d,
            Err(e) => {
                result.errors.push(ListError::from_io(&result.dir, e));
                continue;
            }
        };
        let name = dent.file_name().to_string_lossy().into_owned();
        if !opts.filter.admits_name(&name) {
            continue;
        }

        let path = dent.path();
        let placement = Placement {
            depth: task.depth,
            parent: Some(result.dir.clone()),
        };
        let entry = match inspect(&path, name, placement, &opts.inspect, owners) {
            Ok(entry) => entry,
            Err(e) => {
                result.errors.push(ListError::from_io(&path, e));
                continue;
            }
        };
        if !opts.filter.admits_entry(&entry) {
            continue;
        }
        if entry.is_dir() && task.depth + 1 < opts.max_levels {
            result.subdirs.push(path);
        }
        result.entries.push(entry);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn names(section: &Section) -> Vec<String> {
        let mut v: Vec<String> = section.entries().iter().map(|e| e.name().to_string()).collect();
        v.sort();
        v
    }

    #[test]
    fn flat_listing_skips_hidden() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        File::create(dir.path().join("visible.txt"))?;
        File::create(dir.path().join(".hidden"))?;

        let collection = collect(&[dir.path().to_path_buf()], &CollectOptions::default());
        assert!(collection.failures.is_empty());
        assert_eq!(collection.sections.len(), 1);
        assert_eq!(names(&collection.sections[0]), ["visible.txt"]);
        Ok(())
    }

    #[test]
    fn recursive_listing_records_depth() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("a/b"))?;
        File::create(dir.path().join("a/b/deep.txt"))?;
        File::create(dir.path().join("top.txt"))?;

        let opts = CollectOptions {
            max_levels: usize::MAX,
            threads: 3,
            ..CollectOptions::default()
        };
        let collection = collect(&[dir.path().to_path_buf()], &opts);
        let section = &collection.sections[0];
        assert_eq!(names(section), ["a", "b", "deep.txt", "top.txt"]);

        let deep = section
            .entries()
            .iter()
            .find(|e| e.name() == "deep.txt")
            .ok_or("deep.txt missing")?;
        assert_eq!(deep.depth(), 2);
        assert_eq!(deep.parent(), Some(dir.path().join("a/b").as_path()));
        Ok(())
    }

    #[test]
    fn depth_limit_stops_descent() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("a/b"))?;
        File::create(dir.path().join("a/b/deep.txt"))?;

        let opts = CollectOptions {
            max_levels: 2,
            ..CollectOptions::default()
        };
        let collection = collect(&[dir.path().to_path_buf()], &opts);
        assert_eq!(names(&collection.sections[0]), ["a", "b"]);
        Ok(())
    }

    #[test]
    fn missing_root_does_not_stop_siblings() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file = dir.path().join("present.txt");
        File::create(&file)?;

        let roots = vec![dir.path().join("missing"), file];
        let collection = collect(&roots, &CollectOptions::default());
        assert_eq!(collection.failures.len(), 1);
        assert!(collection.failures[0].argument);
        assert!(matches!(
            collection.failures[0].error,
            ListError::PathNotFound { .. }
        ));
        // file arguments form a section without a root
        assert_eq!(collection.sections.len(), 1);
        assert!(collection.sections[0].root().is_none());
        Ok(())
    }

    #[test]
    fn list_dirs_lists_the_directory_itself() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        File::create(dir.path().join("inside.txt"))?;
        let opts = CollectOptions {
            list_dirs: true,
            ..CollectOptions::default()
        };
        let collection = collect(&[dir.path().to_path_buf()], &opts);
        let entries = collection.sections[0].entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_dir());
        Ok(())
    }

    #[test]
    fn interrupted_walk_reads_nothing_more() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("a/b"))?;
        File::create(dir.path().join("a/b/deep.txt"))?;

        let opts = CollectOptions {
            max_levels: usize::MAX,
            threads: 2,
            ..CollectOptions::default()
        };
        opts.interrupt.trigger();
        let collection = collect(&[dir.path().to_path_buf(), dir.path().join("a")], &opts);
        assert!(collection.sections.is_empty());
        assert!(collection.failures.is_empty());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn followed_link_loops_are_walked_once() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("a"))?;
        File::create(dir.path().join("a/file"))?;
        std::os::unix::fs::symlink(dir.path(), dir.path().join("a/back"))?;

        let mut opts = CollectOptions {
            max_levels: usize::MAX,
            threads: 2,
            ..CollectOptions::default()
        };
        opts.inspect.dereference = true;
        let collection = collect(&[dir.path().to_path_buf()], &opts);
        assert!(collection.failures.is_empty());
        // a, a/file and the link listed as the directory it points to
        assert_eq!(names(&collection.sections[0]), ["a", "back", "file"]);
        Ok(())
    }

    #[test]
    fn directory_sections_follow_depth_first_order() -> Result<(), Box<dyn std::error::Error>> {
        use crate::core::entry::EntryKind;

        let root = PathBuf::from("r");
        let at = |path: &str, kind, depth, parent: &str| {
            Entry::new(path, kind, 0).with_placement(Placement {
                depth,
                parent: Some(PathBuf::from(parent)),
            })
        };
        let section = Section::new(
            Some(root.clone()),
            vec![
                at("r/a", EntryKind::Directory, 0, "r"),
                at("r/b", EntryKind::Directory, 0, "r"),
                at("r/a/x", EntryKind::File, 1, "r/a"),
                at("r/b/y", EntryKind::File, 1, "r/b"),
            ],
        );
        let roots: Vec<_> = section
            .into_directory_sections()
            .into_iter()
            .map(|s| s.root().map(Path::to_path_buf))
            .collect();
        assert_eq!(
            roots,
            vec![
                Some(root),
                Some(PathBuf::from("r/a")),
                Some(PathBuf::from("r/b")),
            ]
        );
        Ok(())
    }
}
