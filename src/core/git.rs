//! Git status augmentation for g.
//!
//! The [GitIndex] runs `git status` once per repository top level and keeps the parsed
//! records. Entries are annotated afterwards by [GitIndex::augment], lookups never spawn
//! processes. Paths outside any repository, or a missing `git` binary, leave every entry
//! at [GitStatus::None].

use crate::core::entry::Entry;
use crate::error::ListError;

use serde::{Deserialize, Serialize};

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Repository-relative status of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitStatus {
    /// Not inside a repository, or git was not queried.
    #[default]
    None,
    Clean,
    Ignored,
    Untracked,
    Staged,
    Modified,
    Conflicted,
}

impl GitStatus {
    /// Maps a porcelain `XY` pair onto a status.
    pub fn from_porcelain(x: u8, y: u8) -> Self {
        match (x, y) {
            (b'?', b'?') => GitStatus::Untracked,
            (b'!', b'!') => GitStatus::Ignored,
            (b'U', _) | (_, b'U') | (b'A', b'A') | (b'D', b'D') => GitStatus::Conflicted,
            (_, b'M' | b'T' | b'D') => GitStatus::Modified,
            (b'M' | b'T' | b'A' | b'D' | b'R' | b'C', _) => GitStatus::Staged,
            _ => GitStatus::Clean,
        }
    }

    /// Priority used when a directory aggregates the status of its children.
    fn rank(self) -> u8 {
        match self {
            GitStatus::None => 0,
            GitStatus::Clean => 1,
            GitStatus::Ignored => 2,
            GitStatus::Untracked => 3,
            GitStatus::Staged => 4,
            GitStatus::Modified => 5,
            GitStatus::Conflicted => 6,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            GitStatus::None => " ",
            GitStatus::Clean => "-",
            GitStatus::Ignored => "!",
            GitStatus::Untracked => "?",
            GitStatus::Staged => "S",
            GitStatus::Modified => "M",
            GitStatus::Conflicted => "U",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GitStatus::None => "none",
            GitStatus::Clean => "clean",
            GitStatus::Ignored => "ignored",
            GitStatus::Untracked => "untracked",
            GitStatus::Staged => "staged",
            GitStatus::Modified => "modified",
            GitStatus::Conflicted => "conflicted",
        }
    }
}

/// Branch and work tree state of a repository, shown next to its top-level directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoHead {
    /// `None` on a detached HEAD.
    pub branch: Option<String>,
    pub dirty: bool,
}

impl RepoHead {
    /// `+` for a clean work tree, `|` for a dirty one.
    pub fn status_symbol(&self) -> &'static str {
        if self.dirty { "|" } else { "+" }
    }

    /// Reads branch and state of `dir` if it is the top level of a repository.
    pub fn query(git: &Path, dir: &Path) -> Option<RepoHead> {
        // top levels carry a .git entry, anything else is skipped without spawning git
        if !dir.join(".git").exists() {
            return None;
        }
        let dirty = match run_git(git, dir, &["status", "--porcelain"]) {
            Ok(out) => !out.is_empty(),
            Err(e) => {
                tracing::debug!("git status failed in {}: {}", dir.display(), e);
                return None;
            }
        };
        let branch = run_git(git, dir, &["branch", "--show-current"])
            .ok()
            .map(|out| String::from_utf8_lossy(&out).trim().to_string())
            .filter(|b| !b.is_empty());
        Some(RepoHead { branch, dirty })
    }
}

/// Attaches a [RepoHead] to every directory that is a repository top level.
pub fn annotate_repos(entries: Vec<Entry>) -> Vec<Entry> {
    let git = match which::which("git") {
        Ok(git) => git,
        Err(e) => {
            tracing::debug!("git not found in PATH, skipping repository heads: {}", e);
            return entries;
        }
    };
    entries
        .into_iter()
        .map(|entry| {
            if !entry.is_dir_like() {
                return entry;
            }
            match RepoHead::query(&git, entry.path()) {
                Some(head) => entry.with_repo(head),
                None => entry,
            }
        })
        .collect()
}

/// The parsed `git status` of one repository.
#[derive(Debug, Clone)]
pub struct RepoStatus {
    root: PathBuf,
    records: Vec<(String, GitStatus)>,
}

impl RepoStatus {
    pub fn new(root: PathBuf, records: Vec<(String, GitStatus)>) -> Self {
        RepoStatus { root, records }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Status of a repository-relative path (`/` separated, empty for the root itself).
    pub fn lookup(&self, rel: &str) -> GitStatus {
        let mut best = GitStatus::Clean;
        for (path, status) in &self.records {
            match status {
                GitStatus::Ignored | GitStatus::Untracked if is_same_or_inside(rel, path) => {
                    return *status;
                }
                // ignored children do not dirty their directory
                GitStatus::Ignored => {}
                _ if is_same_or_inside(path, rel) && status.rank() > best.rank() => {
                    best = *status;
                }
                _ => {}
            }
        }
        best
    }
}

/// True if `child` equals `parent` or lies below it.
fn is_same_or_inside(child: &str, parent: &str) -> bool {
    if parent.is_empty() || child == parent {
        return true;
    }
    child
        .strip_prefix(parent)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Parses the output of `git status --porcelain -z`.
///
/// Renames and copies carry the original path as an extra record which is skipped,
/// the entry is filed under its new name.
pub fn parse_porcelain(out: &[u8]) -> Vec<(String, GitStatus)> {
    let mut records = Vec::new();
    let mut fields = out.split(|b| *b == 0);
    while let Some(field) = fields.next() {
        if field.len() < 4 {
            continue;
        }
        let (x, y) = (field[0], field[1]);
        let path = String::from_utf8_lossy(&field[3..])
            .trim_end_matches('/')
            .to_string();
        if matches!(x, b'R' | b'C') || matches!(y, b'R' | b'C') {
            fields.next();
        }
        records.push((path, GitStatus::from_porcelain(x, y)));
    }
    records
}

/// Status records for every repository touched by a listing.
#[derive(Debug, Default)]
pub struct GitIndex {
    repos: Vec<RepoStatus>,
}

impl GitIndex {
    pub fn from_repos(mut repos: Vec<RepoStatus>) -> Self {
        // longest root first so nested repositories win
        repos.sort_by_key(|r| std::cmp::Reverse(r.root.as_os_str().len()));
        GitIndex { repos }
    }

    /// Queries the repositories containing `dirs`. One `git status` per top level.
    pub fn query(dirs: &[PathBuf]) -> Self {
        let git = match which::which("git") {
            Ok(git) => git,
            Err(e) => {
                tracing::debug!("git not found in PATH, skipping status: {}", e);
                return GitIndex::default();
            }
        };

        let mut roots = HashSet::new();
        for dir in dirs {
            match top_level(&git, dir) {
                Ok(Some(root)) => {
                    roots.insert(root);
                }
                Ok(None) => {
                    let err = ListError::NotARepository { path: dir.clone() };
                    tracing::debug!("{}", err);
                }
                Err(e) => tracing::debug!("git rev-parse failed in {}: {}", dir.display(), e),
            }
        }

        let mut repos = Vec::with_capacity(roots.len());
        for root in roots {
            match status(&git, &root) {
                Ok(records) => {
                    tracing::debug!("{} status records in {}", records.len(), root.display());
                    repos.push(RepoStatus::new(root, records));
                }
                Err(e) => tracing::debug!("git status failed in {}: {}", root.display(), e),
            }
        }
        GitIndex::from_repos(repos)
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    /// Status of an absolute, symlink-resolved path.
    pub fn status_of(&self, path: &Path) -> GitStatus {
        for repo in &self.repos {
            if let Ok(rel) = path.strip_prefix(&repo.root) {
                return repo.lookup(&relative_key(rel));
            }
        }
        GitStatus::None
    }

    /// Attaches a status to every entry. Parent directories are resolved once each.
    pub fn augment(&self, entries: Vec<Entry>) -> Vec<Entry> {
        if self.is_empty() {
            return entries;
        }
        let mut resolved_dirs: HashMap<PathBuf, Option<PathBuf>> = HashMap::new();
        entries
            .into_iter()
            .map(|entry| {
                let status = resolve_entry_path(&entry, &mut resolved_dirs)
                    .map(|p| self.status_of(&p))
                    .unwrap_or_default();
                entry.with_git(status)
            })
            .collect()
    }
}

/// Joins the canonical parent directory with the entry's own file name,
/// the entry itself is not canonicalized so links keep their own status.
fn resolve_entry_path(
    entry: &Entry,
    cache: &mut HashMap<PathBuf, Option<PathBuf>>,
) -> Option<PathBuf> {
    let path = entry.path();
    let Some(file_name) = path.file_name() else {
        return path.canonicalize().ok();
    };
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let canonical = cache
        .entry(parent)
        .or_insert_with_key(|p| p.canonicalize().ok());
    canonical.as_ref().map(|dir| dir.join(file_name))
}

fn relative_key(rel: &Path) -> String {
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    parts.join("/")
}

fn top_level(git: &Path, dir: &Path) -> io::Result<Option<PathBuf>> {
    let output = Command::new(git)
        .arg("-C")
        .arg(dir)
        .args(["rev-parse", "--show-toplevel"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()?;
    if !output.status.success() {
        return Ok(None);
    }
    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if root.is_empty() {
        return Ok(None);
    }
    let root = PathBuf::from(root);
    Ok(Some(root.canonicalize().unwrap_or(root)))
}

fn status(git: &Path, root: &Path) -> io::Result<Vec<(String, GitStatus)>> {
    let out = run_git(git, root, &["status", "--porcelain", "-z", "--ignored"])?;
    Ok(parse_porcelain(&out))
}

/// Runs a git subcommand in `dir` and returns its stdout.
fn run_git(git: &Path, dir: &Path, args: &[&str]) -> io::Result<Vec<u8>> {
    let output = Command::new(git)
        .arg("-C")
        .arg(dir)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()?;
    if !output.status.success() {
        return Err(io::Error::other(format!(
            "git {} exited with {}",
            args.first().copied().unwrap_or_default(),
            output.status
        )));
    }
    Ok(output.stdout)
}
