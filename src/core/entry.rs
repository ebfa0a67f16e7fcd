//! Filesystem entries for g.
//!
//! Provides the [Entry] struct which flows through the whole listing pipeline.
//! Entries are created by [inspect] during collection and are immutable afterwards,
//! the git augmenter attaches its status through [Entry::with_git] which consumes the entry.

use crate::core::git::{GitStatus, RepoHead};
use crate::core::mime;
use crate::core::owner::OwnerNames;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The coarse type of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

impl EntryKind {
    pub fn from_metadata(md: &Metadata) -> Self {
        let ft = md.file_type();
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Symlink => "symlink",
            EntryKind::Other => "other",
        }
    }
}

/// Which timestamp a time column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeType {
    #[value(aliases = ["mod", "mtime"])]
    Modified,
    #[value(aliases = ["access", "ac", "atime"])]
    Accessed,
    /// Status change time, `ctime`.
    #[value(aliases = ["change", "create", "cr", "ctime"])]
    Changed,
    /// Creation time, where the filesystem records one.
    #[value(aliases = ["birth", "btime"])]
    Created,
}

impl TimeType {
    pub const ALL: [TimeType; 4] = [
        TimeType::Modified,
        TimeType::Accessed,
        TimeType::Changed,
        TimeType::Created,
    ];

    pub fn header(self) -> &'static str {
        match self {
            TimeType::Modified => "Modified",
            TimeType::Accessed => "Accessed",
            TimeType::Changed => "Changed",
            TimeType::Created => "Created",
        }
    }
}

/// Symlink details: the target as stored in the link and the kind it resolves to.
/// `resolved` is `None` for broken links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    target: PathBuf,
    resolved: Option<EntryKind>,
}

impl LinkInfo {
    pub fn new(target: PathBuf, resolved: Option<EntryKind>) -> Self {
        LinkInfo { target, resolved }
    }

    #[inline]
    pub fn target(&self) -> &Path {
        &self.target
    }

    #[inline]
    pub fn resolved(&self) -> Option<EntryKind> {
        self.resolved
    }

    #[inline]
    pub fn is_broken(&self) -> bool {
        self.resolved.is_none()
    }
}

/// Options that change how much metadata [inspect] gathers.
#[derive(Debug, Clone, Copy, Default)]
pub struct InspectOptions {
    pub dereference: bool,
    pub mime: bool,
    pub owners: bool,
}

/// Where an entry sits relative to the listed root.
#[derive(Debug, Clone, Default)]
pub struct Placement {
    pub depth: usize,
    pub parent: Option<PathBuf>,
}

/// One filesystem object discovered during a listing pass.
#[derive(Debug, Clone)]
pub struct Entry {
    path: PathBuf,
    name: String,
    kind: EntryKind,
    flags: u8,
    size: u64,
    modified: Option<SystemTime>,
    accessed: Option<SystemTime>,
    changed: Option<SystemTime>,
    created: Option<SystemTime>,
    inode: u64,
    mode: u32,
    uid: u32,
    gid: u32,
    owner: Option<String>,
    group: Option<String>,
    link: Option<LinkInfo>,
    mime: Option<String>,
    git: GitStatus,
    repo: Option<RepoHead>,
    depth: usize,
    parent: Option<PathBuf>,
}

impl Entry {
    // Flag bit definitions
    pub(crate) const IS_HIDDEN: u8 = 1 << 0;
    pub(crate) const IS_EXECUTABLE: u8 = 1 << 1;
    /// Directory size is the recursive total of its contents.
    pub(crate) const SIZE_MEASURED: u8 = 1 << 2;

    #[cfg(unix)]
    const EXEC_FLAG: u32 = 0o111;

    /// Builds a bare entry without touching the filesystem.
    /// The name is the last path component.
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind, size: u64) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mut flags = 0;
        if is_hidden_name(&name) {
            flags |= Self::IS_HIDDEN;
        }
        let mode = match kind {
            EntryKind::Directory => 0o040755,
            EntryKind::Symlink => 0o120777,
            _ => 0o100644,
        };
        Entry {
            path,
            name,
            kind,
            flags,
            size,
            modified: None,
            accessed: None,
            changed: None,
            created: None,
            inode: 0,
            mode,
            uid: 0,
            gid: 0,
            owner: None,
            group: None,
            link: None,
            mime: None,
            git: GitStatus::None,
            repo: None,
            depth: 0,
            parent: None,
        }
    }

    pub fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        if mode & 0o111 != 0 && self.kind == EntryKind::File {
            self.flags |= Self::IS_EXECUTABLE;
        }
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.depth = placement.depth;
        self.parent = placement.parent;
        self
    }

    /// Replaces the display name. Arguments keep the spelling they were given with,
    /// so only the last component decides whether the entry is hidden.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        let hidden = Path::new(&self.name)
            .file_name()
            .is_some_and(|n| is_hidden_name(&n.to_string_lossy()));
        if hidden {
            self.flags |= Self::IS_HIDDEN;
        } else {
            self.flags &= !Self::IS_HIDDEN;
        }
        self
    }

    /// Attaches a git status. Used by the augmenter once the status index is ready.
    pub fn with_git(mut self, git: GitStatus) -> Self {
        self.git = git;
        self
    }

    /// Marks a directory as the top level of a repository.
    pub fn with_repo(mut self, repo: RepoHead) -> Self {
        self.repo = Some(repo);
        self
    }

    /// Replaces the size of a directory with the total of everything below it.
    pub fn with_dir_size(mut self, size: u64) -> Self {
        self.size = size;
        self.flags |= Self::SIZE_MEASURED;
        self
    }

    // Accessors

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    #[inline]
    pub fn accessed(&self) -> Option<SystemTime> {
        self.accessed
    }

    #[inline]
    pub fn changed(&self) -> Option<SystemTime> {
        self.changed
    }

    #[inline]
    pub fn created(&self) -> Option<SystemTime> {
        self.created
    }

    /// The timestamp a time column of `kind` shows.
    pub fn time(&self, kind: TimeType) -> Option<SystemTime> {
        match kind {
            TimeType::Modified => self.modified,
            TimeType::Accessed => self.accessed,
            TimeType::Changed => self.changed,
            TimeType::Created => self.created,
        }
    }

    #[inline]
    pub fn inode(&self) -> u64 {
        self.inode
    }

    #[inline]
    pub fn mode(&self) -> u32 {
        self.mode
    }

    #[inline]
    pub fn uid(&self) -> u32 {
        self.uid
    }

    #[inline]
    pub fn gid(&self) -> u32 {
        self.gid
    }

    #[inline]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    #[inline]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    #[inline]
    pub fn link(&self) -> Option<&LinkInfo> {
        self.link.as_ref()
    }

    #[inline]
    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    #[inline]
    pub fn git(&self) -> GitStatus {
        self.git
    }

    #[inline]
    pub fn repo(&self) -> Option<&RepoHead> {
        self.repo.as_ref()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn parent(&self) -> Option<&Path> {
        self.parent.as_deref()
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// True for directories and for symlinks resolving to a directory.
    #[inline]
    pub fn is_dir_like(&self) -> bool {
        self.is_dir()
            || self
                .link
                .as_ref()
                .is_some_and(|l| l.resolved == Some(EntryKind::Directory))
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.link.is_some()
    }

    #[inline]
    pub fn is_broken_link(&self) -> bool {
        self.link.as_ref().is_some_and(LinkInfo::is_broken)
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.flags & Self::IS_HIDDEN != 0
    }

    #[inline]
    pub fn is_executable(&self) -> bool {
        self.flags & Self::IS_EXECUTABLE != 0
    }

    #[inline]
    pub fn has_measured_size(&self) -> bool {
        self.flags & Self::SIZE_MEASURED != 0
    }

    /// Lowercased extension, `None` for names without one and for dotfiles like `.bashrc`.
    pub fn extension(&self) -> Option<String> {
        let name = self.name.as_str();
        match name.rfind('.') {
            Some(idx) if idx > 0 && idx < name.len() - 1 => {
                Some(name[idx + 1..].to_ascii_lowercase())
            }
            _ => None,
        }
    }
}

/// Names starting with a dot are hidden.
#[inline]
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Reads the metadata of `path` and builds an [Entry] from it.
///
/// Uses link metadata first. For symlinks the target is read and resolved,
/// with `dereference` set the size, times and mode of the target are used.
pub fn inspect(
    path: &Path,
    name: String,
    placement: Placement,
    opts: &InspectOptions,
    owners: &OwnerNames,
) -> io::Result<Entry> {
    let link_md = fs::symlink_metadata(path)?;
    let mut kind = EntryKind::from_metadata(&link_md);

    let mut link = None;
    let mut md = link_md;
    if kind == EntryKind::Symlink {
        let target = fs::read_link(path).unwrap_or_default();
        match fs::metadata(path) {
            Ok(target_md) => {
                let resolved = EntryKind::from_metadata(&target_md);
                link = Some(LinkInfo::new(target, Some(resolved)));
                if opts.dereference {
                    kind = resolved;
                    md = target_md;
                }
            }
            Err(_) => link = Some(LinkInfo::new(target, None)),
        }
    }
    if opts.dereference && kind != EntryKind::Symlink {
        // a followed link is listed as what it points at
        link = None;
    }

    let mut entry = Entry::new(path, kind, md.len())
        .with_name(name)
        .with_placement(placement);
    entry.link = link;
    entry.modified = md.modified().ok();
    entry.accessed = md.accessed().ok();
    entry.created = md.created().ok();
    fill_platform_fields(&mut entry, &md);

    if opts.owners {
        entry.owner = owners.user(entry.uid);
        entry.group = owners.group(entry.gid);
    }
    if opts.mime {
        entry.mime = Some(mime::detect(path, kind));
    }
    Ok(entry)
}

#[cfg(unix)]
fn fill_platform_fields(entry: &mut Entry, md: &Metadata) {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    entry.mode = md.mode();
    entry.inode = md.ino();
    entry.uid = md.uid();
    entry.gid = md.gid();
    entry.changed = if md.ctime() >= 0 {
        Some(UNIX_EPOCH + Duration::new(md.ctime() as u64, md.ctime_nsec() as u32))
    } else {
        None
    };
    if entry.kind == EntryKind::File && md.mode() & Entry::EXEC_FLAG != 0 {
        entry.flags |= Entry::IS_EXECUTABLE;
    }
}

#[cfg(not(unix))]
fn fill_platform_fields(entry: &mut Entry, md: &Metadata) {
    let base = match entry.kind {
        EntryKind::Directory => 0o040755,
        EntryKind::Symlink => 0o120777,
        _ => 0o100644,
    };
    entry.mode = if md.permissions().readonly() {
        base & !0o222
    } else {
        base
    };
    if entry.kind == EntryKind::File
        && let Some(ext) = entry.extension()
        && matches!(ext.as_str(), "exe" | "com" | "bat" | "cmd" | "ps1")
    {
        entry.flags |= Entry::IS_EXECUTABLE;
    }
}
