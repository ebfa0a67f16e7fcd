//! Module for mapping entries to Nerd Font icons.
//!
//! Icons are looked up by special directory name, special file name and extension,
//! in that order. Themes may replace any of them through an `icon` field, see
//! [crate::config::Theme].

use crate::core::{Entry, EntryKind};

use phf::phf_map;

/// File extension to icon mapping. Keys are lowercase.
static EXT_ICON_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "rs" => "\u{e7a8}",
    "py" => "\u{e606}",
    "js" => "\u{e74e}",
    "mjs" => "\u{e74e}",
    "ts" => "\u{e628}",
    "tsx" => "\u{e7ba}",
    "jsx" => "\u{e7ba}",
    "md" => "\u{f48a}",
    "html" => "\u{e736}",
    "css" => "\u{e749}",
    "json" => "\u{e60b}",
    "toml" => "\u{e6b2}",
    "yaml" => "\u{e6a8}",
    "yml" => "\u{e6a8}",
    "xml" => "\u{f05c0}",
    "sh" => "\u{f489}",
    "bash" => "\u{f489}",
    "zsh" => "\u{f489}",
    "fish" => "\u{f489}",
    "nu" => "\u{f489}",
    "ps1" => "\u{f489}",
    "go" => "\u{e627}",
    "java" => "\u{e738}",
    "c" => "\u{e61e}",
    "cpp" => "\u{e61d}",
    "h" => "\u{f0fd}",
    "hpp" => "\u{f0fd}",
    "php" => "\u{e73d}",
    "rb" => "\u{e791}",
    "swift" => "\u{e755}",
    "kt" => "\u{e634}",
    "lua" => "\u{e620}",
    "vue" => "\u{e6a0}",
    "sql" => "\u{e706}",
    "nix" => "\u{f313}",
    "lock" => "\u{f023}",
    "exe" => "\u{f013}",
    "zip" => "\u{f410}",
    "tar" => "\u{f410}",
    "gz" => "\u{f410}",
    "xz" => "\u{f410}",
    "7z" => "\u{f410}",
    "mp3" => "\u{f001}",
    "flac" => "\u{f001}",
    "wav" => "\u{f001}",
    "mp4" => "\u{f03d}",
    "mkv" => "\u{f03d}",
    "png" => "\u{f1c5}",
    "jpg" => "\u{f1c5}",
    "jpeg" => "\u{f1c5}",
    "gif" => "\u{f1c5}",
    "svg" => "\u{f1c5}",
    "webp" => "\u{f1c5}",
    "pdf" => "\u{f1c1}",
    "doc" => "\u{f1c2}",
    "docx" => "\u{f1c2}",
    "xls" => "\u{f1c3}",
    "xlsx" => "\u{f1c3}",
    "ppt" => "\u{f1c4}",
    "pptx" => "\u{f1c4}",
    "txt" => "\u{f15c}",
    "log" => "\u{f15c}",
};

/// Special file names, matched exactly.
pub(crate) static SPECIAL_FILE_ICON_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "README.md" => "\u{f48a}",
    "README" => "\u{f48a}",
    "LICENSE" => "\u{f0219}",
    "LICENSE-MIT" => "\u{f0219}",
    "LICENSE-APACHE" => "\u{f0219}",
    "COPYING" => "\u{f0219}",
    "Makefile" => "\u{e673}",
    ".gitignore" => "\u{e702}",
    ".gitattributes" => "\u{e702}",
    ".gitmodules" => "\u{e702}",
    "Cargo.toml" => "\u{e7a8}",
    "Cargo.lock" => "\u{f023}",
    "Dockerfile" => "\u{f308}",
    "package.json" => "\u{e71e}",
    "go.mod" => "\u{e627}",
    "go.sum" => "\u{e627}",
    ".env" => "\u{f462}",
    ".bashrc" => "\u{f489}",
    ".zshrc" => "\u{f489}",
    "CMakeLists.txt" => "\u{e673}",
    "PKGBUILD" => "\u{f303}",
};

/// Special directory names. Keys are lowercase.
pub(crate) static SPECIAL_DIR_ICON_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "bin" => "\u{f471}",
    "lib" => "\u{f1b3}",
    "node_modules" => "\u{e718}",
    ".git" => "\u{e5fb}",
    ".github" => "\u{e5fd}",
    ".config" => "\u{e5fc}",
    "src" => "\u{f08de}",
    "target" => "\u{f0ae5}",
};

const DIR_ICON: &str = "\u{f115}";
const FILE_ICON: &str = "\u{f15b}";
const EXEC_ICON: &str = "\u{f489}";
const LINK_FILE_ICON: &str = "\u{f481}";
const LINK_DIR_ICON: &str = "\u{f482}";
const OTHER_ICON: &str = "\u{f0b5e}";

/// Get the Nerd Font icon for a given entry.
pub(crate) fn nerd_font_icon(entry: &Entry) -> &'static str {
    let name = entry.name();

    if entry.is_symlink() {
        return if entry.is_dir_like() {
            LINK_DIR_ICON
        } else {
            LINK_FILE_ICON
        };
    }

    match entry.kind() {
        EntryKind::Directory => SPECIAL_DIR_ICON_MAP
            .get(name.to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(DIR_ICON),
        EntryKind::Other => OTHER_ICON,
        EntryKind::File | EntryKind::Symlink => {
            if let Some(icon) = SPECIAL_FILE_ICON_MAP.get(name).copied() {
                return icon;
            }
            if let Some(icon) = entry
                .extension()
                .and_then(|ext| EXT_ICON_MAP.get(ext.as_str()).copied())
            {
                return icon;
            }
            if entry.is_executable() {
                EXEC_ICON
            } else {
                FILE_ICON
            }
        }
    }
}
