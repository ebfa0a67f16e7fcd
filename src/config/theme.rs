//! Theme configuration for g.
//!
//! A theme maps classifiers (`directory`, `ext:rs`, `git:modified`, ...) to a [Style].
//! The built-in theme is always present, a JSON theme file only overrides the fields it sets.
//!
//! ```json
//! {
//!     "directory": { "color": "bright-blue", "bold": true },
//!     "ext:rs": { "icon": "R", "color": "#dea584" },
//!     "git:modified": { "color": "yellow" }
//! }
//! ```

use crate::core::{Entry, EntryKind, GitStatus};
use crate::error::ListError;
use crate::utils::parse_color;

use crossterm::style::{Attribute, Color, ContentStyle};
use serde::Deserialize;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Classifiers that style whole columns rather than entries.
const COLUMN_CLASSIFIERS: [&str; 12] = [
    "inode",
    "octal",
    "permission",
    "size",
    "owner",
    "group",
    "time",
    "mime",
    "git_repo",
    "git_branch",
    "tree",
    "header",
];

const ENTRY_CLASSIFIERS: [&str; 7] = [
    "directory",
    "file",
    "symlink",
    "broken_symlink",
    "executable",
    "other",
    "hidden",
];

const PREFIXED_CLASSIFIERS: [&str; 4] = ["ext:", "name:", "dir:", "git:"];

/// Style of one classifier. Unset fields inherit from less specific classifiers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    icon: Option<String>,
    color: Option<Color>,
    bold: Option<bool>,
    underline: Option<bool>,
    italic: Option<bool>,
    faint: Option<bool>,
    blink: Option<bool>,
}

impl Style {
    pub fn fg(color: Color) -> Self {
        Style {
            color: Some(color),
            ..Style::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = Some(true);
        self
    }

    #[inline]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    #[inline]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Fields set in `other` replace the ones in `self`.
    pub fn overlay(&mut self, other: &Style) {
        if other.icon.is_some() {
            self.icon = other.icon.clone();
        }
        if other.color.is_some() {
            self.color = other.color;
        }
        let flags = [
            (&mut self.bold, other.bold),
            (&mut self.underline, other.underline),
            (&mut self.italic, other.italic),
            (&mut self.faint, other.faint),
            (&mut self.blink, other.blink),
        ];
        for (mine, theirs) in flags {
            if theirs.is_some() {
                *mine = theirs;
            }
        }
    }

    /// Terminal style for crossterm.
    pub fn content_style(&self) -> ContentStyle {
        let mut style = ContentStyle::new();
        style.foreground_color = self.color.filter(|c| *c != Color::Reset);
        let attributes = [
            (self.bold, Attribute::Bold),
            (self.underline, Attribute::Underlined),
            (self.italic, Attribute::Italic),
            (self.faint, Attribute::Dim),
            (self.blink, Attribute::SlowBlink),
        ];
        for (enabled, attribute) in attributes {
            if enabled == Some(true) {
                style.attributes.set(attribute);
            }
        }
        style
    }
}

/// A style as written in the theme file.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct RawStyle {
    icon: Option<String>,
    color: Option<String>,
    bold: Option<bool>,
    underline: Option<bool>,
    #[serde(alias = "italics")]
    italic: Option<bool>,
    faint: Option<bool>,
    blink: Option<bool>,
}

impl RawStyle {
    fn into_style(self, key: &str) -> Result<Style, String> {
        let color = match self.color {
            Some(c) => Some(parse_color(&c).ok_or_else(|| format!("'{key}': invalid color '{c}'"))?),
            None => None,
        };
        Ok(Style {
            icon: self.icon,
            color,
            bold: self.bold,
            underline: self.underline,
            italic: self.italic,
            faint: self.faint,
            blink: self.blink,
        })
    }
}

/// Theme: classifier to style.
#[derive(Debug, Clone)]
pub struct Theme {
    styles: HashMap<String, Style>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut styles = HashMap::new();
        let mut set = |key: &str, style: Style| {
            styles.insert(key.to_string(), style);
        };

        set("directory", Style::fg(Color::Blue).bold());
        set("symlink", Style::fg(Color::Cyan));
        set("broken_symlink", Style::fg(Color::Red));
        set("executable", Style::fg(Color::Green).bold());
        set("other", Style::fg(Color::Yellow));
        set("hidden", Style::fg(Color::DarkGrey));

        set("inode", Style::fg(Color::DarkMagenta));
        set("octal", Style::fg(Color::DarkCyan));
        set("permission", Style::fg(Color::DarkGrey));
        set("size", Style::fg(Color::DarkGreen));
        set("owner", Style::fg(Color::DarkYellow));
        set("group", Style::fg(Color::DarkYellow));
        set("time", Style::fg(Color::DarkBlue));
        set("mime", Style::fg(Color::DarkMagenta));
        set("git_repo", Style::fg(Color::Yellow));
        set("git_branch", Style::fg(Color::Cyan));
        set("tree", Style::fg(Color::DarkGrey));
        set("header", Style::default().bold().underline());

        set("git:clean", Style::fg(Color::DarkGrey));
        set("git:untracked", Style::fg(Color::Red));
        set("git:ignored", Style::fg(Color::DarkGrey));
        set("git:modified", Style::fg(Color::Yellow));
        set("git:staged", Style::fg(Color::Green));
        set("git:conflicted", Style::fg(Color::Magenta).bold());

        for ext in ["zip", "tar", "gz", "xz", "7z", "bz2", "zst"] {
            set(&format!("ext:{ext}"), Style::fg(Color::Red));
        }
        for ext in ["png", "jpg", "jpeg", "gif", "svg", "webp", "mp3", "mp4", "mkv", "flac"] {
            set(&format!("ext:{ext}"), Style::fg(Color::Magenta));
        }

        Theme { styles }
    }
}

impl Theme {
    /// Built-in theme, created once.
    pub fn internal_defaults() -> &'static Self {
        static DEFAULT: LazyLock<Theme> = LazyLock::new(Theme::default);
        &DEFAULT
    }

    /// Loads a JSON theme file on top of the built-in theme.
    pub fn load(path: &Path) -> Result<Self, ListError> {
        let content = fs::read_to_string(path).map_err(|e| ListError::MalformedTheme {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(path, &content)
    }

    /// Parses theme JSON. `path` is only used for error messages.
    pub fn from_json(path: &Path, content: &str) -> Result<Self, ListError> {
        let malformed = |reason: String| ListError::MalformedTheme {
            path: path.to_path_buf(),
            reason,
        };

        let raw: HashMap<String, RawStyle> =
            serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?;

        let mut theme = Theme::default();
        for (key, raw_style) in raw {
            if !is_known_classifier(&key) {
                return Err(malformed(format!("unknown classifier '{key}'")));
            }
            let style = raw_style.into_style(&key).map_err(malformed)?;
            theme.styles.entry(key).or_default().overlay(&style);
        }
        tracing::debug!("loaded theme {} ({} styles)", path.display(), theme.styles.len());
        Ok(theme)
    }

    pub fn get(&self, classifier: &str) -> Option<&Style> {
        self.styles.get(classifier)
    }

    /// Style for a column classifier such as `size` or `header`.
    pub fn column_style(&self, classifier: &str) -> Style {
        self.get(classifier).cloned().unwrap_or_default()
    }

    pub fn git_style(&self, status: GitStatus) -> Style {
        self.column_style(&format!("git:{}", status.as_str()))
    }

    /// Resolves the style of an entry name, from general to specific:
    /// kind, executable, extension, hidden, then `dir:`/`name:` exact matches.
    pub fn entry_style(&self, entry: &Entry) -> Style {
        let mut style = Style::default();
        let mut apply = |key: &str| {
            if let Some(s) = self.styles.get(key) {
                style.overlay(s);
            }
        };

        let kind_key = if entry.is_broken_link() {
            "broken_symlink"
        } else if entry.is_symlink() {
            "symlink"
        } else {
            match entry.kind() {
                EntryKind::Directory => "directory",
                EntryKind::File => "file",
                EntryKind::Symlink => "symlink",
                EntryKind::Other => "other",
            }
        };
        apply(kind_key);

        if entry.kind() == EntryKind::File {
            if entry.is_executable() {
                apply("executable");
            }
            if let Some(ext) = entry.extension() {
                apply(&format!("ext:{ext}"));
            }
        }
        if entry.is_hidden() {
            apply("hidden");
        }
        if entry.is_dir_like() {
            apply(&format!("dir:{}", entry.name()));
        } else {
            apply(&format!("name:{}", entry.name()));
        }
        style
    }
}

fn is_known_classifier(key: &str) -> bool {
    ENTRY_CLASSIFIERS.contains(&key)
        || COLUMN_CLASSIFIERS.contains(&key)
        || PREFIXED_CLASSIFIERS
            .iter()
            .any(|p| key.len() > p.len() && key.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn file_overrides_single_fields() -> Result<(), Box<dyn std::error::Error>> {
        let json = r##"{
            "directory": { "color": "#ff0000" },
            "dir:src": { "icon": "S" },
            "ext:rs": { "color": "208", "italics": true }
        }"##;
        let theme = Theme::from_json(Path::new("t.json"), json)?;

        let src = Entry::new("src", EntryKind::Directory, 0);
        let style = theme.entry_style(&src);
        assert_eq!(style.icon(), Some("S"));
        assert_eq!(style.color(), Some(Color::Rgb { r: 255, g: 0, b: 0 }));
        // bold survives from the built-in directory style
        assert!(style.content_style().attributes.has(Attribute::Bold));

        let rs = Entry::new("main.rs", EntryKind::File, 0);
        assert_eq!(theme.entry_style(&rs).color(), Some(Color::AnsiValue(208)));
        Ok(())
    }

    #[test]
    fn unknown_fields_are_malformed() {
        let bad_field = Theme::from_json(Path::new("t.json"), r#"{"file": {"colour": "red"}}"#);
        assert!(matches!(bad_field, Err(ListError::MalformedTheme { .. })));

        let bad_color = Theme::from_json(Path::new("t.json"), r#"{"file": {"color": "nope"}}"#);
        assert!(matches!(bad_color, Err(ListError::MalformedTheme { .. })));

        let bad_key = Theme::from_json(Path::new("t.json"), r#"{"files": {}}"#);
        assert!(matches!(bad_key, Err(ListError::MalformedTheme { .. })));
    }

    #[test]
    fn missing_file_is_malformed() {
        let err = Theme::load(&PathBuf::from("/no/such/theme.json"));
        assert!(matches!(err, Err(ListError::MalformedTheme { .. })));
    }

    #[test]
    fn git_styles_are_keyed_by_status() {
        let theme = Theme::default();
        assert_eq!(
            theme.git_style(GitStatus::Modified).color(),
            Some(Color::Yellow)
        );
        assert_eq!(theme.git_style(GitStatus::None), Style::default());
    }
}
