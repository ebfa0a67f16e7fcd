//! Cell painting for g.
//!
//! Every value that ends up on screen is a [Cell]: the text to write, which may carry
//! SGR color codes and OSC-8 hyperlinks, plus the display width of its visible part.
//! Layouts only ever measure [Cell::width], never the raw text.

use crate::config::theme::{Style, Theme};
use crate::core::formatter::{display_width, sanitize_name};
use crate::core::{Entry, EntryKind};
use crate::ui::icons::nerd_font_icon;
use crate::utils::file_url;

use clap::ValueEnum;
use serde::Deserialize;

use std::io::{self, IsTerminal, Write};

/// When to emit color codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// `auto` colors only a terminal stdout, and never when `NO_COLOR` is set.
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
                    && io::stdout().is_terminal()
            }
        }
    }
}

/// Visual extras applied to names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decorations {
    pub color: bool,
    pub icons: bool,
    pub hyperlink: bool,
    pub classify: bool,
}

/// Horizontal alignment inside a padded column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Rendered text plus its display width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    text: String,
    width: usize,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        let width = display_width(&text);
        Cell { text, width }
    }

    /// Styled text. Without color the style is dropped and the text stays plain.
    pub fn styled(text: &str, style: &Style, color: bool) -> Self {
        let width = display_width(text);
        let text = if color {
            style.content_style().apply(text).to_string()
        } else {
            text.to_string()
        };
        Cell { text, width }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Appends another cell.
    pub fn push(&mut self, other: &Cell) {
        self.text.push_str(&other.text);
        self.width += other.width;
    }

    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.width += display_width(s);
    }

    /// Writes the cell padded with spaces to `width`.
    pub fn write_padded(&self, out: &mut dyn Write, width: usize, align: Align) -> io::Result<()> {
        let pad = width.saturating_sub(self.width);
        match align {
            Align::Left => write!(out, "{}{:pad$}", self.text, ""),
            Align::Right => write!(out, "{:pad$}{}", "", self.text),
        }
    }
}

/// Paints entries with a theme and a set of decorations.
#[derive(Debug, Clone, Copy)]
pub struct Painter<'a> {
    theme: &'a Theme,
    decorations: Decorations,
}

impl<'a> Painter<'a> {
    pub fn new(theme: &'a Theme, decorations: Decorations) -> Self {
        Painter { theme, decorations }
    }

    /// A column value styled with a column classifier like `size`.
    pub fn column(&self, classifier: &str, text: &str) -> Cell {
        Cell::styled(text, &self.theme.column_style(classifier), self.decorations.color)
    }

    pub fn styled(&self, style: &Style, text: &str) -> Cell {
        Cell::styled(text, style, self.decorations.color)
    }

    /// Icon, colored name, hyperlink and classify suffix.
    pub fn name(&self, entry: &Entry) -> Cell {
        let style = self.theme.entry_style(entry);
        let label = sanitize_name(entry.name());
        let mut cell = Cell::default();

        if self.decorations.icons {
            let icon = style.icon().unwrap_or_else(|| nerd_font_icon(entry));
            cell.push(&self.styled(&style, icon));
            cell.push_str(" ");
        }

        let mut name = self.styled(&style, &label);
        if self.decorations.hyperlink {
            name.text = hyperlink(&file_url(entry.path()), &name.text);
        }
        cell.push(&name);

        if self.decorations.classify
            && let Some(suffix) = classify_suffix(entry)
        {
            cell.push_str(suffix);
        }
        cell
    }

    /// Name followed by ` -> target` for symlinks, used by the detailed views.
    pub fn name_with_target(&self, entry: &Entry) -> Cell {
        let mut cell = self.name(entry);
        if let Some(link) = entry.link() {
            cell.push_str(" -> ");
            let key = match link.resolved() {
                None => "broken_symlink",
                Some(EntryKind::Directory) => "directory",
                Some(_) => "file",
            };
            let target = sanitize_name(&link.target().to_string_lossy());
            cell.push(&self.styled(&self.theme.column_style(key), &target));
        }
        cell
    }

    /// A directory label such as a tree root or a section title.
    pub fn directory_label(&self, label: &str) -> Cell {
        self.styled(&self.theme.column_style("directory"), &sanitize_name(label))
    }
}

/// `ls -F` style suffix.
pub fn classify_suffix(entry: &Entry) -> Option<&'static str> {
    if entry.is_symlink() {
        return Some("@");
    }
    match entry.kind() {
        EntryKind::Directory => Some("/"),
        EntryKind::File if entry.is_executable() => Some("*"),
        EntryKind::Other => match entry.mode() & 0o170000 {
            0o010000 => Some("|"),
            0o140000 => Some("="),
            _ => None,
        },
        _ => None,
    }
}

/// Wraps `text` in an OSC-8 hyperlink.
pub fn hyperlink(url: &str, text: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\{text}\x1b]8;;\x1b\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::theme::Theme;

    #[test]
    fn width_ignores_escape_sequences() {
        let theme = Theme::default();
        let painter = Painter::new(
            &theme,
            Decorations {
                color: true,
                hyperlink: true,
                classify: true,
                icons: false,
            },
        );
        let dir = Entry::new("/tmp/src", EntryKind::Directory, 0);
        let cell = painter.name(&dir);
        assert_eq!(cell.width(), "src/".len());
        assert!(cell.text().contains("\x1b]8;;file://"));
        assert!(cell.text().contains("\x1b["));
    }

    #[test]
    fn icons_add_glyph_and_space() {
        let theme = Theme::default();
        let painter = Painter::new(
            &theme,
            Decorations {
                icons: true,
                ..Decorations::default()
            },
        );
        let cell = painter.name(&Entry::new("a.rs", EntryKind::File, 0));
        assert_eq!(cell.width(), 1 + 1 + 4);
        assert!(cell.text().ends_with(" a.rs"));
    }

    #[test]
    fn padding_respects_alignment() -> Result<(), Box<dyn std::error::Error>> {
        let mut out = Vec::new();
        Cell::plain("ab").write_padded(&mut out, 4, Align::Right)?;
        Cell::plain("c").write_padded(&mut out, 3, Align::Left)?;
        assert_eq!(String::from_utf8(out)?, "  abc  ");
        Ok(())
    }

    #[test]
    fn classify_suffixes() {
        let exe = Entry::new("run", EntryKind::File, 0).with_mode(0o100755);
        assert_eq!(classify_suffix(&exe), Some("*"));
        assert_eq!(
            classify_suffix(&Entry::new("d", EntryKind::Directory, 0)),
            Some("/")
        );
        assert_eq!(classify_suffix(&Entry::new("f", EntryKind::File, 0)), None);
    }
}
