//! Helpers for g.
//!
//! Provides utility functions used across the crate:
//! - Color parsing from names, hex codes or palette indices
//! - Resolving the home directory and expanding `~` in configured paths
//! - Determining the terminal width
//! - Building `file://` URLs for hyperlinks

use crossterm::style::Color;

use std::env;
use std::path::{Path, PathBuf};

/// Width used when neither the terminal nor `COLUMNS` tell us better.
pub const FALLBACK_WIDTH: usize = 80;

/// Parses a string into a crossterm color.
///
/// Supports names (`red`, `bright-red`, `grey`, ...), hex values (`#RRGGBB` or `#RGB`)
/// and palette indices (`0`..=`255`). Returns `None` for anything else.
pub fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_lowercase();
    let named = match lower.replace('_', "-").as_str() {
        "default" | "reset" => Some(Color::Reset),
        "black" => Some(Color::Black),
        "red" => Some(Color::DarkRed),
        "green" => Some(Color::DarkGreen),
        "yellow" => Some(Color::DarkYellow),
        "blue" => Some(Color::DarkBlue),
        "magenta" | "purple" => Some(Color::DarkMagenta),
        "cyan" => Some(Color::DarkCyan),
        "white" => Some(Color::Grey),
        "grey" | "gray" | "bright-black" | "dark-grey" | "dark-gray" => Some(Color::DarkGrey),
        "bright-red" => Some(Color::Red),
        "bright-green" => Some(Color::Green),
        "bright-yellow" => Some(Color::Yellow),
        "bright-blue" => Some(Color::Blue),
        "bright-magenta" | "bright-purple" => Some(Color::Magenta),
        "bright-cyan" => Some(Color::Cyan),
        "bright-white" => Some(Color::White),
        _ => None,
    };
    if named.is_some() {
        return named;
    }

    if let Some(hex) = lower.strip_prefix('#') {
        let expanded = match hex.len() {
            6 => hex.to_string(),
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            _ => return None,
        };
        let rgb = u32::from_str_radix(&expanded, 16).ok()?;
        return Some(Color::Rgb {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        });
    }

    lower.parse::<u8>().ok().map(Color::AnsiValue)
}

/// The home directory of the current user.
pub fn get_home() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Expands a leading `~` to the home directory. Other paths are returned unchanged.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match get_home() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Terminal width: the explicit override, else the terminal size, else `COLUMNS`, else 80.
pub fn terminal_width(override_width: Option<usize>) -> usize {
    if let Some(width) = override_width.filter(|w| *w > 0) {
        return width;
    }
    if let Ok((cols, _)) = crossterm::terminal::size()
        && cols > 0
    {
        return cols as usize;
    }
    env::var("COLUMNS")
        .ok()
        .and_then(|c| c.trim().parse::<usize>().ok())
        .filter(|w| *w > 0)
        .unwrap_or(FALLBACK_WIDTH)
}

/// `file://` URL of a path, absolute when it can be resolved.
pub fn file_url(path: &Path) -> String {
    let absolute = path
        .canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf());
    let mut url = String::from("file://");
    for c in absolute.to_string_lossy().chars() {
        match c {
            '\\' => url.push('/'),
            ' ' => url.push_str("%20"),
            '%' => url.push_str("%25"),
            '#' => url.push_str("%23"),
            '?' => url.push_str("%3F"),
            c if c.is_control() => {}
            c => url.push(c),
        }
    }
    url
}
