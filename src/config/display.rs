//! Display configuration options for g.
//!
//! This module defines the `[display]` table of `g.toml`: the default layout, columns,
//! decorations and the styles of trees and tables.

use crate::core::formatter::DEFAULT_TIME_FORMAT;
use crate::layout::{LayoutKind, TableStyle, TreeStyle};
use crate::ui::paint::ColorMode;

use serde::Deserialize;

use std::path::{Path, PathBuf};

/// Display configuration options
///
/// Every option has a default, so a partial `[display]` table is fine.
/// Command line flags take precedence over all of these.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Display {
    layout: Option<LayoutKind>,
    long: bool,
    icons: bool,
    git: bool,
    mime: bool,
    hyperlink: bool,
    classify: bool,
    color: ColorMode,
    time_format: String,
    tree_style: TreeStyle,
    table_style: TableStyle,
    theme: Option<PathBuf>,
}

impl Display {
    pub fn layout(&self) -> Option<LayoutKind> {
        self.layout
    }

    pub fn long(&self) -> bool {
        self.long
    }

    pub fn icons(&self) -> bool {
        self.icons
    }

    pub fn git(&self) -> bool {
        self.git
    }

    pub fn mime(&self) -> bool {
        self.mime
    }

    pub fn hyperlink(&self) -> bool {
        self.hyperlink
    }

    pub fn classify(&self) -> bool {
        self.classify
    }

    pub fn color(&self) -> ColorMode {
        self.color
    }

    pub fn time_format(&self) -> &str {
        &self.time_format
    }

    pub fn tree_style(&self) -> TreeStyle {
        self.tree_style
    }

    pub fn table_style(&self) -> TableStyle {
        self.table_style
    }

    pub fn theme(&self) -> Option<&Path> {
        self.theme.as_deref()
    }

    pub(crate) fn reset_time_format(&mut self) {
        self.time_format = DEFAULT_TIME_FORMAT.to_string();
    }
}

impl Default for Display {
    fn default() -> Self {
        Display {
            layout: None,
            long: false,
            icons: false,
            git: false,
            mime: false,
            hyperlink: false,
            classify: false,
            color: ColorMode::Auto,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            tree_style: TreeStyle::Unicode,
            table_style: TableStyle::Unicode,
            theme: None,
        }
    }
}
