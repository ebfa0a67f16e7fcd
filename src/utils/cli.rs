//! Command-line argument parsing for g.
//!
//! Flags follow `ls` where `ls` has an equivalent. Every flag only overrides the
//! matching `g.toml` value, unset flags leave the config file in charge.

use crate::core::{SortKey, TimeType};
use crate::layout::{LayoutKind, TableStyle, TreeStyle};
use crate::ui::paint::ColorMode;

use clap::{ArgGroup, Parser};

use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "g",
    version,
    about = "A feature-rich ls alternative with git status, trees and many layouts",
    group(ArgGroup::new("layout").multiple(false)),
    group(ArgGroup::new("sorting").multiple(false))
)]
pub struct Cli {
    /// Files and directories to list
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Show hidden entries
    #[arg(short = 'a', long)]
    pub all: bool,

    /// List directories themselves, not their contents
    #[arg(short = 'd', long)]
    pub directory: bool,

    /// Recurse into directories
    #[arg(short = 'R', long)]
    pub recurse: bool,

    /// Limit recursion and tree depth to N levels
    #[arg(long, value_name = "N")]
    pub depth: Option<usize>,

    /// Hide names matching the glob
    #[arg(short = 'I', long, value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Show only files matching the glob
    #[arg(short = 'M', long = "match", value_name = "GLOB")]
    pub matches: Vec<String>,

    /// Show only directories
    #[arg(short = 'D', long, conflicts_with = "no_dir")]
    pub only_dir: bool,

    /// Hide directories
    #[arg(long)]
    pub no_dir: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    pub dereference: bool,

    /// Permissions, size, owner, group and modification time
    #[arg(short = 'l', long)]
    pub long: bool,

    /// Show icons
    #[arg(long)]
    pub icon: bool,

    /// Show git status
    #[arg(long)]
    pub git: bool,

    /// Show MIME types
    #[arg(long)]
    pub mime: bool,

    /// Show inode numbers
    #[arg(short = 'i', long)]
    pub inode: bool,

    /// Show permission bits in octal
    #[arg(long, visible_alias = "octal-permission")]
    pub octal_perm: bool,

    /// Time columns to show: modified, accessed, changed, created
    #[arg(long, value_enum, value_name = "TYPE", value_delimiter = ',')]
    pub time_type: Vec<TimeType>,

    /// Show whether git repositories have uncommitted changes
    #[arg(long, visible_alias = "repo-status")]
    pub git_repo_status: bool,

    /// Show the checked out branch of git repositories
    #[arg(long, visible_alias = "branch")]
    pub git_repo_branch: bool,

    /// Column titles above the listing
    #[arg(long, visible_alias = "title")]
    pub header: bool,

    /// Column titles below the listing
    #[arg(long)]
    pub footer: bool,

    /// Print entry counts and elapsed time after the listing
    #[arg(long)]
    pub statistic: bool,

    /// Print the summed size of the listed entries
    #[arg(long)]
    pub total_size: bool,

    /// Show directory sizes as the size of everything below them
    #[arg(long)]
    pub recursive_size: bool,

    /// Make names clickable terminal hyperlinks
    #[arg(long)]
    pub hyperlink: bool,

    /// Append a type indicator (one of /@*|=) to names
    #[arg(short = 'F', long)]
    pub classify: bool,

    /// Tree view
    #[arg(short = 'T', long, group = "layout")]
    pub tree: bool,

    /// Grid, filled top to bottom
    #[arg(short = 'C', long, group = "layout")]
    pub grid: bool,

    /// Grid, filled left to right
    #[arg(short = 'x', long, group = "layout")]
    pub across: bool,

    /// One entry per line
    #[arg(short = '1', long, group = "layout")]
    pub oneline: bool,

    /// Entries separated by NUL
    #[arg(short = '0', long, group = "layout")]
    pub zero: bool,

    /// Comma separated entries
    #[arg(short = 'm', long, group = "layout")]
    pub comma: bool,

    /// Boxed table
    #[arg(long, group = "layout")]
    pub table: bool,

    /// JSON document
    #[arg(short = 'j', long, group = "layout")]
    pub json: bool,

    /// Comma separated values
    #[arg(long, group = "layout")]
    pub csv: bool,

    /// Tab separated values
    #[arg(long, group = "layout")]
    pub tsv: bool,

    /// Markdown table
    #[arg(long, group = "layout")]
    pub markdown: bool,

    /// Sort by KEY
    #[arg(long, value_enum, value_name = "KEY", group = "sorting")]
    pub sort: Option<SortKey>,

    /// Largest first
    #[arg(short = 'S', group = "sorting")]
    pub sort_size: bool,

    /// Newest first
    #[arg(short = 't', group = "sorting")]
    pub sort_time: bool,

    /// Sort by extension
    #[arg(short = 'X', group = "sorting")]
    pub sort_extension: bool,

    /// Natural sort of numbers within names
    #[arg(short = 'v', long, group = "sorting")]
    pub versionsort: bool,

    /// Reverse the sort order
    #[arg(short = 'r', long)]
    pub reverse: bool,

    /// List directories before files
    #[arg(long, overrides_with = "no_dirs_first")]
    pub dirs_first: bool,

    /// Mix directories and files
    #[arg(long, overrides_with = "dirs_first")]
    pub no_dirs_first: bool,

    /// When to use colors
    #[arg(long, value_enum, value_name = "WHEN")]
    pub color: Option<ColorMode>,

    /// Assume a terminal N columns wide
    #[arg(long, value_name = "N")]
    pub term_width: Option<usize>,

    /// strftime format of the time column
    #[arg(long, value_name = "FORMAT")]
    pub time_format: Option<String>,

    /// Connector style of the tree view
    #[arg(long, value_enum, value_name = "STYLE")]
    pub tree_style: Option<TreeStyle>,

    /// Border style of the table view
    #[arg(long, value_enum, value_name = "STYLE")]
    pub table_style: Option<TableStyle>,

    /// JSON theme file
    #[arg(long, value_name = "PATH")]
    pub theme: Option<PathBuf>,

    /// Print shell integration for bash, zsh, fish, powershell or nushell
    #[arg(long, value_name = "SHELL")]
    pub init: Option<String>,

    /// Write a default g.toml to the config path
    #[arg(long)]
    pub init_config: bool,

    /// Ignore the config file
    #[arg(long)]
    pub no_config: bool,

    /// Worker threads for recursive listings
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,
}

impl Cli {
    /// The layout picked by a flag, if any.
    pub fn layout(&self) -> Option<LayoutKind> {
        let flags = [
            (self.tree, LayoutKind::Tree),
            (self.grid, LayoutKind::Grid),
            (self.across, LayoutKind::Across),
            (self.oneline, LayoutKind::Oneline),
            (self.zero, LayoutKind::Zero),
            (self.comma, LayoutKind::Comma),
            (self.table, LayoutKind::Table),
            (self.json, LayoutKind::Json),
            (self.csv, LayoutKind::Csv),
            (self.tsv, LayoutKind::Tsv),
            (self.markdown, LayoutKind::Markdown),
        ];
        flags.iter().find(|(set, _)| *set).map(|(_, kind)| *kind)
    }

    /// Sort key and whether the shortcut implies a descending order.
    pub fn sort_override(&self) -> Option<(SortKey, bool)> {
        if let Some(key) = self.sort {
            return Some((key, false));
        }
        if self.sort_size {
            Some((SortKey::Size, true))
        } else if self.sort_time {
            Some((SortKey::Modified, true))
        } else if self.sort_extension {
            Some((SortKey::Extension, false))
        } else if self.versionsort {
            Some((SortKey::Natural, false))
        } else {
            None
        }
    }

    /// `Some(true)` for `--dirs-first`, `Some(false)` for `--no-dirs-first`.
    pub fn dirs_first_override(&self) -> Option<bool> {
        if self.dirs_first {
            Some(true)
        } else if self.no_dirs_first {
            Some(false)
        } else {
            None
        }
    }
}
