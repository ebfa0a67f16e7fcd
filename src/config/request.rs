//! The resolved request of one invocation.
//!
//! [ListingRequest] layers command line flags over `g.toml` once at startup. The
//! pipeline only ever reads it.

use crate::config::Config;
use crate::core::formatter::{DEFAULT_TIME_FORMAT, is_valid_time_format};
use crate::core::{
    CollectOptions, EntryFilter, InspectOptions, SortSpec, TimeType, collect::default_threads,
};
use crate::error::ListError;
use crate::layout::{Columns, LayoutKind, TableStyle, TimeColumns, TreeStyle};
use crate::ui::paint::Decorations;
use crate::utils::cli::Cli;
use crate::utils::{Interrupt, expand_tilde};

use std::io::{self, IsTerminal};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ListingRequest {
    pub paths: Vec<PathBuf>,
    /// `None` lists direct children only, `Some(n)` walks `n` levels.
    pub recursion: Option<usize>,
    pub list_dirs: bool,
    pub filter: EntryFilter,
    pub dereference: bool,
    pub sort: SortSpec,
    pub layout: LayoutKind,
    pub columns: Columns,
    pub decorations: Decorations,
    pub width: Option<usize>,
    pub tree_style: TreeStyle,
    pub table_style: TableStyle,
    pub time_format: String,
    pub threads: usize,
    pub theme: Option<PathBuf>,
    pub header: bool,
    pub footer: bool,
    pub statistic: bool,
    pub total_size: bool,
    pub recursive_size: bool,
    /// Set by SIGINT/SIGTERM, shared with the collector and the layouts.
    pub interrupt: Interrupt,
}

impl Default for ListingRequest {
    fn default() -> Self {
        ListingRequest {
            paths: vec![PathBuf::from(".")],
            recursion: None,
            list_dirs: false,
            filter: EntryFilter::default(),
            dereference: false,
            sort: SortSpec::default(),
            layout: LayoutKind::Grid,
            columns: Columns::default(),
            decorations: Decorations::default(),
            width: None,
            tree_style: TreeStyle::default(),
            table_style: TableStyle::default(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            threads: default_threads(),
            theme: None,
            header: false,
            footer: false,
            statistic: false,
            total_size: false,
            recursive_size: false,
            interrupt: Interrupt::new(),
        }
    }
}

impl ListingRequest {
    /// Layers the flags over the config. Fails only on invalid globs.
    pub fn from_cli(cli: &Cli, config: &Config) -> Result<Self, ListError> {
        let general = config.general();
        let display = config.display();

        let paths = if cli.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            cli.paths.clone()
        };

        let filter = EntryFilter::new(cli.all || general.show_hidden())
            .ignore(&cli.ignore)?
            .matching(&cli.matches)?
            .only_dirs(cli.only_dir)
            .no_dirs(cli.no_dir);

        let long = cli.long || display.long();
        let times = if !cli.time_type.is_empty() {
            TimeColumns::of(&cli.time_type)
        } else if long {
            TimeColumns::of(&[TimeType::Modified])
        } else {
            TimeColumns::default()
        };
        let columns = Columns {
            inode: cli.inode,
            octal: cli.octal_perm,
            long,
            times,
            git: cli.git || display.git(),
            repo_status: cli.git_repo_status,
            repo_branch: cli.git_repo_branch,
            mime: cli.mime || display.mime(),
        };

        let titled = cli.header || cli.footer;
        let mut layout = cli
            .layout()
            .or(display.layout())
            .unwrap_or_else(|| default_layout(columns.any_detailed() || titled));
        if columns.any_detailed() && matches!(layout, LayoutKind::Grid | LayoutKind::Across) {
            tracing::warn!("the {:?} layout has no detail columns, listing one per line", layout);
            layout = LayoutKind::Oneline;
        }

        let recursion = if cli.recurse || layout == LayoutKind::Tree || cli.depth.is_some() {
            Some(cli.depth.map(|d| d.max(1)).unwrap_or(usize::MAX))
        } else {
            None
        };

        let (key, descending) = cli
            .sort_override()
            .unwrap_or((general.sort(), false));
        let sort = SortSpec {
            key,
            reverse: (cli.reverse || general.reverse()) != descending,
            dirs_first: cli.dirs_first_override().unwrap_or(general.dirs_first()),
            case_insensitive: general.case_insensitive(),
        };

        let decorations = Decorations {
            color: cli.color.unwrap_or(display.color()).enabled(),
            icons: cli.icon || display.icons(),
            hyperlink: cli.hyperlink || display.hyperlink(),
            classify: cli.classify || display.classify(),
        };

        let time_format = match &cli.time_format {
            Some(format) if is_valid_time_format(format) => format.clone(),
            Some(format) => {
                tracing::warn!("invalid --time-format '{}', using the default", format);
                display.time_format().to_string()
            }
            None => display.time_format().to_string(),
        };

        let threads = cli
            .threads
            .map(crate::config::general::clamp_threads)
            .or(general.threads())
            .unwrap_or_else(default_threads);

        Ok(ListingRequest {
            paths,
            recursion,
            list_dirs: cli.directory,
            filter,
            dereference: cli.dereference,
            sort,
            layout,
            columns,
            decorations,
            width: cli.term_width,
            tree_style: cli.tree_style.unwrap_or(display.tree_style()),
            table_style: cli.table_style.unwrap_or(display.table_style()),
            time_format,
            threads,
            theme: cli
                .theme
                .clone()
                .or_else(|| display.theme().map(expand_tilde)),
            header: cli.header,
            footer: cli.footer,
            statistic: cli.statistic,
            total_size: cli.total_size,
            recursive_size: cli.recursive_size,
            interrupt: Interrupt::new(),
        })
    }

    /// Collector settings derived from the request.
    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            filter: self.filter.clone(),
            max_levels: self.recursion.unwrap_or(1),
            list_dirs: self.list_dirs,
            inspect: InspectOptions {
                dereference: self.dereference,
                mime: self.columns.mime,
                owners: self.columns.long
                    || matches!(
                        self.layout,
                        LayoutKind::Json | LayoutKind::Csv | LayoutKind::Tsv
                    ),
            },
            threads: self.threads,
            interrupt: self.interrupt.clone(),
        }
    }

    #[inline]
    pub fn is_recursive(&self) -> bool {
        self.recursion.is_some_and(|levels| levels > 1)
    }
}

/// Detail columns read best one per line, and so does anything piped.
fn default_layout(detailed: bool) -> LayoutKind {
    if detailed || !io::stdout().is_terminal() {
        LayoutKind::Oneline
    } else {
        LayoutKind::Grid
    }
}
