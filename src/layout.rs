//! Output layouts for g.
//!
//! Every [LayoutKind] has one [Layout] implementation. Layouts receive the sorted
//! [Listing] and a [RenderContext] and write to any [Write] sink; they never look at
//! the filesystem and never depend on each other. Most of them draw one section at a
//! time through [SectionLayout] and [render_sections]. Shared pieces live in [cells] and
//! [crate::ui::paint].

pub mod cells;
pub mod delimited;
pub mod grid;
pub mod json;
pub mod lines;
pub mod markdown;
pub mod table;
pub mod tree;

use crate::config::theme::Theme;
use crate::core::formatter::{DEFAULT_TIME_FORMAT, format_byte_count};
use crate::core::{Section, Summary, TimeType};
use crate::ui::paint::{Decorations, Painter};
use crate::utils::Interrupt;

pub use delimited::{CsvLayout, TsvLayout};
pub use grid::{AcrossLayout, GridLayout};
pub use json::JsonLayout;
pub use lines::{CommaLayout, OnelineLayout, ZeroLayout};
pub use markdown::MarkdownLayout;
pub use table::{TableLayout, TableStyle};
pub use tree::{TreeLayout, TreeStyle};

use clap::ValueEnum;
use serde::Deserialize;

use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Grid,
    Across,
    Oneline,
    Zero,
    Comma,
    Table,
    Json,
    Csv,
    Tsv,
    Markdown,
    Tree,
}

impl LayoutKind {
    /// Layouts that print every section as its own block with a title.
    pub fn splits_sections(self) -> bool {
        !matches!(
            self,
            LayoutKind::Tree | LayoutKind::Json | LayoutKind::Csv | LayoutKind::Tsv
        )
    }

    /// Layouts with room for detail columns next to the name.
    pub fn shows_columns(self) -> bool {
        !matches!(
            self,
            LayoutKind::Grid | LayoutKind::Across | LayoutKind::Comma | LayoutKind::Zero
        )
    }
}

/// Set of time columns, kept in [TimeType::ALL] order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeColumns(u8);

impl TimeColumns {
    pub fn of(kinds: &[TimeType]) -> Self {
        TimeColumns(kinds.iter().fold(0, |bits, kind| bits | time_bit(*kind)))
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = TimeType> {
        TimeType::ALL
            .into_iter()
            .filter(move |kind| self.0 & time_bit(*kind) != 0)
    }
}

fn time_bit(kind: TimeType) -> u8 {
    1 << kind as u8
}

/// Which detail columns accompany the name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Columns {
    pub inode: bool,
    pub octal: bool,
    /// Permissions, size, owner and group.
    pub long: bool,
    pub times: TimeColumns,
    pub git: bool,
    pub repo_status: bool,
    pub repo_branch: bool,
    pub mime: bool,
}

impl Columns {
    pub fn any(&self) -> bool {
        self.inode
            || self.octal
            || self.long
            || !self.times.is_empty()
            || self.git
            || self.repo_status
            || self.repo_branch
            || self.mime
    }

    /// Columns that only the detailed layouts can show. Git is also drawn by the grids.
    pub fn any_detailed(&self) -> bool {
        Columns {
            git: false,
            ..*self
        }
        .any()
    }
}

/// Everything a layout needs besides the entries.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    pub width: usize,
    pub columns: Columns,
    pub decorations: Decorations,
    pub time_format: String,
    pub tree_style: TreeStyle,
    pub table_style: TableStyle,
    /// Print `path:` titles above titled sections.
    pub titles: bool,
    /// Column titles above and below the one-per-line view.
    pub header: bool,
    pub footer: bool,
    pub interrupt: Interrupt,
}

impl<'a> RenderContext<'a> {
    pub fn new(theme: &'a Theme, width: usize) -> Self {
        RenderContext {
            theme,
            width,
            columns: Columns::default(),
            decorations: Decorations::default(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            tree_style: TreeStyle::default(),
            table_style: TableStyle::default(),
            titles: false,
            header: false,
            footer: false,
            interrupt: Interrupt::new(),
        }
    }

    pub fn painter(&self) -> Painter<'a> {
        Painter::new(self.theme, self.decorations)
    }

    /// Same context without color and hyperlinks, for documents meant to be read as text.
    pub fn undecorated(&self) -> Self {
        let mut ctx = self.clone();
        ctx.decorations.color = false;
        ctx.decorations.hyperlink = false;
        ctx
    }
}

/// The sorted result of one pass plus the per-path errors.
#[derive(Debug, Default)]
pub struct Listing {
    pub sections: Vec<Section>,
    pub errors: Vec<String>,
    pub summary: Summary,
}

/// An output strategy.
pub trait Layout {
    fn render(&self, listing: &Listing, ctx: &RenderContext, out: &mut dyn Write) -> io::Result<()>;

    /// Total and statistic lines after the listing.
    fn render_summary(
        &self,
        summary: &Summary,
        ctx: &RenderContext,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        write_summary(summary, ctx, out)
    }
}

/// A layout drawn one section at a time.
pub trait SectionLayout {
    fn render_section(
        &self,
        section: &Section,
        ctx: &RenderContext,
        out: &mut dyn Write,
    ) -> io::Result<()>;
}

/// Renders every section. Sections are separated by a blank line and, when titles are
/// on, introduced by `path:`. An interrupt stops the output between two sections.
pub fn render_sections(
    layout: &dyn SectionLayout,
    listing: &Listing,
    ctx: &RenderContext,
    out: &mut dyn Write,
) -> io::Result<()> {
    let mut first = true;
    for section in &listing.sections {
        if ctx.interrupt.is_set() {
            tracing::debug!("interrupted, remaining sections dropped");
            break;
        }
        if section.entries().is_empty() && section.root().is_none() {
            continue;
        }
        if !first {
            writeln!(out)?;
        }
        first = false;
        if ctx.titles
            && let Some(root) = section.root()
        {
            let title = ctx.painter().directory_label(&root.display().to_string());
            writeln!(out, "{}:", title.text())?;
        }
        layout.render_section(section, ctx, out)?;
    }
    Ok(())
}

/// The summary as indented text lines.
pub fn write_summary(summary: &Summary, ctx: &RenderContext, out: &mut dyn Write) -> io::Result<()> {
    if summary.is_empty() {
        return Ok(());
    }
    let painter = ctx.painter();
    if let Some(total) = summary.total_size {
        let size = painter.column("size", &format_byte_count(total));
        writeln!(out, "  total {}", size.text())?;
    }
    if let Some(stats) = summary.statistic {
        if let Some(elapsed) = summary.elapsed {
            let took = painter.column("time", &format!("{}ms", elapsed.as_millis()));
            writeln!(out, "  underwent {}", took.text())?;
        }
        writeln!(out, "  statistic: {stats}")?;
    }
    Ok(())
}

/// The layout implementation of a kind.
pub fn layout_for(kind: LayoutKind) -> Box<dyn Layout> {
    match kind {
        LayoutKind::Grid => Box::new(GridLayout),
        LayoutKind::Across => Box::new(AcrossLayout),
        LayoutKind::Oneline => Box::new(OnelineLayout),
        LayoutKind::Zero => Box::new(ZeroLayout),
        LayoutKind::Comma => Box::new(CommaLayout),
        LayoutKind::Table => Box::new(TableLayout),
        LayoutKind::Json => Box::new(JsonLayout),
        LayoutKind::Csv => Box::new(CsvLayout),
        LayoutKind::Tsv => Box::new(TsvLayout),
        LayoutKind::Markdown => Box::new(MarkdownLayout),
        LayoutKind::Tree => Box::new(TreeLayout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Entry, EntryKind, Statistics};
    use std::path::PathBuf;

    #[test]
    fn summary_lines() -> Result<(), Box<dyn std::error::Error>> {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme, 80);
        let summary = Summary {
            total_size: Some(1500),
            statistic: Some(Statistics {
                files: 2,
                dirs: 1,
                links: 0,
            }),
            elapsed: None,
        };
        let mut out = Vec::new();
        write_summary(&summary, &ctx, &mut out)?;
        assert_eq!(
            String::from_utf8(out)?,
            "  total 1.50 kB\n  statistic: 2 file(s), 1 dir(s), 0 link(s)\n"
        );
        Ok(())
    }

    #[test]
    fn interrupt_stops_between_sections() -> Result<(), Box<dyn std::error::Error>> {
        let theme = Theme::default();
        let mut ctx = RenderContext::new(&theme, 80);
        ctx.titles = true;
        let listing = Listing {
            sections: vec![
                Section::new(Some(PathBuf::from("a")), vec![Entry::new("a/x", EntryKind::File, 0)]),
                Section::new(Some(PathBuf::from("b")), vec![Entry::new("b/y", EntryKind::File, 0)]),
            ],
            ..Listing::default()
        };
        ctx.interrupt.trigger();
        let mut out = Vec::new();
        render_sections(&OnelineLayout, &listing, &ctx, &mut out)?;
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn time_columns_keep_a_fixed_order() {
        let times = TimeColumns::of(&[TimeType::Created, TimeType::Modified]);
        let order: Vec<TimeType> = times.iter().collect();
        assert_eq!(order, [TimeType::Modified, TimeType::Created]);
        assert!(TimeColumns::default().is_empty());
    }
}
