//! Tree layout.
//!
//! The hierarchy is rebuilt from the `parent` links the collector records. Children keep
//! the order of the sorted section. A node at depth `d` is drawn behind `d + 1`
//! connector segments.

use crate::core::{Entry, Section};
use crate::layout::cells::{self, COLUMN_GAP};
use crate::layout::{Layout, Listing, RenderContext, SectionLayout, render_sections};
use crate::ui::paint::{Align, Cell};

use clap::ValueEnum;
use serde::Deserialize;

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;

/// Connector glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TreeStyle {
    #[default]
    Unicode,
    Rectangle,
    Ascii,
}

impl TreeStyle {
    /// Branch, last branch, continuation and blank segments, all four columns wide.
    pub fn segments(self) -> [&'static str; 4] {
        match self {
            TreeStyle::Unicode => ["├── ", "╰── ", "│   ", "    "],
            TreeStyle::Rectangle => ["├── ", "└── ", "│   ", "    "],
            TreeStyle::Ascii => ["|-- ", "`-- ", "|   ", "    "],
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeLayout;

/// One drawn line: the entry and its connector prefix.
struct TreeLine<'e> {
    entry: &'e Entry,
    prefix: String,
}

impl SectionLayout for TreeLayout {
    fn render_section(
        &self,
        section: &Section,
        ctx: &RenderContext,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let painter = ctx.painter();
        let Some(root) = section.root() else {
            // file arguments have no hierarchy
            for entry in section.entries() {
                writeln!(out, "{}", painter.name_with_target(entry).text())?;
            }
            return Ok(());
        };

        let lines = tree_lines(root, section.entries(), ctx);
        let tree_style = ctx.theme.column_style("tree");

        let details: Vec<Vec<Cell>> = lines
            .iter()
            .map(|l| cells::detail_cells(l.entry, ctx))
            .collect();
        let widths = cells::column_widths(&details);
        let specs = cells::column_specs(&ctx.columns);
        let blank: usize = widths.iter().map(|w| w + COLUMN_GAP.len()).sum();

        writeln!(
            out,
            "{:blank$}{}",
            "",
            painter.directory_label(&root.display().to_string()).text()
        )?;
        for (line, detail) in lines.iter().zip(&details) {
            for (i, cell) in detail.iter().enumerate() {
                let align = specs.get(i).map(|s| s.align).unwrap_or(Align::Left);
                cell.write_padded(out, widths[i], align)?;
                out.write_all(COLUMN_GAP.as_bytes())?;
            }
            let prefix = painter.styled(&tree_style, &line.prefix);
            writeln!(
                out,
                "{}{}",
                prefix.text(),
                painter.name_with_target(line.entry).text()
            )?;
        }
        Ok(())
    }
}

/// Every root draws its own label, so sections never get `path:` titles.
impl Layout for TreeLayout {
    fn render(&self, listing: &Listing, ctx: &RenderContext, out: &mut dyn Write) -> io::Result<()> {
        let ctx = RenderContext {
            titles: false,
            ..ctx.clone()
        };
        render_sections(self, listing, &ctx, out)
    }
}

/// Orders the entries depth first and computes the connector prefix of each.
fn tree_lines<'e>(root: &Path, entries: &'e [Entry], ctx: &RenderContext) -> Vec<TreeLine<'e>> {
    let mut children: HashMap<&Path, Vec<&'e Entry>> = HashMap::new();
    for entry in entries {
        let parent = entry.parent().unwrap_or(root);
        children.entry(parent).or_default().push(entry);
    }

    let [branch, last, pipe, space] = ctx.tree_style.segments();
    let mut lines = Vec::with_capacity(entries.len());
    // (entry, ancestors' continuation, is last child)
    let mut stack: Vec<(&'e Entry, String, bool)> = Vec::new();

    let push_children = |stack: &mut Vec<(&'e Entry, String, bool)>, dir: &Path, indent: String| {
        if let Some(kids) = children.get(dir) {
            let n = kids.len();
            // reversed so the first child is popped first
            for (i, &kid) in kids.iter().enumerate().rev() {
                stack.push((kid, indent.clone(), i + 1 == n));
            }
        }
    };

    push_children(&mut stack, root, String::new());
    while let Some((entry, indent, is_last)) = stack.pop() {
        let prefix = format!("{indent}{}", if is_last { last } else { branch });
        let child_indent = format!("{indent}{}", if is_last { space } else { pipe });
        lines.push(TreeLine { entry, prefix });
        push_children(&mut stack, entry.path(), child_indent);
    }
    lines
}
