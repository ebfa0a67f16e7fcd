//! Boxed table layout with a header row.

use crate::core::Section;
use crate::layout::cells::{self, ColumnSpec, NAME_COLUMN};
use crate::layout::{Layout, Listing, RenderContext, SectionLayout, render_sections};
use crate::ui::paint::Cell;

use clap::ValueEnum;
use serde::Deserialize;

use std::io::{self, Write};

/// Border characters of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    Ascii,
    #[default]
    Unicode,
}

struct Border {
    horizontal: char,
    vertical: char,
    // left, middle, right for the top, separator and bottom lines
    top: [char; 3],
    mid: [char; 3],
    bottom: [char; 3],
}

impl TableStyle {
    fn border(self) -> Border {
        match self {
            TableStyle::Ascii => Border {
                horizontal: '-',
                vertical: '|',
                top: ['+', '+', '+'],
                mid: ['+', '+', '+'],
                bottom: ['+', '+', '+'],
            },
            TableStyle::Unicode => Border {
                horizontal: '─',
                vertical: '│',
                top: ['╭', '┬', '╮'],
                mid: ['├', '┼', '┤'],
                bottom: ['╰', '┴', '╯'],
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TableLayout;

impl SectionLayout for TableLayout {
    fn render_section(
        &self,
        section: &Section,
        ctx: &RenderContext,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let mut specs: Vec<ColumnSpec> = cells::column_specs(&ctx.columns);
        specs.push(NAME_COLUMN);

        let header = cells::header_row(&specs, ctx);
        let rows: Vec<Vec<Cell>> = section
            .entries()
            .iter()
            .map(|e| cells::row(e, ctx))
            .collect();

        let mut all = Vec::with_capacity(rows.len() + 1);
        all.push(header);
        all.extend(rows);
        let widths = cells::column_widths(&all);

        let border = ctx.table_style.border();
        write_rule(out, &border, &widths, border.top)?;
        for (i, row) in all.iter().enumerate() {
            write!(out, "{}", border.vertical)?;
            for (col, cell) in row.iter().enumerate() {
                out.write_all(b" ")?;
                cell.write_padded(out, widths[col], specs[col].align)?;
                write!(out, " {}", border.vertical)?;
            }
            writeln!(out)?;
            if i == 0 {
                write_rule(out, &border, &widths, border.mid)?;
            }
        }
        write_rule(out, &border, &widths, border.bottom)
    }
}

impl Layout for TableLayout {
    fn render(&self, listing: &Listing, ctx: &RenderContext, out: &mut dyn Write) -> io::Result<()> {
        render_sections(self, listing, ctx, out)
    }
}

fn write_rule(out: &mut dyn Write, border: &Border, widths: &[usize], ends: [char; 3]) -> io::Result<()> {
    let mut line = String::new();
    line.push(ends[0]);
    for (i, w) in widths.iter().enumerate() {
        if i > 0 {
            line.push(ends[1]);
        }
        line.extend(std::iter::repeat_n(border.horizontal, w + 2));
    }
    line.push(ends[2]);
    writeln!(out, "{line}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::core::{Entry, EntryKind};

    #[test]
    fn ascii_table_has_header_and_borders() -> Result<(), Box<dyn std::error::Error>> {
        let theme = Theme::default();
        let mut ctx = RenderContext::new(&theme, 80);
        ctx.table_style = TableStyle::Ascii;
        let section = Section::new(
            None,
            vec![
                Entry::new("a", EntryKind::File, 0),
                Entry::new("long_name", EntryKind::File, 0),
            ],
        );
        let mut out = Vec::new();
        TableLayout.render_section(&section, &ctx, &mut out)?;
        let text = String::from_utf8(out)?;
        let expected = "\
+-----------+
| Name      |
+-----------+
| a         |
| long_name |
+-----------+
";
        assert_eq!(text, expected);
        Ok(())
    }

    #[test]
    fn unicode_table_is_rounded() -> Result<(), Box<dyn std::error::Error>> {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme, 80);
        let section = Section::new(None, vec![Entry::new("a", EntryKind::File, 0)]);
        let mut out = Vec::new();
        TableLayout.render_section(&section, &ctx, &mut out)?;
        let text = String::from_utf8(out)?;
        assert!(text.starts_with('╭'));
        assert!(text.trim_end().ends_with('╯'));
        Ok(())
    }
}
