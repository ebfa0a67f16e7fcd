//! Line oriented layouts: one entry per line, NUL separated, and comma separated.

use crate::core::{Section, Summary};
use crate::layout::{Layout, Listing, RenderContext, SectionLayout, cells, render_sections};
use crate::ui::paint::Cell;

use std::io::{self, Write};

/// One entry per line. With detail columns every column is aligned, optionally under
/// and above a row of column titles.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnelineLayout;

impl SectionLayout for OnelineLayout {
    fn render_section(
        &self,
        section: &Section,
        ctx: &RenderContext,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let titled = ctx.header || ctx.footer;
        if !ctx.columns.any() && !titled {
            let painter = ctx.painter();
            for entry in section.entries() {
                writeln!(out, "{}", painter.name(entry).text())?;
            }
            return Ok(());
        }

        let mut specs = cells::column_specs(&ctx.columns);
        specs.push(cells::NAME_COLUMN);
        let mut rows: Vec<Vec<Cell>> = section
            .entries()
            .iter()
            .map(|e| cells::row(e, ctx))
            .collect();
        let titles = cells::header_row(&specs, ctx);
        if titled {
            rows.push(titles.clone());
        }
        let widths = cells::column_widths(&rows);
        rows.truncate(section.entries().len());

        if ctx.header {
            cells::write_row(out, &titles, &widths, &specs)?;
            writeln!(out)?;
        }
        for row in &rows {
            cells::write_row(out, row, &widths, &specs)?;
            writeln!(out)?;
        }
        if ctx.footer {
            cells::write_row(out, &titles, &widths, &specs)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

impl Layout for OnelineLayout {
    fn render(&self, listing: &Listing, ctx: &RenderContext, out: &mut dyn Write) -> io::Result<()> {
        render_sections(self, listing, ctx, out)
    }
}

/// Names separated by NUL bytes, for `xargs -0` and friends.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroLayout;

impl SectionLayout for ZeroLayout {
    fn render_section(
        &self,
        section: &Section,
        ctx: &RenderContext,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let painter = ctx.painter();
        for entry in section.entries() {
            out.write_all(painter.name(entry).text().as_bytes())?;
            out.write_all(b"\0")?;
        }
        Ok(())
    }
}

impl Layout for ZeroLayout {
    /// No titles and no blank lines, only the NUL separated stream.
    fn render(&self, listing: &Listing, ctx: &RenderContext, out: &mut dyn Write) -> io::Result<()> {
        for section in &listing.sections {
            if ctx.interrupt.is_set() {
                break;
            }
            self.render_section(section, ctx, out)?;
        }
        Ok(())
    }

    fn render_summary(&self, _: &Summary, _: &RenderContext, _: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

/// `a, b, c` wrapped at the terminal width.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommaLayout;

impl SectionLayout for CommaLayout {
    fn render_section(
        &self,
        section: &Section,
        ctx: &RenderContext,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let entries = section.entries();
        if entries.is_empty() {
            return Ok(());
        }

        let mut line_width = 0;
        for (i, entry) in entries.iter().enumerate() {
            let mut item = cells::compact(entry, ctx);
            if i + 1 < entries.len() {
                item.push_str(",");
            }

            if line_width > 0 {
                if line_width + 1 + item.width() > ctx.width {
                    writeln!(out)?;
                    line_width = 0;
                } else {
                    out.write_all(b" ")?;
                    line_width += 1;
                }
            }
            out.write_all(item.text().as_bytes())?;
            line_width += item.width();
        }
        writeln!(out)
    }
}

impl Layout for CommaLayout {
    fn render(&self, listing: &Listing, ctx: &RenderContext, out: &mut dyn Write) -> io::Result<()> {
        render_sections(self, listing, ctx, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::core::{Entry, EntryKind};
    use crate::layout::Columns;

    fn section(names: &[&str]) -> Section {
        Section::new(
            None,
            names
                .iter()
                .map(|n| Entry::new(*n, EntryKind::File, 10))
                .collect(),
        )
    }

    #[test]
    fn comma_wraps_at_width() -> Result<(), Box<dyn std::error::Error>> {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme, 10);
        let mut out = Vec::new();
        CommaLayout.render_section(&section(&["aaa", "bbb", "ccc"]), &ctx, &mut out)?;
        assert_eq!(String::from_utf8(out)?, "aaa, bbb,\nccc\n");
        Ok(())
    }

    #[test]
    fn zero_separates_with_nul() -> Result<(), Box<dyn std::error::Error>> {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme, 80);
        let listing = Listing {
            sections: vec![section(&["a", "b"])],
            ..Listing::default()
        };
        let mut out = Vec::new();
        ZeroLayout.render(&listing, &ctx, &mut out)?;
        assert_eq!(out, b"a\0b\0");
        Ok(())
    }

    #[test]
    fn oneline_aligns_columns() -> Result<(), Box<dyn std::error::Error>> {
        let theme = Theme::default();
        let mut ctx = RenderContext::new(&theme, 80);
        ctx.columns = Columns {
            git: true,
            ..Columns::default()
        };
        let mut out = Vec::new();
        OnelineLayout.render_section(&section(&["x", "y"]), &ctx, &mut out)?;
        // status none renders as a blank symbol
        assert_eq!(String::from_utf8(out)?, "  x\n  y\n");
        Ok(())
    }

    #[test]
    fn header_and_footer_frame_the_rows() -> Result<(), Box<dyn std::error::Error>> {
        let theme = Theme::default();
        let mut ctx = RenderContext::new(&theme, 80);
        ctx.header = true;
        ctx.footer = true;
        ctx.columns = Columns {
            inode: true,
            ..Columns::default()
        };
        let entry = Entry::new("long-name", EntryKind::File, 10);
        let mut out = Vec::new();
        OnelineLayout.render_section(&Section::new(None, vec![entry]), &ctx, &mut out)?;
        assert_eq!(
            String::from_utf8(out)?,
            "Inode Name\n    0 long-name\nInode Name\n"
        );
        Ok(())
    }
}
