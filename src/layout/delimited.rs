//! Comma and tab separated layouts for spreadsheets and scripts.
//!
//! One header record (the detail column titles followed by `Name`), then one record per
//! entry of every section. Values are never colored or decorated and names are written
//! as they are, quoting is left to the `csv` writer.

use crate::core::Summary;
use crate::layout::cells::{self, NAME_COLUMN};
use crate::layout::{Layout, Listing, RenderContext};

use std::io::{self, Write};

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvLayout;

#[derive(Debug, Clone, Copy, Default)]
pub struct TsvLayout;

impl Layout for CsvLayout {
    fn render(&self, listing: &Listing, ctx: &RenderContext, out: &mut dyn Write) -> io::Result<()> {
        write_records(listing, ctx, out, b',')
    }

    fn render_summary(&self, _: &Summary, _: &RenderContext, _: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

impl Layout for TsvLayout {
    fn render(&self, listing: &Listing, ctx: &RenderContext, out: &mut dyn Write) -> io::Result<()> {
        write_records(listing, ctx, out, b'\t')
    }

    fn render_summary(&self, _: &Summary, _: &RenderContext, _: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

fn write_records(
    listing: &Listing,
    ctx: &RenderContext,
    out: &mut dyn Write,
    delimiter: u8,
) -> io::Result<()> {
    let ctx = ctx.undecorated();
    let mut specs = cells::column_specs(&ctx.columns);
    specs.push(NAME_COLUMN);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);
    writer.write_record(specs.iter().map(|s| s.header))?;
    for section in &listing.sections {
        if ctx.interrupt.is_set() {
            break;
        }
        for entry in section.entries() {
            writer.write_record(specs.iter().map(|s| cells::field_text(s.field, entry, &ctx)))?;
        }
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::core::{Entry, EntryKind, Section};
    use crate::layout::Columns;

    fn listing() -> Listing {
        Listing {
            sections: vec![Section::new(
                None,
                vec![
                    Entry::new("plain.txt", EntryKind::File, 5),
                    Entry::new("with, comma", EntryKind::File, 7),
                ],
            )],
            ..Listing::default()
        }
    }

    #[test]
    fn csv_quotes_names_with_commas() -> Result<(), Box<dyn std::error::Error>> {
        let theme = Theme::default();
        let mut ctx = RenderContext::new(&theme, 80);
        ctx.columns = Columns {
            octal: true,
            ..Columns::default()
        };
        let mut out = Vec::new();
        CsvLayout.render(&listing(), &ctx, &mut out)?;
        assert_eq!(
            String::from_utf8(out)?,
            "Octal,Name\n00,plain.txt\n00,\"with, comma\"\n"
        );
        Ok(())
    }

    #[test]
    fn tsv_separates_with_tabs() -> Result<(), Box<dyn std::error::Error>> {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme, 80);
        let mut out = Vec::new();
        TsvLayout.render(&listing(), &ctx, &mut out)?;
        let text = String::from_utf8(out)?;
        assert_eq!(text.lines().next(), Some("Name"));
        assert!(text.contains("\nwith, comma\n"));

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(text.as_bytes());
        assert_eq!(reader.records().count(), 2);
        Ok(())
    }
}
