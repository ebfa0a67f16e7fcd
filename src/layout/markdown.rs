//! GitHub flavored markdown table layout. Never colored.

use crate::core::Section;
use crate::core::formatter::sanitize_name;
use crate::layout::cells::{self, NAME_COLUMN};
use crate::layout::{Layout, Listing, RenderContext, SectionLayout, render_sections};
use crate::ui::paint::Align;

use std::io::{self, Write};

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownLayout;

impl SectionLayout for MarkdownLayout {
    fn render_section(
        &self,
        section: &Section,
        ctx: &RenderContext,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let ctx = ctx.undecorated();
        let mut specs = cells::column_specs(&ctx.columns);
        specs.push(NAME_COLUMN);

        let header: Vec<String> = specs.iter().map(|s| s.header.to_string()).collect();
        writeln!(out, "| {} |", header.join(" | "))?;
        let rule: Vec<&str> = specs
            .iter()
            .map(|s| match s.align {
                Align::Left => "---",
                Align::Right => "---:",
            })
            .collect();
        writeln!(out, "| {} |", rule.join(" | "))?;

        let painter = ctx.painter();
        for entry in section.entries() {
            let mut values: Vec<String> = cells::detail_texts(entry, &ctx)
                .into_iter()
                .map(|(_, text)| escape(&text))
                .collect();
            let mut name = painter.name(entry).text().to_string();
            if let Some(link) = entry.link() {
                name.push_str(" -> ");
                name.push_str(&sanitize_name(&link.target().to_string_lossy()));
            }
            values.push(escape(&name));
            writeln!(out, "| {} |", values.join(" | "))?;
        }
        Ok(())
    }
}

impl Layout for MarkdownLayout {
    fn render(&self, listing: &Listing, ctx: &RenderContext, out: &mut dyn Write) -> io::Result<()> {
        render_sections(self, listing, ctx, out)
    }
}

/// Escapes a value for a table cell: backslashes and pipes, newlines become `<br>`.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            '\n' => out.push_str("<br>"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::core::{Entry, EntryKind};
    use crate::ui::paint::Decorations;

    #[test]
    fn escapes_cell_content() {
        assert_eq!(escape("a|b"), "a\\|b");
        assert_eq!(escape("back\\slash"), "back\\\\slash");
        assert_eq!(escape("two\nlines"), "two<br>lines");
    }

    #[test]
    fn renders_plain_table_even_with_color() -> Result<(), Box<dyn std::error::Error>> {
        let theme = Theme::default();
        let mut ctx = RenderContext::new(&theme, 80);
        ctx.decorations = Decorations {
            color: true,
            ..Decorations::default()
        };
        let section = Section::new(
            None,
            vec![
                Entry::new("pipe|name", EntryKind::File, 0),
                Entry::new("dir", EntryKind::Directory, 0),
            ],
        );
        let mut out = Vec::new();
        MarkdownLayout.render_section(&section, &ctx, &mut out)?;
        let text = String::from_utf8(out)?;
        assert_eq!(text, "| Name |\n| --- |\n| pipe\\|name |\n| dir |\n");
        Ok(())
    }
}
