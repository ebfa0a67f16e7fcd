//! Column building shared by the detailed layouts.
//!
//! A row is the list of detail [Cell]s of one entry (inode, permissions, size, owner,
//! group, times, git, repository, mime) followed by the name. Which columns exist is
//! decided by [Columns].

use crate::core::formatter::{
    format_attributes, format_file_size, format_file_time, format_octal_permissions,
};
use crate::core::{Entry, TimeType};
use crate::layout::{Columns, RenderContext};
use crate::ui::paint::{Align, Cell};

use std::io::{self, Write};

/// Separator between detail columns.
pub const COLUMN_GAP: &str = " ";

/// What a column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Inode,
    Octal,
    Permissions,
    Size,
    Owner,
    Group,
    Time(TimeType),
    Git,
    RepoStatus,
    RepoBranch,
    Mime,
    Name,
}

impl Field {
    /// Theme classifier of the column.
    pub fn classifier(self) -> &'static str {
        match self {
            Field::Inode => "inode",
            Field::Octal => "octal",
            Field::Permissions => "permission",
            Field::Size => "size",
            Field::Owner => "owner",
            Field::Group => "group",
            Field::Time(_) => "time",
            Field::Git => "git",
            Field::RepoStatus => "git_repo",
            Field::RepoBranch => "git_branch",
            Field::Mime => "mime",
            Field::Name => "file",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub header: &'static str,
    pub align: Align,
    pub field: Field,
}

const fn spec(header: &'static str, align: Align, field: Field) -> ColumnSpec {
    ColumnSpec {
        header,
        align,
        field,
    }
}

pub const NAME_COLUMN: ColumnSpec = spec("Name", Align::Left, Field::Name);

/// Detail columns in display order, the name column excluded.
pub fn column_specs(columns: &Columns) -> Vec<ColumnSpec> {
    let mut specs = Vec::with_capacity(12);
    if columns.inode {
        specs.push(spec("Inode", Align::Right, Field::Inode));
    }
    if columns.octal {
        specs.push(spec("Octal", Align::Left, Field::Octal));
    }
    if columns.long {
        specs.extend([
            spec("Permissions", Align::Left, Field::Permissions),
            spec("Size", Align::Right, Field::Size),
            spec("User", Align::Left, Field::Owner),
            spec("Group", Align::Left, Field::Group),
        ]);
    }
    for kind in columns.times.iter() {
        specs.push(spec(kind.header(), Align::Left, Field::Time(kind)));
    }
    if columns.git {
        specs.push(spec("Git", Align::Left, Field::Git));
    }
    if columns.repo_status {
        specs.push(spec("Repo", Align::Left, Field::RepoStatus));
    }
    if columns.repo_branch {
        specs.push(spec("Branch", Align::Left, Field::RepoBranch));
    }
    if columns.mime {
        specs.push(spec("Mime", Align::Left, Field::Mime));
    }
    specs
}

/// Unstyled value of one field.
pub fn field_text(field: Field, entry: &Entry, ctx: &RenderContext) -> String {
    match field {
        Field::Inode => entry.inode().to_string(),
        Field::Octal => format_octal_permissions(entry),
        Field::Permissions => format_attributes(entry),
        Field::Size => format_file_size(entry),
        Field::Owner => entry
            .owner()
            .map(str::to_string)
            .unwrap_or_else(|| entry.uid().to_string()),
        Field::Group => entry
            .group()
            .map(str::to_string)
            .unwrap_or_else(|| entry.gid().to_string()),
        Field::Time(kind) => format_file_time(entry.time(kind), &ctx.time_format),
        Field::Git => entry.git().symbol().to_string(),
        Field::RepoStatus => entry
            .repo()
            .map(|r| r.status_symbol().to_string())
            .unwrap_or_default(),
        Field::RepoBranch => entry
            .repo()
            .and_then(|r| r.branch.clone())
            .unwrap_or_default(),
        Field::Mime => entry.mime().unwrap_or("-").to_string(),
        Field::Name => entry.name().to_string(),
    }
}

/// Unstyled detail values of an entry, matching [column_specs].
pub fn detail_texts(entry: &Entry, ctx: &RenderContext) -> Vec<(Field, String)> {
    column_specs(&ctx.columns)
        .into_iter()
        .map(|s| (s.field, field_text(s.field, entry, ctx)))
        .collect()
}

/// Styled detail cells of an entry.
pub fn detail_cells(entry: &Entry, ctx: &RenderContext) -> Vec<Cell> {
    let painter = ctx.painter();
    detail_texts(entry, ctx)
        .into_iter()
        .map(|(field, text)| match field {
            Field::Git => painter.styled(&ctx.theme.git_style(entry.git()), &text),
            _ => painter.column(field.classifier(), &text),
        })
        .collect()
}

/// Detail cells plus the name, the full row of the long view.
pub fn row(entry: &Entry, ctx: &RenderContext) -> Vec<Cell> {
    let mut cells = detail_cells(entry, ctx);
    cells.push(ctx.painter().name_with_target(entry));
    cells
}

/// Column titles styled as headers, the name column included.
pub fn header_row(specs: &[ColumnSpec], ctx: &RenderContext) -> Vec<Cell> {
    let painter = ctx.painter();
    specs
        .iter()
        .map(|s| painter.column("header", s.header))
        .collect()
}

/// One cell holding the git symbol and the name, for layouts that have no columns.
pub fn compact(entry: &Entry, ctx: &RenderContext) -> Cell {
    let painter = ctx.painter();
    let mut cell = Cell::default();
    if ctx.columns.git {
        cell.push(&painter.styled(&ctx.theme.git_style(entry.git()), entry.git().symbol()));
        cell.push_str(" ");
    }
    cell.push(&painter.name(entry));
    cell
}

/// Widest cell of every column.
pub fn column_widths(rows: &[Vec<Cell>]) -> Vec<usize> {
    let mut widths: Vec<usize> = Vec::new();
    for row in rows {
        if widths.len() < row.len() {
            widths.resize(row.len(), 0);
        }
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }
    widths
}

/// Writes one row. The last cell is not padded so lines carry no trailing spaces.
pub fn write_row(
    out: &mut dyn Write,
    row: &[Cell],
    widths: &[usize],
    specs: &[ColumnSpec],
) -> io::Result<()> {
    let last = row.len().saturating_sub(1);
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            out.write_all(COLUMN_GAP.as_bytes())?;
        }
        if i == last {
            out.write_all(cell.text().as_bytes())?;
        } else {
            let align = specs.get(i).map(|s| s.align).unwrap_or(Align::Left);
            cell.write_padded(out, widths.get(i).copied().unwrap_or(0), align)?;
        }
    }
    Ok(())
}
