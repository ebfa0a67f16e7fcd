//! Grid layouts: names in columns, filled down then across ([GridLayout]) or across
//! then down ([AcrossLayout]).
//!
//! The column count is the largest one whose column widths plus separators fit the
//! terminal width. When not even a single column fits the listing degrades to one entry
//! per line.

use crate::core::Section;
use crate::error::ListError;
use crate::layout::{Layout, Listing, RenderContext, SectionLayout, cells, render_sections};
use crate::ui::paint::{Align, Cell};

use std::io::{self, Write};

/// Spaces between two grid columns.
pub const GRID_GAP: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fill {
    Down,
    Across,
}

/// Column layout chosen for a set of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPlan {
    pub rows: usize,
    pub cols: usize,
    pub widths: Vec<usize>,
}

impl GridPlan {
    pub fn line_width(&self) -> usize {
        self.widths.iter().sum::<usize>() + GRID_GAP * self.widths.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GridLayout;

#[derive(Debug, Clone, Copy, Default)]
pub struct AcrossLayout;

impl SectionLayout for GridLayout {
    fn render_section(
        &self,
        section: &Section,
        ctx: &RenderContext,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        render_grid(section, ctx, out, Fill::Down)
    }
}

impl Layout for GridLayout {
    fn render(&self, listing: &Listing, ctx: &RenderContext, out: &mut dyn Write) -> io::Result<()> {
        render_sections(self, listing, ctx, out)
    }
}

impl SectionLayout for AcrossLayout {
    fn render_section(
        &self,
        section: &Section,
        ctx: &RenderContext,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        render_grid(section, ctx, out, Fill::Across)
    }
}

impl Layout for AcrossLayout {
    fn render(&self, listing: &Listing, ctx: &RenderContext, out: &mut dyn Write) -> io::Result<()> {
        render_sections(self, listing, ctx, out)
    }
}

fn render_grid(
    section: &Section,
    ctx: &RenderContext,
    out: &mut dyn Write,
    fill: Fill,
) -> io::Result<()> {
    let cells: Vec<Cell> = section
        .entries()
        .iter()
        .map(|e| cells::compact(e, ctx))
        .collect();
    let widths: Vec<usize> = cells.iter().map(Cell::width).collect();
    let plan = match fill {
        Fill::Down => plan_down(&widths, ctx.width),
        Fill::Across => plan_across(&widths, ctx.width),
    };
    write_plan(&cells, &plan, fill, out)
}

/// Plans a down-then-across grid.
pub fn plan_down(widths: &[usize], max_width: usize) -> GridPlan {
    plan(widths, max_width, Fill::Down)
}

/// Plans an across-then-down grid.
pub fn plan_across(widths: &[usize], max_width: usize) -> GridPlan {
    plan(widths, max_width, Fill::Across)
}

fn plan(widths: &[usize], max_width: usize, fill: Fill) -> GridPlan {
    let n = widths.len();
    if n == 0 {
        return GridPlan {
            rows: 0,
            cols: 0,
            widths: Vec::new(),
        };
    }

    // no more columns than could fit if every entry were the narrowest one
    let narrowest = widths.iter().copied().min().unwrap_or(0).max(1);
    let upper = (max_width / (narrowest + GRID_GAP) + 1).clamp(1, n);

    for cols in (2..=upper).rev() {
        let rows = n.div_ceil(cols);
        // down fill may need fewer columns than asked for
        let cols = match fill {
            Fill::Down => n.div_ceil(rows),
            Fill::Across => cols,
        };
        let candidate = GridPlan {
            rows,
            cols,
            widths: column_widths(widths, rows, cols, fill),
        };
        if candidate.line_width() <= max_width {
            return candidate;
        }
    }

    let widest = widths.iter().copied().max().unwrap_or(0);
    if widest > max_width {
        let err = ListError::UnsupportedLayoutWidth {
            width: max_width,
            needed: widest,
        };
        tracing::debug!("{}, using one column", err);
    }
    GridPlan {
        rows: n,
        cols: 1,
        widths: vec![widest],
    }
}

fn index(row: usize, col: usize, rows: usize, cols: usize, fill: Fill) -> usize {
    match fill {
        Fill::Down => col * rows + row,
        Fill::Across => row * cols + col,
    }
}

fn column_widths(widths: &[usize], rows: usize, cols: usize, fill: Fill) -> Vec<usize> {
    let mut out = vec![0; cols];
    for (col, w) in out.iter_mut().enumerate() {
        for row in 0..rows {
            if let Some(cell) = widths.get(index(row, col, rows, cols, fill)) {
                *w = (*w).max(*cell);
            }
        }
    }
    out
}

fn write_plan(cells: &[Cell], plan: &GridPlan, fill: Fill, out: &mut dyn Write) -> io::Result<()> {
    for row in 0..plan.rows {
        let line: Vec<&Cell> = (0..plan.cols)
            .filter_map(|col| cells.get(index(row, col, plan.rows, plan.cols, fill)))
            .collect();
        let last = line.len().saturating_sub(1);
        for (col, cell) in line.iter().enumerate() {
            if col == last {
                out.write_all(cell.text().as_bytes())?;
            } else {
                cell.write_padded(out, plan.widths[col] + GRID_GAP, Align::Left)?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::core::{Entry, EntryKind};

    fn render(kind: &dyn SectionLayout, names: &[&str], width: usize) -> String {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme, width);
        let entries = names
            .iter()
            .map(|n| Entry::new(*n, EntryKind::File, 0))
            .collect();
        let section = Section::new(None, entries);
        let mut out = Vec::new();
        kind.render_section(&section, &ctx, &mut out)
            .map(|_| String::from_utf8_lossy(&out).into_owned())
            .unwrap_or_default()
    }

    #[test]
    fn down_fills_columns_first() {
        let out = render(&GridLayout, &["a", "b", "c", "d", "e"], 9);
        assert_eq!(out, "a  c  e\nb  d\n");
    }

    #[test]
    fn across_fills_rows_first() {
        let out = render(&AcrossLayout, &["a", "b", "c", "d", "e"], 7);
        assert_eq!(out, "a  b  c\nd  e\n");
    }

    #[test]
    fn everything_on_one_line_when_it_fits() {
        let out = render(&GridLayout, &["one", "two"], 80);
        assert_eq!(out, "one  two\n");
    }

    #[test]
    fn too_wide_entry_degrades_to_one_column() {
        let plan = plan_down(&[30, 2, 2], 10);
        assert_eq!(plan.cols, 1);
        assert_eq!(plan.rows, 3);
    }

    #[test]
    fn down_plan_drops_empty_columns() {
        // 4 entries asked in 3 columns need 2 rows, which only fill 2 columns
        let plan = plan_down(&[1, 1, 1, 1], 7);
        assert_eq!((plan.rows, plan.cols), (2, 2));
    }
}
