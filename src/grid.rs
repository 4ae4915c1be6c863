use std::io::{self, Write};

use crate::color::{colored_name, visible_width};
use crate::entry::Entry;

/// Column count and width for one grid rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub columns: usize,
    pub width: usize,
}

impl ColumnLayout {
    /// Fit names whose longest visible length is `max_len` into `term_width`.
    pub fn compute(max_len: usize, term_width: usize) -> ColumnLayout {
        if max_len == 0 {
            return ColumnLayout {
                columns: 1,
                width: term_width,
            };
        }

        let mut columns = (term_width / (max_len + 1)).max(1);
        let mut width = term_width / columns;

        // grow while the slack could hold another column
        while columns > 1 && columns * (max_len + 2) < term_width {
            columns += 1;
            width = term_width / columns;
        }

        // shrink until the longest name plus a gutter fits
        while columns > 1 && width < max_len + 1 {
            columns -= 1;
            width = term_width / columns;
        }

        ColumnLayout { columns, width }
    }
}

/// Write names row-major, padded to the column width.
pub fn write_cells<W: Write>(out: &mut W, cells: &[String], term_width: usize) -> io::Result<()> {
    let widths: Vec<usize> = cells.iter().map(|c| visible_width(c)).collect();
    let max_len = widths.iter().copied().max().unwrap_or(0);
    let layout = ColumnLayout::compute(max_len, term_width);

    for (i, (cell, width)) in cells.iter().zip(&widths).enumerate() {
        out.write_all(cell.as_bytes())?;
        let end_of_row = i % layout.columns == layout.columns - 1;
        if end_of_row || i == cells.len() - 1 {
            writeln!(out)?;
        } else {
            let padding = layout.width.saturating_sub(*width);
            write!(out, "{:padding$}", "", padding = padding)?;
        }
    }
    Ok(())
}

/// Short-form output for a listing.
pub fn write_grid<W: Write>(out: &mut W, entries: &[Entry], term_width: usize) -> io::Result<()> {
    let cells: Vec<String> = entries.iter().map(colored_name).collect();
    write_cells(out, &cells, term_width)
}
