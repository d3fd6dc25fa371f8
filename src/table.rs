//! Plain-text grid layout for lists of short strings.

use crate::error::{Result, SteamError};

/// Lay `items` out row-major in `columns` columns.
///
/// Every cell is left-padded to the widest entry of its column, and cells are
/// joined by `spacing` spaces, `separator`, then `spacing` spaces again. A
/// trailing partial row holds only the items that are left.
///
/// # Arguments
/// * `items` - Cells in reading order
/// * `columns` - Cells per row, must be at least 1
/// * `separator` - Text placed between two cells
/// * `spacing` - Spaces on each side of the separator
///
/// # Returns
/// * `Result<Vec<String>>` - One string per row
pub fn format_table<S: AsRef<str>>(
    items: &[S],
    columns: usize,
    separator: &str,
    spacing: usize,
) -> Result<Vec<String>> {
    if columns == 0 {
        return Err(SteamError::InvalidArgument(
            "table needs at least one column".to_string(),
        ));
    }

    let mut widths = vec![0usize; columns];
    for (i, item) in items.iter().enumerate() {
        let width = item.as_ref().chars().count();
        widths[i % columns] = widths[i % columns].max(width);
    }

    let pad = " ".repeat(spacing);
    let joiner = format!("{pad}{separator}{pad}");

    let rows = items
        .chunks(columns)
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:>width$}", cell.as_ref(), width = *width))
                .collect::<Vec<_>>()
                .join(&joiner)
        })
        .collect();

    Ok(rows)
}
