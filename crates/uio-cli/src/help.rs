use crate::command::Command;

const HEADING: &str = "Commands:\n\n";

/// Cells are padded to the widest cell of their column plus this many spaces.
const PADDING: usize = 4;

/// The command listing: a blank first column, the names, then the short
/// descriptions, aligned like tab stops.
pub(crate) fn listing(commands: &[Command]) -> String {
    let rows: Vec<[&str; 2]> = commands
        .iter()
        .map(|cmd| ["", cmd.name()])
        .collect();

    let widths = column_widths(&rows);

    let mut out = String::from(HEADING);
    for (row, cmd) in rows.iter().zip(commands) {
        for (cell, width) in row.iter().zip(widths) {
            out.push_str(cell);
            out.extend(std::iter::repeat(' ').take(width - cell.chars().count()));
        }
        out.push_str(cmd.short());
        out.push('\n');
    }
    out
}

fn column_widths<const N: usize>(rows: &[[&str; N]]) -> [usize; N] {
    let mut widths = [1; N];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count() + PADDING);
        }
    }
    widths
}
