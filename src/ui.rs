use std::fmt::Write;

use crate::common::{Coordinate, ShotStatus};
use crate::config::{COLS, ROWS};
use crate::view::{GridOwner, GridView};

/// Human label for a cell, e.g. `A5` for `(0, 4)`. Off-board cells keep
/// their raw `(x, y)` form.
pub fn coord_label(coord: Coordinate) -> String {
    if !coord.in_bounds() {
        return coord.to_string();
    }
    let col = (b'A' + coord.x as u8) as char;
    format!("{}{}", col, coord.y + 1)
}

/// Parse a label such as `A5` or `j10` into a coordinate.
pub fn parse_coord(input: &str) -> Result<Coordinate, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty input".to_string());
    }
    if input.len() < 2 {
        return Err("Too short - need column letter and row number (e.g., A5)".to_string());
    }
    let mut chars = input.chars();
    let col_ch = chars.next().ok_or("No column letter")?.to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("Invalid column '{}' - must be a letter A-J", col_ch));
    }
    let col = (col_ch as u8 - b'A') as usize;
    if col >= COLS as usize {
        return Err(format!("Column '{}' out of bounds - must be A-J", col_ch));
    }
    let row_str: String = chars.collect();
    let row: usize = row_str
        .parse()
        .map_err(|_| format!("Invalid row '{}' - must be a number 1-10", row_str))?;
    if row == 0 || row > ROWS as usize {
        return Err(format!("Row {} out of bounds - must be 1-10", row));
    }
    Ok(Coordinate::new(col as i32, row as i32 - 1))
}

/// Draw one grid. Ships are drawn wherever the view shows them.
pub fn render_grid(view: &GridView, owner: GridOwner) -> String {
    let mut out = String::new();
    let title = match owner {
        GridOwner::Own => "Your fleet",
        GridOwner::Opponent => "Enemy waters",
    };
    let _ = writeln!(out, "    {}", title);
    out.push_str("    ╔═══════════════════════╗\n");
    out.push_str("    ║  ");
    for c in 0..COLS {
        let _ = write!(out, " {}", (b'A' + c) as char);
    }
    out.push_str(" ║\n");
    out.push_str("    ╠═══════════════════════╣\n");
    for y in 0..ROWS {
        let _ = write!(out, "    ║ {:2}", y as u32 + 1);
        for x in 0..COLS {
            let coord = Coordinate::new(x as i32, y as i32);
            let ch = match view.status_at(coord) {
                ShotStatus::Hit => 'X',
                ShotStatus::Miss => 'o',
                ShotStatus::Untouched if view.has_ship_at(coord) => 'S',
                ShotStatus::Untouched => '.',
            };
            let _ = write!(out, " {}", ch);
        }
        out.push_str(" ║\n");
    }
    out.push_str("    ╚═══════════════════════╝\n");
    match owner {
        GridOwner::Own => out.push_str("    Legend: S=Ship  X=Hit  o=Miss  .=Water\n"),
        GridOwner::Opponent => out.push_str("    Legend: S=Sunk  X=Hit  o=Miss  .=Unknown\n"),
    }
    out
}

pub fn print_grids(own: &GridView, opponent: &GridView) {
    println!("{}", render_grid(own, GridOwner::Own));
    println!("{}", render_grid(opponent, GridOwner::Opponent));
}
