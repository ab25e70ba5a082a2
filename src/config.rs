use crate::ship::ShipType;

/// Width and height of every board. Part of the wire contract.
pub const BOARD_SIZE: u8 = 10;
pub const ROWS: u8 = BOARD_SIZE;
pub const COLS: u8 = BOARD_SIZE;
/// Number of cells in a board, i.e. the length of a projected shot grid.
pub const CELL_COUNT: usize = ROWS as usize * COLS as usize;

pub const NUM_SHIPS: usize = 5;
/// The fixed roster placed on every board, largest first.
pub const SHIPS: [ShipType; NUM_SHIPS] = [
    ShipType::new("Carrier", 5),
    ShipType::new("Battleship", 4),
    ShipType::new("Cruiser", 3),
    ShipType::new("Submarine", 3),
    ShipType::new("Destroyer", 2),
];

/// Total number of ship segments used in the standard configuration.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Longest ship a board accepts.
pub const MAX_SHIP_LENGTH: u8 = 5;

/// Random anchors tried per ship before the whole layout is restarted.
pub const PLACEMENT_ATTEMPTS_PER_SHIP: usize = 1000;
/// Empty-board restarts before fleet generation gives up.
pub const PLACEMENT_RESTARTS: usize = 16;

/// Look up the roster entry with the given name.
pub fn ship_type_by_name(name: &str) -> Option<ShipType> {
    SHIPS.iter().copied().find(|def| def.name() == name)
}
