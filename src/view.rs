//! Player-relative projections of a match.
//!
//! Projections are computed from the boards on every request and never
//! stored, so they cannot drift from the authoritative state.

use alloc::vec::Vec;

use crate::board::Board;
use crate::common::{Coordinate, ShotStatus};
use crate::config::CELL_COUNT;
use crate::game::{MatchStatus, Seat};
use crate::ship::Ship;

/// Wire shape of a ship: anchor, size and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipPlacement {
    pub x: i32,
    pub y: i32,
    pub size: u8,
    pub horizontal: bool,
}

impl From<&Ship> for ShipPlacement {
    fn from(ship: &Ship) -> Self {
        ShipPlacement {
            x: ship.anchor().x,
            y: ship.anchor().y,
            size: ship.size(),
            horizontal: ship.is_horizontal(),
        }
    }
}

impl ShipPlacement {
    pub fn cells(&self) -> impl Iterator<Item = Coordinate> + '_ {
        let anchor = Coordinate::new(self.x, self.y);
        (0..self.size as i32).map(move |i| anchor.offset(self.horizontal, i))
    }
}

/// Which of the viewer's two grids a projection describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GridOwner {
    /// The viewer's own board.
    Own,
    /// The opponent's board.
    Opponent,
}

/// Shot grid plus the ships the viewer is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GridView {
    /// Row-major wire codes, `ROWS * COLS` long.
    pub shots: Vec<u8>,
    pub ships: Vec<ShipPlacement>,
}

impl GridView {
    /// A grid with no shots and no visible ships.
    pub fn empty() -> Self {
        GridView {
            shots: alloc::vec![ShotStatus::Untouched.code(); CELL_COUNT],
            ships: Vec::new(),
        }
    }

    /// Full view of a board, for its owner.
    pub fn revealed(board: &Board) -> Self {
        GridView {
            shots: board.shot_codes(),
            ships: board.ships().iter().map(ShipPlacement::from).collect(),
        }
    }

    /// Opponent view of a board: shots, and only ships that are sunk.
    pub fn concealed(board: &Board) -> Self {
        GridView {
            shots: board.shot_codes(),
            ships: board.sunk_ships().map(ShipPlacement::from).collect(),
        }
    }

    pub fn status_at(&self, coord: Coordinate) -> ShotStatus {
        coord
            .index()
            .and_then(|idx| self.shots.get(idx))
            .map_or(ShotStatus::Untouched, |code| ShotStatus::from_code(*code))
    }

    /// Cells that have not been fired upon.
    pub fn untouched(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.shots
            .iter()
            .enumerate()
            .filter(|(_, code)| ShotStatus::from_code(**code) == ShotStatus::Untouched)
            .map(|(idx, _)| Coordinate::from_index(idx))
    }

    /// Whether any visible ship covers `coord`.
    pub fn has_ship_at(&self, coord: Coordinate) -> bool {
        self.ships.iter().any(|ship| ship.cells().any(|c| c == coord))
    }
}

/// One board of a match as seen by one player.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Whether it is the viewer's turn to shoot.
    pub turn: bool,
    pub grid: GridOwner,
    pub view: GridView,
    pub current_player: Seat,
    pub status: MatchStatus,
}
