//! Common types for Battleship: coordinates, cell status, shot results and
//! the error taxonomy shared by boards, placement and matches.

use thiserror::Error;

use crate::bitboard::BitBoardError;
use crate::config::{COLS, ROWS};

/// A cell position. `x` is the column, `y` the row.
///
/// Signed so that malformed client input can be represented and rejected
/// instead of wrapping around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns `true` if the coordinate lies on the board.
    pub fn in_bounds(&self) -> bool {
        (0..COLS as i32).contains(&self.x) && (0..ROWS as i32).contains(&self.y)
    }

    /// Row-major index into a shot grid (`y * COLS + x`), if in bounds.
    pub fn index(&self) -> Option<usize> {
        if self.in_bounds() {
            Some(self.y as usize * COLS as usize + self.x as usize)
        } else {
            None
        }
    }

    /// Inverse of [`Coordinate::index`].
    pub fn from_index(index: usize) -> Self {
        Self {
            x: (index % COLS as usize) as i32,
            y: (index / COLS as usize) as i32,
        }
    }

    /// Coordinate `steps` cells away along the given axis. Saturates at the
    /// `i32` range, which is far off the board.
    pub fn offset(&self, horizontal: bool, steps: i32) -> Self {
        if horizontal {
            Self::new(self.x.saturating_add(steps), self.y)
        } else {
            Self::new(self.x, self.y.saturating_add(steps))
        }
    }
}

impl core::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Status of a single cell in a shot grid. The discriminants are the wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ShotStatus {
    #[default]
    Untouched = 0,
    Miss = 1,
    Hit = 2,
}

impl ShotStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire code; unknown codes are treated as untouched.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => ShotStatus::Miss,
            2 => ShotStatus::Hit,
            _ => ShotStatus::Untouched,
        }
    }
}

/// Result of an accepted shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotResult {
    /// Shot landed in open water.
    Miss,
    /// Shot hit a ship that is still afloat.
    Hit,
    /// Shot hit the last intact cell of a ship, carrying its name.
    Sunk(&'static str),
}

impl ShotResult {
    pub fn is_hit(&self) -> bool {
        !matches!(self, ShotResult::Miss)
    }

    pub fn is_sunk(&self) -> bool {
        matches!(self, ShotResult::Sunk(_))
    }
}

/// Errors raised while laying out ships.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// At least one ship cell falls off the board.
    #[error("ship placement at {anchor} is out of bounds")]
    OutOfBounds { anchor: Coordinate },
    /// Ship would share a cell with an already placed ship.
    #[error("ship placement at {anchor} overlaps another ship")]
    Overlap { anchor: Coordinate },
    /// Ship length outside `1..=MAX_SHIP_LENGTH`.
    #[error("invalid ship size {0}")]
    InvalidSize(u8),
    /// Randomized placement ran out of retries. Fatal for match creation.
    #[error("unable to place fleet after {restarts} restarts")]
    Exhausted { restarts: usize },
}

/// Reasons a shot is rejected. A rejected shot never mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShotError {
    #[error("coordinate {0} is outside the board")]
    InvalidCoordinate(Coordinate),
    #[error("cell {0} has already been fired upon")]
    AlreadyFired(Coordinate),
    #[error("match is already over")]
    GameOver,
}

impl From<BitBoardError> for ShotError {
    fn from(err: BitBoardError) -> Self {
        match err {
            BitBoardError::OutOfBounds(coord) => ShotError::InvalidCoordinate(coord),
            BitBoardError::SizeTooLarge { .. } => {
                ShotError::InvalidCoordinate(Coordinate::new(-1, -1))
            }
        }
    }
}

impl From<BitBoardError> for PlacementError {
    fn from(err: BitBoardError) -> Self {
        match err {
            BitBoardError::OutOfBounds(anchor) => PlacementError::OutOfBounds { anchor },
            BitBoardError::SizeTooLarge { .. } => PlacementError::OutOfBounds {
                anchor: Coordinate::new(-1, -1),
            },
        }
    }
}
