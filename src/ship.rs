//! Ship definitions and placement geometry using our `BitBoard`.

use core::fmt;

use crate::bitboard::CellMask;
use crate::common::{Coordinate, PlacementError};
use crate::config::MAX_SHIP_LENGTH;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn is_horizontal(self) -> bool {
        self == Orientation::Horizontal
    }

    pub fn from_horizontal(horizontal: bool) -> Self {
        if horizontal {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }
}

/// Type of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipType {
    name: &'static str,
    length: u8,
}

impl ShipType {
    /// Create a new ship type.
    pub const fn new(name: &'static str, length: u8) -> Self {
        Self { name, length }
    }

    /// Ship's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ship's length.
    pub fn length(&self) -> u8 {
        self.length
    }
}

/// A ship placed on the board. Immutable once built; whether it is sunk is
/// derived from the owning board's hit mask.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ship {
    kind: ShipType,
    anchor: Coordinate,
    orientation: Orientation,
    mask: CellMask,
}

impl Ship {
    /// Lay `kind` out from `anchor` along `orientation`.
    ///
    /// Fails if the length is outside `1..=MAX_SHIP_LENGTH` or any cell is
    /// off the board.
    pub fn new(
        kind: ShipType,
        anchor: Coordinate,
        orientation: Orientation,
    ) -> Result<Self, PlacementError> {
        let len = kind.length();
        if len == 0 || len > MAX_SHIP_LENGTH {
            return Err(PlacementError::InvalidSize(len));
        }
        if !anchor.in_bounds() {
            return Err(PlacementError::OutOfBounds { anchor });
        }
        let tail = anchor.offset(orientation.is_horizontal(), len as i32 - 1);
        if !tail.in_bounds() {
            return Err(PlacementError::OutOfBounds { anchor });
        }

        let cells = (0..len as i32).map(|i| anchor.offset(orientation.is_horizontal(), i));
        let mask = CellMask::from_cells(cells)?;
        Ok(Ship {
            kind,
            anchor,
            orientation,
            mask,
        })
    }

    /// Ship's type.
    pub fn kind(&self) -> ShipType {
        self.kind
    }

    /// Number of cells the ship occupies.
    pub fn size(&self) -> u8 {
        self.kind.length()
    }

    pub fn anchor(&self) -> Coordinate {
        self.anchor
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation.is_horizontal()
    }

    /// Occupancy mask of the ship on the board.
    pub fn mask(&self) -> CellMask {
        self.mask
    }

    /// Cells from the anchor towards the tail.
    pub fn cells(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.size() as i32).map(move |i| self.anchor.offset(self.is_horizontal(), i))
    }

    pub fn contains(&self, cell: Coordinate) -> bool {
        self.mask.contains(cell).unwrap_or(false)
    }

    /// A ship is sunk once every one of its cells is in `hits`.
    pub fn is_sunk(&self, hits: &CellMask) -> bool {
        self.mask.is_subset_of(hits)
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ name: \"{}\", anchor: {}, orientation: {:?}, size: {} }}",
            self.kind.name(),
            self.anchor,
            self.orientation,
            self.size(),
        )
    }
}
