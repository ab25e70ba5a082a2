//! One player's board: fleet placement and shot resolution.

use alloc::vec::Vec;
use core::fmt;

use crate::bitboard::CellMask;
use crate::common::{Coordinate, PlacementError, ShotError, ShotResult, ShotStatus};
use crate::config::CELL_COUNT;
use crate::ship::{Orientation, Ship, ShipType};

/// Ship placements plus the hit and miss history of incoming shots.
///
/// Invariants: every hit cell is occupied by exactly one ship, every miss
/// cell is unoccupied, and a cell is never both.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Board {
    ships: Vec<Ship>,
    occupied: CellMask,
    hits: CellMask,
    misses: CellMask,
}

impl Board {
    /// Create an empty board (no ships placed, no shots).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `ship`. Ships may touch but never share a cell.
    pub fn place(&mut self, ship: Ship) -> Result<(), PlacementError> {
        if !(self.occupied & ship.mask()).is_empty() {
            return Err(PlacementError::Overlap {
                anchor: ship.anchor(),
            });
        }
        self.occupied |= ship.mask();
        self.ships.push(ship);
        Ok(())
    }

    /// Build a ship from its parts and place it.
    pub fn place_at(
        &mut self,
        kind: ShipType,
        anchor: Coordinate,
        orientation: Orientation,
    ) -> Result<(), PlacementError> {
        self.place(Ship::new(kind, anchor, orientation)?)
    }

    /// Resolve a shot at `coord`.
    ///
    /// Rejected shots (off the board, or at a cell already fired upon) leave
    /// the board untouched.
    pub fn apply_shot(&mut self, coord: Coordinate) -> Result<ShotResult, ShotError> {
        if !coord.in_bounds() {
            return Err(ShotError::InvalidCoordinate(coord));
        }
        if self.hits.contains(coord)? || self.misses.contains(coord)? {
            return Err(ShotError::AlreadyFired(coord));
        }

        match self.ships.iter().find(|ship| ship.contains(coord)) {
            Some(ship) => {
                self.hits.insert(coord)?;
                if ship.is_sunk(&self.hits) {
                    Ok(ShotResult::Sunk(ship.kind().name()))
                } else {
                    Ok(ShotResult::Hit)
                }
            }
            None => {
                self.misses.insert(coord)?;
                Ok(ShotResult::Miss)
            }
        }
    }

    /// Returns `true` when every occupied cell has been hit.
    pub fn all_sunk(&self) -> bool {
        self.occupied.is_subset_of(&self.hits)
    }

    /// Status of a single cell.
    pub fn status_at(&self, coord: Coordinate) -> Result<ShotStatus, ShotError> {
        if self.hits.contains(coord)? {
            Ok(ShotStatus::Hit)
        } else if self.misses.contains(coord)? {
            Ok(ShotStatus::Miss)
        } else {
            Ok(ShotStatus::Untouched)
        }
    }

    /// Row-major shot grid in wire codes (0 untouched, 1 miss, 2 hit).
    pub fn shot_codes(&self) -> Vec<u8> {
        let mut codes = alloc::vec![ShotStatus::Untouched.code(); CELL_COUNT];
        for cell in self.misses.cells() {
            if let Some(idx) = cell.index() {
                codes[idx] = ShotStatus::Miss.code();
            }
        }
        for cell in self.hits.cells() {
            if let Some(idx) = cell.index() {
                codes[idx] = ShotStatus::Hit.code();
            }
        }
        codes
    }

    /// All placed ships in placement order.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Ships whose every cell has been hit.
    pub fn sunk_ships(&self) -> impl Iterator<Item = &Ship> + '_ {
        self.ships.iter().filter(move |ship| ship.is_sunk(&self.hits))
    }

    /// The ship covering `coord`, if any.
    pub fn ship_at(&self, coord: Coordinate) -> Option<&Ship> {
        self.ships.iter().find(|ship| ship.contains(coord))
    }

    /// Board occupancy mask of all ships.
    pub fn occupied(&self) -> CellMask {
        self.occupied
    }

    pub fn hits(&self) -> CellMask {
        self.hits
    }

    pub fn misses(&self) -> CellMask {
        self.misses
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  occupied: {:?},\n  hits: {:?},\n  misses: {:?},\n  ships: {:?}\n}}",
            self.occupied, self.hits, self.misses, self.ships
        )
    }
}
