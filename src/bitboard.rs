//! A fixed-size cell mask using const generics.
//!
//! The type is `no_std` friendly and avoids heap allocations. An `N×N` grid
//! is packed row-major into an unsigned integer `T`, so bit `y * N + x`
//! belongs to [`Coordinate`] `(x, y)`, the same order as the wire shot grid.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign};

use num_traits::{PrimInt, Unsigned, Zero};
use thiserror::Error;

use crate::common::Coordinate;
use crate::config::BOARD_SIZE;

/// Mask covering one game board.
pub type CellMask = BitBoard<u128, { BOARD_SIZE as usize }>;

/// Errors returned by bitboard operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitBoardError {
    /// Requested board size N*N exceeds capacity of `T::BITS`.
    #[error("{n}x{n} board exceeds capacity of {capacity} bits")]
    SizeTooLarge { n: usize, capacity: usize },
    /// Coordinate outside `[0, N)` on either axis.
    #[error("coordinate {0} is out of bounds")]
    OutOfBounds(Coordinate),
}

/// A fixed-size N×N bitboard stored in the unsigned integer `T`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BitBoard<T, const N: usize>
where
    T: PrimInt + Unsigned + Zero,
{
    bits: T,
}

impl<T, const N: usize> BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    /// Number of usable bits in the board (`N * N`).
    const BOARD_BITS: usize = N * N;

    /// Create a new empty bitboard without size check.
    #[inline]
    pub fn new() -> Self {
        BitBoard { bits: T::zero() }
    }

    /// Fallible constructor: returns `Err(SizeTooLarge)` if N*N > T::BITS.
    pub fn try_new() -> Result<Self, BitBoardError> {
        let capacity = core::mem::size_of::<T>() * 8;
        if Self::BOARD_BITS > capacity {
            Err(BitBoardError::SizeTooLarge { n: N, capacity })
        } else {
            Ok(Self::new())
        }
    }

    /// Build a mask from a list of cells.
    pub fn from_cells<I>(cells: I) -> Result<Self, BitBoardError>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut board = Self::new();
        for cell in cells {
            board.insert(cell)?;
        }
        Ok(board)
    }

    /// Returns the number of set cells.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns true if no cells are set.
    pub fn is_empty(&self) -> bool {
        self.bits.is_zero()
    }

    /// Returns whether `cell` is set.
    pub fn contains(&self, cell: Coordinate) -> Result<bool, BitBoardError> {
        let idx = Self::bit_index(cell)?;
        Ok(((self.bits >> idx) & T::one()) != T::zero())
    }

    /// Sets `cell`.
    pub fn insert(&mut self, cell: Coordinate) -> Result<(), BitBoardError> {
        let idx = Self::bit_index(cell)?;
        self.bits = self.bits | (T::one() << idx);
        Ok(())
    }

    /// Returns `true` if every cell set in `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        (self.bits & other.bits) == self.bits
    }

    /// Iterator over the set cells in row-major order.
    pub fn cells(&self) -> Cells<'_, T, N> {
        Cells {
            board: self,
            idx: 0,
        }
    }

    #[inline]
    fn bit_index(cell: Coordinate) -> Result<usize, BitBoardError> {
        let n = N as i32;
        if cell.x < 0 || cell.y < 0 || cell.x >= n || cell.y >= n {
            Err(BitBoardError::OutOfBounds(cell))
        } else {
            Ok(cell.y as usize * N + cell.x as usize)
        }
    }
}

impl<T, const N: usize> Default for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> fmt::Debug for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitBoard<{}, {}>:", core::any::type_name::<T>(), N)?;
        for y in 0..N {
            for x in 0..N {
                let bit = if ((self.bits >> (y * N + x)) & T::one()) != T::zero() {
                    '■'
                } else {
                    '□'
                };
                write!(f, "{} ", bit)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterator over the set cells of a bitboard.
#[derive(Clone, Copy)]
pub struct Cells<'a, T, const N: usize>
where
    T: PrimInt + Unsigned + Zero,
{
    board: &'a BitBoard<T, N>,
    idx: usize,
}

impl<T, const N: usize> Iterator for Cells<'_, T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Item = Coordinate;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.idx < N * N {
            let idx = self.idx;
            self.idx += 1;
            if ((self.board.bits >> idx) & T::one()) != T::zero() {
                return Some(Coordinate::new((idx % N) as i32, (idx / N) as i32));
            }
        }
        None
    }
}

impl<T, const N: usize> BitAnd for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        BitBoard {
            bits: self.bits & rhs.bits,
        }
    }
}

impl<T, const N: usize> BitOr for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        BitBoard {
            bits: self.bits | rhs.bits,
        }
    }
}

impl<T, const N: usize> BitOrAssign for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits = self.bits | rhs.bits;
    }
}
