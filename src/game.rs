//! The authoritative state machine for one match.

use core::fmt;

use rand::Rng;

use crate::board::Board;
use crate::common::{Coordinate, PlacementError, ShotError, ShotResult};
use crate::placement::generate_fleet;
use crate::view::{GameState, GridOwner, GridView};

/// Identifier assigned to a match by the orchestrator.
pub type MatchId = u64;

/// One of the two players of a match. Serialized as `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(into = "u8", try_from = "u8"))]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::First, Seat::Second];

    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Seat> {
        match index {
            0 => Some(Seat::First),
            1 => Some(Seat::Second),
            _ => None,
        }
    }

    /// The opposing seat.
    pub fn other(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> u8 {
        seat.index() as u8
    }
}

impl TryFrom<u8> for Seat {
    type Error = InvalidSeat;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Seat::from_index(value as usize).ok_or(InvalidSeat(value))
    }
}

/// A player index other than 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid player index {0}")]
pub struct InvalidSeat(pub u8);

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Current status of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchStatus {
    InProgress,
    GameOver,
}

/// Two boards, the turn pointer and the outcome of one game.
///
/// `P` is the opaque identifier the orchestrator uses for each player
/// (a connection id on the server, a name in tests).
///
/// # Caller contract
///
/// [`Match::shoot`] takes no player argument: it always fires on behalf of
/// [`Match::current_player`] at the opponent's board. Callers must check
/// that the requesting player owns the turn before calling it.
#[derive(Clone)]
pub struct Match<P> {
    id: MatchId,
    players: [P; 2],
    boards: [Board; 2],
    current: Seat,
    status: MatchStatus,
    winner: Option<Seat>,
}

impl<P> Match<P> {
    /// Start a match with freshly generated fleets from the thread RNG.
    #[cfg(feature = "std")]
    pub fn new(id: MatchId, player0: P, player1: P) -> Result<Self, PlacementError> {
        Self::with_rng(id, player0, player1, &mut rand::rng())
    }

    /// Start a match with fleets drawn from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        id: MatchId,
        player0: P,
        player1: P,
        rng: &mut R,
    ) -> Result<Self, PlacementError> {
        let first = generate_fleet(rng)?;
        let second = generate_fleet(rng)?;
        Ok(Self::from_boards(id, player0, player1, [first, second]))
    }

    /// Start a match on already placed boards. Seat 0 moves first.
    pub fn from_boards(id: MatchId, player0: P, player1: P, boards: [Board; 2]) -> Self {
        log::debug!("match {} created", id);
        Match {
            id,
            players: [player0, player1],
            boards,
            current: Seat::First,
            status: MatchStatus::InProgress,
            winner: None,
        }
    }

    /// Fire at the opponent of the current player. Returns `true` if the
    /// shot was accepted and applied.
    ///
    /// Rejected shots change nothing and do not consume the turn.
    pub fn shoot(&mut self, coord: Coordinate) -> bool {
        match self.try_shoot(coord) {
            Ok(_) => true,
            Err(err) => {
                log::debug!("match {}: shot rejected: {}", self.id, err);
                false
            }
        }
    }

    /// Detailed form of [`Match::shoot`].
    pub fn try_shoot(&mut self, coord: Coordinate) -> Result<ShotResult, ShotError> {
        if self.status == MatchStatus::GameOver {
            return Err(ShotError::GameOver);
        }
        let shooter = self.current;
        let target = &mut self.boards[shooter.other().index()];
        let result = target.apply_shot(coord)?;

        if target.all_sunk() {
            self.status = MatchStatus::GameOver;
            self.winner = Some(shooter);
            log::info!("match {}: fleet destroyed, player {} wins", self.id, shooter);
        } else {
            self.current = shooter.other();
        }
        Ok(result)
    }

    /// End the match with `forfeiting` as the loser, whatever the boards say.
    pub fn abort_game(&mut self, forfeiting: Seat) {
        self.status = MatchStatus::GameOver;
        self.winner = Some(forfeiting.other());
        log::info!(
            "match {}: player {} forfeited, player {} wins",
            self.id,
            forfeiting,
            forfeiting.other()
        );
    }

    /// Project `owner`'s board as seen by `viewer`.
    ///
    /// A player sees all of their own ships; on the opponent's board only
    /// shots and fully sunk ships are visible.
    pub fn game_state(&self, viewer: Seat, owner: Seat) -> GameState {
        let board = &self.boards[owner.index()];
        let (grid, view) = if viewer == owner {
            (GridOwner::Own, GridView::revealed(board))
        } else {
            (GridOwner::Opponent, GridView::concealed(board))
        };
        GameState {
            turn: self.status == MatchStatus::InProgress && self.current == viewer,
            grid,
            view,
            current_player: self.current,
            status: self.status,
        }
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn current_player(&self) -> Seat {
        self.current
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status == MatchStatus::GameOver
    }

    /// Winning seat, once the match is over.
    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    pub fn board(&self, seat: Seat) -> &Board {
        &self.boards[seat.index()]
    }

    pub fn player_id(&self, seat: Seat) -> &P {
        &self.players[seat.index()]
    }

    pub fn winner_id(&self) -> Option<&P> {
        self.winner.map(|seat| self.player_id(seat))
    }

    pub fn loser_id(&self) -> Option<&P> {
        self.winner.map(|seat| self.player_id(seat.other()))
    }
}

impl<P: PartialEq> Match<P> {
    /// Seat of the player with identifier `id`.
    pub fn seat_of(&self, id: &P) -> Option<Seat> {
        Seat::BOTH
            .into_iter()
            .find(|seat| self.players[seat.index()] == *id)
    }
}

impl<P: fmt::Debug> fmt::Debug for Match<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("id", &self.id)
            .field("players", &self.players)
            .field("current", &self.current)
            .field("status", &self.status)
            .field("winner", &self.winner)
            .finish_non_exhaustive()
    }
}
