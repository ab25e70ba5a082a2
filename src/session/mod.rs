//! Session orchestration: the waiting room, the registry of connections, and
//! routing of shot, chat and leave requests into matches.
//!
//! [`Lobby`] is synchronous and owns all shared state. Every operation
//! returns the messages to deliver instead of sending them, so the caller
//! decides how to reach each connection and the pairing of waiting players
//! happens atomically with respect to every other event.

pub mod callsign;
pub mod chat;

use std::collections::{HashMap, VecDeque};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::common::Coordinate;
use crate::game::{Match, MatchId, Seat};
use crate::protocol::Message;

use self::callsign::{call_signs, PIRATE_NAMES};
use self::chat::escape_html;

/// Server-assigned identifier of one client connection.
pub type ConnectionId = u64;

/// A message addressed to one connection.
pub type Delivery = (ConnectionId, Message);

/// Match creation is retried this many times on a fatal placement error
/// before the pair goes back to the waiting room.
const MATCH_CREATION_ATTEMPTS: usize = 3;

const FALLBACK_NAME: &str = "Unknown Corsair";

/// What the lobby knows about one connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    name: Option<String>,
    game: Option<(MatchId, Seat)>,
}

impl Session {
    /// Call sign for the current match.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Match and seat this connection currently plays in.
    pub fn game(&self) -> Option<(MatchId, Seat)> {
        self.game
    }
}

pub struct Lobby {
    sessions: HashMap<ConnectionId, Session>,
    waiting: VecDeque<ConnectionId>,
    matches: HashMap<MatchId, Match<ConnectionId>>,
    next_match_id: MatchId,
    rng: SmallRng,
}

impl Lobby {
    pub fn new(rng: SmallRng) -> Self {
        Self {
            sessions: HashMap::new(),
            waiting: VecDeque::new(),
            matches: HashMap::new(),
            next_match_id: 1,
            rng,
        }
    }

    /// Lobby with a reproducible RNG.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    /// Lobby seeded from the thread RNG.
    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_rng(&mut rand::rng()))
    }

    /// Register a new connection, put it in the waiting room and pair it if
    /// someone is already waiting.
    pub fn connect(&mut self, conn: ConnectionId) -> Vec<Delivery> {
        if self.sessions.contains_key(&conn) {
            log::warn!("connection {} registered twice", conn);
            return Vec::new();
        }
        log::info!("connection {} joined the waiting room", conn);
        self.sessions.insert(conn, Session::default());
        self.waiting.push_back(conn);

        let mut out = Vec::new();
        self.pair_waiting(&mut out);
        out
    }

    /// Route one inbound message.
    pub fn handle(&mut self, conn: ConnectionId, msg: Message) -> Vec<Delivery> {
        match msg {
            Message::Shot { x, y } => self.shoot(conn, Coordinate::new(x, y)),
            Message::Chat(text) => self.chat(conn, &text),
            Message::Leave => self.leave(conn),
            other => {
                log::debug!("ignoring {} message from connection {}", other.kind(), conn);
                Vec::new()
            }
        }
    }

    /// Fire on behalf of `conn`.
    ///
    /// Shots from players not in a match, out of turn, after game over, or
    /// rejected by the match produce no deliveries.
    pub fn shoot(&mut self, conn: ConnectionId, coord: Coordinate) -> Vec<Delivery> {
        let Some((match_id, seat)) = self.sessions.get(&conn).and_then(Session::game) else {
            log::debug!("connection {} fired outside a match", conn);
            return Vec::new();
        };
        let Some(game) = self.matches.get_mut(&match_id) else {
            return Vec::new();
        };
        if game.is_over() {
            log::debug!("match {}: shot from {} after game over", match_id, conn);
            return Vec::new();
        }
        if game.current_player() != seat {
            log::debug!("match {}: connection {} fired out of turn", match_id, conn);
            return Vec::new();
        }
        if !game.shoot(coord) {
            return Vec::new();
        }

        let target = seat.other();
        let mut out = Vec::new();
        game_over_signals(game, &mut out);
        out.push((conn, Message::Update(game.game_state(seat, target))));
        out.push((
            *game.player_id(target),
            Message::Update(game.game_state(target, target)),
        ));
        out
    }

    /// Relay a chat line to both players of `conn`'s match.
    pub fn chat(&mut self, conn: ConnectionId, text: &str) -> Vec<Delivery> {
        let Some(session) = self.sessions.get(&conn) else {
            return Vec::new();
        };
        let Some((match_id, seat)) = session.game else {
            return Vec::new();
        };
        if text.is_empty() {
            return Vec::new();
        }
        let Some(game) = self.matches.get(&match_id) else {
            return Vec::new();
        };

        let name = session.name.as_deref().unwrap_or(FALLBACK_NAME);
        log::debug!("match {}: chat from {} ({}): {}", match_id, conn, name, text);
        let message = escape_html(text).into_owned();
        let mut out = Vec::with_capacity(2);
        let opponent = *game.player_id(seat.other());
        if self.is_seated(opponent, match_id, seat.other()) {
            out.push((
                opponent,
                Message::ChatMessage {
                    name: name.to_string(),
                    message: message.clone(),
                },
            ));
        }
        out.push((
            conn,
            Message::ChatMessage {
                name: format!("{} (You)", name),
                message,
            },
        ));
        out
    }

    /// Leave the current match, forfeiting it if unfinished, and queue again.
    pub fn leave(&mut self, conn: ConnectionId) -> Vec<Delivery> {
        if !self.sessions.get(&conn).is_some_and(|s| s.game.is_some()) {
            return Vec::new();
        }
        let mut out = Vec::new();
        self.leave_game(conn, &mut out);
        self.waiting.push_back(conn);
        self.pair_waiting(&mut out);
        out
    }

    /// Forget `conn`, forfeiting its match if unfinished.
    pub fn disconnect(&mut self, conn: ConnectionId) -> Vec<Delivery> {
        log::info!("connection {} disconnected", conn);
        let mut out = Vec::new();
        self.leave_game(conn, &mut out);
        self.sessions.remove(&conn);
        self.waiting.retain(|waiting| *waiting != conn);
        out
    }

    pub fn session(&self, conn: ConnectionId) -> Option<&Session> {
        self.sessions.get(&conn)
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match<ConnectionId>> {
        self.matches.get(&id)
    }

    /// The match `conn` is currently seated in.
    pub fn match_of(&self, conn: ConnectionId) -> Option<&Match<ConnectionId>> {
        let (id, _) = self.sessions.get(&conn)?.game?;
        self.matches.get(&id)
    }

    /// Connections waiting for an opponent, in arrival order.
    pub fn waiting(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.waiting.iter().copied()
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Whether `conn` still occupies `seat` of match `match_id`.
    fn is_seated(&self, conn: ConnectionId, match_id: MatchId, seat: Seat) -> bool {
        self.sessions.get(&conn).and_then(Session::game) == Some((match_id, seat))
    }

    fn leave_game(&mut self, conn: ConnectionId, out: &mut Vec<Delivery>) {
        let Some(session) = self.sessions.get_mut(&conn) else {
            return;
        };
        let Some((match_id, seat)) = session.game.take() else {
            return;
        };
        session.name = None;
        log::info!("connection {} left match {}", conn, match_id);

        let Some(opponent) = self.matches.get(&match_id).map(|game| *game.player_id(seat.other()))
        else {
            return;
        };
        let opponent_seated = self.is_seated(opponent, match_id, seat.other());
        let Some(game) = self.matches.get_mut(&match_id) else {
            return;
        };

        if opponent_seated {
            out.push((
                opponent,
                Message::Notification {
                    message: "Opponent has left the game".to_string(),
                },
            ));
        }
        if !game.is_over() {
            game.abort_game(seat);
            game_over_signals(game, out);
        }
        out.push((conn, Message::Left));

        if !opponent_seated {
            self.matches.remove(&match_id);
            log::debug!("match {} closed", match_id);
        }
    }

    fn pair_waiting(&mut self, out: &mut Vec<Delivery>) {
        while self.waiting.len() >= 2 {
            let (Some(first), Some(second)) = (self.waiting.pop_front(), self.waiting.pop_front())
            else {
                break;
            };
            if !self.start_match(first, second, out) {
                self.waiting.push_front(second);
                self.waiting.push_front(first);
                break;
            }
        }
    }

    fn start_match(
        &mut self,
        first: ConnectionId,
        second: ConnectionId,
        out: &mut Vec<Delivery>,
    ) -> bool {
        let id = self.next_match_id;
        let mut game = None;
        for attempt in 1..=MATCH_CREATION_ATTEMPTS {
            match Match::with_rng(id, first, second, &mut self.rng) {
                Ok(created) => {
                    game = Some(created);
                    break;
                }
                Err(err) => log::error!(
                    "creating match {} for {} and {} failed (attempt {}): {}",
                    id,
                    first,
                    second,
                    attempt,
                    err
                ),
            }
        }
        let Some(game) = game else {
            return false;
        };
        self.next_match_id += 1;

        let [first_name, second_name] = call_signs(&mut self.rng, &PIRATE_NAMES);
        for (conn, seat, name) in [
            (first, Seat::First, &first_name),
            (second, Seat::Second, &second_name),
        ] {
            let session = self.sessions.entry(conn).or_default();
            session.name = Some(name.clone());
            session.game = Some((id, seat));
        }

        out.push((
            first,
            Message::Join {
                game_id: id,
                self_name: first_name.clone(),
                opponent_name: second_name.clone(),
            },
        ));
        out.push((
            second,
            Message::Join {
                game_id: id,
                self_name: second_name.clone(),
                opponent_name: first_name.clone(),
            },
        ));
        out.push((first, Message::Update(game.game_state(Seat::First, Seat::First))));
        out.push((second, Message::Update(game.game_state(Seat::Second, Seat::Second))));

        log::info!(
            "{} ({}) and {} ({}) have joined match {}",
            first,
            first_name,
            second,
            second_name,
            id
        );
        self.matches.insert(id, game);
        true
    }
}

/// Winner and loser notifications, if the match has ended.
fn game_over_signals(game: &Match<ConnectionId>, out: &mut Vec<Delivery>) {
    if let (Some(winner), Some(loser)) = (game.winner_id(), game.loser_id()) {
        log::info!("match {} ended, winner {}", game.id(), winner);
        out.push((*winner, Message::GameOver { won: true }));
        out.push((*loser, Message::GameOver { won: false }));
    }
}
