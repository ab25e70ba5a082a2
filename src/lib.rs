#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bitboard;
mod board;
mod common;
mod config;
pub mod game;
pub mod placement;
mod ship;
pub mod view;

#[cfg(feature = "std")]
pub mod client;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod server;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod transport;
#[cfg(feature = "std")]
pub mod ui;

pub use bitboard::{BitBoard, BitBoardError, CellMask};
pub use board::*;
pub use common::*;
pub use config::*;
pub use game::{InvalidSeat, Match, MatchId, MatchStatus, Seat};
pub use placement::{generate_fleet, generate_fleet_with, PlacementConfig};
pub use ship::*;
pub use view::{GameState, GridOwner, GridView, ShipPlacement};

#[cfg(feature = "std")]
pub use client::{
    BotPlayer, ClientNode, ClientSummary, ClientView, Player, PlayerCommand, TerminalPlayer,
};
#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use protocol::{Message, PROTOCOL_VERSION};
#[cfg(feature = "std")]
pub use server::{spawn_lobby, LobbyHandle, ServerConfig};
#[cfg(feature = "std")]
pub use session::{ConnectionId, Delivery, Lobby};
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};
