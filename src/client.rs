//! Client side of the match protocol: a connection driver plus the players
//! that decide what to send.

use rand::rngs::SmallRng;
use rand::Rng;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::common::Coordinate;
use crate::game::MatchStatus;
use crate::protocol::{Message, PROTOCOL_VERSION};
use crate::session::ConnectionId;
use crate::transport::Transport;
use crate::ui::{coord_label, parse_coord, print_grids};
use crate::view::{GridOwner, GridView};

/// What a player asks the client to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Shoot(Coordinate),
    Chat(String),
    /// Leave the current match and queue for a new one.
    Leave,
    /// Close the connection.
    Quit,
}

/// Everything the client has learned about its current match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientView {
    pub own: GridView,
    pub opponent: GridView,
    pub my_turn: bool,
    pub in_game: bool,
    pub over: bool,
}

impl Default for ClientView {
    fn default() -> Self {
        Self {
            own: GridView::empty(),
            opponent: GridView::empty(),
            my_turn: false,
            in_game: false,
            over: false,
        }
    }
}

impl ClientView {
    pub fn can_shoot(&self) -> bool {
        self.in_game && !self.over && self.my_turn
    }
}

/// Decides the commands a client sends.
#[async_trait::async_trait]
pub trait Player: Send {
    /// Produce the next command. Must be cancel-safe: the client drops the
    /// future whenever a server message arrives first.
    async fn next_command(&mut self, view: &ClientView) -> anyhow::Result<PlayerCommand>;

    /// Interactive players are asked for input at any time and see the
    /// game printed; others are asked only when they may shoot.
    fn interactive(&self) -> bool {
        false
    }
}

/// Fires at a random untouched cell of the opponent grid.
pub struct BotPlayer {
    rng: SmallRng,
}

impl BotPlayer {
    pub fn new(rng: SmallRng) -> Self {
        Self { rng }
    }
}

#[async_trait::async_trait]
impl Player for BotPlayer {
    async fn next_command(&mut self, view: &ClientView) -> anyhow::Result<PlayerCommand> {
        let targets: Vec<Coordinate> = view.opponent.untouched().collect();
        if targets.is_empty() {
            return Ok(PlayerCommand::Leave);
        }
        let target = targets[self.rng.random_range(0..targets.len())];
        Ok(PlayerCommand::Shoot(target))
    }
}

/// Reads commands from standard input.
///
/// Accepts a cell label (`B7`), `chat <text>`, `leave` and `quit`.
pub struct TerminalPlayer {
    lines: Lines<BufReader<Stdin>>,
}

impl TerminalPlayer {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for TerminalPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpret one line of terminal input.
pub fn parse_command(line: &str) -> Result<PlayerCommand, String> {
    let line = line.trim();
    if let Some(text) = line.strip_prefix("chat ") {
        return Ok(PlayerCommand::Chat(text.trim().to_string()));
    }
    match line.to_ascii_lowercase().as_str() {
        "leave" => Ok(PlayerCommand::Leave),
        "quit" | "exit" => Ok(PlayerCommand::Quit),
        _ => parse_coord(line).map(PlayerCommand::Shoot),
    }
}

#[async_trait::async_trait]
impl Player for TerminalPlayer {
    async fn next_command(&mut self, _view: &ClientView) -> anyhow::Result<PlayerCommand> {
        loop {
            // `next_line` is cancel-safe.
            let Some(line) = self.lines.next_line().await? else {
                return Ok(PlayerCommand::Quit);
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Ok(cmd) => return Ok(cmd),
                Err(e) => println!("{}", e),
            }
        }
    }

    fn interactive(&self) -> bool {
        true
    }
}

/// Outcome of a client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSummary {
    pub connection: ConnectionId,
    pub games: usize,
    pub wins: usize,
}

/// Drives one connection to the match server on behalf of a [`Player`].
pub struct ClientNode<T: Transport, P: Player> {
    transport: T,
    player: P,
    view: ClientView,
    summary: ClientSummary,
}

impl<T: Transport, P: Player> ClientNode<T, P> {
    pub fn new(transport: T, player: P) -> Self {
        Self {
            transport,
            player,
            view: ClientView::default(),
            summary: ClientSummary {
                connection: 0,
                games: 0,
                wins: 0,
            },
        }
    }

    pub fn view(&self) -> &ClientView {
        &self.view
    }

    async fn handshake(&mut self) -> anyhow::Result<()> {
        self.transport
            .send(Message::Hello {
                version: PROTOCOL_VERSION,
            })
            .await?;
        match self.transport.recv().await? {
            Message::Welcome {
                version,
                connection,
            } if version == PROTOCOL_VERSION => {
                self.summary.connection = connection;
                Ok(())
            }
            Message::Welcome { version, .. } => Err(anyhow::anyhow!(
                "Protocol version mismatch: expected {}, got {}",
                PROTOCOL_VERSION,
                version
            )),
            Message::Error { reason } => Err(anyhow::anyhow!("Server refused connection: {}", reason)),
            other => Err(anyhow::anyhow!("Expected welcome, got {}", other.kind())),
        }
    }

    /// Play until `max_games` matches have finished (or forever) or the
    /// player quits. Non-interactive players queue again after each match.
    pub async fn run(&mut self, max_games: Option<usize>) -> anyhow::Result<ClientSummary> {
        self.handshake().await?;
        self.announce(format!(
            "Connected as {}, waiting for an opponent...",
            self.summary.connection
        ));

        loop {
            let ask = self.player.interactive() || self.view.can_shoot();
            tokio::select! {
                incoming = self.transport.recv() => {
                    if self.on_message(incoming?, max_games).await? {
                        return Ok(self.summary);
                    }
                }
                command = self.player.next_command(&self.view), if ask => {
                    if self.on_command(command?).await? {
                        return Ok(self.summary);
                    }
                }
            }
        }
    }

    /// Returns `true` once the session is finished.
    async fn on_command(&mut self, command: PlayerCommand) -> anyhow::Result<bool> {
        match command {
            PlayerCommand::Shoot(target) => {
                log::debug!("firing at {}", coord_label(target));
                self.view.my_turn = false;
                self.transport
                    .send(Message::Shot {
                        x: target.x,
                        y: target.y,
                    })
                    .await?;
            }
            PlayerCommand::Chat(text) => self.transport.send(Message::Chat(text)).await?,
            PlayerCommand::Leave => self.transport.send(Message::Leave).await?,
            PlayerCommand::Quit => return Ok(true),
        }
        Ok(false)
    }

    /// Returns `true` once the session is finished.
    async fn on_message(&mut self, msg: Message, max_games: Option<usize>) -> anyhow::Result<bool> {
        match msg {
            Message::Join {
                game_id,
                self_name,
                opponent_name,
            } => {
                self.view = ClientView {
                    in_game: true,
                    ..ClientView::default()
                };
                self.announce(format!(
                    "Match {}: you are {}, facing {}",
                    game_id, self_name, opponent_name
                ));
            }
            Message::Update(state) => {
                match state.grid {
                    GridOwner::Own => self.view.own = state.view,
                    GridOwner::Opponent => self.view.opponent = state.view,
                }
                self.view.my_turn = state.turn;
                self.view.over |= state.status == MatchStatus::GameOver;
                if self.player.interactive() {
                    print_grids(&self.view.own, &self.view.opponent);
                    if self.view.can_shoot() {
                        println!("Your turn. Enter a target (e.g. A5):");
                    }
                }
            }
            Message::ChatMessage { name, message } => {
                self.announce(format!("{}: {}", name, message));
            }
            Message::Notification { message } => self.announce(message),
            Message::GameOver { won } => {
                self.view.over = true;
                self.summary.games += 1;
                if won {
                    self.summary.wins += 1;
                }
                self.announce(
                    if won {
                        "VICTORY! You have sunk all enemy ships."
                    } else {
                        "DEFEAT. Your fleet is lost."
                    }
                    .to_string(),
                );
                if max_games.is_some_and(|max| self.summary.games >= max) {
                    return Ok(true);
                }
                if self.player.interactive() {
                    println!("Type `leave` for a new match or `quit` to exit.");
                } else {
                    self.transport.send(Message::Leave).await?;
                }
            }
            Message::Left => {
                self.view = ClientView::default();
                self.announce("Back in the waiting room.".to_string());
            }
            Message::Error { reason } => {
                return Err(anyhow::anyhow!("Server error: {}", reason));
            }
            other => log::debug!("ignoring unexpected {} message", other.kind()),
        }
        Ok(false)
    }

    fn announce(&self, line: String) {
        if self.player.interactive() {
            println!("{}", line);
        } else {
            log::info!("[{}] {}", self.summary.connection, line);
        }
    }
}
