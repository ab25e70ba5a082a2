use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};

use crate::protocol::{Message, PROTOCOL_VERSION};
use crate::session::{ConnectionId, Lobby};
use crate::transport::tcp::{TcpTransport, DEFAULT_SEND_TIMEOUT, MAX_MESSAGE_SIZE};
use crate::transport::Transport;

pub const DEFAULT_PORT: u16 = 8900;

/// How long a new connection may take to send `Hello`.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

const EVENT_QUEUE: usize = 256;

/// Settings for a listening match server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Fixed RNG seed for reproducible fleets and call signs.
    pub seed: Option<u64>,
    pub send_timeout: Duration,
    pub handshake_timeout: Duration,
    pub max_message_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            seed: None,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn lobby(&self) -> Lobby {
        match self.seed {
            Some(seed) => Lobby::with_seed(seed),
            None => Lobby::from_entropy(),
        }
    }
}

enum LobbyEvent {
    Connected {
        id: ConnectionId,
        outbox: UnboundedSender<Message>,
    },
    Inbound {
        id: ConnectionId,
        msg: Message,
    },
    Disconnected {
        id: ConnectionId,
    },
}

/// Handle to a running lobby task. Cloning it is cheap; the lobby stops once
/// every handle and connection task is gone.
#[derive(Clone)]
pub struct LobbyHandle {
    events: mpsc::Sender<LobbyEvent>,
    next_id: Arc<AtomicU64>,
    handshake_timeout: Duration,
}

/// Move `lobby` onto its own task. All lobby state is touched only there, so
/// events from different connections are applied one at a time.
pub fn spawn_lobby(mut lobby: Lobby) -> LobbyHandle {
    let (events, mut rx) = mpsc::channel(EVENT_QUEUE);
    tokio::spawn(async move {
        let mut outboxes: HashMap<ConnectionId, UnboundedSender<Message>> = HashMap::new();
        while let Some(event) = rx.recv().await {
            let deliveries = match event {
                LobbyEvent::Connected { id, outbox } => {
                    outboxes.insert(id, outbox);
                    lobby.connect(id)
                }
                LobbyEvent::Inbound { id, msg } => lobby.handle(id, msg),
                LobbyEvent::Disconnected { id } => {
                    outboxes.remove(&id);
                    lobby.disconnect(id)
                }
            };
            for (to, msg) in deliveries {
                match outboxes.get(&to) {
                    Some(outbox) if outbox.send(msg).is_ok() => {}
                    _ => log::debug!("dropping message for closed connection {}", to),
                }
            }
        }
        log::debug!("lobby stopped");
    });
    LobbyHandle {
        events,
        next_id: Arc::new(AtomicU64::new(1)),
        handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
    }
}

impl LobbyHandle {
    /// Connections attached through this handle must say `Hello` within
    /// `limit` or are closed.
    pub fn with_handshake_timeout(mut self, limit: Duration) -> Self {
        self.handshake_timeout = limit;
        self
    }

    /// Serve one client over `transport` until it disconnects.
    pub fn attach<T: Transport + 'static>(&self, transport: T) -> JoinHandle<anyhow::Result<()>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let events = self.events.clone();
        let handshake_timeout = self.handshake_timeout;
        tokio::spawn(async move {
            let result = run_connection(id, transport, &events, handshake_timeout).await;
            if let Err(e) = &result {
                log::info!("connection {} closed: {}", id, e);
            }
            result
        })
    }
}

async fn handshake<T: Transport>(
    id: ConnectionId,
    transport: &mut T,
    limit: Duration,
) -> anyhow::Result<()> {
    let hello = timeout(limit, transport.recv())
        .await
        .map_err(|_| anyhow::anyhow!("No hello within {:?}", limit))??;
    let reason = match hello {
        Message::Hello { version } if version == PROTOCOL_VERSION => {
            return transport
                .send(Message::Welcome {
                    version: PROTOCOL_VERSION,
                    connection: id,
                })
                .await;
        }
        Message::Hello { version } => format!(
            "Protocol version mismatch: expected {}, got {}",
            PROTOCOL_VERSION, version
        ),
        other => format!("Expected hello, got {}", other.kind()),
    };
    log::warn!("connection {} rejected: {}", id, reason);
    transport
        .send(Message::Error {
            reason: reason.clone(),
        })
        .await?;
    Err(anyhow::anyhow!(reason))
}

async fn run_connection<T: Transport>(
    id: ConnectionId,
    mut transport: T,
    events: &mpsc::Sender<LobbyEvent>,
    handshake_timeout: Duration,
) -> anyhow::Result<()> {
    handshake(id, &mut transport, handshake_timeout).await?;

    let (outbox, mut inbox) = mpsc::unbounded_channel();
    events
        .send(LobbyEvent::Connected { id, outbox })
        .await
        .map_err(|_| anyhow::anyhow!("Lobby stopped"))?;

    let result = pump(id, &mut transport, &mut inbox, events).await;
    let _ = events.send(LobbyEvent::Disconnected { id }).await;
    result
}

async fn pump<T: Transport>(
    id: ConnectionId,
    transport: &mut T,
    inbox: &mut UnboundedReceiver<Message>,
    events: &mpsc::Sender<LobbyEvent>,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            inbound = transport.recv() => {
                let msg = inbound?;
                log::trace!("connection {} sent {}", id, msg.kind());
                events
                    .send(LobbyEvent::Inbound { id, msg })
                    .await
                    .map_err(|_| anyhow::anyhow!("Lobby stopped"))?;
            }
            outbound = inbox.recv() => match outbound {
                Some(msg) => transport.send(msg).await?,
                None => return Ok(()),
            },
        }
    }
}

/// Accept TCP clients forever, attaching each to `lobby`.
pub async fn serve(
    listener: TcpListener,
    lobby: LobbyHandle,
    config: &ServerConfig,
) -> anyhow::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        if let Err(e) = stream.set_nodelay(true) {
            log::warn!("set_nodelay failed for {}: {}", peer, e);
        }
        log::info!("accepted connection from {}", peer);
        lobby.attach(TcpTransport::with_config(
            stream,
            config.send_timeout,
            config.max_message_size,
        ));
    }
}

/// Bind, start a lobby and serve until the listener fails.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    log::info!("listening on {}", listener.local_addr()?);
    let lobby = spawn_lobby(config.lobby()).with_handshake_timeout(config.handshake_timeout);
    serve(listener, lobby, &config).await
}
