use crate::protocol::Message;

/// A bidirectional, ordered message pipe to one peer.
///
/// `recv` must be cancel-safe: connection loops race it against their
/// outbound queue in `tokio::select!`.
#[async_trait::async_trait]
pub trait Transport: Send {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Message>;
}

pub mod in_memory;
pub mod tcp;
