//! Connectivity notifier.
//!
//! Fan-out of `connect`/`disconnect` announcements to every open socket. No
//! business data flows through here; clients use the events only to render an
//! online indicator.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Buffered announcements per subscriber before it starts lagging.
const CHANNEL_CAPACITY: usize = 64;

/// Event names carried on the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocketEventKind {
    Connect,
    Disconnect,
    Message,
}

/// A socket frame: `{"event": ..., "id": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketEvent {
    pub event: SocketEventKind,
    /// Connection the event is about.
    pub id: Uuid,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl SocketEvent {
    #[must_use]
    pub const fn connect(id: Uuid) -> Self {
        Self {
            event: SocketEventKind::Connect,
            id,
            data: None,
        }
    }

    #[must_use]
    pub const fn disconnect(id: Uuid) -> Self {
        Self {
            event: SocketEventKind::Disconnect,
            id,
            data: None,
        }
    }

    #[must_use]
    pub const fn message(id: Uuid, data: Option<serde_json::Value>) -> Self {
        Self {
            event: SocketEventKind::Message,
            id,
            data,
        }
    }
}

/// Broadcast hub shared by all socket connections.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<SocketEvent>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to announcements made after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SocketEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn connections(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Announce an event to all subscribers. Returns how many received it.
    pub fn announce(&self, event: SocketEvent) -> usize {
        // Err only means nobody is listening.
        self.sender.send(event).unwrap_or(0)
    }
}
