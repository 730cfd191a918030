//! `/socket.io` connectivity channel.
//!
//! Each connection is told its own ID on connect, sees `connect`/`disconnect`
//! announcements for everyone else, and gets its `message` frames echoed back.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt, stream::SplitSink};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::services::{Notifier, SocketEvent, SocketEventKind};
use crate::state::AppState;

/// A frame sent by a client. Its `id`, if any, is ignored.
#[derive(Deserialize)]
struct ClientFrame {
    event: SocketEventKind,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Upgrade the request to a WebSocket.
pub async fn upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let notifier = state.notifier().clone();
    ws.on_upgrade(move |socket| handle_socket(socket, notifier))
}

async fn handle_socket(socket: WebSocket, notifier: Notifier) {
    let id = Uuid::new_v4();
    let mut events = notifier.subscribe();
    let (mut sink, mut stream) = socket.split();

    if send(&mut sink, &SocketEvent::connect(id)).await.is_err() {
        return;
    }
    notifier.announce(SocketEvent::connect(id));
    tracing::info!(connection_id = %id, connections = notifier.connections(), "socket connected");

    loop {
        tokio::select! {
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Some(reply) = reply_to(text.as_str(), id)
                        && send(&mut sink, &reply).await.is_err()
                    {
                        break;
                    }
                }
                Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                // Ping/pong are answered by axum; binary frames carry nothing for us.
                Some(Ok(_)) => {}
            },
            event = events.recv() => match event {
                Ok(event) if event.id == id => {}
                Ok(event) => {
                    if send(&mut sink, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(connection_id = %id, skipped, "socket lagged behind notifier");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    drop(events);
    notifier.announce(SocketEvent::disconnect(id));
    tracing::info!(connection_id = %id, "socket disconnected");
}

async fn send(
    sink: &mut SplitSink<WebSocket, Message>,
    event: &SocketEvent,
) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode socket event");
            return Ok(());
        }
    };
    sink.send(Message::Text(text.into())).await
}

/// Decide the reply to a client frame. Only `message` is answered, by echoing
/// its data back to the sender.
fn reply_to(frame: &str, id: Uuid) -> Option<SocketEvent> {
    let frame: ClientFrame = match serde_json::from_str(frame) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(connection_id = %id, error = %e, "ignoring malformed socket frame");
            return None;
        }
    };

    match frame.event {
        SocketEventKind::Message => Some(SocketEvent::message(id, frame.data)),
        SocketEventKind::Connect | SocketEventKind::Disconnect => None,
    }
}
