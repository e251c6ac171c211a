//! Push connections: `OPENING -> OPEN -> CLOSED`.
//!
//! The upgrade handshake is the opening state. A connection is a registry
//! member only while its socket task runs, and leaves it for good when the
//! task ends.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};

use crate::debug;
use crate::log;
use crate::reload::{Connection, Registry};

/// Drive one upgraded socket until the client goes away.
///
/// Inbound messages are read and dropped; outbound traffic is only the
/// reload token.
pub async fn run(mut socket: WebSocket, addr: SocketAddr, registry: Arc<Registry>) {
    let (connection, mut signals) = Connection::open(addr);
    let id = registry.register(connection);
    log!("ws"; "connection opened at {} [{}]", addr, id);

    loop {
        tokio::select! {
            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!("ws"; "transport error [{}]: {}", id, e);
                    break;
                }
                Some(Ok(_)) => {}
            },
            signal = signals.recv() => {
                let Some(signal) = signal else { break };
                if let Err(e) = socket.send(Message::Text(signal.as_str().into())).await {
                    debug!("ws"; "send failed [{}]: {}", id, e);
                    break;
                }
            }
        }
    }

    registry.unregister(id);
    log!("ws"; "connection closed [{}]", id);
}
