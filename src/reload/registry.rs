//! Connection registry and reload broadcast.

use std::net::SocketAddr;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::message::{ConnectionId, Signal};
use crate::debug;
use crate::logger::status_success;

/// Sending half of one open push connection.
///
/// The socket task owns the receiving half and forwards every signal to the
/// client. Once that task ends the receiver is dropped and sends fail.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    addr: SocketAddr,
    tx: UnboundedSender<Signal>,
}

impl Connection {
    /// New connection with a fresh identifier.
    pub fn open(addr: SocketAddr) -> (Self, UnboundedReceiver<Signal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection = Self {
            id: ConnectionId::new(),
            addr,
            tx,
        };
        (connection, rx)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn send(&self, signal: Signal) -> bool {
        self.tx.send(signal).is_ok()
    }
}

/// Outcome of one broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Broadcast {
    pub delivered: usize,
    /// Members whose transport was already gone; they are unregistered.
    pub dropped: usize,
}

/// Set of open push connections.
#[derive(Debug, Default)]
pub struct Registry {
    connections: Mutex<FxHashMap<ConnectionId, Connection>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `connection`, returning its identifier.
    pub fn register(&self, connection: Connection) -> ConnectionId {
        let id = connection.id;
        self.connections.lock().insert(id, connection);
        id
    }

    /// Remove a connection. Absent ids are ignored.
    pub fn unregister(&self, id: ConnectionId) -> Option<Connection> {
        self.connections.lock().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.lock().is_empty()
    }

    /// Send the reload signal to every current member.
    ///
    /// A failed send only affects its own connection, which is removed; the
    /// rest of the members still receive the signal.
    pub fn broadcast_reload(&self) -> Broadcast {
        let mut connections = self.connections.lock();
        let mut result = Broadcast::default();

        connections.retain(|id, connection| {
            if connection.send(Signal::Reload) {
                result.delivered += 1;
                true
            } else {
                debug!("ws"; "dropping closed connection [{}] at {}", id, connection.addr());
                result.dropped += 1;
                false
            }
        });
        result
    }
}

/// Reaction to a change of the watched file.
pub trait ChangeHandler: Send + Sync {
    fn on_change(&self);
}

impl ChangeHandler for Registry {
    fn on_change(&self) {
        if self.is_empty() {
            status_success("file changed, no clients connected");
            return;
        }
        let result = self.broadcast_reload();
        let noun = if result.delivered == 1 { "client" } else { "clients" };
        status_success(&format!("file changed, reloaded {} {noun}", result.delivered));
        if result.dropped > 0 {
            debug!("ws"; "{} stale connections removed", result.dropped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn test_register_unregister_counts() {
        let registry = Registry::new();
        let mut receivers = Vec::new();
        let mut ids = Vec::new();
        for port in 0..5 {
            let (connection, rx) = Connection::open(addr(40000 + port));
            ids.push(registry.register(connection));
            receivers.push(rx);
        }
        assert_eq!(registry.len(), 5);

        registry.unregister(ids[1]);
        registry.unregister(ids[3]);
        assert_eq!(registry.len(), 3);

        let result = registry.broadcast_reload();
        assert_eq!(result, Broadcast { delivered: 3, dropped: 0 });

        for (i, rx) in receivers.iter_mut().enumerate() {
            let received = rx.try_recv().ok();
            if i == 1 || i == 3 {
                assert_eq!(received, None);
            } else {
                assert_eq!(received, Some(Signal::Reload));
            }
        }
    }

    #[test]
    fn test_unregister_absent_is_noop() {
        let registry = Registry::new();
        let (connection, _rx) = Connection::open(addr(1));
        let id = registry.register(connection);
        assert!(registry.unregister(id).is_some());
        assert!(registry.unregister(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_broadcast_isolates_failed_send() {
        let registry = Registry::new();
        let (alive_a, mut rx_a) = Connection::open(addr(1));
        let (dead, rx_dead) = Connection::open(addr(2));
        let (alive_b, mut rx_b) = Connection::open(addr(3));
        registry.register(alive_a);
        let dead_id = registry.register(dead);
        registry.register(alive_b);
        drop(rx_dead);

        let result = registry.broadcast_reload();
        assert_eq!(result, Broadcast { delivered: 2, dropped: 1 });
        assert_eq!(rx_a.try_recv().ok(), Some(Signal::Reload));
        assert_eq!(rx_b.try_recv().ok(), Some(Signal::Reload));
        assert_eq!(registry.len(), 2);
        assert!(registry.unregister(dead_id).is_none());
    }

    #[test]
    fn test_late_connection_sees_no_stale_reload() {
        let registry = Registry::new();
        let (first, mut rx_first) = Connection::open(addr(1));
        let (second, mut rx_second) = Connection::open(addr(2));
        registry.register(first);
        registry.register(second);

        registry.on_change();

        let (third, mut rx_third) = Connection::open(addr(3));
        registry.register(third);

        assert_eq!(rx_first.try_recv().ok(), Some(Signal::Reload));
        assert_eq!(rx_second.try_recv().ok(), Some(Signal::Reload));
        assert!(rx_third.try_recv().is_err());

        registry.on_change();
        assert_eq!(rx_third.try_recv().ok(), Some(Signal::Reload));
    }

    #[test]
    fn test_broadcast_empty() {
        assert_eq!(Registry::new().broadcast_reload(), Broadcast::default());
    }
}
