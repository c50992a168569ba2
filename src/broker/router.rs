//! Addressed reply routing
//!
//! Replies are routed by client identity, not by the request currently being
//! processed: a deferred grant goes to a client that sent nothing in the
//! current dispatch step. The router is the only component that knows which
//! identities are reachable.

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::broker::protocol::Reply;

/// Opaque identity for a connected client.
///
/// Minted by the transport layer at accept time and echoed on every reply
/// addressed to that client. The broker compares identities for equality but
/// never interprets or destroys them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    /// Mint a fresh identity for a newly accepted connection
    pub fn generate() -> Self {
        Self(format!(
            "cli_{}",
            uuid::Uuid::new_v4().to_string().split('-').next().unwrap()
        ))
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ClientId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Routes reply frames to connected clients by identity
pub struct ReplyRouter {
    clients: RwLock<HashMap<ClientId, mpsc::UnboundedSender<Reply>>>,
}

impl ReplyRouter {
    /// Create a router with no connected clients
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Attach a newly connected client's outbound channel
    pub fn register(&self, id: ClientId, tx: mpsc::UnboundedSender<Reply>) {
        self.clients.write().insert(id, tx);
    }

    /// Detach a departed client.
    ///
    /// Lock state is deliberately left untouched: the broker has no notion
    /// of client liveness, so a client that vanishes while owning or waiting
    /// leaves its resource held or its queue slot occupied.
    pub fn unregister(&self, id: &ClientId) {
        self.clients.write().remove(id);
    }

    /// Deliver one reply frame to the identified client, whether or not that
    /// client sent the request being processed. Delivery to an identity that
    /// already disconnected is logged and dropped.
    pub fn send(&self, id: &ClientId, reply: Reply) {
        let clients = self.clients.read();
        match clients.get(id) {
            Some(tx) => {
                if tx.send(reply).is_err() {
                    tracing::warn!("Dropping reply for {}: connection task gone", id);
                }
            }
            None => {
                tracing::warn!("Dropping reply for {}: client not connected", id);
            }
        }
    }

    /// Number of currently connected clients
    pub fn connected(&self) -> usize {
        self.clients.read().len()
    }
}

impl Default for ReplyRouter {
    fn default() -> Self {
        Self::new()
    }
}
