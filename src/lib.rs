//! Lockbroker: a centralized mutual-exclusion service
//!
//! Named resources can be exclusively locked, have an associated value
//! written and read while locked, and released, by multiple independent
//! clients over a multiplexed WebSocket channel.
//!
//! The broker processes one request at a time on a single dispatch loop and
//! answers by client identity. Its defining protocol property is the
//! deferred grant: a LOCK against a held resource gets no reply when it is
//! processed. The requester is queued FIFO, its call stays outstanding, and
//! the `LOCK_GRANTED` pushed during a later UNLOCK is the reply to that
//! original request, addressed by identity rather than by call handle.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use lockbroker::broker::{dispatch, ReplyRouter};
//!
//! let router = Arc::new(ReplyRouter::new());
//! let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
//! tokio::spawn(dispatch::run(inbound_rx, Arc::clone(&router)));
//! // accept connections and pass each to broker::handle_connection
//! ```

pub mod broker;
pub mod cli;
pub mod client;
pub mod error;

// Re-export commonly used types
pub use broker::{ClientId, LockManager, Registry, Reply, ReplyRouter, Request, RequestFrame};
pub use cli::{Cli, Operation, Plan};
pub use error::{BrokerError, Result};
