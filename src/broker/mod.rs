//! Lock broker core
//!
//! A single daemon granting exclusive locks on named resources to many
//! clients over one multiplexed channel.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                 LOCK BROKER (lockbroker-daemon)                  │
//! ├──────────────────────────────────────────────────────────────────┤
//! │                                                                  │
//! │  connection task per client                                      │
//! │    └── inbound frames tagged with ClientId ──► mpsc ──┐          │
//! │                                                       ▼          │
//! │  ┌────────────────────────────────────────────────────────────┐  │
//! │  │  Dispatch loop (single serializer)                         │  │
//! │  │                                                            │  │
//! │  │  Request::parse ──► LockManager.handle ──► [(ClientId,     │  │
//! │  │                       │                      Reply); 0..2] │  │
//! │  │                       ▼                                    │  │
//! │  │  Registry: name ──► ResourceState {owner, waiters, value}  │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! │                                                       │          │
//! │  ReplyRouter: ClientId ──► outbound mpsc ◄────────────┘          │
//! │    └── connection task writes the frame to its socket            │
//! │                                                                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol
//!
//! Single text frame per message, both directions:
//!
//! ```text
//! // Client -> Server
//! LOCK <resource>
//! WRITE <resource> <data...>
//! READ <resource>
//! UNLOCK <resource>
//!
//! // Server -> Client
//! LOCK_GRANTED | WRITE_OK | WRITE_DENIED | READ_OK <value> |
//! READ_DENIED | UNLOCKED | UNLOCK_DENIED | ERR UnknownOp
//! ```
//!
//! A LOCK against a held resource gets no reply at processing time; the
//! `LOCK_GRANTED` pushed during a later UNLOCK is the reply to that original
//! request, routed by client identity through the [`router::ReplyRouter`].

pub mod connection;
pub mod dispatch;
pub mod manager;
pub mod protocol;
pub mod registry;
pub mod router;

pub use connection::handle_connection;
pub use dispatch::RequestFrame;
pub use manager::LockManager;
pub use protocol::{Reply, Request};
pub use registry::{Registry, ResourceState};
pub use router::{ClientId, ReplyRouter};
