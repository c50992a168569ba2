//! Dispatch loop
//!
//! A single serializing loop: one inbound request at a time is decoded,
//! applied to the lock manager, and its replies routed. All resource state
//! lives behind this loop, so no locking is needed around the registry, and
//! no two mutations of the same resource can interleave.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::broker::manager::LockManager;
use crate::broker::protocol::Request;
use crate::broker::router::{ClientId, ReplyRouter};

/// One inbound request frame, tagged with the sending client's identity
#[derive(Debug)]
pub struct RequestFrame {
    pub client: ClientId,
    pub payload: String,
}

/// Run the dispatch loop until the inbound channel closes.
///
/// Each frame is handled to completion (state mutation plus zero, one, or
/// two reply sends) before the next is dequeued.
pub async fn run(mut inbound: mpsc::UnboundedReceiver<RequestFrame>, router: Arc<ReplyRouter>) {
    let mut manager = LockManager::new();
    while let Some(frame) = inbound.recv().await {
        let request = Request::parse(&frame.payload);
        tracing::debug!("{} -> {:?}", frame.client, request);
        for (target, reply) in manager.handle(&frame.client, request) {
            router.send(&target, reply);
        }
    }
    tracing::info!("Dispatch loop stopped: inbound channel closed");
}
