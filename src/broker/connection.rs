//! WebSocket connection handler
//!
//! Owns the transport half of one client: mints the client's identity,
//! forwards inbound text frames to the dispatch loop, and writes replies
//! addressed to this client back out. Teardown detaches the reply channel
//! only; lock state is never touched, so a client that disconnects while
//! owning or waiting leaves the resource held or queued.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};

use crate::broker::dispatch::RequestFrame;
use crate::broker::router::{ClientId, ReplyRouter};

/// Handle a single client connection
pub async fn handle_connection(
    stream: TcpStream,
    router: Arc<ReplyRouter>,
    inbound: mpsc::UnboundedSender<RequestFrame>,
) {
    let addr = stream.peer_addr().ok();

    let mut ws = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            tracing::error!("WebSocket handshake failed for {:?}: {}", addr, e);
            return;
        }
    };

    let client_id = ClientId::generate();
    tracing::info!("Client {} connected from {:?}", client_id, addr);

    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();
    router.register(client_id.clone(), reply_tx);

    loop {
        tokio::select! {
            // Inbound requests from this client
            msg = ws.next() => {
                match msg {
                    Some(Ok(Message::Text(payload))) => {
                        let frame = RequestFrame {
                            client: client_id.clone(),
                            payload,
                        };
                        if inbound.send(frame).is_err() {
                            tracing::error!("Dispatch loop gone, closing {}", client_id);
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("Client {} requested close", client_id);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws.send(Message::Pong(data)).await;
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error on {}: {}", client_id, e);
                        break;
                    }
                    None => break,
                    _ => {}
                }
            }

            // Replies addressed to this client, including deferred grants
            // that arrive with no request outstanding on our side
            reply = reply_rx.recv() => {
                match reply {
                    Some(reply) => {
                        if let Err(e) = ws.send(Message::Text(reply.to_string())).await {
                            tracing::warn!("Failed to deliver reply to {}: {}", client_id, e);
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    router.unregister(&client_id);
    tracing::info!("Client {} disconnected", client_id);
}
