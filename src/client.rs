//! Client driver
//!
//! A thin synchronous-call driver over the broker's socket: send one
//! request, block until exactly one reply comes back. A LOCK against a held
//! resource simply leaves the call outstanding; the `LOCK_GRANTED` the
//! broker eventually pushes is the reply.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::cli::{Cli, Plan};
use crate::error::{BrokerError, Result};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Run the LOCK -> optional sleep -> WRITE|READ -> UNLOCK sequence
pub async fn run(cli: Cli) -> Result<()> {
    let plan = cli.plan()?;
    let url = format!("ws://{}:{}", cli.host, cli.port);

    println!("CONNECTING to lock broker at {}", url);
    let (mut socket, _) = connect_async(&url).await?;

    println!("REQUESTING lock for resource: {}", cli.resource);
    let reply = call(&mut socket, &format!("LOCK {}", cli.resource)).await?;
    if reply != "LOCK_GRANTED" {
        return Err(BrokerError::UnexpectedReply { reply });
    }
    println!("LOCKED {}", cli.resource);

    match plan {
        Plan::Write {
            data,
            sleep_seconds,
        } => {
            if sleep_seconds > 0 {
                println!("Sleeping for {} seconds before WRITE...", sleep_seconds);
                tokio::time::sleep(Duration::from_secs(sleep_seconds)).await;
            }
            println!("WRITING value to {}: {}", cli.resource, data);
            let reply = call(&mut socket, &format!("WRITE {} {}", cli.resource, data)).await?;
            println!("WRITE reply: {}", reply);
        }
        Plan::Read => {
            let reply = call(&mut socket, &format!("READ {}", cli.resource)).await?;
            match read_value(&reply) {
                Some(value) => println!("READING value from {}: {}", cli.resource, value),
                None => println!("READ reply: {}", reply),
            }
        }
    }

    println!("RELEASING lock for resource: {}", cli.resource);
    let reply = call(&mut socket, &format!("UNLOCK {}", cli.resource)).await?;
    println!("UNLOCK reply: {}", reply);

    Ok(())
}

/// Send one request and block until the broker's next text frame
async fn call(socket: &mut Socket, request: &str) -> Result<String> {
    socket.send(Message::Text(request.to_string())).await?;
    loop {
        match socket.next().await {
            Some(Ok(Message::Text(reply))) => return Ok(reply),
            Some(Ok(Message::Close(_))) | None => return Err(BrokerError::ConnectionClosed),
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
        }
    }
}

/// Extract the value from a `READ_OK <value>` reply
fn read_value(reply: &str) -> Option<&str> {
    reply.strip_prefix("READ_OK ")
}
