// WebSocket transport for the tracker service.

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};

/// Events emitted by the WebSocket server to the application layer.
#[derive(Debug, PartialEq)]
pub enum WsEvent {
    /// A new client has connected.
    Connected { addr: String },
    /// The current client has disconnected.
    Disconnected,
    /// A text frame was received from the client (raw JSON string).
    Request(String),
}

/// Run the WebSocket server on the given port.
///
/// Binds a TCP listener on `127.0.0.1:{port}` and serves one connection at
/// a time. Incoming text frames are forwarded through `tx` as
/// [`WsEvent::Request`]; reply frames arriving on `replies` are written
/// back to the connected client. The server runs until the task is
/// cancelled or the application side drops its channel ends.
pub async fn run(
    port: u16,
    tx: mpsc::Sender<WsEvent>,
    mut replies: mpsc::Receiver<String>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    let local_addr = listener.local_addr()?;
    info!("WebSocket server listening on {local_addr}");

    loop {
        let (stream, addr) = listener.accept().await?;
        let addr_str = addr.to_string();
        info!("Accepted TCP connection from {addr_str}");

        let ws_stream = match tokio_tungstenite::accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                warn!("WebSocket handshake failed for {addr_str}: {e}");
                continue;
            }
        };

        if tx
            .send(WsEvent::Connected {
                addr: addr_str.clone(),
            })
            .await
            .is_err()
        {
            break;
        }

        let (mut write, read) = ws_stream.split();
        if serve_connection(read, &mut write, &tx, &mut replies, &addr_str)
            .await
            .is_err()
        {
            break;
        }

        if tx.send(WsEvent::Disconnected).await.is_err() {
            break;
        }
    }

    Ok(())
}

/// Serve one established connection: forward incoming text frames through
/// `tx` and write reply frames from `replies` back to the client.
///
/// Returns `Err(())` when the application side is gone (either channel
/// closed), signalling the caller to stop accepting. A client close frame
/// or socket error returns `Ok(())` so the accept loop can take the next
/// connection.
///
/// Generic over the stream and sink types so it can be unit-tested with
/// in-memory frames, without opening TCP ports.
pub async fn serve_connection<St, Si>(
    mut read: St,
    write: &mut Si,
    tx: &mpsc::Sender<WsEvent>,
    replies: &mut mpsc::Receiver<String>,
    addr: &str,
) -> Result<(), ()>
where
    St: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
    Si: Sink<Message> + Unpin,
{
    loop {
        tokio::select! {
            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if tx.send(WsEvent::Request(text.to_string())).await.is_err() {
                            return Err(());
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Client {addr} sent close frame");
                        return Ok(());
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error from {addr}: {e}");
                        return Ok(());
                    }
                    Some(_) => {
                        // Ignore Binary, Ping, Pong, Frame variants.
                    }
                    None => return Ok(()),
                }
            }
            reply = replies.recv() => {
                match reply {
                    Some(json) => {
                        if write.send(Message::Text(json.into())).await.is_err() {
                            warn!("Failed to write reply to {addr}");
                            return Ok(());
                        }
                    }
                    None => return Err(()),
                }
            }
        }
    }
}
