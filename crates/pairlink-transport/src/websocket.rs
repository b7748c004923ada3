//! WebSocket transport built on `tokio-tungstenite`.
//!
//! Accepting and upgrading are separate steps: the listener only accepts
//! TCP, and the upgrade runs wherever the caller awaits it. Each upgraded
//! socket is split into a write half and a read half behind
//! separate locks. A handler spends most of its life parked in `recv`, and
//! the lobby still has to be able to push frames to it in the meantime.

use std::net::SocketAddr;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::{Connection, Incoming, Transport, TransportError};

type WsStream = WebSocketStream<TcpStream>;

/// Listens for TCP connections that will be upgraded to WebSockets.
pub struct WebSocketTransport {
    listener: TcpListener,
}

impl WebSocketTransport {
    /// Binds to `addr` (`host:port`; port 0 picks a free port).
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| TransportError::Bind {
                addr: addr.to_owned(),
                source,
            })?;
        tracing::info!(addr, "websocket transport listening");
        Ok(Self { listener })
    }
}

impl Transport for WebSocketTransport {
    type Incoming = IncomingWebSocket;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Incoming, Self::Error> {
        let (tcp, peer) = self.listener.accept().await.map_err(TransportError::Accept)?;
        tracing::trace!(%peer, "tcp connection accepted");
        Ok(IncomingWebSocket { tcp, peer })
    }

    fn local_addr(&self) -> Result<SocketAddr, Self::Error> {
        self.listener.local_addr().map_err(TransportError::Accept)
    }
}

/// A TCP connection waiting for its WebSocket upgrade request.
pub struct IncomingWebSocket {
    tcp: TcpStream,
    peer: SocketAddr,
}

impl Incoming for IncomingWebSocket {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn upgrade(self) -> Result<Self::Connection, Self::Error> {
        let peer = self.peer;
        let ws = tokio_tungstenite::accept_async(self.tcp)
            .await
            .map_err(|e| TransportError::Upgrade {
                peer,
                source: e.into(),
            })?;
        tracing::debug!(%peer, "websocket upgrade complete");

        let (sink, stream) = ws.split();
        Ok(WebSocketConnection {
            peer,
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        })
    }

    fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

/// One upgraded WebSocket connection.
pub struct WebSocketConnection {
    peer: SocketAddr,
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<SplitStream<WsStream>>,
}

impl WebSocketConnection {
    fn send_error(&self, e: tokio_tungstenite::tungstenite::Error) -> TransportError {
        TransportError::Send {
            peer: self.peer,
            source: e.into(),
        }
    }
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send(&self, frame: &str) -> Result<(), Self::Error> {
        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(frame.to_owned().into()))
            .await
            .map_err(|e| self.send_error(e))
    }

    async fn recv(&self) -> Result<Option<String>, Self::Error> {
        let mut stream = self.stream.lock().await;
        while let Some(next) = stream.next().await {
            let msg = next.map_err(|e| TransportError::Receive {
                peer: self.peer,
                source: e.into(),
            })?;
            match classify(msg) {
                Inbound::Frame(text) => return Ok(Some(text)),
                Inbound::Closed => return Ok(None),
                Inbound::Skip(reason) => {
                    tracing::trace!(peer = %self.peer, reason, "skipping frame");
                }
            }
        }
        Ok(None)
    }

    async fn close(&self) -> Result<(), Self::Error> {
        let mut sink = self.sink.lock().await;
        sink.close().await.map_err(|e| self.send_error(e))
    }

    fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

// ---------------------------------------------------------------------------
// Frame classification
// ---------------------------------------------------------------------------

/// What an incoming WebSocket message means to the relay.
#[derive(Debug, PartialEq, Eq)]
enum Inbound {
    /// A text payload to hand upward.
    Frame(String),
    /// The peer said goodbye.
    Closed,
    /// Control traffic or unusable data.
    Skip(&'static str),
}

/// Text passes through. Binary passes through if it is valid UTF-8, since
/// some clients send JSON that way.
fn classify(msg: Message) -> Inbound {
    match msg {
        Message::Text(text) => Inbound::Frame(text.as_str().to_owned()),
        Message::Binary(data) => match String::from_utf8(data.to_vec()) {
            Ok(text) => Inbound::Frame(text),
            Err(_) => Inbound::Skip("binary frame is not UTF-8"),
        },
        Message::Close(_) => Inbound::Closed,
        Message::Ping(_) | Message::Pong(_) => Inbound::Skip("control frame"),
        Message::Frame(_) => Inbound::Skip("raw frame"),
    }
}
