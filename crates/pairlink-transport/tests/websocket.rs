//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener on a loopback port and drive it with a
//! `tokio-tungstenite` client, so frames really cross the network stack.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use pairlink_transport::{Connection, Incoming, Transport, WebSocketTransport};
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Binds on an OS-assigned port and connects one client to it.
    /// Returns the client stream and the server side of the connection.
    async fn connected_pair() -> (ClientWs, pairlink_transport::WebSocketConnection)
    {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("should have local addr");

        let server_handle = tokio::spawn(async move {
            let incoming = transport.accept().await.expect("should accept");
            incoming.upgrade().await.expect("should upgrade")
        });

        let (client, _) =
            tokio_tungstenite::connect_async(format!("ws://{addr}"))
                .await
                .expect("client should connect");
        let server_conn = server_handle.await.expect("task should complete");
        (client, server_conn)
    }

    #[tokio::test]
    async fn test_websocket_send_arrives_as_text_frame() {
        let (mut client, server_conn) = connected_pair().await;

        server_conn
            .send(r#"{"type":"waitingForMatch"}"#)
            .await
            .expect("send should succeed");

        let msg = client.next().await.unwrap().unwrap();
        assert!(msg.is_text(), "browser clients expect text frames");
        assert_eq!(msg.to_text().unwrap(), r#"{"type":"waitingForMatch"}"#);
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_text_and_utf8_binary() {
        let (mut client, server_conn) = connected_pair().await;

        client
            .send(Message::Text("hello".to_owned().into()))
            .await
            .unwrap();
        client
            .send(Message::Binary(b"world".to_vec().into()))
            .await
            .unwrap();

        let first = server_conn.recv().await.unwrap().unwrap();
        let second = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(first, "hello");
        assert_eq!(second, "world");
    }

    #[tokio::test]
    async fn test_websocket_recv_skips_non_utf8_binary() {
        let (mut client, server_conn) = connected_pair().await;

        client
            .send(Message::Binary(vec![0xff, 0xfe, 0xfd].into()))
            .await
            .unwrap();
        client
            .send(Message::Text("after".to_owned().into()))
            .await
            .unwrap();

        let frame = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(frame, "after");
    }

    #[tokio::test]
    async fn test_websocket_send_while_recv_pending() {
        // A handler waits on `recv` most of the time; sends to that same
        // connection must still go through.
        let (mut client, server_conn) = connected_pair().await;
        let server_conn = std::sync::Arc::new(server_conn);

        let reader = {
            let conn = std::sync::Arc::clone(&server_conn);
            tokio::spawn(async move { conn.recv().await })
        };
        tokio::task::yield_now().await;

        server_conn.send("ping-from-server").await.expect("send");
        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.to_text().unwrap(), "ping-from-server");

        client.send(Message::Close(None)).await.unwrap();
        let result = reader.await.unwrap().expect("recv should not error");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let (mut client, server_conn) = connected_pair().await;

        client.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_websocket_peer_addr_is_loopback() {
        let (_client, server_conn) = connected_pair().await;
        assert!(server_conn.peer_addr().ip().is_loopback());
    }

    #[tokio::test]
    async fn test_websocket_accept_returns_before_handshake() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("should have local addr");

        // Connects at the TCP level and never sends an upgrade request.
        let _idle = tokio::net::TcpStream::connect(addr)
            .await
            .expect("tcp connect");

        let incoming = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            transport.accept(),
        )
        .await
        .expect("accept should not wait for the handshake")
        .expect("should accept");
        assert!(incoming.peer_addr().ip().is_loopback());
    }

    #[tokio::test]
    async fn test_websocket_upgrade_fails_for_non_websocket_client() {
        use tokio::io::AsyncWriteExt;

        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("should have local addr");

        let mut plain = tokio::net::TcpStream::connect(addr)
            .await
            .expect("tcp connect");
        plain
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();

        let incoming = transport.accept().await.expect("should accept");
        let err = match incoming.upgrade().await {
            Ok(_) => panic!("a plain HTTP request should not upgrade"),
            Err(e) => e,
        };
        assert!(err.is_per_connection());
    }
}
