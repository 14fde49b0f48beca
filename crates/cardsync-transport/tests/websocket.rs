//! Integration tests for the WebSocket client transport.
//!
//! Each test spins up a bare `tokio-tungstenite` server on an OS-assigned
//! port and dials it with [`WebSocketConnector`], so real frames cross a
//! real socket.

#[cfg(feature = "websocket")]
mod websocket {
    use cardsync_transport::{Connection, Connector, TransportError, WebSocketConnector};
    use futures_util::{SinkExt, StreamExt};
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    type ServerWs = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

    /// Binds a listener on a random port and returns it with its ws:// URL.
    async fn listen() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
        let addr = listener.local_addr().expect("should have addr");
        (listener, format!("ws://{addr}"))
    }

    async fn accept(listener: &TcpListener) -> ServerWs {
        let (stream, _) = listener.accept().await.expect("should accept");
        tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake should succeed")
    }

    #[tokio::test]
    async fn test_websocket_connect_send_and_receive() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(async move { accept(&listener).await });

        let conn = WebSocketConnector::new(url)
            .connect()
            .await
            .expect("client should connect");
        let mut server_ws = server.await.expect("task should complete");

        assert!(conn.id().get() > 0);

        // --- Client sends, server receives a text frame ---
        conn.send(br#"{"event":"get_games","data":{}}"#)
            .await
            .expect("send should succeed");
        let msg = server_ws.next().await.unwrap().unwrap();
        assert!(msg.is_text(), "JSON frames should travel as text");
        assert_eq!(msg.into_data().as_ref(), br#"{"event":"get_games","data":{}}"#);

        // --- Server sends, client receives ---
        server_ws
            .send(Message::text(r#"{"event":"update_games","data":["g1"]}"#.to_owned()))
            .await
            .unwrap();
        let received = conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, br#"{"event":"update_games","data":["g1"]}"#);

        conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_server_close() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(async move { accept(&listener).await });

        let conn = WebSocketConnector::new(url).connect().await.unwrap();
        let mut server_ws = server.await.unwrap();

        server_ws.send(Message::Close(None)).await.unwrap();

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on server close");
    }

    #[tokio::test]
    async fn test_websocket_connect_to_closed_port_fails() {
        let (listener, url) = listen().await;
        drop(listener);

        let result = WebSocketConnector::new(url).connect().await;
        assert!(matches!(result, Err(TransportError::ConnectFailed(_))));
    }
}
