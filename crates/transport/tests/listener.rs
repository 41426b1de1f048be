//! Listener tests over loopback TCP.

use futures_util::StreamExt;
use std::{io::Write, time::Duration};
use tcore::{FileReplay, Generative, ReplayMode, testing::SuffixEngine};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::oneshot,
};
use typer_transport::{Connection, ListenMode, Listener, ServerConfig, SessionPolicy};

fn loopback() -> ServerConfig {
    ServerConfig::new("127.0.0.1", 0)
}

#[tokio::test]
async fn bind_failure_is_an_error() {
    let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = taken.local_addr().unwrap().port();
    let result = Listener::bind(&ServerConfig::new("127.0.0.1", port), ListenMode::Loop).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn once_mode_serves_one_connection_and_returns() {
    let listener = Listener::bind(&loopback(), ListenMode::Once).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (_tx, rx) = oneshot::channel();
    let server = tokio::spawn(async move {
        let mut source = Generative::new(SuffixEngine::new(" world")).max_length(11);
        listener
            .serve(&mut source, SessionPolicy::default(), rx)
            .await
    });

    let mut conn = Connection::connect(addr).await.unwrap();
    conn.send_prompt("Hello").await.unwrap();
    let received: Vec<u8> = conn
        .bytes()
        .map(|bytes| bytes.unwrap())
        .collect::<Vec<_>>()
        .await
        .concat();
    assert_eq!(received, b" world world");

    let stats = server.await.unwrap();
    assert_eq!(stats.sessions, 1);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn loop_mode_survives_abrupt_disconnect() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "first").unwrap();
    let path = file.path().to_path_buf();

    let listener = Listener::bind(&loopback(), ListenMode::Loop).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    let server = tokio::spawn(async move {
        let mut source = FileReplay::new(path)
            .delay(Duration::from_millis(2))
            .mode(ReplayMode::Poll {
                placeholder: "tick\n".into(),
            });
        listener
            .serve(&mut source, SessionPolicy::default(), rx)
            .await
    });

    let mut first = TcpStream::connect(addr).await.unwrap();
    first.write_all(b"one").await.unwrap();
    let mut buf = [0u8; 6];
    first.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"first\n");
    drop(first);

    let mut second = TcpStream::connect(addr).await.unwrap();
    second.write_all(b"two").await.unwrap();
    let mut buf = [0u8; 11];
    tokio::time::timeout(Duration::from_secs(10), second.read_exact(&mut buf))
        .await
        .expect("second session never started")
        .unwrap();
    assert_eq!(&buf, b"first\ntick\n");

    tx.send(()).unwrap();
    let stats = server.await.unwrap();
    assert!(stats.sessions >= 1);
    assert!(stats.disconnected >= 1);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn shutdown_stops_an_idle_listener() {
    let listener = Listener::bind(&loopback(), ListenMode::Loop).await.unwrap();
    let (tx, rx) = oneshot::channel();
    let server = tokio::spawn(async move {
        let mut source = Generative::new(SuffixEngine::new("!"));
        listener
            .serve(&mut source, SessionPolicy::default(), rx)
            .await
    });
    tx.send(()).unwrap();
    let stats = server.await.unwrap();
    assert_eq!(stats.sessions, 0);
}
