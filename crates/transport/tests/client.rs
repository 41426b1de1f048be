//! Tests for the client connection and line windows.

use futures_util::{StreamExt, stream};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};
use typer_transport::{
    Connection, LineWindow, PROMPT_BUFFER, ServerConfig, window::windows,
};

/// Verify Connection is Send (required for async usage).
#[test]
fn connection_is_send() {
    fn assert_send<T: Send>() {}
    let _: fn() = assert_send::<Connection>;
}

#[test]
fn address_brackets_ipv6() {
    assert_eq!(ServerConfig::new("::1", 80).address(), "[::1]:80");
    assert_eq!(ServerConfig::new("0.0.0.0", 80).address(), "0.0.0.0:80");
}

#[test]
fn window_slides_then_drains() {
    let mut window = LineWindow::new(2);
    assert_eq!(window.push("a".into()), None);
    assert_eq!(window.push("b".into()), None);
    assert_eq!(window.push("c".into()), Some(vec!["a".into(), "b".into(), "c".into()]));
    assert_eq!(window.push("d".into()), Some(vec!["b".into(), "c".into(), "d".into()]));
    assert_eq!(window.finish(), Some(vec!["c".into(), "d".into()]));
    assert_eq!(window.finish(), Some(vec!["d".into()]));
    assert_eq!(window.finish(), None);
}

#[test]
fn short_input_still_puts_every_line_first_once() {
    let mut window = LineWindow::new(10);
    assert_eq!(window.push("a".into()), None);
    assert_eq!(window.push("b".into()), None);
    assert_eq!(window.finish(), Some(vec!["a".into(), "b".into()]));
    assert_eq!(window.finish(), Some(vec!["b".into()]));
    assert_eq!(window.finish(), None);
}

#[tokio::test]
async fn windows_stream_matches_manual_driving() {
    let lines = stream::iter(["1", "2", "3"].map(|line| Ok(line.to_owned())));
    let fronts: Vec<String> = windows(lines, 1)
        .map(|window| window.unwrap()[0].clone())
        .collect()
        .await;
    assert_eq!(fronts, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn lines_read_until_server_closes() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut prompt = [0u8; 5];
        stream.read_exact(&mut prompt).await.unwrap();
        stream.write_all(b"one\ntwo\nthr").await.unwrap();
        stream.write_all(b"ee").await.unwrap();
        prompt
    });

    let mut conn = Connection::connect(addr).await.unwrap();
    conn.send_prompt("hello").await.unwrap();
    let lines: Vec<String> = conn.lines().map(|line| line.unwrap()).collect().await;
    assert_eq!(lines, vec!["one", "two", "three"]);
    assert_eq!(&server.await.unwrap(), b"hello");
}

#[tokio::test]
async fn oversized_and_empty_prompts_are_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accept = tokio::spawn(async move { listener.accept().await.unwrap() });

    let mut conn = Connection::connect(addr).await.unwrap();
    assert!(conn.send_prompt("").await.is_err());
    assert!(conn.send_prompt(&"x".repeat(PROMPT_BUFFER + 1)).await.is_err());
    assert!(conn.send_prompt(&"x".repeat(PROMPT_BUFFER)).await.is_ok());
    conn.close().await.unwrap();
    accept.await.unwrap();
}
