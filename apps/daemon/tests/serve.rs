//! Tests for building sources and serving them end to end.

use std::io::Write;
use tcore::{Augment, Generative, testing::SuffixEngine};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use transport::{ListenMode, SessionPolicy};
use typer_daemon::{
    DaemonConfig, StartPrompt, build_source,
    config::{AugmentConfig, ReplayConfig, ReplayModeKind, SourceConfig},
    serve_source, serve_with_config,
};

fn loopback(mode: ListenMode) -> DaemonConfig {
    let mut config = DaemonConfig::default();
    config.server.port = 0;
    config.server.mode = mode;
    config
}

async fn request(addr: std::net::SocketAddr, prompt: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(prompt.as_bytes()).await.unwrap();
    let mut received = String::new();
    stream.read_to_string(&mut received).await.unwrap();
    received
}

#[tokio::test]
async fn replay_config_serves_file_once() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "fn main() {{\n}}\n").unwrap();

    let mut config = loopback(ListenMode::Once);
    config.source = SourceConfig::Replay(ReplayConfig {
        file: file.path().to_path_buf(),
        delay_ms: 0,
        mode: ReplayModeKind::Finite,
        placeholder: String::new(),
    });

    let handle = serve_with_config(&config).await.unwrap();
    let received = request(handle.addr, "anything").await;
    assert_eq!(received, "fn main() {\n}\n");

    let stats = handle.finished().await.unwrap();
    assert_eq!(stats.sessions, 1);
}

#[tokio::test]
async fn missing_replay_file_fails_before_binding() {
    let mut config = loopback(ListenMode::Once);
    config.source = SourceConfig::Replay(ReplayConfig {
        file: "/definitely/not/here.txt".into(),
        delay_ms: 0,
        mode: ReplayModeKind::Finite,
        placeholder: String::new(),
    });
    assert!(serve_with_config(&config).await.is_err());
}

#[test]
fn invalid_engine_endpoint_is_fatal() {
    let mut config = DaemonConfig::default();
    let SourceConfig::Generative(generative) = &mut config.source else {
        panic!("default source is generative");
    };
    generative.engine.endpoint = "not a url".into();
    assert!(build_source(&config.source).is_err());
}

#[tokio::test]
async fn loop_mode_serves_until_shutdown() {
    let config = loopback(ListenMode::Loop);
    let source = Generative::new(SuffixEngine::new(" world")).max_length(11);
    let handle = serve_source(source, &config, SessionPolicy::default())
        .await
        .unwrap();

    assert_eq!(request(handle.addr, "Hello").await, " world world");
    assert_eq!(request(handle.addr, "Bye").await, " world world");

    let stats = handle.shutdown().await.unwrap();
    assert_eq!(stats.sessions, 2);
    assert_eq!(stats.failed, 0);
}

#[test]
fn start_prompt_fills_template_from_topics_file() {
    let mut topics = tempfile::NamedTempFile::new().unwrap();
    writeln!(topics, "parsers").unwrap();

    let augment = AugmentConfig {
        template: "// {topic}\n{prompt}".into(),
        topics_file: topics.path().to_path_buf(),
        seed: Some(1),
    };
    let mut start = StartPrompt::from_config(Some(&augment)).unwrap();
    assert_eq!(start.augment("fn"), "// parsers\nfn");

    let mut verbatim = StartPrompt::from_config(None).unwrap();
    assert_eq!(verbatim.augment("fn"), "fn");
}
