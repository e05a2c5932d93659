//! Integration tests for per-request proxies, against a minimal `CONNECT` proxy.

use std::time::Duration;

use tenacious::{HyperClient, Req, RetryPolicy};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn read_head(stream: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0_u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await.expect("read");
        assert!(n > 0, "connection closed mid-head");
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8(head).expect("utf-8 head")
}

/// Accepts one tunnel, answers the tunnelled request with `ok`, and returns
/// the `CONNECT` head and the tunnelled request head.
async fn one_shot_proxy() -> (String, JoinHandle<(String, String)>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr").to_string();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");

        let connect = read_head(&mut stream).await;
        stream
            .write_all(b"HTTP/1.1 200 Connection established\r\n\r\n")
            .await
            .expect("write");

        let tunnelled = read_head(&mut stream).await;
        stream
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok")
            .await
            .expect("write");

        (connect, tunnelled)
    });

    (addr, handle)
}

fn single_attempt() -> RetryPolicy {
    RetryPolicy::default()
        .with_attempts(1)
        .with_delay(Duration::ZERO)
}

#[tokio::test]
async fn test_request_tunnels_through_proxy_with_credentials() {
    let (proxy_addr, proxy) = one_shot_proxy().await;

    let client = HyperClient::new();
    let mut req = Req::new(&client, "http://api.example.test")
        .path("/ticker")
        .proxy(format!("http://user:p%40ss@{proxy_addr}"))
        .retry(single_attempt());

    let resp = req.get().await.expect("tunnelled response");
    assert_eq!(resp.text(), "ok");

    let (connect, tunnelled) = proxy.await.expect("proxy task");
    assert!(connect.starts_with("CONNECT api.example.test:80 HTTP/1.1\r\n"));
    // base64("user:p@ss")
    assert!(
        connect
            .to_ascii_lowercase()
            .contains("proxy-authorization: basic dxnlcjpwqhnz")
    );
    assert!(tunnelled.starts_with("GET /ticker HTTP/1.1\r\n"));
}

#[tokio::test]
async fn test_proxy_is_scoped_to_its_request() {
    let (proxy_addr, proxy) = one_shot_proxy().await;
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_string("direct"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();

    let mut proxied = Req::new(&client, "http://api.example.test")
        .path("/ticker")
        .proxy(format!("http://{proxy_addr}"))
        .retry(single_attempt());
    assert_eq!(proxied.get().await.expect("proxied").text(), "ok");

    let (connect, _) = proxy.await.expect("proxy task");
    assert!(!connect.to_ascii_lowercase().contains("proxy-authorization"));

    // the proxy is gone: this only succeeds if the shared client goes direct
    let mut direct = Req::new(&client, mock_server.uri())
        .path("/direct")
        .retry(single_attempt());
    assert_eq!(direct.get().await.expect("direct").text(), "direct");
}
