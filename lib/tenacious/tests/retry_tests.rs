//! Attempt-loop tests against a scripted transport.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use tenacious::{Error, HttpClient, Req, Request, RequestSpec, Response, Result, RetryPolicy};

/// Replays canned outcomes and records every request it receives.
struct Scripted {
    outcomes: Mutex<VecDeque<Result<Response<Bytes>>>>,
    seen: Mutex<Vec<Request<Bytes>>>,
}

impl Scripted {
    fn new(outcomes: impl IntoIterator<Item = Result<Response<Bytes>>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            seen: Mutex::default(),
        }
    }

    fn seen(&self) -> Vec<Request<Bytes>> {
        self.seen.lock().expect("lock").clone()
    }
}

impl HttpClient for Scripted {
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        self.seen.lock().expect("lock").push(request);
        self.outcomes
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(Error::connection("script exhausted")))
    }
}

fn reply(status: u16, body: &'static str) -> Result<Response<Bytes>> {
    Ok(Response::new(
        status,
        HashMap::new(),
        Bytes::from_static(body.as_bytes()),
    ))
}

fn no_delay(attempts: u32) -> RetryPolicy {
    RetryPolicy::default()
        .with_attempts(attempts)
        .with_delay(Duration::ZERO)
}

#[tokio::test]
async fn test_first_success_stops() {
    let client = Scripted::new([reply(200, "ok"), reply(200, "unused")]);
    let mut req = Req::new(&client, "https://api.example.com/");

    let resp = req.send().await.expect("success");

    assert_eq!(resp.text(), "ok");
    assert_eq!(client.seen().len(), 1);
}

#[tokio::test]
async fn test_zero_attempts_means_one() {
    let client = Scripted::new([reply(500, "boom")]);
    let mut req = Req::new(&client, "https://api.example.com/").retry(no_delay(0));

    let err = req.send().await.expect_err("single failed attempt");

    let Error::ExhaustedRetries { attempts, .. } = err else {
        panic!("expected exhausted retries");
    };
    assert_eq!(attempts, 1);
    assert_eq!(client.seen().len(), 1);
}

#[tokio::test]
async fn test_classification_order() {
    let client = Scripted::new([
        Err(Error::connection("refused")),
        Err(Error::read("unexpected eof")),
        reply(502, "Error"),
        reply(200, "error"),
        reply(200, "fine"),
    ]);
    let mut req = Req::new(&client, "https://api.example.com/").retry(no_delay(5));

    let resp = req.send().await.expect("fifth attempt succeeds");

    assert_eq!(resp.text(), "fine");
    assert_eq!(client.seen().len(), 5);
}

#[tokio::test]
async fn test_read_error_reason() {
    let client = Scripted::new([Err(Error::read("unexpected eof"))]);
    let mut req = Req::new(&client, "https://api.example.com/").retry(no_delay(1));

    let err = req.send().await.expect_err("read failure");

    assert_eq!(
        err.to_string(),
        "request failed after 1 attempt(s): GET https://api.example.com/: response read error: unexpected eof"
    );
    assert!(err.response().is_some_and(|resp| resp.raw().is_none()));
}

#[tokio::test]
async fn test_reason_with_url_is_not_prefixed() {
    let client = Scripted::new([Err(Error::connection(
        "dns error for https://api.example.com/",
    ))]);
    let mut req = Req::new(&client, "https://api.example.com/").retry(no_delay(1));

    let err = req.send().await.expect_err("transport failure");

    let Error::ExhaustedRetries { message, .. } = &err else {
        panic!("expected exhausted retries");
    };
    assert_eq!(message, "connection error: dns error for https://api.example.com/");
}

#[tokio::test]
async fn test_last_outcome_wins() {
    let client = Scripted::new([reply(503, "first"), Err(Error::Timeout)]);
    let mut req = Req::new(&client, "https://api.example.com/").retry(no_delay(2));

    let err = req.send().await.expect_err("both attempts fail");

    assert!(err.to_string().ends_with("request timeout"));
    let resp = err.into_response().expect("envelope");
    assert!(resp.status().is_none());
    assert_eq!(resp.text(), "");
}

#[tokio::test(start_paused = true)]
async fn test_no_delay_after_final_attempt() {
    let client = Scripted::new([reply(500, "a"), reply(500, "b")]);
    let mut req = Req::new(&client, "https://api.example.com/").retry(
        RetryPolicy::default()
            .with_attempts(2)
            .with_delay(Duration::from_secs(10)),
    );

    let start = tokio::time::Instant::now();
    let err = req.send().await.expect_err("both attempts fail");

    assert!(err.is_exhausted());
    assert_eq!(start.elapsed(), Duration::from_secs(10));
}

#[tokio::test]
async fn test_request_reused_without_middleware() {
    let client = Scripted::new([reply(500, "a"), reply(200, "ok")]);
    let mut req = Req::new(&client, "https://api.example.com/")
        .path("items")
        .retry(no_delay(2));

    req.send().await.expect("second attempt succeeds");

    let seen = client.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].url(), seen[1].url());
    assert_eq!(
        req.raw_request().map(|raw| raw.url().as_str()),
        Some("https://api.example.com/items")
    );
}

#[tokio::test]
async fn test_middleware_rebuilds_each_attempt() {
    let client = Scripted::new([reply(500, "a"), reply(500, "b"), reply(200, "ok")]);
    let calls = AtomicUsize::new(0);

    let mut req = Req::new(&client, "https://api.example.com/")
        .retry(no_delay(3))
        .middleware(move |spec: &mut RequestSpec| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            spec.path = format!("page/{n}");
        });

    req.send().await.expect("third attempt succeeds");

    let paths: Vec<String> = client
        .seen()
        .iter()
        .map(|request| request.url().path().to_string())
        .collect();
    assert_eq!(paths, ["/page/1", "/page/2", "/page/3"]);
}

#[tokio::test]
async fn test_middleware_runs_in_registration_order() {
    let client = Scripted::new([reply(200, "ok")]);

    let mut req = Req::new(&client, "https://api.example.com/")
        .middleware(|spec: &mut RequestSpec| spec.body.push('a'))
        .middleware(|spec: &mut RequestSpec| spec.body.push('b'));

    req.send().await.expect("success");

    let seen = client.seen();
    assert_eq!(seen[0].body(), Some(&Bytes::from_static(b"ab")));
}

#[tokio::test]
async fn test_raw_request_reset_between_sends() {
    let client = Scripted::new([reply(200, "ok")]);
    let mut req = Req::new(&client, "https://api.example.com/");

    req.send().await.expect("success");
    assert!(req.raw_request().is_some());

    req.spec_mut().proxy_url = Some("::bad::".to_string());
    let err = req.send().await.expect_err("invalid proxy");

    assert!(matches!(err, Error::InvalidProxy { .. }));
    assert!(req.raw_request().is_none());
    assert_eq!(client.seen().len(), 1);
}

#[tokio::test]
async fn test_bare_host_port_proxy_consumes_no_attempt() {
    let client = Scripted::new([reply(200, "ok")]);
    let mut req = Req::new(&client, "http://127.0.0.1:9/").proxy("localhost:3128");

    let err = req.get().await.expect_err("proxy without scheme");

    assert!(matches!(err, Error::InvalidProxy { .. }));
    assert!(client.seen().is_empty());
}
