//! Shared mock services for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, Response, StatusCode},
    routing::get,
    Router,
};
use identity_proxy::config::FailurePolicy;
use identity_proxy::identity::{EndpointConfig, IdentityResolver};
use identity_proxy::pipeline::{RequestAugmenter, UpstreamForwarder};
use identity_proxy::{AugmentationPipeline, USER_UUID};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use url::Url;

/// Identity service that always answers with the same status and body.
#[derive(Clone)]
pub struct MockIdentity {
    pub url: Url,
    pub calls: Arc<AtomicU32>,
    pub credentials: Arc<Mutex<Vec<String>>>,
}

impl MockIdentity {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

pub async fn start_identity_service(status: StatusCode, body: &'static str) -> MockIdentity {
    let calls = Arc::new(AtomicU32::new(0));
    let credentials = Arc::new(Mutex::new(Vec::new()));

    let (c, creds) = (calls.clone(), credentials.clone());
    let app = Router::new().route(
        "/identity",
        get(move |headers: HeaderMap| {
            let (c, creds) = (c.clone(), creds.clone());
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
                    creds.lock().unwrap().push(auth.to_string());
                }
                (status, body)
            }
        }),
    );

    let addr = serve(app).await;
    MockIdentity {
        url: format!("http://{addr}/identity").parse().unwrap(),
        calls,
        credentials,
    }
}

/// Identity service whose handler never answers.
///
/// `dropped` fires once the in-flight handler future is dropped, which
/// happens when the calling connection goes away.
pub struct HangingIdentity {
    pub url: Url,
    pub calls: Arc<AtomicU32>,
    pub dropped: oneshot::Receiver<()>,
}

impl HangingIdentity {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

struct NotifyOnDrop(Option<oneshot::Sender<()>>);

impl Drop for NotifyOnDrop {
    fn drop(&mut self) {
        if let Some(tx) = self.0.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn start_hanging_identity_service() -> HangingIdentity {
    let calls = Arc::new(AtomicU32::new(0));
    let (tx, dropped) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));

    let c = calls.clone();
    let app = Router::new().route(
        "/identity",
        get(move || {
            let (c, tx) = (c.clone(), tx.clone());
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                let _guard = NotifyOnDrop(tx.lock().unwrap().take());
                tokio::time::sleep(Duration::from_secs(60)).await;
                (StatusCode::OK, r#"{"data":{"result":[{"uuid":"late"}]}}"#)
            }
        }),
    );

    let addr = serve(app).await;
    HangingIdentity {
        url: format!("http://{addr}/identity").parse().unwrap(),
        calls,
        dropped,
    }
}

/// Upstream that records what it received, echoes any `User-Uuid` back and
/// sets two cookies. The body is echoed, or `ok` when the request had none.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicU32>,
    pub last_headers: Arc<Mutex<Option<HeaderMap>>>,
}

impl MockUpstream {
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_headers(&self) -> HeaderMap {
        self.last_headers.lock().unwrap().clone().expect("upstream was never called")
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

async fn echo_upstream(State(upstream): State<MockUpstream>, headers: HeaderMap, body: Bytes) -> Response<Body> {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    *upstream.last_headers.lock().unwrap() = Some(headers.clone());

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(SET_COOKIE, "session=1")
        .header(SET_COOKIE, "theme=dark");
    if let Some(claim) = headers.get(USER_UUID) {
        response = response.header(USER_UUID, claim.clone());
    }

    let body = if body.is_empty() { Bytes::from_static(b"ok") } else { body };
    response.body(Body::from(body)).unwrap()
}

pub async fn start_upstream() -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let upstream = MockUpstream {
        addr: listener.local_addr().unwrap(),
        hits: Arc::new(AtomicU32::new(0)),
        last_headers: Arc::new(Mutex::new(None)),
    };

    let app = Router::new().fallback(echo_upstream).with_state(upstream.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    upstream
}

/// Backend that promises more body than it sends, then hangs up.
pub async fn start_truncating_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = "HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\npartial";
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    addr
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn pipeline(identity: &Url, on_failure: FailurePolicy) -> AugmentationPipeline {
    pipeline_with_upstream(identity, None, on_failure)
}

pub fn pipeline_with_upstream(
    identity: &Url,
    upstream: Option<Url>,
    on_failure: FailurePolicy,
) -> AugmentationPipeline {
    let endpoint = Arc::new(EndpointConfig::new(identity.clone()));
    let resolver = IdentityResolver::new(reqwest::Client::new(), endpoint);
    AugmentationPipeline::new(
        RequestAugmenter::new(resolver),
        UpstreamForwarder::new(upstream),
        on_failure,
    )
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}
