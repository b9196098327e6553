//! Shared helpers for integration tests: a local HTTP server standing in
//! for the upstream lookup services.

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use number_lookup_bot::config::LookupConfig;
use parking_lot::Mutex;
use tokio::net::TcpListener;

/// Response returned by the mock upstream for every request
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl CannedResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn ok_json(body: &str) -> Self {
        Self::new(200, body)
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Local upstream recording the path and query of every request it receives
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockUpstream {
    pub async fn start(response: CannedResponse) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream");
        let addr = listener.local_addr().expect("mock upstream address");
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    continue;
                };
                let recorded = Arc::clone(&recorded);
                let response = response.clone();

                tokio::spawn(async move {
                    let io = TokioIo::new(stream);
                    let service = hyper::service::service_fn(
                        move |req: hyper::Request<hyper::body::Incoming>| {
                            let recorded = Arc::clone(&recorded);
                            let response = response.clone();
                            async move {
                                recorded.lock().push(req.uri().to_string());
                                tokio::time::sleep(response.delay).await;

                                let mut reply = hyper::Response::new(response.body);
                                *reply.status_mut() = hyper::StatusCode::from_u16(response.status)
                                    .expect("valid status code");
                                reply.headers_mut().insert(
                                    "content-type",
                                    hyper::header::HeaderValue::from_static("application/json"),
                                );
                                Ok::<_, Infallible>(reply)
                            }
                        },
                    );
                    let _ = http1::Builder::new().serve_connection(io, service).await;
                });
            }
        });

        Self { addr, requests }
    }

    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

/// Lookup configuration pointing at the given endpoints
pub fn lookup_config(phone_endpoint: &str, id_endpoint: &str, timeout_secs: u64) -> LookupConfig {
    LookupConfig {
        phone_endpoint: phone_endpoint.to_string(),
        id_endpoint: id_endpoint.to_string(),
        id_access_key: "test-key".to_string(),
        id_query_param: "id".to_string(),
        timeout_secs,
    }
}

/// An address nothing listens on
pub const UNREACHABLE_ENDPOINT: &str = "http://127.0.0.1:1/";
