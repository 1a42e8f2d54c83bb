//! Transport abstraction and the reqwest-backed implementation.
//!
//! Connect and idle-read timeouts are handed to reqwest. The response
//! timeout wraps the exchange until headers arrive, and the idle-write
//! timeout is a watchdog raced against the exchange that observes how
//! quickly the connection pulls request body chunks.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt, TryStreamExt};
use http::HeaderValue;
use http::header::CONTENT_LENGTH;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::{
    ClientConfig, HttpClientError, RequestEnvelope, ResponseOutcome, Result, TimeoutPhase,
};

/// Size of the chunks a request body is streamed in.
pub const WRITE_CHUNK_SIZE: usize = 16 * 1024;

/// Moves a request envelope over the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and resolve once response headers are available.
    async fn dispatch(&self, envelope: RequestEnvelope) -> Result<ResponseOutcome>;
}

/// Transport backed by a single pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
    response_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Build the transport with every timeout from `config` wired in.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        if let Some((name, value)) = config.first_negative() {
            return Err(HttpClientError::InvalidConfig(format!(
                "{} must not be negative, got {}",
                name, value
            )));
        }

        // 3xx responses must reach the status classifier untouched.
        let mut builder = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());

        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.read_timeout() {
            builder = builder.read_timeout(timeout);
        }

        let inner = builder
            .build()
            .map_err(|e| HttpClientError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            inner,
            response_timeout: config.response_timeout(),
            write_timeout: config.write_timeout(),
        })
    }

    /// Get the underlying reqwest client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn dispatch(&self, envelope: RequestEnvelope) -> Result<ResponseOutcome> {
        let (method, url, mut headers, body) = envelope.into_parts();
        debug!(method = %method, url = %url, "Dispatching HTTP request");

        let mut request = reqwest::Request::new(method, url);
        let mut watchdog = None;

        if let Some(body) = body {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
            *request.body_mut() = Some(match self.write_timeout {
                Some(window) if !body.is_empty() => {
                    let watched = WatchedBody::new(body);
                    watchdog = Some((watched.progress(), window));
                    reqwest::Body::wrap_stream(watched)
                }
                _ => reqwest::Body::from(body),
            });
        }
        *request.headers_mut() = headers;

        let exchange = async {
            let send = self.inner.execute(request);
            match watchdog {
                Some((progress, window)) => tokio::select! {
                    result = send => result.map_err(HttpClientError::from),
                    err = watch_writes(progress, window) => Err(err),
                },
                None => send.await.map_err(HttpClientError::from),
            }
        };

        let response = match self.response_timeout {
            Some(window) => match tokio::time::timeout(window, exchange).await {
                Ok(result) => result?,
                Err(_) => {
                    debug!(timeout = ?window, "Response timeout fired");
                    return Err(HttpClientError::Timeout {
                        phase: TimeoutPhase::Response,
                        after: window,
                    });
                }
            },
            None => exchange.await?,
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes_stream()
            .map_err(HttpClientError::from)
            .boxed();

        Ok(ResponseOutcome::new(status, headers, body))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteState {
    /// No chunk handed to the connection yet.
    Idle,
    /// Last chunk handed over at this instant.
    Writing(Instant),
    Done,
}

#[derive(Debug)]
struct WriteProgress {
    state: Mutex<WriteState>,
}

impl WriteProgress {
    fn new() -> Self {
        Self {
            state: Mutex::new(WriteState::Idle),
        }
    }

    fn touch(&self) {
        *self.state.lock() = WriteState::Writing(Instant::now());
    }

    fn finish(&self) {
        *self.state.lock() = WriteState::Done;
    }

    fn snapshot(&self) -> WriteState {
        *self.state.lock()
    }
}

/// Request body that records each chunk the connection pulls.
struct WatchedBody {
    chunks: VecDeque<Bytes>,
    progress: Arc<WriteProgress>,
}

impl WatchedBody {
    fn new(mut body: Bytes) -> Self {
        let mut chunks = VecDeque::new();
        while !body.is_empty() {
            let len = body.len().min(WRITE_CHUNK_SIZE);
            chunks.push_back(body.split_to(len));
        }
        Self {
            chunks,
            progress: Arc::new(WriteProgress::new()),
        }
    }

    fn progress(&self) -> Arc<WriteProgress> {
        Arc::clone(&self.progress)
    }
}

impl Stream for WatchedBody {
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.chunks.pop_front() {
            Some(chunk) => {
                // With a fixed Content-Length the connection stops polling
                // after the last chunk, so completion is recorded here.
                if self.chunks.is_empty() {
                    self.progress.finish();
                } else {
                    self.progress.touch();
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            None => {
                self.progress.finish();
                Poll::Ready(None)
            }
        }
    }
}

/// Resolve with a write timeout once the body stalls for `window`.
///
/// Never resolves after the body has been fully handed over.
async fn watch_writes(progress: Arc<WriteProgress>, window: Duration) -> HttpClientError {
    loop {
        match progress.snapshot() {
            WriteState::Idle => tokio::time::sleep(window).await,
            WriteState::Writing(last) => {
                let deadline = last + window;
                if Instant::now() >= deadline {
                    debug!(timeout = ?window, "Write timeout fired");
                    return HttpClientError::Timeout {
                        phase: TimeoutPhase::Write,
                        after: window,
                    };
                }
                tokio::time::sleep_until(deadline).await;
            }
            WriteState::Done => futures::future::pending::<()>().await,
        }
    }
}
