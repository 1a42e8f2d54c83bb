//! Received response with a lazily read body.

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use http::{HeaderMap, StatusCode};

use crate::{HttpClientError, Result};

/// Body chunks as delivered by the transport.
pub type BodyStream = BoxStream<'static, Result<Bytes>>;

/// Status, headers and an unread body stream.
///
/// The body is only pulled when [`ResponseOutcome::bytes`] is called, so a
/// response classified as a failure is dropped without reading it.
pub struct ResponseOutcome {
    status: StatusCode,
    headers: HeaderMap,
    body: BodyStream,
}

impl ResponseOutcome {
    /// Create a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: BodyStream) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a response with a fully buffered body.
    pub fn buffered(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        let body = stream::once(async move { Ok::<_, HttpClientError>(body) }).boxed();
        Self::new(status, headers, body)
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Read the whole body.
    pub async fn bytes(self) -> Result<Bytes> {
        let buf = self
            .body
            .try_fold(BytesMut::new(), |mut buf, chunk| async move {
                buf.extend_from_slice(&chunk);
                Ok(buf)
            })
            .await?;
        Ok(buf.freeze())
    }
}

impl std::fmt::Debug for ResponseOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseOutcome")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
