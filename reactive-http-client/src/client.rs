//! HTTP client implementation.

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::classify::{Outcome, classify};
use crate::{
    ClientConfig, Codec, HttpClientError, JsonCodec, MultiValueMap, Part, RequestEnvelope,
    ReqwestTransport, Result, Transport,
};

/// Asynchronous HTTP client with uniform timeouts and status classification.
///
/// Every operation builds a [`RequestEnvelope`], dispatches it through the
/// transport and classifies the status before decoding. Any 4xx or 5xx
/// status resolves to [`HttpClientError::RequestFailed`] without touching
/// the body. Clones share the same transport.
pub struct ReactiveHttpClient<C: Codec = JsonCodec> {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    codec: Arc<C>,
}

impl ReactiveHttpClient<JsonCodec> {
    /// Create a client backed by reqwest with every timeout from `config`.
    ///
    /// Fails when a timeout is negative or the transport cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport, JsonCodec))
    }
}

impl<C: Codec> ReactiveHttpClient<C> {
    /// Create a client over a custom transport and codec.
    pub fn with_transport(
        config: ClientConfig,
        transport: impl Transport + 'static,
        codec: C,
    ) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
            codec: Arc::new(codec),
        }
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the transport.
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Get the codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// GET `url` and decode the JSON response.
    #[tracing::instrument(skip(self, headers))]
    pub async fn do_get<T: DeserializeOwned>(&self, url: &str, headers: &HeaderMap) -> Result<T> {
        let envelope = build_envelope(Method::GET, url, headers)?;
        self.exchange(envelope).await
    }

    /// POST url-encoded form fields and decode the JSON response.
    #[tracing::instrument(skip(self, headers, form))]
    pub async fn do_post_with_form_param<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &HeaderMap,
        form: &MultiValueMap<String>,
    ) -> Result<T> {
        let body = self.codec.encode_form(form)?;
        let envelope = build_envelope(Method::POST, url, headers)?
            .content_type(HeaderValue::from_static(
                "application/x-www-form-urlencoded",
            ))
            .body(body);
        self.exchange(envelope).await
    }

    /// POST `multipart/form-data` parts and decode the JSON response.
    #[tracing::instrument(skip(self, headers, parts))]
    pub async fn do_post_with_multipart<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &HeaderMap,
        parts: &MultiValueMap<Part>,
    ) -> Result<T> {
        let multipart = self.codec.encode_multipart(parts)?;
        let content_type = HeaderValue::from_str(&multipart.content_type())?;
        let envelope = build_envelope(Method::POST, url, headers)?
            .content_type(content_type)
            .body(multipart.body);
        self.exchange(envelope).await
    }

    /// POST `body` serialized as JSON and decode the JSON response.
    #[tracing::instrument(skip(self, headers, body))]
    pub async fn do_post_with_request_body<T, B>(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: &B,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = self.codec.encode_json(body)?;
        let envelope = build_envelope(Method::POST, url, headers)?
            .content_type(HeaderValue::from_static("application/json"))
            .body(body);
        self.exchange(envelope).await
    }

    /// Dispatch, classify, then decode.
    async fn exchange<T: DeserializeOwned>(&self, envelope: RequestEnvelope) -> Result<T> {
        let start = Instant::now();
        let response = self.transport.dispatch(envelope).await?;
        let status = response.status().as_u16();

        debug!(
            status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Received HTTP response"
        );

        if let Outcome::Fail(message) = classify(status) {
            warn!(status, "{}", message);
            return Err(HttpClientError::RequestFailed { status, message });
        }

        let body: Bytes = response.bytes().await?;
        self.codec.decode(&body)
    }
}

fn build_envelope(method: Method, url: &str, headers: &HeaderMap) -> Result<RequestEnvelope> {
    let url = Url::parse(url)?;
    Ok(RequestEnvelope::new(method, url)
        .headers(headers)
        .accept(HeaderValue::from_static("application/json")))
}

impl<C: Codec> Clone for ReactiveHttpClient<C> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            transport: Arc::clone(&self.transport),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<C: Codec + std::fmt::Debug> std::fmt::Debug for ReactiveHttpClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveHttpClient")
            .field("config", &self.config)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
