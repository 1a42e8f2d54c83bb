//! Outbound request envelope and multipart parts.

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use url::Url;

use crate::Result;

/// A single multipart part: its own headers plus a body.
#[derive(Debug, Clone, Default)]
pub struct Part {
    headers: HeaderMap,
    file_name: Option<String>,
    body: Bytes,
}

impl Part {
    /// A `text/plain` part.
    pub fn text(value: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        Self {
            headers,
            file_name: None,
            body: Bytes::from(value.into()),
        }
    }

    /// An `application/octet-stream` part.
    pub fn bytes(body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );
        Self {
            headers,
            file_name: None,
            body: body.into(),
        }
    }

    /// Set the file name reported in `Content-Disposition`.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Override the part content type.
    pub fn mime(mut self, content_type: &str) -> Result<Self> {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_str(content_type)?);
        Ok(self)
    }

    /// Add a header to this part.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Part headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// File name, if any.
    pub fn get_file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Part body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Fully assembled outbound request, built once per call.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl RequestEnvelope {
    /// Create an envelope with no headers and no body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Append every entry of `headers`, keeping repeated names.
    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        for (name, value) in headers {
            self.headers.append(name.clone(), value.clone());
        }
        self
    }

    /// Set the `Accept` header, replacing any caller value.
    pub fn accept(mut self, value: HeaderValue) -> Self {
        self.headers.insert(ACCEPT, value);
        self
    }

    /// Set the `Content-Type` header, replacing any caller value.
    pub fn content_type(mut self, value: HeaderValue) -> Self {
        self.headers.insert(CONTENT_TYPE, value);
        self
    }

    /// Set the encoded body.
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Outgoing headers.
    pub fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    /// Encoded body, if any.
    pub fn body_bytes(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Split into owned parts for the transport.
    pub fn into_parts(self) -> (Method, Url, HeaderMap, Option<Bytes>) {
        (self.method, self.url, self.headers, self.body)
    }
}
