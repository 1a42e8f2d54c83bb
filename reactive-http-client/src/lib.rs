//! # Reactive HTTP Client
//!
//! An asynchronous HTTP client wrapper with a uniform request/response
//! contract over a reqwest transport.
//!
//! ## Features
//!
//! - **Four operations**: GET, form POST, multipart POST and JSON-body POST
//! - **Timeouts**: Independent connect, response, idle-read and idle-write windows
//! - **Status classification**: Any 4xx/5xx resolves to a failure without decoding the body
//! - **Typed decoding**: The target type is a generic parameter bound to the codec
//! - **Pluggable seams**: Swap the [`Transport`] or [`Codec`] for tests or custom stacks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reactive_http_client::{ClientConfig, HeaderMap, ReactiveHttpClient};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .connection_timeout_in_millis(5000)
//!         .response_timeout_in_millis(8000)
//!         .read_timeout_in_millis(3000)
//!         .write_timeout_in_millis(1000)
//!         .build();
//!
//!     let client = ReactiveHttpClient::new(config)?;
//!     let user: User = client
//!         .do_get("https://api.example.com/users/1", &HeaderMap::new())
//!         .await?;
//!
//!     println!("Hello {}", user.name);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Classification
//!
//! ```rust,no_run
//! use reactive_http_client::{ClientConfig, HeaderMap, HttpClientError, ReactiveHttpClient};
//!
//! # async fn run() -> Result<(), HttpClientError> {
//! let client = ReactiveHttpClient::new(ClientConfig::default())?;
//!
//! match client.do_get::<serde_json::Value>("https://api.example.com/missing", &HeaderMap::new()).await {
//!     Err(HttpClientError::RequestFailed { status, message }) => {
//!         // message == "Client returned 404 status code"
//!         eprintln!("{} ({})", message, status);
//!     }
//!     Err(e) if e.is_timeout() => eprintln!("timed out: {}", e),
//!     other => println!("{:?}", other.map(|v| v.to_string())),
//! }
//! # Ok(())
//! # }
//! ```

mod classify;
mod client;
mod codec;
mod config;
mod error;
mod multi_value;
mod request;
mod response;
mod transport;

pub use classify::{Outcome, classify};
pub use client::ReactiveHttpClient;
pub use codec::{Codec, JsonCodec, MultipartBody};
pub use config::{
    ClientConfig, ClientConfigBuilder, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_READ_TIMEOUT_MS,
    DEFAULT_RESPONSE_TIMEOUT_MS, DEFAULT_WRITE_TIMEOUT_MS,
};
pub use error::{BoxError, HttpClientError, Result, TimeoutPhase};
pub use multi_value::MultiValueMap;
pub use request::{Part, RequestEnvelope};
pub use response::{BodyStream, ResponseOutcome};
pub use transport::{ReqwestTransport, Transport, WRITE_CHUNK_SIZE};

// Re-export common types
pub use bytes::Bytes;
pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};

/// Prelude for common imports.
///
/// ```
/// use reactive_http_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::ReactiveHttpClient;
    pub use crate::codec::{Codec, JsonCodec};
    pub use crate::config::{ClientConfig, ClientConfigBuilder};
    pub use crate::error::{HttpClientError, Result, TimeoutPhase};
    pub use crate::multi_value::MultiValueMap;
    pub use crate::request::Part;
    pub use http::{HeaderMap, HeaderValue, StatusCode, header};
}
