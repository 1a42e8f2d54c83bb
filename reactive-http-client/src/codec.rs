//! Body codecs.
//!
//! The client never touches wire formats directly. Outbound bodies are
//! produced and inbound bodies consumed through a [`Codec`], so hosts can
//! swap the JSON implementation or observe decoding in tests.

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{HttpClientError, MultiValueMap, Part, Result};

/// Encoded multipart body together with its boundary.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    /// Boundary separating the parts.
    pub boundary: String,
    /// Encoded body.
    pub body: Bytes,
}

impl MultipartBody {
    /// `Content-Type` value announcing the boundary.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

/// Serialization capability used by the client.
pub trait Codec: Send + Sync + 'static {
    /// Encode a value as a JSON body.
    fn encode_json<B: Serialize + ?Sized>(&self, body: &B) -> Result<Bytes>;

    /// Encode form fields as `application/x-www-form-urlencoded`.
    fn encode_form(&self, form: &MultiValueMap<String>) -> Result<Bytes>;

    /// Encode parts as `multipart/form-data`.
    fn encode_multipart(&self, parts: &MultiValueMap<Part>) -> Result<MultipartBody>;

    /// Decode a response body into `T`.
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T>;
}

/// Default codec backed by `serde_json` and `serde_urlencoded`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode_json<B: Serialize + ?Sized>(&self, body: &B) -> Result<Bytes> {
        serde_json::to_vec(body)
            .map(Bytes::from)
            .map_err(|e| HttpClientError::Encode(Box::new(e)))
    }

    fn encode_form(&self, form: &MultiValueMap<String>) -> Result<Bytes> {
        let pairs: Vec<(&str, &str)> = form.iter().map(|(k, v)| (k, v.as_str())).collect();
        serde_urlencoded::to_string(pairs)
            .map(Bytes::from)
            .map_err(|e| HttpClientError::Encode(Box::new(e)))
    }

    fn encode_multipart(&self, parts: &MultiValueMap<Part>) -> Result<MultipartBody> {
        let boundary = generate_boundary();
        let mut buf = BytesMut::new();

        for (name, part) in parts.iter() {
            buf.put_slice(b"--");
            buf.put_slice(boundary.as_bytes());
            buf.put_slice(b"\r\n");

            buf.put_slice(b"Content-Disposition: form-data; name=\"");
            buf.put_slice(escape_quoted(name).as_bytes());
            buf.put_u8(b'"');
            if let Some(file_name) = part.get_file_name() {
                buf.put_slice(b"; filename=\"");
                buf.put_slice(escape_quoted(file_name).as_bytes());
                buf.put_u8(b'"');
            }
            buf.put_slice(b"\r\n");

            for (header, value) in part.headers() {
                buf.put_slice(header.as_str().as_bytes());
                buf.put_slice(b": ");
                buf.put_slice(value.as_bytes());
                buf.put_slice(b"\r\n");
            }
            buf.put_slice(b"\r\n");
            buf.put_slice(part.body());
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(b"--");
        buf.put_slice(boundary.as_bytes());
        buf.put_slice(b"--\r\n");

        Ok(MultipartBody {
            boundary,
            body: buf.freeze(),
        })
    }

    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T> {
        // An empty body decodes like `null` so `()` and `Option<T>` succeed.
        let body = if body.iter().all(u8::is_ascii_whitespace) {
            b"null".as_slice()
        } else {
            body
        };
        Ok(serde_json::from_slice(body)?)
    }
}

fn generate_boundary() -> String {
    format!("{:016x}{:016x}", fastrand::u64(..), fastrand::u64(..))
}

fn escape_quoted(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ack {
        ok: bool,
    }

    #[test]
    fn test_form_encoding_keeps_order_and_repeats() {
        let form: MultiValueMap<String> = [
            ("a", "1".to_string()),
            ("b", "x y".to_string()),
            ("a", "2&3".to_string()),
        ]
        .into_iter()
        .collect();

        let body = JsonCodec.encode_form(&form).unwrap();
        assert_eq!(body, "a=1&a=2%263&b=x+y");
    }

    #[test]
    fn test_empty_form() {
        let body = JsonCodec.encode_form(&MultiValueMap::new()).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_multipart_layout() {
        let parts = MultiValueMap::new()
            .with("note", Part::text("hello"))
            .with("file", Part::bytes(&b"abc"[..]).file_name("a.txt"));

        let encoded = JsonCodec.encode_multipart(&parts).unwrap();
        let text = String::from_utf8(encoded.body.to_vec()).unwrap();
        let b = &encoded.boundary;

        assert_eq!(
            encoded.content_type(),
            format!("multipart/form-data; boundary={}", b)
        );
        assert_eq!(
            text,
            format!(
                "--{b}\r\n\
                 Content-Disposition: form-data; name=\"note\"\r\n\
                 content-type: text/plain; charset=utf-8\r\n\r\n\
                 hello\r\n\
                 --{b}\r\n\
                 Content-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\
                 content-type: application/octet-stream\r\n\r\n\
                 abc\r\n\
                 --{b}--\r\n"
            )
        );
    }

    #[test]
    fn test_empty_multipart_is_closing_delimiter() {
        let encoded = JsonCodec.encode_multipart(&MultiValueMap::new()).unwrap();
        assert_eq!(encoded.body, format!("--{}--\r\n", encoded.boundary));
    }

    #[test]
    fn test_boundaries_differ() {
        assert_ne!(generate_boundary(), generate_boundary());
    }

    #[test]
    fn test_decode() {
        let ack: Ack = JsonCodec.decode(br#"{"ok":true}"#).unwrap();
        assert_eq!(ack, Ack { ok: true });
    }

    #[test]
    fn test_decode_empty_body() {
        JsonCodec.decode::<()>(b"").unwrap();
        assert_eq!(JsonCodec.decode::<Option<Ack>>(b"  ").unwrap(), None);
        assert!(JsonCodec.decode::<Ack>(b"").is_err());
    }

    #[test]
    fn test_decode_type_mismatch() {
        let err = JsonCodec.decode::<Ack>(br#"{"ok":"yes"}"#).unwrap_err();
        assert!(matches!(err, HttpClientError::Decode(_)));
    }

    #[test]
    fn test_encode_json() {
        let body = JsonCodec
            .encode_json(&serde_json::json!({"name": "x"}))
            .unwrap();
        assert_eq!(body, r#"{"name":"x"}"#);
    }
}
