//! Request/response body encoding strategies.
//!
//! # Design
//! A `Codec` works on `serde_json::Value`, the serde data model in tree
//! form. That keeps the trait object safe, so a client can hold any codec
//! behind `Box<dyn Codec>`, while any `Serialize` type can still be used as
//! a body through `Encodable`. Converting the decoded value into the caller's
//! destination type happens in the pipeline.
//!
//! Going through `Value` limits bodies to what it can hold. Integers must fit
//! in 64 bits, so an `i128`/`u128` beyond that range fails to encode or
//! decode. Byte strings (`serialize_bytes`) become arrays of numbers and
//! only decode back into types that accept a sequence.

use serde::Serialize;
use serde_json::Value;

use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse};

/// Content type set by the `Json` codec.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Paired body encoder/decoder.
///
/// `encode` must set a content-type header on the request that matches the
/// bytes it returns.
pub trait Codec: Send + Sync {
    /// Media type of the encoded bodies, including charset where relevant.
    fn content_type(&self) -> &str;

    fn encode(&self, request: &mut HttpRequest<'_>, src: &Value) -> Result<Vec<u8>, Error>;

    fn decode(&self, response: &mut HttpResponse) -> Result<Value, Error>;
}

/// A body value that can be handed to a codec.
///
/// Implemented for every `Serialize` type.
pub trait Encodable {
    fn to_value(&self) -> Result<Value, serde_json::Error>;
}

impl<T: Serialize + ?Sized> Encodable for T {
    fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// JSON codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Codec for Json {
    fn content_type(&self) -> &str {
        JSON_CONTENT_TYPE
    }

    fn encode(&self, request: &mut HttpRequest<'_>, src: &Value) -> Result<Vec<u8>, Error> {
        request.set_header("Content-Type", JSON_CONTENT_TYPE);
        serde_json::to_vec(src).map_err(|e| Error::Encode(Box::new(e)))
    }

    fn decode(&self, response: &mut HttpResponse) -> Result<Value, Error> {
        serde_json::from_reader(&mut response.body).map_err(|e| Error::Decode(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use serde::Deserialize;
    use std::io::Cursor;
    use url::Url;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Point {
        x: i32,
        label: String,
        tags: Vec<String>,
    }

    fn request() -> HttpRequest<'static> {
        HttpRequest::new(HttpMethod::Post, Url::parse("https://example.org/points").unwrap())
    }

    #[test]
    fn encode_sets_content_type() {
        let mut req = request();
        let point = Point {
            x: 1,
            label: "a".to_string(),
            tags: Vec::new(),
        };
        let bytes = Json.encode(&mut req, &point.to_value().unwrap()).unwrap();
        assert_eq!(req.header("content-type"), Some(JSON_CONTENT_TYPE));
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["label"], "a");
    }

    #[test]
    fn encoded_object_decodes_to_same_values() {
        let point = Point {
            x: -7,
            label: "origin ünïcode".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
        };
        let bytes = Json.encode(&mut request(), &point.to_value().unwrap()).unwrap();

        let mut response = HttpResponse::new(200, Vec::new(), Cursor::new(bytes));
        let value = Json.decode(&mut response).unwrap();
        let back: Point = serde_json::from_value(value).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let mut response = HttpResponse::new(200, Vec::new(), Cursor::new(b"{\"x\":".to_vec()));
        let err = Json.decode(&mut response).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn empty_body_is_a_decode_error() {
        let mut response = HttpResponse::new(200, Vec::new(), Cursor::new(Vec::new()));
        assert!(matches!(Json.decode(&mut response), Err(Error::Decode(_))));
    }

    #[test]
    fn integers_wider_than_64_bits_do_not_encode() {
        assert!(u128::MAX.to_value().is_err());
        assert_eq!(u128::from(u64::MAX).to_value().unwrap(), Value::from(u64::MAX));
    }
}
