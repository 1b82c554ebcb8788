//! Pre-request and error hooks.
//!
//! The pipeline itself never logs and knows nothing about authentication;
//! both are done through hooks. This module carries the common ones.

use std::any::Any;
use std::error::Error as StdError;
use std::io::{Cursor, Read};

use serde::de::DeserializeOwned;

use crate::error::BoxError;
use crate::http::{HttpRequest, HttpResponse};

/// Runs against every outgoing request, after query and body are composed.
pub type PreRequestHook = Box<dyn Fn(&mut HttpRequest<'_>) + Send + Sync>;

/// Runs when the response status is outside 200..=299.
///
/// Receives the response, the request that produced it and the caller's
/// destination. Returning `Err` stops the remaining error hooks and becomes
/// the result of the call.
pub type ErrorHook =
    Box<dyn Fn(&mut HttpResponse, &HttpRequest<'_>, &mut dyn Any) -> Result<(), BoxError> + Send + Sync>;

/// Set header `name` to `value` on every request.
pub fn header(
    name: impl Into<String>,
    value: impl Into<String>,
) -> impl Fn(&mut HttpRequest<'_>) + Send + Sync + 'static {
    let name = name.into();
    let value = value.into();
    move |request: &mut HttpRequest<'_>| request.set_header(name.as_str(), value.as_str())
}

/// `Authorization: Bearer <token>`.
pub fn bearer_auth(token: impl AsRef<str>) -> impl Fn(&mut HttpRequest<'_>) + Send + Sync + 'static {
    header("Authorization", format!("Bearer {}", token.as_ref()))
}

/// Emit a `tracing` debug event for every dispatched request.
pub fn trace_requests() -> impl Fn(&mut HttpRequest<'_>) + Send + Sync + 'static {
    |request: &mut HttpRequest<'_>| {
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            content_length = ?request.content_length,
            "dispatching request"
        );
    }
}

/// Emit a `tracing` warning for every error status. Never replaces the
/// default error.
pub fn trace_errors(
) -> impl Fn(&mut HttpResponse, &HttpRequest<'_>, &mut dyn Any) -> Result<(), BoxError> + Send + Sync + 'static {
    |response: &mut HttpResponse, request: &HttpRequest<'_>, _dst: &mut dyn Any| {
        tracing::warn!(
            status = response.status,
            method = %request.method,
            url = %request.url,
            "request failed"
        );
        Ok(())
    }
}

/// Decode a JSON error body into `E` and return it as the call's error.
///
/// The body is read into memory first. Bodies that are not valid JSON for
/// `E` fall through to the next hook with the buffered bytes put back, so
/// later hooks still see the full body.
pub fn json_error_body<E>(
) -> impl Fn(&mut HttpResponse, &HttpRequest<'_>, &mut dyn Any) -> Result<(), BoxError> + Send + Sync + 'static
where
    E: DeserializeOwned + StdError + Send + Sync + 'static,
{
    |response: &mut HttpResponse, _request: &HttpRequest<'_>, _dst: &mut dyn Any| {
        let mut buf = Vec::new();
        response.body.read_to_end(&mut buf)?;
        match serde_json::from_slice::<E>(&buf) {
            Ok(err) => Err(Box::new(err) as BoxError),
            Err(_) => {
                response.body = Box::new(Cursor::new(buf));
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use serde::Deserialize;
    use std::fmt;
    use url::Url;

    #[derive(Debug, Deserialize)]
    struct ApiFailure {
        message: String,
    }

    impl fmt::Display for ApiFailure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "api failure: {}", self.message)
        }
    }

    impl StdError for ApiFailure {}

    fn request() -> HttpRequest<'static> {
        HttpRequest::new(HttpMethod::Get, Url::parse("https://example.org/").unwrap())
    }

    #[test]
    fn header_hook_replaces_existing_value() {
        let mut req = request();
        req.add_header("x-api-key", "old");
        header("X-Api-Key", "new")(&mut req);
        assert_eq!(req.header("x-api-key"), Some("new"));
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn bearer_auth_sets_authorization() {
        let mut req = request();
        bearer_auth("s3cret")(&mut req);
        assert_eq!(req.header("authorization"), Some("Bearer s3cret"));
    }

    #[test]
    fn json_error_body_returns_decoded_error() {
        let hook = json_error_body::<ApiFailure>();
        let mut response = HttpResponse::new(
            422,
            Vec::new(),
            Cursor::new(br#"{"message":"title missing"}"#.to_vec()),
        );
        let err = hook(&mut response, &request(), &mut ()).unwrap_err();
        let failure = err.downcast_ref::<ApiFailure>().unwrap();
        assert_eq!(failure.message, "title missing");
    }

    #[test]
    fn json_error_body_falls_through_on_unparseable_body() {
        let hook = json_error_body::<ApiFailure>();
        let mut response = HttpResponse::new(500, Vec::new(), Cursor::new(b"<html>".to_vec()));
        assert!(hook(&mut response, &request(), &mut ()).is_ok());
    }

    #[test]
    fn json_error_body_leaves_body_for_later_hooks() {
        let hook = json_error_body::<ApiFailure>();
        let mut response = HttpResponse::new(502, Vec::new(), Cursor::new(br#"{"code":7}"#.to_vec()));
        hook(&mut response, &request(), &mut ()).unwrap();

        let mut rest = String::new();
        response.body.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, r#"{"code":7}"#);
    }

    #[test]
    fn trace_errors_never_overrides() {
        let hook = trace_errors();
        let mut response = HttpResponse::new(503, Vec::new(), Cursor::new(Vec::new()));
        assert!(hook(&mut response, &request(), &mut ()).is_ok());
    }
}
