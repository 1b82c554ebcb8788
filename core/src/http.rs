//! HTTP request and response values passed between the pipeline, hooks and
//! the transport.
//!
//! # Design
//! `HttpRequest` is built fresh for every invocation of a bound request and
//! never reused. Hooks mutate it in place; the transport reads it and drains
//! a streamed body. `HttpResponse` owns the response body reader, so the
//! underlying resource is released when the response is dropped, on every
//! exit path of the pipeline.

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use url::Url;

use crate::error::Error;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = match s.to_ascii_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            "HEAD" => HttpMethod::Head,
            "OPTIONS" => HttpMethod::Options,
            other => return Err(Error::Config(format!("unsupported http method `{other}`"))),
        };
        Ok(method)
    }
}

/// Request body attached by the pipeline.
#[derive(Default)]
pub enum Body<'a> {
    #[default]
    Empty,
    Bytes(Vec<u8>),
    /// Streamed body; drained by the transport.
    Stream(Box<dyn Read + 'a>),
}

impl Body<'_> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Bytes(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Debug for Body<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Body::Stream(_) => f.write_str("Stream"),
        }
    }
}

/// An outgoing HTTP request.
///
/// Built by `BoundRequest::build`, mutated by pre-request hooks and executed
/// by a `Transport`.
#[derive(Debug)]
pub struct HttpRequest<'a> {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Body<'a>,
    /// Known length of `body`. `None` for empty bodies and for streams of
    /// unknown size; a stream with a known size is sent with a
    /// `Content-Length` header instead of chunked.
    pub content_length: Option<u64>,
}

impl<'a> HttpRequest<'a> {
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: Body::Empty,
            content_length: None,
        }
    }

    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Replace every value of header `name` with `value`.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Append a header value, keeping existing values of the same name.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    pub fn set_body_bytes(&mut self, bytes: Vec<u8>) {
        self.content_length = Some(bytes.len() as u64);
        self.body = Body::Bytes(bytes);
    }

    pub fn set_body_stream(&mut self, stream: Box<dyn Read + 'a>) {
        self.content_length = None;
        self.body = Body::Stream(stream);
    }

    /// Reconcile `content_length` with the body once hooks have run.
    ///
    /// In-memory bodies must match the declared length exactly. A stream
    /// with a declared length gets a `Content-Length` header unless one is
    /// already set.
    pub fn apply_content_length(&mut self) -> Result<(), Error> {
        let actual = match &self.body {
            Body::Empty => 0,
            Body::Bytes(bytes) => bytes.len() as u64,
            Body::Stream(_) => {
                if let Some(length) = self.content_length {
                    if self.header("content-length").is_none() {
                        self.set_header("Content-Length", length.to_string());
                    }
                }
                return Ok(());
            }
        };
        match self.content_length {
            Some(declared) if declared != actual => Err(Error::ContentLength { declared, actual }),
            _ => Ok(()),
        }
    }
}

/// A response received from the transport.
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Box<dyn Read>,
}

impl HttpResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Read + 'static) -> Self {
        Self {
            status,
            headers,
            body: Box::new(body),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

fn find_header<'h>(headers: &'h [(String, String)], name: &str) -> Option<&'h str> {
    headers
        .iter()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
