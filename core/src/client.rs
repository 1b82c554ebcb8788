//! Endpoint client and bound requests.
//!
//! # Design
//! `Client` holds the base URL, the optional codec, the ordered hook lists
//! and the transport. Hooks are registered through `&mut self` while
//! `BoundRequest` borrows the client, so registration always happens before
//! any request derived from the client runs.
//!
//! A bound request runs one full cycle per call: `build` composes the URL,
//! query and body and runs the pre-request hooks; the transport executes the
//! request; the status is then either decoded into the destination or
//! handed to the error hooks. The response body is dropped, and so
//! released, on every exit path.

use std::any::Any;
use std::fmt;
use std::time::Duration;

use serde::de::{DeserializeOwned, IgnoredAny};
use url::Url;

use crate::arg::Arg;
use crate::codec::{Codec, Json};
use crate::config::ClientConfig;
use crate::error::{BoxError, Error};
use crate::hooks::{self, ErrorHook, PreRequestHook};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::Query;
use crate::transport::{Transport, UreqTransport};

/// Transport timeout of a new client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A remote HTTP API rooted at one base URL.
pub struct Client {
    base_url: Url,
    codec: Option<Box<dyn Codec>>,
    pre_request: Vec<PreRequestHook>,
    on_error: Vec<ErrorHook>,
    transport: Box<dyn Transport>,
    timeout: Duration,
}

impl Client {
    /// Client for `base_url` that encodes and decodes bodies with `codec`.
    pub fn new(base_url: &str, codec: impl Codec + 'static) -> Result<Self, Error> {
        Self::with_codec(base_url, Some(Box::new(codec)))
    }

    /// Client that sends raw bodies only and never decodes responses.
    pub fn without_codec(base_url: &str) -> Result<Self, Error> {
        Self::with_codec(base_url, None)
    }

    pub fn with_codec(base_url: &str, codec: Option<Box<dyn Codec>>) -> Result<Self, Error> {
        let parsed = Url::parse(base_url).map_err(|source| Error::Parse {
            url: base_url.to_string(),
            source,
        })?;
        if parsed.cannot_be_a_base() {
            return Err(Error::NotABase(base_url.to_string()));
        }

        Ok(Self {
            base_url: parsed,
            codec,
            pre_request: Vec::new(),
            on_error: Vec::new(),
            transport: Box::new(UreqTransport::new(DEFAULT_TIMEOUT)),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// JSON client built from `config`: base URL, timeout and one header
    /// hook per configured header.
    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        let mut client = Self::new(&config.base_url, Json)?;
        client.set_timeout(config.timeout());
        for (name, value) in &config.headers {
            client.add_pre_request_hook(hooks::header(name.as_str(), value.as_str()));
        }
        Ok(client)
    }

    /// Replace the transport; the client's current timeout is applied to it.
    pub fn with_transport(mut self, mut transport: impl Transport + 'static) -> Self {
        transport.set_timeout(self.timeout);
        self.transport = Box::new(transport);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn codec(&self) -> Option<&dyn Codec> {
        self.codec.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Timeout for all future requests.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
        self.transport.set_timeout(timeout);
    }

    /// Append a hook run against every request before dispatch.
    pub fn add_pre_request_hook(&mut self, hook: impl Fn(&mut HttpRequest<'_>) + Send + Sync + 'static) {
        self.pre_request.push(Box::new(hook));
    }

    /// Append a hook run when a response status is outside 200..=299.
    pub fn add_error_hook(
        &mut self,
        hook: impl Fn(&mut HttpResponse, &HttpRequest<'_>, &mut dyn Any) -> Result<(), BoxError> + Send + Sync + 'static,
    ) {
        self.on_error.push(Box::new(hook));
    }

    pub fn pre_request_hook_count(&self) -> usize {
        self.pre_request.len()
    }

    pub fn error_hook_count(&self) -> usize {
        self.on_error.len()
    }

    /// Reusable request for `method` and `path`, relative to the base URL.
    pub fn bind(&self, method: HttpMethod, path: impl Into<String>) -> BoundRequest<'_> {
        BoundRequest {
            client: self,
            method,
            path: path.into(),
        }
    }

    pub fn get(&self, path: impl Into<String>) -> BoundRequest<'_> {
        self.bind(HttpMethod::Get, path)
    }

    pub fn post(&self, path: impl Into<String>) -> BoundRequest<'_> {
        self.bind(HttpMethod::Post, path)
    }

    pub fn put(&self, path: impl Into<String>) -> BoundRequest<'_> {
        self.bind(HttpMethod::Put, path)
    }

    pub fn patch(&self, path: impl Into<String>) -> BoundRequest<'_> {
        self.bind(HttpMethod::Patch, path)
    }

    pub fn delete(&self, path: impl Into<String>) -> BoundRequest<'_> {
        self.bind(HttpMethod::Delete, path)
    }

    /// Base URL with its path joined to `relative`. Query and fragment of
    /// the base URL are dropped.
    pub fn compose_url(&self, relative: &str) -> Url {
        let mut url = self.base_url.clone();
        let path = join_path(self.base_url.path(), relative);
        url.set_path(if path.is_empty() { "/" } else { &path });
        url.set_query(None);
        url.set_fragment(None);
        url
    }

    /// `Rest:<scheme>{<host><path>}`, for logs.
    pub fn describe(&self) -> String {
        let host = match (self.base_url.host_str(), self.base_url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };
        format!("Rest:{}{{{}{}}}", self.base_url.scheme(), host, self.base_url.path())
    }

    fn error_for_status(&self, response: &mut HttpResponse, request: &HttpRequest<'_>, dst: &mut dyn Any) -> Error {
        for hook in &self.on_error {
            if let Err(err) = hook(&mut *response, request, &mut *dst) {
                return Error::Hook(err);
            }
        }
        Error::Status(response.status)
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("codec", &self.codec.as_ref().map(|codec| codec.content_type().to_string()))
            .field("pre_request_hooks", &self.pre_request.len())
            .field("error_hooks", &self.on_error.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// A request fixed to one method and path of a `Client`.
#[derive(Clone)]
pub struct BoundRequest<'c> {
    client: &'c Client,
    method: HttpMethod,
    path: String,
}

impl<'c> BoundRequest<'c> {
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Build the outgoing request without dispatching it.
    ///
    /// Query contributors are merged in argument order. The first body
    /// candidate becomes the body; later candidates are ignored. Pre-request
    /// hooks run last, in registration order, and may change
    /// `content_length`: a mismatch with an in-memory body fails with
    /// `Error::ContentLength`, a stream gets a `Content-Length` header.
    pub fn build<'a>(&self, args: impl IntoIterator<Item = Arg<'a>>) -> Result<HttpRequest<'a>, Error> {
        let mut request = HttpRequest::new(self.method, self.client.compose_url(&self.path));
        let mut query = Query::new();

        for arg in args {
            match arg {
                Arg::Query(param) => param.append_to(&mut query),
                _ if !request.body.is_empty() => {}
                Arg::Text(text) => request.set_body_bytes(text.into_bytes()),
                Arg::Bytes(bytes) => request.set_body_bytes(bytes),
                Arg::Stream(stream) => request.set_body_stream(stream),
                Arg::Reader(reader) => request.set_body_stream(Box::new(reader)),
                Arg::Encodable(value) => {
                    let codec = self.client.codec.as_deref().ok_or(Error::MissingCodec)?;
                    let value = value.to_value().map_err(|e| Error::Encode(Box::new(e)))?;
                    let bytes = codec.encode(&mut request, &value)?;
                    request.set_body_bytes(bytes);
                }
            }
        }

        query.apply_to(&mut request.url);

        for hook in &self.client.pre_request {
            hook(&mut request);
        }
        request.apply_content_length()?;
        Ok(request)
    }

    /// Run the request and decode a successful response into `dst`.
    ///
    /// The decoded body replaces `*dst` as a whole; it is not merged into
    /// the existing value, so fields missing from the response are not
    /// kept from `dst` and a missing required field is `Error::Decode`.
    /// Without a codec `dst` is left untouched. After an error `dst` may
    /// hold hook-written data.
    pub fn call<'a, D>(&self, dst: &mut D, args: impl IntoIterator<Item = Arg<'a>>) -> Result<(), Error>
    where
        D: DeserializeOwned + Any,
    {
        self.execute(Some(dst), args)
    }

    /// Run the request and discard the response body.
    pub fn send<'a>(&self, args: impl IntoIterator<Item = Arg<'a>>) -> Result<(), Error> {
        self.execute(None::<&mut IgnoredAny>, args)
    }

    fn execute<'a, D>(&self, dst: Option<&mut D>, args: impl IntoIterator<Item = Arg<'a>>) -> Result<(), Error>
    where
        D: DeserializeOwned + Any,
    {
        let mut request = self.build(args)?;
        let mut response = self.client.transport.execute(&mut request).map_err(Error::Transport)?;

        if !response.is_success() {
            let mut discarded = ();
            let dst: &mut dyn Any = match dst {
                Some(dst) => dst,
                None => &mut discarded,
            };
            return Err(self.client.error_for_status(&mut response, &request, dst));
        }

        if let (Some(codec), Some(dst)) = (self.client.codec.as_deref(), dst) {
            let value = codec.decode(&mut response)?;
            *dst = serde_json::from_value(value).map_err(|e| Error::Decode(Box::new(e)))?;
        }
        Ok(())
    }
}

impl fmt::Debug for BoundRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundRequest")
            .field("client", &self.client.describe())
            .field("method", &self.method)
            .field("path", &self.path)
            .finish()
    }
}

/// Join two slash-separated paths and normalize the result: repeated
/// separators collapse, `.` segments vanish, `..` removes the previous
/// segment and the trailing separator is dropped. A rooted result never
/// climbs above `/`. Two empty inputs give an empty path.
fn join_path(base: &str, relative: &str) -> String {
    let joined = match (base.is_empty(), relative.is_empty()) {
        (true, true) => return String::new(),
        (false, true) => base.to_string(),
        (true, false) => relative.to_string(),
        (false, false) => format!("{base}/{relative}"),
    };
    let rooted = joined.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            segment => segments.push(segment),
        }
    }

    let cleaned = segments.join("/");
    match (rooted, cleaned.is_empty()) {
        (true, _) => format!("/{cleaned}"),
        (false, true) => ".".to_string(),
        (false, false) => cleaned,
    }
}
