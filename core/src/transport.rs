//! Transport seam between the pipeline and the network.
//!
//! # Design
//! The pipeline hands a fully built `HttpRequest` to a `Transport` and gets
//! an `HttpResponse` back, whatever the status code. Any failure before a
//! response arrives (DNS, connect, TLS, timeout) is a transport error.
//! `UreqTransport` is the default; tests swap in fakes through
//! `Client::with_transport`.

use std::fmt;
use std::time::Duration;

use ureq::http;
use ureq::SendBody;

use crate::error::BoxError;
use crate::http::{Body, HttpRequest, HttpResponse};

/// Executes requests over the network.
pub trait Transport: Send + Sync {
    /// Perform one round-trip. A streamed request body is drained.
    fn execute(&self, request: &mut HttpRequest<'_>) -> Result<HttpResponse, BoxError>;

    /// Timeout applied to every future round-trip.
    fn set_timeout(&mut self, timeout: Duration);
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: agent(timeout),
        }
    }
}

/// Build an agent that reports 4xx/5xx responses as data rather than `Err`,
/// leaving status interpretation to the pipeline.
fn agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .new_agent()
}

impl Transport for UreqTransport {
    fn execute(&self, request: &mut HttpRequest<'_>) -> Result<HttpResponse, BoxError> {
        let mut builder = http::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = match &mut request.body {
            Body::Empty => self.agent.run(builder.body(())?),
            Body::Bytes(bytes) => self.agent.run(builder.body(bytes.as_slice())?),
            Body::Stream(reader) => self.agent.run(builder.body(SendBody::from_reader(&mut **reader))?),
        }?;

        let (parts, body) = response.into_parts();
        let headers = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_string(), value.to_string()))
            })
            .collect();

        Ok(HttpResponse::new(parts.status.as_u16(), headers, body.into_reader()))
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.agent = agent(timeout);
    }
}
