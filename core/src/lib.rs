//! Minimal client for remote HTTP APIs.
//!
//! # Overview
//! A `Client` is created once per remote API from a base URL and an optional
//! `Codec`. `Client::bind` turns an HTTP method and a relative path into a
//! reusable `BoundRequest`; calling it with a destination and a list of
//! `Arg`s performs one request/response cycle.
//!
//! # Design
//! - Arguments are a closed union (`Arg`): query contributors are merged
//!   into the query string, the first body candidate becomes the body.
//! - Pre-request hooks mutate every outgoing request; error hooks see every
//!   non-2xx response and may replace the default `Error::Status`.
//! - Bodies are encoded and decoded by a pluggable `Codec`; `Json` is the
//!   reference one.
//! - The network round-trip sits behind `Transport`; `UreqTransport` is the
//!   default. The pipeline never retries and never logs; see `hooks` for
//!   tracing and auth hooks.
//!
//! ```no_run
//! use rest_core::{Client, Json, Param};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct SearchResult {
//!     total: u64,
//! }
//!
//! let api = Client::new("https://api.example.org/v1", Json)?;
//! let search = api.get("/search");
//!
//! let mut result = SearchResult::default();
//! search.call(&mut result, [Param::new("q", "rust").into()])?;
//! println!("{} hits", result.total);
//! # Ok::<(), rest_core::Error>(())
//! ```

pub mod arg;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod hooks;
pub mod http;
pub mod query;
pub mod transport;

pub use arg::Arg;
pub use client::{BoundRequest, Client, DEFAULT_TIMEOUT};
pub use codec::{Codec, Encodable, Json, JSON_CONTENT_TYPE};
pub use config::ClientConfig;
pub use error::{BoxError, Error};
pub use hooks::{ErrorHook, PreRequestHook};
pub use http::{Body, HttpMethod, HttpRequest, HttpResponse};
pub use query::{Id, Length, Offset, Param, Query, QueryParam};
pub use transport::{Transport, UreqTransport};
