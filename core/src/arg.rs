//! Invocation arguments of a bound request.
//!
//! Every argument is exactly one of: a query contributor, or a body
//! candidate. Body candidates are raw text, raw bytes, a reader (owned or
//! borrowed) or a value the client's codec encodes. Only the first body
//! candidate of an invocation becomes the body; later ones are ignored.

use std::fmt;
use std::io::Read;

use serde::Serialize;

use crate::codec::Encodable;
use crate::query::{Id, Length, Offset, Param, QueryParam};

pub enum Arg<'a> {
    Query(Box<dyn QueryParam + 'a>),
    Text(String),
    Bytes(Vec<u8>),
    /// Owned reader; the request takes ownership and drops it once sent.
    Stream(Box<dyn Read + 'a>),
    /// Borrowed reader; the caller keeps ownership.
    Reader(&'a mut dyn Read),
    Encodable(&'a dyn Encodable),
}

impl<'a> Arg<'a> {
    pub fn query(param: impl QueryParam + 'a) -> Self {
        Arg::Query(Box::new(param))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Arg::Text(text.into())
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Arg::Bytes(bytes.into())
    }

    pub fn stream(reader: impl Read + 'a) -> Self {
        Arg::Stream(Box::new(reader))
    }

    pub fn reader(reader: &'a mut dyn Read) -> Self {
        Arg::Reader(reader)
    }

    /// Body encoded by the client's codec.
    pub fn encode<T: Serialize + 'a>(value: &'a T) -> Self {
        Arg::Encodable(value)
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Arg::Query(_))
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Query(_) => f.write_str("Query"),
            Arg::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Arg::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Arg::Stream(_) => f.write_str("Stream"),
            Arg::Reader(_) => f.write_str("Reader"),
            Arg::Encodable(_) => f.write_str("Encodable"),
        }
    }
}

impl From<Id> for Arg<'_> {
    fn from(id: Id) -> Self {
        Arg::query(id)
    }
}

impl From<Length> for Arg<'_> {
    fn from(length: Length) -> Self {
        Arg::query(length)
    }
}

impl From<Offset> for Arg<'_> {
    fn from(offset: Offset) -> Self {
        Arg::query(offset)
    }
}

impl From<Param> for Arg<'_> {
    fn from(param: Param) -> Self {
        Arg::query(param)
    }
}

impl From<String> for Arg<'_> {
    fn from(text: String) -> Self {
        Arg::Text(text)
    }
}

impl From<&str> for Arg<'_> {
    fn from(text: &str) -> Self {
        Arg::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Arg<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Arg::Bytes(bytes)
    }
}

impl From<&[u8]> for Arg<'_> {
    fn from(bytes: &[u8]) -> Self {
        Arg::Bytes(bytes.to_vec())
    }
}
