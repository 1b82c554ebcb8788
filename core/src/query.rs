//! Query parameter collection and the typed contributors that fill it.
//!
//! # Design
//! `Query` is an insertion-ordered multi-map: contributors only ever append,
//! so two contributors targeting the same key both end up in the query
//! string, in the order they were applied.

use url::form_urlencoded;
use url::Url;

/// Ordered collection of query key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'q>(&'q self, key: &'q str) -> impl Iterator<Item = &'q str> + 'q {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `key=value&...` form, escaped with URL form-encoding rules.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish()
    }

    /// Replace the query string of `url`; an empty collection clears it.
    pub fn apply_to(&self, url: &mut Url) {
        if self.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&self.encode()));
        }
    }
}

/// A value that contributes key/value pairs to the outgoing query string.
pub trait QueryParam {
    fn append_to(&self, query: &mut Query);
}

impl<P: QueryParam + ?Sized> QueryParam for &P {
    fn append_to(&self, query: &mut Query) {
        (**self).append_to(query)
    }
}

/// `id=<value>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id(pub String);

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Id(id.into())
    }
}

impl QueryParam for Id {
    fn append_to(&self, query: &mut Query) {
        query.append("id", self.0.as_str());
    }
}

/// Page length, `length=<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Length(pub usize);

impl QueryParam for Length {
    fn append_to(&self, query: &mut Query) {
        query.append("length", self.0.to_string());
    }
}

/// Page offset, `offset=<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset(pub usize);

impl QueryParam for Offset {
    fn append_to(&self, query: &mut Query) {
        query.append("offset", self.0.to_string());
    }
}

/// Arbitrary key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    key: String,
    value: String,
}

impl Param {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl QueryParam for Param {
    fn append_to(&self, query: &mut Query) {
        query.append(self.key.as_str(), self.value.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_contributors_use_their_keys() {
        let mut query = Query::new();
        Id::new("42").append_to(&mut query);
        Length(10).append_to(&mut query);
        Offset(20).append_to(&mut query);
        assert_eq!(query.encode(), "id=42&length=10&offset=20");
    }

    #[test]
    fn repeated_keys_append_rather_than_replace() {
        let mut query = Query::new();
        Param::new("tag", "a").append_to(&mut query);
        Param::new("tag", "b").append_to(&mut query);
        assert_eq!(query.get("tag"), Some("a"));
        assert_eq!(query.get_all("tag").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(query.encode(), "tag=a&tag=b");
    }

    #[test]
    fn values_are_escaped() {
        let mut query = Query::new();
        Param::new("q", "a b&c=d").append_to(&mut query);
        assert_eq!(query.encode(), "q=a+b%26c%3Dd");
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut query = Query::new();
        query.append("z", "1");
        query.append("a", "2");
        let keys: Vec<_> = query.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn empty_query_clears_url_query() {
        let mut url = Url::parse("https://example.org/search?stale=1").unwrap();
        Query::new().apply_to(&mut url);
        assert_eq!(url.as_str(), "https://example.org/search");

        let mut query = Query::new();
        query.append("q", "1");
        query.apply_to(&mut url);
        assert_eq!(url.as_str(), "https://example.org/search?q=1");
    }
}
