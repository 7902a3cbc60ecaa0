//! Logical query keys.

use serde::Serialize;
use std::fmt;

use crate::format::to_query_string;

/// Identity of a cached read: an ordered list of segments derived from the
/// endpoint and its parameters. Two requests with equal keys share one
/// cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Key for `endpoint` called with `params`. The parameters become one
    /// trailing segment, so parameter order is part of the identity.
    pub fn from_request(endpoint: &str, params: &[(String, String)]) -> Self {
        let mut key: Self = endpoint.into();
        if !params.is_empty() {
            key.0.push(to_query_string(params));
        }
        key
    }

    /// Append one segment.
    pub fn with(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether every segment of `prefix` matches the start of this key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl From<&str> for QueryKey {
    fn from(path: &str) -> Self {
        Self::new(path.split('/').filter(|s| !s.is_empty()))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
