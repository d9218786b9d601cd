use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{KlaviyoError, Result};

/// One logical API call: method, path, query, optional JSON body and the
/// query key that carries the continuation marker on follow-up pages.
#[derive(Clone, Debug)]
pub(crate) struct Endpoint {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<JsonValue>,
    continuation_key: Option<&'static str>,
}

impl Endpoint {
    pub(crate) fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
            continuation_key: None,
        }
    }

    pub(crate) fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    pub(crate) fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, segments)
    }

    pub(crate) fn put<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::PUT, segments)
    }

    pub(crate) fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::DELETE, segments)
    }

    pub(crate) fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub(crate) fn query_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub(crate) fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        let body = serde_json::to_value(body)
            .map_err(|err| KlaviyoError::Encode(format!("request body: {err}")))?;
        self.body = Some(body);
        Ok(self)
    }

    /// Marks the endpoint as paginated: markers are sent under `key`.
    pub(crate) fn paginated(mut self, key: &'static str) -> Self {
        self.continuation_key = Some(key);
        self
    }

    pub(crate) fn method(&self) -> &Method {
        &self.method
    }

    pub(crate) fn body(&self) -> Option<&JsonValue> {
        self.body.as_ref()
    }

    pub(crate) fn continuation_key(&self) -> Option<&'static str> {
        self.continuation_key
    }

    /// Resolves the full request URL against `base_url`.
    ///
    /// A marker replaces any initial value stored under the continuation key,
    /// so `since` passed by the caller is superseded by the server's `next`.
    pub(crate) fn url(&self, base_url: &str, marker: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(base_url)
            .map_err(|err| KlaviyoError::Config(format!("invalid base url '{base_url}': {err}")))?;

        url.path_segments_mut()
            .map_err(|_| KlaviyoError::Config(format!("base url '{base_url}' cannot be a base")))?
            .pop_if_empty()
            .extend(&self.segments);

        let continuation = match (self.continuation_key, marker) {
            (Some(key), Some(marker)) => Some((key, marker)),
            _ => None,
        };

        let mut pairs: Vec<(&str, &str)> = self
            .query
            .iter()
            .filter(|(key, _)| continuation.map_or(true, |(ckey, _)| key != ckey))
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        pairs.extend(continuation);

        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }
}
