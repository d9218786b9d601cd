use std::env::VarError;
use std::fmt;
use std::time::Duration;

use reqwest::{
    header::{HeaderMap, RETRY_AFTER},
    StatusCode,
};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    decode::decode_json, page::Page, request::Endpoint, ClientOptions, KlaviyoError, ListsApi,
    ProfilesApi, Result,
};

/// Base URL of the Klaviyo REST API.
pub const DEFAULT_BASE_URL: &str = "https://a.klaviyo.com/api";

const API_KEY_ENV: &str = "KLAVIYO_API_KEY";
const PUBLIC_TOKEN_ENV: &str = "KLAVIYO_PUBLIC_TOKEN";
const BASE_URL_ENV: &str = "KLAVIYO_BASE_URL";

#[derive(Clone)]
/// HTTP client for the Klaviyo profiles, lists and track APIs.
pub struct KlaviyoClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    public_token: Option<String>,
    options: ClientOptions,
}

impl fmt::Debug for KlaviyoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KlaviyoClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("public_token", &self.public_token.as_ref().map(|_| "<redacted>"))
            .field("options", &self.options)
            .finish()
    }
}

/// Outcome of a request once rate limiting has been waited out.
#[derive(Debug)]
pub(crate) enum Reply {
    Found(String),
    NotFound(String),
}

impl KlaviyoClient {
    /// Creates a client with both a private API key and a public token.
    ///
    /// The API key authorizes the `/v1` and `/v2` endpoints; the public
    /// token authorizes `identify` and `track`.
    pub fn new(api_key: impl Into<String>, public_token: impl Into<String>) -> Self {
        Self::build(Some(api_key.into()), Some(public_token.into()))
    }

    /// Creates a client for the server-side endpoints only.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self::build(Some(api_key.into()), None)
    }

    /// Creates a client for `identify` and `track` only.
    pub fn with_public_token(public_token: impl Into<String>) -> Self {
        Self::build(None, Some(public_token.into()))
    }

    fn build(api_key: Option<String>, public_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key,
            public_token,
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `KLAVIYO_API_KEY` — private API key
    /// - `KLAVIYO_PUBLIC_TOKEN` — public token for identify/track
    /// - `KLAVIYO_BASE_URL` — optional base URL override
    ///
    /// At least one credential must be set. A variable that is set but empty
    /// is an error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use klaviyo_http::KlaviyoClient;
    ///
    /// let client = KlaviyoClient::from_env().expect("missing KLAVIYO_* env vars");
    /// ```
    pub fn from_env() -> Result<Self> {
        let api_key = non_empty_env(API_KEY_ENV)?;
        let public_token = non_empty_env(PUBLIC_TOKEN_ENV)?;
        if api_key.is_none() && public_token.is_none() {
            return Err(KlaviyoError::Config(format!(
                "missing {API_KEY_ENV} or {PUBLIC_TOKEN_ENV} environment variable"
            )));
        }

        let client = Self::build(api_key, public_token);
        Ok(match non_empty_env(BASE_URL_ENV)? {
            Some(base_url) => client.with_base_url(base_url),
            None => client,
        })
    }

    /// Points the client at another API host, e.g. a proxy or a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Applies client options such as timeout and rate-limit behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Group membership and list management endpoints.
    pub fn lists(&self) -> ListsApi<'_> {
        ListsApi::new(self)
    }

    /// Person and event timeline endpoints.
    pub fn profiles(&self) -> ProfilesApi<'_> {
        ProfilesApi::new(self)
    }

    pub(crate) fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(KlaviyoError::MissingCredential("api key"))
    }

    pub(crate) fn public_token(&self) -> Result<&str> {
        self.public_token
            .as_deref()
            .ok_or(KlaviyoError::MissingCredential("public token"))
    }

    /// Follows continuation markers until the last page and returns every
    /// item in server order.
    ///
    /// A 404 ends pagination and returns what was collected so far.
    pub(crate) async fn fetch_all_pages<P: Page>(&self, endpoint: &Endpoint) -> Result<Vec<P::Item>> {
        let mut items = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            #[cfg(feature = "tracing")]
            tracing::trace!(marker = ?marker, collected = items.len(), "fetching page");

            let body = match self.send(endpoint, marker.as_deref()).await? {
                Reply::Found(body) => body,
                Reply::NotFound(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(collected = items.len(), "page not found, ending pagination");
                    return Ok(items);
                }
            };

            let page: P = decode_json(&body, "page")?;
            let (page_items, next) = page.into_parts();
            items.extend(page_items);

            match (next, endpoint.continuation_key()) {
                (Some(next), Some(_)) => marker = Some(next),
                _ => return Ok(items),
            }
        }
    }

    /// Fetches a single resource; 404 yields `None`.
    pub(crate) async fn fetch_optional<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        what: &str,
    ) -> Result<Option<T>> {
        match self.send(endpoint, None).await? {
            Reply::Found(body) => decode_json(&body, what).map(Some),
            Reply::NotFound(_) => Ok(None),
        }
    }

    /// Executes a request where 404 is an error like any other status.
    pub(crate) async fn execute(&self, endpoint: &Endpoint) -> Result<String> {
        match self.send(endpoint, None).await? {
            Reply::Found(body) => Ok(body),
            Reply::NotFound(body) => Err(KlaviyoError::api(StatusCode::NOT_FOUND, body)),
        }
    }

    /// Sends one request, re-sending it unchanged while the API answers 429.
    async fn send(&self, endpoint: &Endpoint, marker: Option<&str>) -> Result<Reply> {
        let url = endpoint.url(&self.base_url, marker)?;
        let mut retries = 0usize;

        loop {
            let mut request = self
                .http
                .request(endpoint.method().clone(), url.clone())
                .timeout(Duration::from_millis(self.options.timeout_ms));
            if let Some(body) = endpoint.body() {
                request = request.json(body);
            }

            let response = request.send().await.map_err(KlaviyoError::Transport)?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if self
                    .options
                    .max_rate_limit_retries
                    .is_some_and(|max| retries >= max)
                {
                    return Err(KlaviyoError::RateLimited { retries });
                }
                let delay = retry_delay(response.headers(), self.options.default_retry_after_ms);
                self.wait_before_retry(delay, retries).await;
                retries += 1;
                continue;
            }

            let body = response.text().await.map_err(KlaviyoError::Transport)?;

            if status == StatusCode::NOT_FOUND {
                return Ok(Reply::NotFound(body));
            }
            if !status.is_success() {
                return Err(KlaviyoError::api(status, body));
            }
            return Ok(Reply::Found(body));
        }
    }

    async fn wait_before_retry(&self, delay: Duration, retries: usize) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "rate limited, retrying in {} ms (retry {})",
            delay.as_millis(),
            retries + 1
        );
        #[cfg(not(feature = "tracing"))]
        let _ = retries;

        sleep(delay).await;
    }
}

/// Wait derived from `retry-after` (seconds), else `default_ms`.
///
/// Zero, negative and non-numeric values fall back to the default.
fn retry_delay(headers: &HeaderMap, default_ms: u64) -> Duration {
    let seconds = headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|seconds| seconds.is_finite() && *seconds > 0.0);

    match seconds {
        Some(seconds) => Duration::from_millis((seconds * 1000.0).round() as u64),
        None => Duration::from_millis(default_ms),
    }
}

fn non_empty_env(name: &str) -> Result<Option<String>> {
    env_value(name, std::env::var(name))
}

fn env_value(name: &str, value: std::result::Result<String, VarError>) -> Result<Option<String>> {
    match value {
        Ok(value) if value.trim().is_empty() => Err(KlaviyoError::Config(format!(
            "{name} is set but empty"
        ))),
        Ok(value) => Ok(Some(value.trim().to_owned())),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(KlaviyoError::Config(format!(
            "{name} is not valid unicode"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::env::VarError;
    use std::time::Duration;

    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    use super::{env_value, retry_delay, KlaviyoClient};
    use crate::KlaviyoError;

    fn headers(retry_after: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_str(retry_after).expect("valid header value"),
        );
        headers
    }

    #[test]
    fn retry_delay_converts_seconds_to_millis() {
        assert_eq!(retry_delay(&headers("2"), 3_000), Duration::from_millis(2_000));
        assert_eq!(retry_delay(&headers(" 0.5 "), 3_000), Duration::from_millis(500));
    }

    #[test]
    fn retry_delay_falls_back_to_default() {
        assert_eq!(retry_delay(&HeaderMap::new(), 3_000), Duration::from_millis(3_000));
        assert_eq!(retry_delay(&headers("soon"), 3_000), Duration::from_millis(3_000));
        assert_eq!(retry_delay(&headers("0"), 3_000), Duration::from_millis(3_000));
        assert_eq!(retry_delay(&headers("-4"), 3_000), Duration::from_millis(3_000));
    }

    #[test]
    fn debug_redacts_credentials() {
        let client = KlaviyoClient::new("pk_secret", "pub_secret");
        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("pk_secret"));
        assert!(!debug.contains("pub_secret"));
    }

    #[test]
    fn missing_credentials_are_reported() {
        let track_only = KlaviyoClient::with_public_token("pub");
        assert!(matches!(
            track_only.api_key(),
            Err(KlaviyoError::MissingCredential("api key"))
        ));

        let server_only = KlaviyoClient::with_api_key("pk");
        assert!(matches!(
            server_only.public_token(),
            Err(KlaviyoError::MissingCredential("public token"))
        ));
    }

    #[test]
    fn env_values_distinguish_unset_from_invalid() {
        assert!(matches!(env_value("KEY", Err(VarError::NotPresent)), Ok(None)));
        assert!(matches!(
            env_value("KEY", Ok("  pk_live  ".to_owned())),
            Ok(Some(value)) if value == "pk_live"
        ));
        assert!(matches!(
            env_value("KEY", Ok("   ".to_owned())),
            Err(KlaviyoError::Config(_))
        ));

        let invalid = std::ffi::OsString::from("pk_\u{fffd}");
        match env_value("KEY", Err(VarError::NotUnicode(invalid))) {
            Err(KlaviyoError::Config(message)) => assert!(message.contains("KEY")),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
