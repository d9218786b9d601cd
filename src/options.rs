/// Configures HTTP timeout and rate-limit retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Wait applied to a 429 response without a usable `retry-after` header.
    pub default_retry_after_ms: u64,
    /// Upper bound on consecutive 429 retries of one request.
    ///
    /// `None` retries for as long as the API keeps throttling.
    pub max_rate_limit_retries: Option<usize>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            default_retry_after_ms: 3_000,
            max_rate_limit_retries: None,
        }
    }
}
