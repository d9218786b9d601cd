/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum KlaviyoError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status that the client does not recover from.
    #[error("Klaviyo API responded {status} {status_text}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for `status`, empty when unknown.
        status_text: String,
        /// Raw response body.
        body: String,
    },
    /// Still rate limited after the configured number of retries.
    #[error("rate limited after {retries} retries")]
    RateLimited {
        /// Number of retries that were attempted.
        retries: usize,
    },
    /// Response body did not match the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// Request body or track payload could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),
    /// Operation needs a credential the client was built without.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
    /// Invalid client configuration (base URL, environment variables).
    #[error("configuration error: {0}")]
    Config(String),
}

impl KlaviyoError {
    /// Returns the HTTP status code for [`KlaviyoError::Api`] errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn api(status: reqwest::StatusCode, body: String) -> Self {
        Self::Api {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use crate::KlaviyoError;

    #[test]
    fn api_error_carries_status_and_reason() {
        let err = KlaviyoError::api(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_owned());
        assert_eq!(err.status(), Some(500));
        assert_eq!(
            err.to_string(),
            "Klaviyo API responded 500 Internal Server Error"
        );
        match err {
            KlaviyoError::Api { body, .. } => assert_eq!(body, "boom"),
            _ => panic!("expected api error"),
        }
    }

    #[test]
    fn non_api_errors_have_no_status() {
        assert_eq!(KlaviyoError::MissingCredential("api key").status(), None);
    }
}
