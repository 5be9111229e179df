//! Error types for the API client.

/// Errors that can occur when requesting or normalizing Coinglass data.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unreadable response).
    #[error("Request failed")]
    RequestFailed,
    /// The gateway returned a non-success status with a non-JSON body.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The response carried no `success` envelope at all.
    #[error("Unable to communicate with Coinglass API (status: {status}, error: {error})")]
    Communication { status: String, error: String },
    /// The API reported `success=false` with a non-rate-limit code.
    #[error("Coinglass API request failed (code {code}): {msg}")]
    Request { code: String, msg: String },
    /// The API reported the rate-limit code. Callers should back off and retry.
    #[error("Rate limit exceeded")]
    RateLimited,
    /// The API reported success but returned no `data` payload.
    #[error("No data returned")]
    NoData,
    /// The payload does not have the shape the table builder expects.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    /// Query parameters were rejected before any request was sent.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl Error {
    /// Returns true for errors a caller may reasonably retry after backing off.
    ///
    /// The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RateLimited)
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedPayload(msg.into())
    }
}
