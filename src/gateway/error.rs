//! Error types for the gateway module.
//!
//! Every remote call made by the archiver (VK and Yandex Disk alike) fails
//! with an [`ApiError`]. URLs carried by the variants never include the query
//! string, so access tokens passed as query parameters do not leak into logs.

use thiserror::Error;

/// Errors that can occur while talking to a remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error calling {url}")]
    Network {
        /// The endpoint that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout calling {url}")]
    Timeout {
        /// The endpoint that timed out.
        url: String,
    },

    /// The server answered with a status code of 400 or above.
    #[error("http error: {status} calling {url}\n{body}")]
    HttpStatus {
        /// The endpoint that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// The base URL and path did not form a valid URL.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The response body was not the JSON shape we expected.
    #[error("unexpected response format from {url}")]
    Decode {
        /// The endpoint whose response failed to decode.
        url: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// VK reported a method-level error inside a successful HTTP response.
    #[error("VK API error {code}: {message}")]
    Vk {
        /// VK `error_code`.
        code: i64,
        /// VK `error_msg`.
        message: String,
    },

    /// A response decoded fine but lacked a field the archiver relies on.
    #[error("unexpected response from {url}: {reason}")]
    UnexpectedResponse {
        /// The endpoint that returned the response.
        url: String,
        /// What was missing.
        reason: String,
    },

    /// A listed photo carried no size renditions to pick from.
    #[error("photo {photo_id} has no size renditions")]
    MissingRendition {
        /// VK photo id.
        photo_id: i64,
    },

    /// The HTTP client itself could not be constructed.
    #[error("HTTP client construction failed")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Creates a network error from a reqwest error.
    ///
    /// The request URL is dropped from `source`, since reqwest renders it with
    /// the query string.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source: source.without_url(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error carrying the raw response body.
    pub fn http_status(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a decode error.
    pub fn decode(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Creates an unexpected-response error.
    pub fn unexpected_response(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns the HTTP status code for [`ApiError::HttpStatus`] errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
