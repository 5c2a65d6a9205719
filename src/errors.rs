// src/errors.rs
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Failures talking to the language-model service.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected response structure: {0}")]
    UnexpectedResponse(String),
}

#[derive(Error, Debug)]
pub enum SolveError {
    #[error("{0}")]
    Validation(String),

    // Unknown callers and wrong secrets must be indistinguishable.
    #[error("invalid secret")]
    Unauthorized,

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Model invocation failed: {0}")]
    Extraction(#[from] ProviderError),

    #[error("Submission to {url} failed: {source}")]
    Submit {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("solver timed out")]
    DeadlineExceeded,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub detail: String,
}

impl ResponseError for SolveError {
    fn status_code(&self) -> StatusCode {
        match self {
            SolveError::Validation(_) => StatusCode::BAD_REQUEST,
            SolveError::Unauthorized => StatusCode::FORBIDDEN,
            SolveError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            SolveError::Fetch { .. }
            | SolveError::Extraction(_)
            | SolveError::Submit { .. }
            | SolveError::Config(_)
            | SolveError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            status: "error",
            detail: self.to_string(),
        })
    }
}

pub type Result<T> = std::result::Result<T, SolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            SolveError::Validation("invalid json".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(SolveError::Unauthorized.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            SolveError::DeadlineExceeded.status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            SolveError::Extraction(ProviderError::UnexpectedResponse("no choices".into()))
                .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            SolveError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(SolveError::Unauthorized.to_string(), "invalid secret");
        assert_eq!(SolveError::DeadlineExceeded.to_string(), "solver timed out");

        let err = SolveError::Extraction(ProviderError::Api {
            status: 429,
            body: "rate limited".into(),
        });
        assert_eq!(
            err.to_string(),
            "Model invocation failed: API request failed with status 429: rate limited"
        );
    }
}
