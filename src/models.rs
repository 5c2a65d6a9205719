// src/models.rs
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;
use validator::{Validate, ValidationError};

/// Inbound body of `POST /solve`.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct QuizRequest {
    #[validate(length(min = 1, message = "email must not be empty"))]
    pub email: String,

    #[validate(length(min = 1, message = "secret must not be empty"))]
    pub secret: String,

    #[validate(custom(function = "validate_http_url"))]
    pub url: String,
}

fn validate_http_url(raw: &str) -> Result<(), ValidationError> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err(ValidationError::new("http_url")
            .with_message("url must be an absolute http(s) URL".into())),
    }
}

impl QuizRequest {
    /// The request URL, parsed. Only meaningful after `validate()` passed.
    pub fn target_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.url)
    }
}

/// The model's answer object, either parsed from its output or wrapped around the raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedAnswer(Value);

impl ExtractedAnswer {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Wraps unparsable model output as `{"answer": <text>}`.
    pub fn from_raw_text(text: &str) -> Self {
        Self(json!({ "answer": text }))
    }

    /// The `answer` value; `null` when the model's object did not carry one.
    pub fn answer(&self) -> &Value {
        self.0.get("answer").unwrap_or(&Value::Null)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// JSON body posted to the resolved submission endpoint.
#[derive(Debug, Serialize)]
pub struct SubmissionPayload<'a> {
    pub email: &'a str,
    pub secret: &'a str,
    pub url: &'a str,
    pub answer: &'a Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub status: Option<u16>,
    pub response: Value,
}

impl SubmissionOutcome {
    pub fn no_target() -> Self {
        Self {
            status: None,
            response: Value::String("no submit url found".to_string()),
        }
    }

    pub fn failed(description: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            response: json!({ "error": description.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResult {
    pub llm_parsed: ExtractedAnswer,
    pub submit: SubmissionOutcome,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SolveResponse {
    pub status: String,
    pub result: SolveResult,
}

impl SolveResponse {
    pub fn ok(result: SolveResult) -> Self {
        Self {
            status: "ok".to_string(),
            result,
        }
    }
}
