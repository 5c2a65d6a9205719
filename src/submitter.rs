// src/submitter.rs

use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::errors::SolveError;
use crate::models::{ExtractedAnswer, QuizRequest, SubmissionOutcome, SubmissionPayload};

/// Posts answers to the resolved submission endpoint.
#[derive(Clone)]
pub struct Submitter {
    client: Client,
    timeout: Duration,
}

impl Submitter {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Submits `answer` to `target` and reports what came back.
    ///
    /// Never fails: a missing target or a transport error becomes an outcome with
    /// no status, so the caller still sees the extracted answer.
    pub async fn submit(
        &self,
        target: Option<&str>,
        request: &QuizRequest,
        answer: &ExtractedAnswer,
    ) -> SubmissionOutcome {
        let Some(target) = target else {
            log::info!("ℹ️  No submit URL found, skipping submission");
            return SubmissionOutcome::no_target();
        };

        let payload = SubmissionPayload {
            email: &request.email,
            secret: &request.secret,
            url: &request.url,
            answer: answer.answer(),
        };

        match self.post(target, &payload).await {
            Ok(outcome) => {
                log::info!("📨 Submitted to {} -> {:?}", target, outcome.status);
                outcome
            }
            Err(e) => {
                log::warn!("⚠️  {}", e);
                SubmissionOutcome::failed(e)
            }
        }
    }

    async fn post(
        &self,
        target: &str,
        payload: &SubmissionPayload<'_>,
    ) -> Result<SubmissionOutcome, SolveError> {
        let submit_err = |source| SolveError::Submit {
            url: target.to_string(),
            source,
        };

        let resp = self
            .client
            .post(target)
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(submit_err)?;

        let status = resp.status().as_u16();
        let text = resp.text().await.map_err(submit_err)?;

        Ok(SubmissionOutcome {
            status: Some(status),
            response: normalize_body(&text),
        })
    }
}

/// JSON bodies pass through untouched; anything else is wrapped as `{"text": ...}`.
fn normalize_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "text": text }))
}
