// src/extractor.rs
use serde_json::Value;
use std::sync::Arc;

use crate::errors::{Result, SolveError};
use crate::models::ExtractedAnswer;
use crate::providers::{CompletionRequest, LlmProvider};

pub const SYSTEM_INSTRUCTION: &str = "Respond ONLY with JSON. No explanation.";

/// Asks a language model for the answer to a quiz page.
#[derive(Clone)]
pub struct AnswerExtractor {
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_tokens: u32,
    prompt_char_limit: usize,
}

impl AnswerExtractor {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        max_tokens: u32,
        prompt_char_limit: usize,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
            prompt_char_limit,
        }
    }

    /// Builds the completion request for `page`, truncated to the configured prefix.
    pub fn completion_request(&self, page: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt: build_prompt(page, self.prompt_char_limit),
            max_tokens: self.max_tokens,
            temperature: 0.0,
        }
    }

    /// Runs the model on its own task and parses whatever comes back.
    ///
    /// Only a failed model call is an error; unparsable output falls back to
    /// `{"answer": <raw text>}`. If the caller stops waiting, the spawned call
    /// keeps running until the provider's own request timeout fires.
    pub async fn extract(&self, page: &str) -> Result<ExtractedAnswer> {
        let request = self.completion_request(page);
        let provider = Arc::clone(&self.provider);

        let raw = tokio::spawn(async move { provider.complete(&request).await })
            .await
            .map_err(|e| SolveError::Internal(format!("model worker failed: {}", e)))??;

        log::debug!("Raw model output:\n{}", raw);
        Ok(parse_model_output(&raw))
    }
}

fn build_prompt(page: &str, char_limit: usize) -> String {
    let excerpt: String = page.chars().take(char_limit).collect();
    format!(
        "\nYou MUST output ONLY JSON with key \"answer\".\n\nPage content:\n\"\"\"{}\"\"\"",
        excerpt
    )
}

/// Parses the span between the first `{` and the last `}` of the trimmed output.
///
/// Any JSON object found there is returned as-is, even without an `answer` key.
pub fn parse_model_output(raw: &str) -> ExtractedAnswer {
    let text = raw.trim();

    let span = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => return ExtractedAnswer::from_raw_text(text),
    };

    match serde_json::from_str::<Value>(span) {
        Ok(value @ Value::Object(_)) => ExtractedAnswer::from_value(value),
        Ok(_) | Err(_) => {
            log::warn!("Model output is not a JSON object, wrapping raw text as the answer");
            ExtractedAnswer::from_raw_text(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct ScriptedProvider {
        reply: std::result::Result<String, String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> std::result::Result<String, ProviderError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply
                .clone()
                .map_err(|body| ProviderError::Api { status: 500, body })
        }
    }

    fn extractor(reply: std::result::Result<&str, &str>) -> (AnswerExtractor, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider {
            reply: reply.map(str::to_string).map_err(str::to_string),
            seen: Mutex::new(Vec::new()),
        });
        (
            AnswerExtractor::new(provider.clone(), "gpt-4o-mini", 800, 10),
            provider,
        )
    }

    #[test]
    fn test_parses_embedded_object() {
        let parsed = parse_model_output("sure, here: {\"answer\": 42} done");
        assert_eq!(parsed.as_value(), &json!({ "answer": 42 }));
    }

    #[test]
    fn test_object_without_answer_key_is_kept() {
        let parsed = parse_model_output("{\"result\": \"x\"}");
        assert_eq!(parsed.as_value(), &json!({ "result": "x" }));
        assert_eq!(parsed.answer(), &Value::Null);
    }

    #[test]
    fn test_spans_first_to_last_brace() {
        let parsed = parse_model_output("{\"answer\": {\"a\": 1, \"b\": [2, 3]}}");
        assert_eq!(parsed.answer(), &json!({ "a": 1, "b": [2, 3] }));
    }

    #[test]
    fn test_falls_back_to_trimmed_raw_text() {
        assert_eq!(parse_model_output("  Paris \n").as_value(), &json!({ "answer": "Paris" }));
        assert_eq!(
            parse_model_output("{not json}").as_value(),
            &json!({ "answer": "{not json}" })
        );
        // Two separate objects make the outer span invalid.
        assert_eq!(
            parse_model_output("{\"a\": 1} and {\"b\": 2}").as_value(),
            &json!({ "answer": "{\"a\": 1} and {\"b\": 2}" })
        );
        assert_eq!(parse_model_output("} {").as_value(), &json!({ "answer": "} {" }));
        assert_eq!(parse_model_output("").as_value(), &json!({ "answer": "" }));
    }

    #[test]
    fn test_prompt_is_truncated_by_characters() {
        let prompt = build_prompt("ééééééééééééééé", 4);
        assert!(prompt.contains("\"\"\"éééé\"\"\""));
        assert!(prompt.contains("You MUST output ONLY JSON with key \"answer\"."));
    }

    #[tokio::test]
    async fn test_extract_uses_deterministic_request() {
        let (extractor, provider) = extractor(Ok("{\"answer\": \"7\"}"));
        let answer = extractor.extract("What is 3 + 4? Answer quickly.").await.unwrap();

        assert_eq!(answer.answer(), &json!("7"));

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system, SYSTEM_INSTRUCTION);
        assert_eq!(seen[0].temperature, 0.0);
        assert_eq!(seen[0].max_tokens, 800);
        assert!(seen[0].prompt.contains("\"\"\"What is 3 \"\"\""));
    }

    #[tokio::test]
    async fn test_model_failure_is_extraction_error() {
        let (extractor, _) = extractor(Err("upstream down"));
        let err = extractor.extract("page").await.unwrap_err();
        assert!(matches!(err, SolveError::Extraction(ProviderError::Api { .. })));
    }
}
