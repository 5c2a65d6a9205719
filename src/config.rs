// src/config.rs
use secrecy::SecretString;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::CredentialTable;
use crate::errors::{Result, SolveError};

/// Configuration for the OpenAI-compatible chat completions provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_base: String,
    pub api_key: SecretString,
    pub model: String,
    pub max_tokens: u32,
    /// Transport timeout for one completion call, independent of the solve deadline.
    pub timeout: Duration,
}

/// High-level application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub credentials: CredentialTable,
    pub openai: OpenAIConfig,
    /// Overall budget for one solve, measured from the moment the handler accepts the request.
    pub deadline: Duration,
    /// Slack kept back from `deadline` so the error response still goes out in time.
    pub deadline_margin: Duration,
    pub fetch_timeout: Duration,
    pub submit_timeout: Duration,
    /// Number of page characters included in the model prompt.
    pub prompt_char_limit: usize,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut credentials = CredentialTable::new();
        let email = lookup("STUDENT_EMAIL").unwrap_or_else(|| "student@example.com".to_string());
        let secret = lookup("STUDENT_SECRET").unwrap_or_else(|| "my-secret".to_string());
        credentials.insert(email, &SecretString::from(secret));

        if let Some(extra) = lookup("SOLVER_CREDENTIALS") {
            for pair in extra.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let (email, secret) = pair.split_once(':').ok_or_else(|| {
                    SolveError::Config(format!(
                        "SOLVER_CREDENTIALS entry '{}' must look like email:secret",
                        pair
                    ))
                })?;
                credentials.insert(email.trim(), &SecretString::from(secret.trim().to_string()));
            }
        }

        let api_key = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            SolveError::Config("OPENAI_API_KEY must be set".to_string())
        })?;

        let openai = OpenAIConfig {
            api_base: lookup("OPENAI_API_BASE")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            api_key: SecretString::from(api_key),
            model: lookup("LLM_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            max_tokens: parse_or(&lookup, "LLM_MAX_TOKENS", 800)?,
            timeout: Duration::from_secs(parse_or(&lookup, "LLM_TIMEOUT_SECS", 120)?),
        };

        Ok(AppConfig {
            host: lookup("SOLVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            credentials,
            openai,
            deadline: Duration::from_secs(parse_or(&lookup, "SOLVE_DEADLINE_SECS", 180)?),
            deadline_margin: Duration::from_secs(parse_or(
                &lookup,
                "SOLVE_DEADLINE_MARGIN_SECS",
                5,
            )?),
            fetch_timeout: Duration::from_secs(parse_or(&lookup, "FETCH_TIMEOUT_SECS", 30)?),
            submit_timeout: Duration::from_secs(parse_or(&lookup, "SUBMIT_TIMEOUT_SECS", 30)?),
            prompt_char_limit: parse_or(&lookup, "PROMPT_CHAR_LIMIT", 4000)?,
        })
    }

    /// The deadline actually enforced by the orchestrator.
    pub fn effective_deadline(&self) -> Duration {
        self.deadline.saturating_sub(self.deadline_margin)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SolveError::Config(format!("{} has an invalid value: '{}'", key, raw))),
        None => Ok(default),
    }
}
