// src/runner.rs
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::errors::{Result, SolveError};
use crate::extractor::AnswerExtractor;
use crate::fetcher::PageFetcher;
use crate::models::{QuizRequest, SolveResult};
use crate::providers::{openai::OpenAIProvider, LlmProvider};
use crate::resolver::resolve_submit_url;
use crate::submitter::Submitter;

/// Runs the fetch -> resolve -> extract -> submit pipeline for one quiz request.
#[derive(Clone)]
pub struct Solver {
    fetcher: PageFetcher,
    extractor: AnswerExtractor,
    submitter: Submitter,
    deadline: Duration,
}

impl Solver {
    /// Wires the solver to the OpenAI-compatible provider described by `config`.
    pub fn from_config(config: &AppConfig, client: Client) -> Self {
        let provider = Arc::new(OpenAIProvider::new(client.clone(), config.openai.clone()));
        Self::with_provider(config, client, provider)
    }

    pub fn with_provider(config: &AppConfig, client: Client, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            fetcher: PageFetcher::new(client.clone(), config.fetch_timeout),
            extractor: AnswerExtractor::new(
                provider,
                config.openai.model.clone(),
                config.openai.max_tokens,
                config.prompt_char_limit,
            ),
            submitter: Submitter::new(client, config.submit_timeout),
            deadline: config.effective_deadline(),
        }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Runs [`Solver::solve`] under the overall deadline, starting the clock now.
    pub async fn solve_within_deadline(&self, request: &QuizRequest) -> Result<SolveResult> {
        self.solve_accepted_at(request, Instant::now()).await
    }

    /// Runs [`Solver::solve`] so that it finishes within the deadline counted from
    /// `accepted_at`, the moment the request was taken in.
    ///
    /// On expiry the in-flight step is dropped and nothing computed so far is reported.
    pub async fn solve_accepted_at(
        &self,
        request: &QuizRequest,
        accepted_at: Instant,
    ) -> Result<SolveResult> {
        let expires_at = tokio::time::Instant::from_std(accepted_at + self.deadline);
        match tokio::time::timeout_at(expires_at, self.solve(request)).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!(
                    "⏱️  Solve for {} exceeded {}ms deadline",
                    request.url,
                    self.deadline.as_millis()
                );
                Err(SolveError::DeadlineExceeded)
            }
        }
    }

    /// Each step runs exactly once, strictly in order. Submission problems are
    /// reported inside the result; fetch and model failures abort the solve.
    pub async fn solve(&self, request: &QuizRequest) -> Result<SolveResult> {
        let start = Instant::now();
        let request_url = request
            .target_url()
            .map_err(|e| SolveError::Validation(format!("invalid url: {}", e)))?;

        let page = self.fetcher.fetch(&request.url).await?;

        let target = resolve_submit_url(&page, &request_url);
        match &target {
            Some(t) => log::info!("🎯 Submit URL: {} (via {:?})", t.url, t.rule),
            None => log::info!("🎯 Submit URL: none"),
        }

        let answer = self.extractor.extract(&page).await?;
        log::info!("✅ Extracted answer: {}", answer.answer());

        let submit = self
            .submitter
            .submit(target.as_ref().map(|t| t.url.as_str()), request, &answer)
            .await;

        log::info!(
            "⏱️  Solved {} in {}ms",
            request.url,
            start.elapsed().as_millis()
        );

        Ok(SolveResult {
            llm_parsed: answer,
            submit,
        })
    }
}
