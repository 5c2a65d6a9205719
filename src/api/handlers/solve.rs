// src/api/handlers/solve.rs
use actix_web::{web, HttpResponse};
use serde_json::Value;
use std::time::Instant;
use uuid::Uuid;
use validator::Validate;

use crate::api::AppState;
use crate::errors::SolveError;
use crate::models::{QuizRequest, SolveResponse};

/// `POST /solve`. Validation and the secret check both happen before any network call.
pub async fn solve(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, SolveError> {
    let accepted_at = Instant::now();
    let solve_id = Uuid::new_v4();

    let raw: Value = serde_json::from_slice(&body)
        .map_err(|_| SolveError::Validation("invalid json".to_string()))?;
    let request: QuizRequest = serde_json::from_value(raw)
        .map_err(|e| SolveError::Validation(format!("invalid payload: {}", e)))?;
    request
        .validate()
        .map_err(|e| SolveError::Validation(format!("invalid payload: {}", e)))?;

    if let Err(e) = state
        .config
        .credentials
        .verify(&request.email, &request.secret)
    {
        log::warn!("[{}] Rejected solve request for {}", solve_id, request.email);
        return Err(e);
    }

    log::info!("[{}] Solving {} for {}", solve_id, request.url, request.email);

    match state.solver.solve_accepted_at(&request, accepted_at).await {
        Ok(result) => Ok(HttpResponse::Ok().json(SolveResponse::ok(result))),
        Err(e) => {
            log::error!("[{}] Solve failed: {}", solve_id, e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::errors::ProviderError;
    use crate::providers::{CompletionRequest, LlmProvider};
    use crate::runner::Solver;
    use actix_web::{http::StatusCode, test, App};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LlmProvider for CountingProvider {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("{\"answer\": 1}".to_string())
        }
    }

    fn state(provider: Arc<CountingProvider>) -> AppState {
        let config = AppConfig::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        })
        .unwrap();
        let solver = Solver::with_provider(&config, reqwest::Client::new(), provider);
        AppState::with_solver(config, solver)
    }

    async fn post(provider: Arc<CountingProvider>, body: &'static str) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(provider)))
                .route("/solve", web::post().to(solve)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/solve")
            .insert_header(("content-type", "application/json"))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_invalid_json_is_bad_request() {
        let provider = Arc::new(CountingProvider::default());
        let (status, body) = post(provider.clone(), "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "invalid json");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_missing_field_is_bad_request() {
        let provider = Arc::new(CountingProvider::default());
        let (status, body) = post(
            provider,
            r#"{"email": "student@example.com", "url": "https://q.example/quiz"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().starts_with("invalid payload"));
    }

    #[actix_web::test]
    async fn test_relative_url_is_bad_request() {
        let provider = Arc::new(CountingProvider::default());
        let (status, _) = post(
            provider,
            r#"{"email": "student@example.com", "secret": "my-secret", "url": "/quiz"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_wrong_secret_and_unknown_caller_are_forbidden_alike() {
        let provider = Arc::new(CountingProvider::default());
        let (wrong_status, wrong_body) = post(
            provider.clone(),
            r#"{"email": "student@example.com", "secret": "guess", "url": "https://q.example/quiz"}"#,
        )
        .await;
        let (unknown_status, unknown_body) = post(
            provider.clone(),
            r#"{"email": "nobody@example.com", "secret": "my-secret", "url": "https://q.example/quiz"}"#,
        )
        .await;

        assert_eq!(wrong_status, StatusCode::FORBIDDEN);
        assert_eq!(unknown_status, StatusCode::FORBIDDEN);
        assert_eq!(wrong_body, unknown_body);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
