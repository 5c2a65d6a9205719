// src/api/state.rs
use crate::config::AppConfig;
use crate::runner::Solver;
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub solver: Arc<Solver>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let solver = Solver::from_config(&config, Client::new());
        Self::with_solver(config, solver)
    }

    pub fn with_solver(config: AppConfig, solver: Solver) -> Self {
        Self {
            config: Arc::new(config),
            solver: Arc::new(solver),
        }
    }
}
