// src/api/handlers/mod.rs
mod health;
mod solve;

pub use health::{health_check, index};
pub use solve::solve;
