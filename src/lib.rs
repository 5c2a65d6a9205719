// src/lib.rs
pub mod api;
pub mod auth;
pub mod banner;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod providers;
pub mod resolver;
pub mod runner;
pub mod submitter;
