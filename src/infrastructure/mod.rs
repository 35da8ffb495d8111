// src/infrastructure/mod.rs
pub mod config;
pub mod ollama;

pub use config::Config;
pub use ollama::OllamaCli;
