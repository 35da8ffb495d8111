// src/ports/mod.rs
pub mod http;

pub use http::{router, ApiError, GenerateRequest, GenerateResponse};
