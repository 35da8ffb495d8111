// src/util/testing.rs

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::env;
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::TextGenerator;
use crate::domain::DomainError;

/// Scripted stand-in for the model, for testing code that depends on TextGenerator
///
/// Responses are handed out in the order they were configured. Every prompt
/// received is recorded so tests can check what would have been sent.
///
/// # Examples
///
/// ```
/// use cardsmith::util::testing::MockTextGenerator;
/// use cardsmith::domain::DomainError;
///
/// let mock = MockTextGenerator::builder()
///     .with_output(r#"[["femur", "bone"]]"#)
///     .with_failure(DomainError::ExternalTool("exit status: 1".to_string()))
///     .build();
/// assert!(mock.prompts().is_empty());
/// ```
pub struct MockTextGenerator {
    model: String,
    responses: Mutex<VecDeque<Result<String, DomainError>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockTextGenerator {
    pub fn builder() -> MockTextGeneratorBuilder {
        MockTextGeneratorBuilder::new()
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());

        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| {
                Err(DomainError::Unexpected(
                    "MockTextGenerator has no scripted response left".to_string(),
                ))
            })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Builder for MockTextGenerator
///
/// Provides a fluent interface for scripting model responses.
pub struct MockTextGeneratorBuilder {
    model: String,
    responses: VecDeque<Result<String, DomainError>>,
}

impl MockTextGeneratorBuilder {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            responses: VecDeque::new(),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Queue raw stdout for the next call
    pub fn with_output(mut self, output: &str) -> Self {
        self.responses.push_back(Ok(output.to_string()));
        self
    }

    /// Queue a failure for the next call
    pub fn with_failure(mut self, error: DomainError) -> Self {
        self.responses.push_back(Err(error));
        self
    }

    pub fn build(self) -> MockTextGenerator {
        MockTextGenerator {
            model: self.model,
            responses: Mutex::new(self.responses),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl Default for MockTextGeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "h2", "tower", "mio"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    // Build and set the subscriber
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
