// src/application/flashcard_generator.rs
use crate::application::prompt::build_prompt;
use crate::domain::{DomainError, Flashcard};
use crate::util::text::extract_json_array;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Something that turns a prompt into raw model output.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run the model once and return everything it wrote to stdout
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;

    /// Model identifier, for logging and the health endpoint
    fn model(&self) -> &str;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        (**self).generate(prompt).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

pub struct FlashcardGenerator<G: TextGenerator> {
    generator: G,
    strict: bool,
}

impl<G: TextGenerator> FlashcardGenerator<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            strict: false,
        }
    }

    /// Reject output that is valid JSON but not a list of `[front, back]` string pairs
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Ask the model for flashcards and parse its answer.
    ///
    /// Without strict mode the parsed JSON is handed back untouched, whatever
    /// its shape. With strict mode it is decoded into [`Flashcard`]s and
    /// re-encoded, so the result is always `[[front, back], ...]`.
    #[instrument(level = "debug", skip_all, fields(input_len = input_text.len(), strict = self.strict))]
    pub async fn generate_flashcards(&self, input_text: &str) -> Result<Value, DomainError> {
        let prompt = build_prompt(input_text);
        let output = self.generator.generate(&prompt).await?;
        debug!(output_len = output.len(), "Model finished");

        let parsed = parse_flashcards(&output)?;
        if self.strict {
            return validate_shape(parsed);
        }
        Ok(parsed)
    }
}

/// Pull the JSON array out of raw model output and decode it.
pub fn parse_flashcards(output: &str) -> Result<Value, DomainError> {
    let json = extract_json_array(output.trim()).ok_or_else(DomainError::no_json_array)?;
    serde_json::from_str(json).map_err(|e| DomainError::MalformedOutput(e.to_string()))
}

fn validate_shape(parsed: Value) -> Result<Value, DomainError> {
    let cards: Vec<Flashcard> = serde_json::from_value(parsed).map_err(|e| {
        DomainError::MalformedOutput(format!(
            "Expected a JSON array of [front, back] string pairs: {e}"
        ))
    })?;
    debug!(count = cards.len(), "Validated flashcards");
    serde_json::to_value(cards).map_err(|e| DomainError::Unexpected(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::MockTextGenerator;
    use serde_json::json;

    #[tokio::test]
    async fn given_output_with_preamble_when_generating_then_returns_parsed_array() {
        // Arrange
        let mock = MockTextGenerator::builder()
            .with_output(r#"Some preamble text [["femur","is a bone in a human leg"]] trailing"#)
            .build();
        let generator = FlashcardGenerator::new(mock);

        // Act
        let result = generator
            .generate_flashcards("femur - is a bone in a human leg")
            .await;

        // Assert
        assert_eq!(
            result.expect("Generation should succeed"),
            json!([["femur", "is a bone in a human leg"]])
        );
    }

    #[tokio::test]
    async fn given_input_when_generating_then_prompt_embeds_input() {
        // Arrange
        let mock = MockTextGenerator::builder().with_output("[]").build();
        let generator = FlashcardGenerator::new(mock);

        // Act
        generator
            .generate_flashcards("tibia - shin bone")
            .await
            .expect("Generation should succeed");

        // Assert
        let prompts = generator.generator().prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].ends_with("following text:\ntibia - shin bone"));
    }

    #[tokio::test]
    async fn given_output_without_brackets_when_generating_then_returns_malformed_output() {
        // Arrange
        let mock = MockTextGenerator::builder()
            .with_output("I am sorry, I cannot help with that.")
            .build();
        let generator = FlashcardGenerator::new(mock);

        // Act
        let result = generator.generate_flashcards("anything").await;

        // Assert
        assert_eq!(result, Err(DomainError::no_json_array()));
    }

    #[tokio::test]
    async fn given_invalid_json_span_when_generating_then_returns_parse_error() {
        // Arrange
        let mock = MockTextGenerator::builder()
            .with_output(r#"[["femur", "bone"],]"#)
            .build();
        let generator = FlashcardGenerator::new(mock);

        // Act
        let result = generator.generate_flashcards("femur - bone").await;

        // Assert
        match result.expect_err("Should fail to parse") {
            DomainError::MalformedOutput(msg) => assert!(msg.contains("line 1")),
            other => panic!("Expected MalformedOutput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn given_tool_failure_when_generating_then_propagates_error() {
        // Arrange
        let mock = MockTextGenerator::builder()
            .with_failure(DomainError::ExternalTool("exit status: 1".to_string()))
            .build();
        let generator = FlashcardGenerator::new(mock);

        // Act
        let result = generator.generate_flashcards("x").await;

        // Assert
        assert_eq!(
            result,
            Err(DomainError::ExternalTool("exit status: 1".to_string()))
        );
    }

    #[tokio::test]
    async fn given_wrong_shape_without_strict_when_generating_then_passes_through() {
        // Arrange
        let mock = MockTextGenerator::builder()
            .with_output(r#"[1, {"front": "x"}]"#)
            .build();
        let generator = FlashcardGenerator::new(mock);

        // Act
        let result = generator.generate_flashcards("x").await;

        // Assert
        assert_eq!(result, Ok(json!([1, {"front": "x"}])));
    }

    #[tokio::test]
    async fn given_wrong_shape_with_strict_when_generating_then_rejects() {
        // Arrange
        let mock = MockTextGenerator::builder().with_output("[1, 2]").build();
        let generator = FlashcardGenerator::new(mock).with_strict(true);

        // Act
        let result = generator.generate_flashcards("x").await;

        // Assert
        match result.expect_err("Strict mode should reject") {
            DomainError::MalformedOutput(msg) => {
                assert!(msg.starts_with("Expected a JSON array of [front, back] string pairs"))
            }
            other => panic!("Expected MalformedOutput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn given_pairs_with_strict_when_generating_then_returns_pairs() {
        // Arrange
        let mock = MockTextGenerator::builder()
            .with_output(r#"Here you go: [["a", "b"], ["c", "d"]]"#)
            .build();
        let generator = FlashcardGenerator::new(mock).with_strict(true);

        // Act
        let result = generator.generate_flashcards("a - b\nc - d").await;

        // Assert
        assert_eq!(result, Ok(json!([["a", "b"], ["c", "d"]])));
    }

    #[test]
    fn given_closing_bracket_before_opening_when_parsing_then_returns_parse_error() {
        let result = parse_flashcards("Sorry ] I cannot [ help");

        match result.expect_err("Empty span should not parse") {
            DomainError::MalformedOutput(msg) => {
                assert!(msg.starts_with("EOF while parsing a value"), "got: {msg}")
            }
            other => panic!("Expected MalformedOutput, got {other:?}"),
        }
    }

    #[test]
    fn given_surrounding_whitespace_when_parsing_then_ignores_it() {
        let result = parse_flashcards("\n\n  [[\"x\", \"y\"]]  \n");

        assert_eq!(result, Ok(json!([["x", "y"]])));
    }
}
