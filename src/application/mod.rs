// src/application/mod.rs
pub mod flashcard_generator;
pub mod prompt;

pub use flashcard_generator::{parse_flashcards, FlashcardGenerator, TextGenerator};
pub use prompt::build_prompt;
