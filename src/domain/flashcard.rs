// src/domain/flashcard.rs
use serde::{Deserialize, Serialize};

/// A learning prompt and its answer.
///
/// Serialized as a two-element array `["front", "back"]`, which is the shape
/// the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

impl From<(String, String)> for Flashcard {
    fn from((front, back): (String, String)) -> Self {
        Self { front, back }
    }
}

impl From<Flashcard> for (String, String) {
    fn from(card: Flashcard) -> Self {
        (card.front, card.back)
    }
}
