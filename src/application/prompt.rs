// src/application/prompt.rs
use crate::constants::PROMPT_PREAMBLE;

/// Compose the full instruction for the model, embedding `input_text` verbatim.
pub fn build_prompt(input_text: &str) -> String {
    let mut prompt = String::with_capacity(PROMPT_PREAMBLE.len() + input_text.len());
    prompt.push_str(PROMPT_PREAMBLE);
    prompt.push_str(input_text);
    prompt
}
