// src/constants.rs
//
// Application-wide defaults and the fixed instruction text sent to the model.

/// Instruction text placed in front of the user's input.
///
/// The worked example shows the model the exact `[[front, back], ...]` shape
/// that `util::text::extract_json_array` later looks for.
///
/// Used in: `application/prompt.rs`
pub const PROMPT_PREAMBLE: &str = concat!(
    "You are an assistant that extracts flashcards from text. ",
    "Each line of the input text is in the format 'term - definition'. ",
    "Your task is to output a JSON array of tuples [front, back]. ",
    "For example, if the input text is:\n",
    "femur - is a bone in a human leg\n",
    "A bone in the upper arm is called humerus\n",
    "Then the output should be: [[\"femur\", \"is a bone in a human leg\"], [\"humerus\", \"is a bone in the upper arm\"]].\n\n",
    "Now extract flashcards from the following text:\n",
);

/// Executable invoked as `<command> run <model> <prompt>`.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_COMMAND: &str = "ollama";

/// Model passed to `ollama run`.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_MODEL: &str = "llama2:7b";

pub const DEFAULT_HOST: &str = "127.0.0.1";

pub const DEFAULT_PORT: u16 = 8000;

/// Directory under the platform config dir holding `config.toml`.
///
/// Used in: `infrastructure/config.rs`
pub const CONFIG_DIR_NAME: &str = "cardsmith";

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Spawn attempts while the executable reports "Text file busy".
///
/// Used in: `infrastructure/ollama.rs`
pub const SPAWN_BUSY_RETRIES: u32 = 5;

/// First delay between busy retries; doubles on each attempt.
///
/// Used in: `infrastructure/ollama.rs`
pub const SPAWN_BUSY_BACKOFF_MS: u64 = 10;
