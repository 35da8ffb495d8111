// src/util/text.rs

/// Locate the JSON array literal embedded in free-form model output.
///
/// Returns the span from the first `[` through the last `]`, inclusive.
/// Models tend to wrap their answer in chatter ("Sure! Here are your
/// flashcards: ... Hope this helps"), so anything outside that span is
/// ignored. Nested arrays are covered because the outermost brackets win.
///
/// Returns `None` when either bracket is missing. When the last `]` comes
/// before the first `[` the span is empty, which the JSON parser then
/// rejects.
///
/// # Examples
///
/// ```
/// use cardsmith::util::text::extract_json_array;
///
/// let output = r#"Some preamble text [["femur","is a bone"]] trailing"#;
/// assert_eq!(extract_json_array(output), Some(r#"[["femur","is a bone"]]"#));
/// ```
pub fn extract_json_array(output: &str) -> Option<&str> {
    let start = output.find('[')?;
    let end = output.rfind(']')?;
    Some(output.get(start..=end).unwrap_or(""))
}
