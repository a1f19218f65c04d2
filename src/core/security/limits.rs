//! Bounded reads and bounded responses.
//!
//! Every tool that reads files or relays external output goes through these
//! helpers so that size limits are enforced the same way everywhere.

/// Marker appended to text that was cut short.
pub const TRUNCATION_MARKER: &str = "\n... (output truncated)";

/// Errors raised when a file exceeds the allowed size.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SizeLimitError {
    #[error("File is too large ({size_kb}KB). Maximum allowed size is {max_kb}KB.")]
    TooLarge { size_kb: u64, max_kb: u64 },
}

/// Rejects a file whose length exceeds `max_bytes`.
pub fn ensure_file_size(len: u64, max_bytes: u64) -> Result<(), SizeLimitError> {
    if len > max_bytes {
        return Err(SizeLimitError::TooLarge {
            size_kb: round_kb(len),
            max_kb: round_kb(max_bytes),
        });
    }
    Ok(())
}

/// Cuts `text` to at most `max_chars` characters, appending `marker` when it was cut.
///
/// Truncation always lands on a character boundary.
pub fn truncate_text(text: &str, max_chars: usize, marker: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            let mut truncated = String::with_capacity(byte_index + marker.len());
            truncated.push_str(&text[..byte_index]);
            truncated.push_str(marker);
            truncated
        }
        None => text.to_string(),
    }
}

fn round_kb(bytes: u64) -> u64 {
    (bytes + 512) / 1024
}
