//! Transcript buffer.
//!
//! Append-only line buffer for exactly one chat at a time. Holds no
//! scheduling concerns: redraws are the caller's responsibility.

/// Formatted display lines for the active chat.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the buffer.
    pub fn reset(&mut self) {
        self.lines.clear();
    }

    /// Append a formatted line.
    pub fn append(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Replace the entire buffer with a single diagnostic line.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.lines.clear();
        self.lines.push(message.into());
    }

    /// The buffered lines, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.append("Ada: hi");
        transcript.append("You: hello");

        assert_eq!(transcript.lines(), ["Ada: hi", "You: hello"]);
    }

    #[test]
    fn reset_clears_buffer() {
        let mut transcript = Transcript::new();
        transcript.append("Ada: hi");
        transcript.reset();

        assert!(transcript.is_empty());
    }

    #[test]
    fn show_error_replaces_buffer_with_one_line() {
        let mut transcript = Transcript::new();
        transcript.append("Ada: hi");
        transcript.append("Ada: still there?");
        transcript.show_error("Error: failed to load messages");

        assert_eq!(transcript.lines(), ["Error: failed to load messages"]);
    }
}
