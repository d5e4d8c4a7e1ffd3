//! In-memory [`LineSink`] for tests.
//!
//! Records every broadcast line instead of writing to a socket, so tests can
//! assert on exact wire output without binding a Unix socket.

use parking_lot::Mutex;

use crate::application::ports::LineSink;

/// A [`LineSink`] that records lines and reports one subscriber.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line broadcast so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Forgets recorded lines.
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl LineSink for RecordingSink {
    fn broadcast(&self, line: &str) -> usize {
        self.lines.lock().push(line.to_string());
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_lines_in_order() {
        // Arrange
        let sink = RecordingSink::new();

        // Act
        sink.broadcast("a\n");
        sink.broadcast("b\n");

        // Assert
        assert_eq!(sink.lines(), vec!["a\n", "b\n"]);
    }

    #[test]
    fn test_recording_sink_clear_forgets_lines() {
        let sink = RecordingSink::new();
        sink.broadcast("a\n");
        sink.clear();
        assert!(sink.lines().is_empty());
    }
}
