//! Clipboard access.
//!
//! The widget only ever writes one string at a time, so the seam is a single
//! `write_text` call. `SystemClipboard` opens the OS clipboard per write.

use std::sync::Arc;

use thiserror::Error;

/// A clipboard write that did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// The clipboard could not be opened (no display server, no permission).
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    /// The clipboard was opened but rejected the text.
    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
}

/// Something that can place text on a clipboard.
///
/// Implementations may block; callers run them off the event loop.
pub trait ClipboardWriter: Send + Sync + 'static {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard, backed by `arboard`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|err| ClipboardError::Unavailable(err.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|err| ClipboardError::WriteFailed(err.to_string()))?;
        Ok(())
    }
}

/// Run a clipboard write on the blocking pool.
pub async fn write_in_background(
    clipboard: Arc<dyn ClipboardWriter>,
    text: String,
) -> Result<(), ClipboardError> {
    match tokio::task::spawn_blocking(move || clipboard.write_text(&text)).await {
        Ok(outcome) => outcome,
        Err(err) => Err(ClipboardError::WriteFailed(err.to_string())),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeClipboard;
    use super::*;

    #[test]
    fn fake_clipboard_keeps_contents_on_failure() {
        let clipboard = FakeClipboard::with_failures(vec![false, true]);
        clipboard.write_text("https://a.test/").unwrap();
        let err = clipboard.write_text("https://b.test/").unwrap_err();
        assert_eq!(err, ClipboardError::WriteFailed("permission denied".to_string()));
        assert_eq!(clipboard.contents().as_deref(), Some("https://a.test/"));
    }

    #[tokio::test]
    async fn background_write_reports_outcome() {
        let clipboard = Arc::new(FakeClipboard::with_failures(vec![true]));
        let writer: Arc<dyn ClipboardWriter> = clipboard.clone();
        let first = write_in_background(writer.clone(), "one".to_string()).await;
        let second = write_in_background(writer, "two".to_string()).await;
        assert!(first.is_err());
        assert!(second.is_ok());
        assert_eq!(clipboard.contents().as_deref(), Some("two"));
    }

    #[test]
    fn errors_render_with_cause() {
        let err = ClipboardError::Unavailable("no display".to_string());
        assert_eq!(err.to_string(), "clipboard unavailable: no display");
    }
}
