//! Interfaces to the editing host: the active editor, the active document
//! and user-visible notices.

pub mod markdown;

use std::path::PathBuf;

pub use markdown::MarkdownEditor;

/// Identity of the document a command runs against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    pub path: PathBuf,
}

impl DocumentRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn display(&self) -> String {
        self.path.display().to_string()
    }
}

/// The active editor view.
pub trait Editor: Send {
    fn selection(&self) -> String;

    fn document_text(&self) -> String;

    fn cursor_offset(&self) -> usize;

    /// Replace the current selection; an empty selection inserts at the cursor.
    fn replace_selection(&mut self, text: &str) -> Result<(), String>;
}

/// Short messages shown to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Prints notices to stderr and the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::info!("[Notice] {}", message);
        eprintln!("{}", message);
    }
}

/// Snapshot of the editor taken before a command runs.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorContext {
    pub selection: String,
    pub document_text: String,
    pub document_path: String,
    pub cursor_offset: usize,
}

impl EditorContext {
    pub fn capture(editor: &dyn Editor, document: &DocumentRef) -> Self {
        Self {
            selection: editor.selection(),
            document_text: editor.document_text(),
            document_path: document.display(),
            cursor_offset: editor.cursor_offset(),
        }
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.trim().is_empty()
    }

    /// Document text before the cursor, clamped to a char boundary.
    pub fn text_before_cursor(&self) -> &str {
        let mut end = self.cursor_offset.min(self.document_text.len());
        while !self.document_text.is_char_boundary(end) {
            end -= 1;
        }
        &self.document_text[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::mocks::MockEditor;

    #[test]
    fn test_capture_snapshots_editor() {
        let editor = MockEditor::new("Hello brave world", 6..11);
        let document = DocumentRef::new("/notes/today.md");

        let context = EditorContext::capture(&editor, &document);

        assert_eq!(context.selection, "brave");
        assert_eq!(context.document_text, "Hello brave world");
        assert_eq!(context.document_path, "/notes/today.md");
        assert_eq!(context.cursor_offset, 11);
        assert!(context.has_selection());
    }

    #[test]
    fn test_whitespace_selection_is_empty() {
        let editor = MockEditor::new("a   b", 1..4);
        let context = EditorContext::capture(&editor, &DocumentRef::new("x.md"));

        assert!(!context.has_selection());
    }

    #[test]
    fn test_text_before_cursor_respects_char_boundaries() {
        let context = EditorContext {
            selection: String::new(),
            document_text: "héllo".to_string(),
            document_path: "x.md".to_string(),
            cursor_offset: 2,
        };

        assert_eq!(context.text_before_cursor(), "h");
    }
}
