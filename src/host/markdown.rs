use super::{DocumentRef, Editor};
use crate::session::frontmatter::split_frontmatter;
use std::ops::Range;

/// Editor over a Markdown file on disk.
///
/// Offsets are byte offsets into the body, the text after the frontmatter
/// block, so frontmatter writes between capture and render never shift the
/// selection.
pub struct MarkdownEditor {
    document: DocumentRef,
    body: String,
    selection: Range<usize>,
}

impl MarkdownEditor {
    /// Open `document` with `selection` (or an empty selection at `cursor`,
    /// or at the end of the body when neither is given).
    pub fn open(
        document: &DocumentRef,
        selection: Option<Range<usize>>,
        cursor: Option<usize>,
    ) -> Result<Self, String> {
        let body = read_body(document)?;

        let selection = match (selection, cursor) {
            (Some(range), _) => range,
            (None, Some(cursor)) => cursor..cursor,
            (None, None) => body.len()..body.len(),
        };
        validate_range(&body, &selection)?;

        Ok(Self {
            document: document.clone(),
            body,
            selection,
        })
    }

    pub fn selection_range(&self) -> Range<usize> {
        self.selection.clone()
    }
}

fn read_body(document: &DocumentRef) -> Result<String, String> {
    let content = std::fs::read_to_string(&document.path)
        .map_err(|e| format!("Failed to read {}: {}", document.display(), e))?;
    Ok(split_frontmatter(&content).body.to_string())
}

fn validate_range(body: &str, range: &Range<usize>) -> Result<(), String> {
    if range.start > range.end || body.get(range.clone()).is_none() {
        return Err(format!(
            "Selection {}..{} is outside the document body or splits a character",
            range.start, range.end
        ));
    }
    Ok(())
}

impl Editor for MarkdownEditor {
    fn selection(&self) -> String {
        self.body[self.selection.clone()].to_string()
    }

    fn document_text(&self) -> String {
        self.body.clone()
    }

    fn cursor_offset(&self) -> usize {
        self.selection.end
    }

    fn replace_selection(&mut self, text: &str) -> Result<(), String> {
        // Re-read: the frontmatter may have changed since the editor opened
        let content = std::fs::read_to_string(&self.document.path)
            .map_err(|e| format!("Failed to read {}: {}", self.document.display(), e))?;
        let split = split_frontmatter(&content);

        if split.body != self.body {
            return Err(format!(
                "{} changed on disk while the command was running",
                self.document.display()
            ));
        }

        let mut body = self.body.clone();
        body.replace_range(self.selection.clone(), text);

        crate::fs::write_atomic(&self.document.path, &format!("{}{}", split.block, body))
            .map_err(|e| format!("Failed to write {}: {}", self.document.display(), e))?;

        let end = self.selection.start + text.len();
        self.body = body;
        self.selection = end..end;
        Ok(())
    }
}
