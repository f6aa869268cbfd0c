use super::frontmatter::FrontmatterStore;
use crate::error::FrontmatterError;
use crate::host::DocumentRef;
use std::sync::Arc;

/// Frontmatter key holding the conversation to resume for a document.
pub const SESSION_FIELD: &str = "claude_session_id";

/// Per-document conversation ids, stored in the document itself so they
/// survive restarts and travel with the file.
#[derive(Clone)]
pub struct SessionStore {
    frontmatter: Arc<dyn FrontmatterStore>,
}

impl SessionStore {
    pub fn new(frontmatter: Arc<dyn FrontmatterStore>) -> Self {
        Self { frontmatter }
    }

    /// An empty field counts as no session. Unreadable metadata is an error.
    pub fn get(&self, document: &DocumentRef) -> Result<Option<String>, FrontmatterError> {
        let session = self.frontmatter.read_field(document, SESSION_FIELD)?;
        Ok(session.filter(|id| !id.is_empty()))
    }

    pub fn set(&self, document: &DocumentRef, session_id: &str) -> Result<(), FrontmatterError> {
        tracing::debug!(
            "[SessionStore] Saving session {} for {}",
            session_id,
            document.display()
        );
        self.frontmatter.write_field(document, SESSION_FIELD, session_id)
    }

    /// Put back `previous`, or remove the field when there was none.
    pub fn restore(
        &self,
        document: &DocumentRef,
        previous: Option<&str>,
    ) -> Result<(), FrontmatterError> {
        match previous {
            Some(session_id) => self.set(document, session_id),
            None => self.clear(document),
        }
    }

    pub fn clear(&self, document: &DocumentRef) -> Result<(), FrontmatterError> {
        tracing::debug!("[SessionStore] Clearing session for {}", document.display());
        self.frontmatter.remove_field(document, SESSION_FIELD)
    }
}
