pub mod frontmatter;
pub mod store;

pub use frontmatter::{FrontmatterStore, MarkdownFrontmatter};
pub use store::{SessionStore, SESSION_FIELD};
