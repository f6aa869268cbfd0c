//! Per-document metadata kept in a Markdown file's YAML frontmatter.

use crate::error::FrontmatterError;
use crate::host::DocumentRef;
use serde_yml::{Mapping, Value};

/// Key/value metadata attached to a single document.
pub trait FrontmatterStore: Send + Sync {
    fn read_field(
        &self,
        document: &DocumentRef,
        key: &str,
    ) -> Result<Option<String>, FrontmatterError>;

    /// Set `key`, creating the metadata block if the document has none.
    fn write_field(
        &self,
        document: &DocumentRef,
        key: &str,
        value: &str,
    ) -> Result<(), FrontmatterError>;

    fn remove_field(&self, document: &DocumentRef, key: &str) -> Result<(), FrontmatterError>;
}

/// A document split at its frontmatter block.
#[derive(Debug, PartialEq)]
pub(crate) struct Split<'a> {
    /// YAML between the `---` delimiters, if the document has a block.
    pub yaml: Option<&'a str>,
    /// Full text of the block including both delimiter lines.
    pub block: &'a str,
    pub body: &'a str,
    /// Line ending of the block, or the dominant one of a file without a block.
    pub newline: &'static str,
}

fn detect_newline(content: &str) -> &'static str {
    if content.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

pub(crate) fn split_frontmatter(content: &str) -> Split<'_> {
    let (opening, newline) = if content.starts_with("---\n") {
        (4, "\n")
    } else if content.starts_with("---\r\n") {
        (5, "\r\n")
    } else {
        return Split {
            yaml: None,
            block: "",
            body: content,
            newline: detect_newline(content),
        };
    };

    let rest = &content[opening..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let end = opening + offset + line.len();
            return Split {
                yaml: Some(&rest[..offset]),
                block: &content[..end],
                body: &content[end..],
                newline,
            };
        }
        offset += line.len();
    }

    // No closing delimiter: the whole file is body
    Split {
        yaml: None,
        block: "",
        body: content,
        newline: detect_newline(content),
    }
}

fn parse_mapping(yaml: &str, path: &str) -> Result<Mapping, FrontmatterError> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(mapping)) => Ok(mapping),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(FrontmatterError::Yaml {
            path: path.to_string(),
            message: "frontmatter is not a key/value mapping".to_string(),
        }),
        Err(e) => Err(FrontmatterError::Yaml {
            path: path.to_string(),
            message: e.to_string(),
        }),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Frontmatter stored in the Markdown file at the document's path.
#[derive(Debug, Default, Clone)]
pub struct MarkdownFrontmatter;

impl MarkdownFrontmatter {
    pub fn new() -> Self {
        Self
    }

    fn read(&self, document: &DocumentRef) -> Result<String, FrontmatterError> {
        std::fs::read_to_string(&document.path).map_err(|source| FrontmatterError::Io {
            path: document.display(),
            source,
        })
    }

    fn update<F>(&self, document: &DocumentRef, apply: F) -> Result<(), FrontmatterError>
    where
        F: FnOnce(&mut Mapping) -> bool,
    {
        let path = document.display();
        let content = self.read(document)?;
        let split = split_frontmatter(&content);
        let mut mapping = parse_mapping(split.yaml.unwrap_or(""), &path)?;

        if !apply(&mut mapping) {
            return Ok(());
        }

        let updated = if mapping.is_empty() {
            split.body.to_string()
        } else {
            let yaml = serde_yml::to_string(&mapping).map_err(|e| FrontmatterError::Yaml {
                path: path.clone(),
                message: e.to_string(),
            })?;
            let yaml = if split.newline == "\n" {
                yaml
            } else {
                yaml.replace('\n', split.newline)
            };
            format!("---{nl}{}---{nl}{}", yaml, split.body, nl = split.newline)
        };

        crate::fs::write_atomic(&document.path, &updated)
            .map_err(|source| FrontmatterError::Io { path, source })
    }
}

impl FrontmatterStore for MarkdownFrontmatter {
    fn read_field(
        &self,
        document: &DocumentRef,
        key: &str,
    ) -> Result<Option<String>, FrontmatterError> {
        let content = self.read(document)?;
        let split = split_frontmatter(&content);
        let Some(yaml) = split.yaml else {
            return Ok(None);
        };

        let mapping = parse_mapping(yaml, &document.display())?;
        Ok(mapping.get(key).and_then(scalar_to_string))
    }

    fn write_field(
        &self,
        document: &DocumentRef,
        key: &str,
        value: &str,
    ) -> Result<(), FrontmatterError> {
        self.update(document, |mapping| {
            let key = Value::String(key.to_string());
            let value = Value::String(value.to_string());
            if mapping.get(&key) == Some(&value) {
                return false;
            }
            mapping.insert(key, value);
            true
        })
    }

    fn remove_field(&self, document: &DocumentRef, key: &str) -> Result<(), FrontmatterError> {
        self.update(document, |mapping| mapping.remove(key).is_some())
    }
}
