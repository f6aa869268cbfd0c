#[cfg(test)]
pub mod mocks {
    use crate::claude::ProcessRunner;
    use crate::error::{ClaudeError, FrontmatterError};
    use crate::host::{DocumentRef, Editor, Notifier};
    use crate::session::FrontmatterStore;
    use async_trait::async_trait;
    use std::collections::{BTreeMap, HashMap, VecDeque};
    use std::ops::Range;
    use std::process::{ExitStatus, Output};
    use std::sync::{Arc, Mutex};

    #[cfg(unix)]
    fn exit_status(code: i32) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        // wait(2) status: exit code lives in the high byte
        ExitStatus::from_raw(code << 8)
    }

    #[cfg(windows)]
    fn exit_status(code: i32) -> ExitStatus {
        use std::os::windows::process::ExitStatusExt;
        ExitStatus::from_raw(code as u32)
    }

    pub fn mock_successful_output(stdout: &str) -> Output {
        Output {
            status: exit_status(0),
            stdout: stdout.as_bytes().to_vec(),
            stderr: Vec::new(),
        }
    }

    pub fn mock_json_output(value: serde_json::Value) -> Output {
        mock_successful_output(&value.to_string())
    }

    pub fn mock_failed_output(code: i32, error: &str) -> Output {
        Output {
            status: exit_status(code),
            stdout: Vec::new(),
            stderr: error.as_bytes().to_vec(),
        }
    }

    /// Process runner that replays scripted results and records each call.
    pub struct ScriptedRunner {
        results: Mutex<VecDeque<Result<Output, ClaudeError>>>,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl ScriptedRunner {
        pub fn new(results: Vec<Result<Output, ClaudeError>>) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(results.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub fn returning(output: Output) -> Arc<Self> {
            Self::new(vec![Ok(output)])
        }

        pub fn failing(error: ClaudeError) -> Arc<Self> {
            Self::new(vec![Err(error)])
        }

        pub fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessRunner for ScriptedRunner {
        async fn run(&self, program: &str, args: &[String]) -> Result<Output, ClaudeError> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ClaudeError::Io("no scripted output left".to_string())))
        }
    }

    /// In-memory editor over a single string.
    pub struct MockEditor {
        pub text: String,
        pub selection: Range<usize>,
        pub fail_writes: bool,
    }

    impl MockEditor {
        pub fn new(text: &str, selection: Range<usize>) -> Self {
            Self {
                text: text.to_string(),
                selection,
                fail_writes: false,
            }
        }
    }

    impl Editor for MockEditor {
        fn selection(&self) -> String {
            self.text[self.selection.clone()].to_string()
        }

        fn document_text(&self) -> String {
            self.text.clone()
        }

        fn cursor_offset(&self) -> usize {
            self.selection.end
        }

        fn replace_selection(&mut self, text: &str) -> Result<(), String> {
            if self.fail_writes {
                return Err("editor is read-only".to_string());
            }
            self.text.replace_range(self.selection.clone(), text);
            let end = self.selection.start + text.len();
            self.selection = end..end;
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct InMemoryFrontmatter {
        documents: Mutex<HashMap<DocumentRef, BTreeMap<String, String>>>,
        pub fail_writes: bool,
    }

    impl InMemoryFrontmatter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_writes() -> Self {
            Self {
                fail_writes: true,
                ..Default::default()
            }
        }

        pub fn fields(&self, document: &DocumentRef) -> BTreeMap<String, String> {
            self.documents
                .lock()
                .unwrap()
                .get(document)
                .cloned()
                .unwrap_or_default()
        }
    }

    impl FrontmatterStore for InMemoryFrontmatter {
        fn read_field(
            &self,
            document: &DocumentRef,
            key: &str,
        ) -> Result<Option<String>, FrontmatterError> {
            Ok(self.fields(document).get(key).cloned())
        }

        fn write_field(
            &self,
            document: &DocumentRef,
            key: &str,
            value: &str,
        ) -> Result<(), FrontmatterError> {
            if self.fail_writes {
                return Err(FrontmatterError::Io {
                    path: document.display(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        "read-only vault",
                    ),
                });
            }
            self.documents
                .lock()
                .unwrap()
                .entry(document.clone())
                .or_default()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove_field(&self, document: &DocumentRef, key: &str) -> Result<(), FrontmatterError> {
            let mut documents = self.documents.lock().unwrap();
            if let Some(fields) = documents.get_mut(document) {
                fields.remove(key);
                if fields.is_empty() {
                    documents.remove(document);
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }
}
