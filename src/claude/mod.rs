pub mod invoker;
pub mod parser;
pub mod resolver;
pub mod service;
pub mod types;

pub use invoker::{build_args, ProcessRunner, SystemProcessRunner};
pub use parser::parse_response;
pub use resolver::resolve_cli_path;
pub use service::ClaudeService;
pub use types::*;
