pub mod cli;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod logger;
pub mod modes;
pub mod outputs;
pub mod progress;
pub mod session;
pub mod utils;

// Exporting types for convenience
pub use cli::{Cli, OutputFormat};
pub use config::{Config, ExpectedStatus};
pub use errors::ParserError;
pub use modes::{Mode, Row};
pub use session::{CachedSession, Session};
pub use utils::{cook_page, find_tag, Page, TagQuery};
