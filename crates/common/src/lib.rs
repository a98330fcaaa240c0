pub mod config;
pub mod error;
pub mod source;
pub mod storage;

pub use config::{Config, FetchConfig, HeaderStrategy, PaginationConfig, Strategy};
pub use error::{ScholarError, ScholarResult};
pub use source::{require_url, PageSource};
pub use storage::{FailureLog, SnapshotWriter};
