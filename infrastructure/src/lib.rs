//! Infrastructure layer for ai-council
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the provider HTTP APIs, configuration file loading,
//! the report directory, and the inbox queue.

pub mod catalog;
pub mod config;
pub mod inbox;
pub mod providers;
pub mod report;

// Re-export commonly used types
pub use catalog::{build_catalog, restrict_catalog};
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use inbox::{InboxError, InboxOverrides, InboxQuestion};
pub use providers::{ProviderRegistry, read_credential};
pub use report::MarkdownReportWriter;
