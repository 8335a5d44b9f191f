pub mod config;
pub mod error;
pub mod exports;
pub mod ids;

pub use config::AppConfig;
pub use error::{ReportError, ReportResult};
pub use exports::{ExportBundle, ExportKind};
pub use ids::EntityId;
