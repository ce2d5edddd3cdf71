pub mod config;
pub mod models;
pub mod pipeline;

pub use models::{DocumentRecord, DocumentType, ExtractedDocument, FieldIssue, IssueKind};
pub use pipeline::extraction::{DocumentExtractor, ExtractionError};

use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber, filtered by `RUST_LOG` or
/// `config::default_log_filter()`. Later calls are no-ops.
pub fn init_tracing() {
    let initialized = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if initialized {
        tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    }
}
