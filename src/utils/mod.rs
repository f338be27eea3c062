pub mod bucket;
pub mod documents;
pub mod logging;

// Re-exports for convenience
pub use bucket::{bucket_uri, validate_bucket_name};
pub use documents::{read_document, write_if_absent};
pub use logging::initialize_logger;
