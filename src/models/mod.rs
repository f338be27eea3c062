pub mod cloudfront;
pub mod config;
pub mod s3;
pub mod state;

// Re-exports for convenience
pub use cloudfront::DistributionConfig;
pub use config::{CdnConfig, SiteConfig};
pub use s3::{
    AccessControlPolicy, BucketLoggingStatus, CannedAcl, Grant, LOG_DELIVERY_URI, Permission,
    WebsiteConfiguration,
};
pub use state::{Preconditions, ResourceState};
