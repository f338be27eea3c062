//! Control-plane access for storage buckets and the CDN.
//!
//! [`CloudProvider`] is the seam between the convergence logic and AWS.
//! [`AwsCli`] drives the real `aws` command line tool, [`MemoryProvider`]
//! keeps everything in process and records each call.

pub mod aws_cli;
pub mod memory;

pub use aws_cli::AwsCli;
pub use memory::{Call, MemoryProvider};

use std::path::Path;

use crate::error::Result;
use crate::models::cloudfront::DistributionConfig;
use crate::models::s3::CallerIdentity;
use crate::models::{AccessControlPolicy, BucketLoggingStatus, CannedAcl, WebsiteConfiguration};

/// Blocking operations against the storage/CDN control plane.
///
/// Query methods may fail for resources that do not exist yet; callers that
/// only inspect state treat any error as "not there".
pub trait CloudProvider {
    /// Verify the local tooling needed to talk to the provider is installed.
    fn check_tooling(&self) -> Result<()>;

    fn caller_identity(&self) -> Result<CallerIdentity>;

    fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    /// Create the bucket only; it may not be visible to other calls yet.
    fn create_bucket(&self, bucket: &str, region: &str) -> Result<()>;

    /// Apply a canned ACL, lifting whatever blocks it first.
    fn put_bucket_canned_acl(&self, bucket: &str, acl: CannedAcl) -> Result<()>;

    fn get_bucket_acl(&self, bucket: &str) -> Result<AccessControlPolicy>;

    /// Replaces the bucket's whole access control policy.
    fn put_bucket_acl(&self, bucket: &str, policy: &AccessControlPolicy) -> Result<()>;

    fn get_bucket_logging(&self, bucket: &str) -> Result<BucketLoggingStatus>;

    fn put_bucket_logging(&self, bucket: &str, status: &BucketLoggingStatus) -> Result<()>;

    fn put_bucket_website(&self, bucket: &str, website: &WebsiteConfiguration) -> Result<()>;

    fn distribution_exists(&self, id: &str) -> Result<bool>;

    /// Id of a distribution aliased to `domain` or pulling from `origin`.
    fn find_distribution(&self, domain: &str, origin: &str) -> Result<Option<String>>;

    /// Returns the id of the new distribution.
    fn create_distribution(&self, config: &DistributionConfig) -> Result<String>;

    /// Mirror `dir` into the bucket, deleting objects that no longer exist locally.
    fn sync_site(&self, dir: &Path, bucket: &str) -> Result<()>;

    fn create_invalidation(&self, distribution_id: &str, paths: &[&str]) -> Result<()>;
}
