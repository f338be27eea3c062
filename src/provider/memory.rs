//! In-process provider for tests and dry runs.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use super::CloudProvider;
use crate::error::{InfraError, Result};
use crate::models::cloudfront::DistributionConfig;
use crate::models::s3::{CallerIdentity, Owner};
use crate::models::{AccessControlPolicy, BucketLoggingStatus, CannedAcl, WebsiteConfiguration};

/// One mutating call received by [`MemoryProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateBucket(String),
    PutBucketCannedAcl(String),
    PutBucketAcl(String),
    PutBucketLogging(String),
    PutBucketWebsite(String),
    CreateDistribution(String),
    SyncSite(String),
    CreateInvalidation(String),
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBucket {
    pub canned_acl: Option<CannedAcl>,
    pub acl: AccessControlPolicy,
    pub logging: BucketLoggingStatus,
    pub website: Option<WebsiteConfiguration>,
}

#[derive(Default)]
struct Inner {
    buckets: HashMap<String, MemoryBucket>,
    distributions: Vec<(String, DistributionConfig)>,
    calls: Vec<Call>,
    /// Remaining `bucket_exists` polls that still report a new bucket as absent.
    hidden_polls: HashMap<String, u32>,
}

/// Records every mutation and keeps bucket/distribution state in memory.
#[derive(Default)]
pub struct MemoryProvider {
    inner: Mutex<Inner>,
    /// Polls a new bucket stays invisible for, mimicking S3 propagation lag.
    visibility_lag: u32,
    missing_credentials: bool,
    fail_on: Option<String>,
    failing_queries: HashSet<String>,
}

const OWNER_ID: &str = "memory-owner";

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_visibility_lag(mut self, polls: u32) -> Self {
        self.visibility_lag = polls;
        self
    }

    pub fn without_credentials(mut self) -> Self {
        self.missing_credentials = true;
        self
    }

    /// Make every call whose [`Call`] debug name starts with `operation` fail.
    pub fn failing_on(mut self, operation: &str) -> Self {
        self.fail_on = Some(operation.to_string());
        self
    }

    /// Make a read-only query fail, e.g. `"GetBucketAcl"` or `"FindDistribution"`.
    pub fn failing_query(mut self, query: &str) -> Self {
        self.failing_queries.insert(query.to_string());
        self
    }

    pub fn add_bucket(&self, name: &str, bucket: MemoryBucket) {
        self.lock().buckets.insert(name.to_string(), bucket);
    }

    pub fn add_distribution(&self, id: &str, config: DistributionConfig) {
        self.lock().distributions.push((id.to_string(), config));
    }

    pub fn bucket(&self, name: &str) -> Option<MemoryBucket> {
        self.lock().buckets.get(name).cloned()
    }

    pub fn distribution_count(&self) -> usize {
        self.lock().distributions.len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: Call) -> Result<()> {
        if let Some(op) = &self.fail_on
            && format!("{call:?}").starts_with(op.as_str())
        {
            return Err(InfraError::command_failed(
                format!("{call:?}"),
                "exit status: 254",
                "injected failure",
            ));
        }
        self.lock().calls.push(call);
        Ok(())
    }

    fn query(&self, name: &str) -> Result<()> {
        if self.failing_queries.contains(name) {
            return Err(InfraError::command_failed(
                format!("memory {name}"),
                "exit status: 255",
                "injected query failure",
            ));
        }
        Ok(())
    }

    fn no_such_bucket(bucket: &str) -> InfraError {
        InfraError::command_failed(
            format!("memory {bucket}"),
            "exit status: 254",
            "NoSuchBucket",
        )
    }

    fn with_bucket<T>(&self, bucket: &str, f: impl FnOnce(&mut MemoryBucket) -> T) -> Result<T> {
        let mut inner = self.lock();
        // Not visible yet, same as S3 right after create-bucket
        if inner.hidden_polls.get(bucket).is_some_and(|polls| *polls > 0) {
            return Err(Self::no_such_bucket(bucket));
        }
        inner
            .buckets
            .get_mut(bucket)
            .map(f)
            .ok_or_else(|| Self::no_such_bucket(bucket))
    }
}

impl CloudProvider for MemoryProvider {
    fn check_tooling(&self) -> Result<()> {
        Ok(())
    }

    fn caller_identity(&self) -> Result<CallerIdentity> {
        if self.missing_credentials {
            return Err(InfraError::MissingCredentials(
                "Unable to locate credentials".to_string(),
            ));
        }
        Ok(CallerIdentity {
            account: "000000000000".to_string(),
            arn: "arn:aws:iam::000000000000:user/memory".to_string(),
        })
    }

    fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        self.query("BucketExists")?;
        let mut inner = self.lock();
        if let Some(polls) = inner.hidden_polls.get_mut(bucket)
            && *polls > 0
        {
            *polls -= 1;
            return Ok(false);
        }
        Ok(inner.buckets.contains_key(bucket))
    }

    fn create_bucket(&self, bucket: &str, _region: &str) -> Result<()> {
        self.record(Call::CreateBucket(bucket.to_string()))?;
        let mut inner = self.lock();
        if inner.buckets.contains_key(bucket) {
            return Err(InfraError::command_failed(
                format!("memory create-bucket {bucket}"),
                "exit status: 254",
                "BucketAlreadyOwnedByYou",
            ));
        }
        inner.buckets.insert(
            bucket.to_string(),
            MemoryBucket {
                acl: AccessControlPolicy {
                    grants: Vec::new(),
                    owner: Some(Owner {
                        id: OWNER_ID.to_string(),
                        display_name: None,
                    }),
                },
                ..Default::default()
            },
        );
        inner
            .hidden_polls
            .insert(bucket.to_string(), self.visibility_lag);
        Ok(())
    }

    fn put_bucket_canned_acl(&self, bucket: &str, acl: CannedAcl) -> Result<()> {
        self.record(Call::PutBucketCannedAcl(bucket.to_string()))?;
        self.with_bucket(bucket, |b| b.canned_acl = Some(acl))
    }

    fn get_bucket_acl(&self, bucket: &str) -> Result<AccessControlPolicy> {
        self.query("GetBucketAcl")?;
        self.with_bucket(bucket, |b| b.acl.clone())
    }

    fn put_bucket_acl(&self, bucket: &str, policy: &AccessControlPolicy) -> Result<()> {
        self.record(Call::PutBucketAcl(bucket.to_string()))?;
        self.with_bucket(bucket, |b| b.acl = policy.clone())
    }

    fn get_bucket_logging(&self, bucket: &str) -> Result<BucketLoggingStatus> {
        self.query("GetBucketLogging")?;
        self.with_bucket(bucket, |b| b.logging.clone())
    }

    fn put_bucket_logging(&self, bucket: &str, status: &BucketLoggingStatus) -> Result<()> {
        self.record(Call::PutBucketLogging(bucket.to_string()))?;
        self.with_bucket(bucket, |b| b.logging = status.clone())
    }

    fn put_bucket_website(&self, bucket: &str, website: &WebsiteConfiguration) -> Result<()> {
        self.record(Call::PutBucketWebsite(bucket.to_string()))?;
        self.with_bucket(bucket, |b| b.website = Some(website.clone()))
    }

    fn distribution_exists(&self, id: &str) -> Result<bool> {
        self.query("DistributionExists")?;
        Ok(self.lock().distributions.iter().any(|(d, _)| d == id))
    }

    fn find_distribution(&self, domain: &str, origin: &str) -> Result<Option<String>> {
        self.query("FindDistribution")?;
        Ok(self
            .lock()
            .distributions
            .iter()
            .find(|(_, c)| {
                c.aliases.items.iter().any(|a| a == domain)
                    || c.origins.items.iter().any(|o| o.domain_name == origin)
            })
            .map(|(id, _)| id.clone()))
    }

    fn create_distribution(&self, config: &DistributionConfig) -> Result<String> {
        self.record(Call::CreateDistribution(config.caller_reference.clone()))?;
        let mut inner = self.lock();
        let id = format!("EMEMORY{}", inner.distributions.len() + 1);
        inner.distributions.push((id.clone(), config.clone()));
        Ok(id)
    }

    fn sync_site(&self, dir: &Path, bucket: &str) -> Result<()> {
        if !dir.is_dir() {
            return Err(InfraError::command_failed(
                format!("memory sync {}", dir.display()),
                "exit status: 255",
                "The user-provided path does not exist.",
            ));
        }
        self.record(Call::SyncSite(bucket.to_string()))?;
        self.with_bucket(bucket, |_| ())
    }

    fn create_invalidation(&self, distribution_id: &str, _paths: &[&str]) -> Result<()> {
        self.record(Call::CreateInvalidation(distribution_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_lag() {
        let provider = MemoryProvider::new().with_visibility_lag(2);
        provider.create_bucket("lagging", "us-east-1").unwrap();
        assert!(provider.put_bucket_canned_acl("lagging", CannedAcl::Private).is_err());
        assert!(!provider.bucket_exists("lagging").unwrap());
        assert!(!provider.bucket_exists("lagging").unwrap());
        assert!(provider.bucket_exists("lagging").unwrap());
        provider
            .put_bucket_canned_acl("lagging", CannedAcl::Private)
            .unwrap();
        assert_eq!(
            provider.bucket("lagging").unwrap().canned_acl,
            Some(CannedAcl::Private)
        );
    }

    #[test]
    fn test_queries_on_missing_bucket_fail() {
        let provider = MemoryProvider::new();
        assert!(provider.get_bucket_acl("absent").is_err());
        assert!(provider.get_bucket_logging("absent").is_err());
    }

    #[test]
    fn test_injected_failure() {
        let provider = MemoryProvider::new().failing_on("PutBucketAcl");
        provider.create_bucket("site", "us-east-1").unwrap();
        let err = provider
            .put_bucket_acl("site", &AccessControlPolicy::default())
            .unwrap_err();
        assert!(matches!(err, InfraError::CommandFailed { .. }));
        assert_eq!(provider.calls(), vec![Call::CreateBucket("site".into())]);
    }

    #[test]
    fn test_injected_query_failure() {
        let provider = MemoryProvider::new().failing_query("GetBucketAcl");
        provider.create_bucket("site", "us-east-1").unwrap();
        assert!(provider.get_bucket_acl("site").is_err());
        assert!(provider.get_bucket_logging("site").is_ok());
        assert_eq!(provider.calls().len(), 1);
    }
}
