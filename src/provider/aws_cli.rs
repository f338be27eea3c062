use log::debug;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use super::CloudProvider;
use crate::error::{InfraError, Result};
use crate::models::cloudfront::{
    CreateDistributionOutput, DistributionConfig, ListDistributionsOutput,
};
use crate::models::s3::CallerIdentity;
use crate::models::{
    AccessControlPolicy, BucketLoggingStatus, CannedAcl, SiteConfig, WebsiteConfiguration,
};
use crate::utils::bucket_uri;

/// Region where `create-bucket` must not carry a location constraint.
const DEFAULT_BUCKET_REGION: &str = "us-east-1";

/// Provider backed by the `aws` command line tool.
pub struct AwsCli {
    binary: String,
    profile: Option<String>,
    region: String,
}

impl AwsCli {
    pub fn new(binary: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            profile: None,
            region: region.into(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            binary: config.aws_binary.clone(),
            profile: config.profile.clone(),
            region: config.region.clone(),
        }
    }

    /// Run one CLI invocation and return its stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .args(["--output", "json", "--region", self.region.as_str()]);
        if let Some(profile) = &self.profile {
            cmd.args(["--profile", profile.as_str()]);
        }

        let command = format!("{} {}", self.binary, args.join(" "));
        debug!("Running {command}");

        let output = cmd.output().map_err(|e| self.spawn_error(e))?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(InfraError::command_failed(command, output.status, stderr));
        }
        Ok(stdout)
    }

    fn run_json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        let stdout = self.run(args)?;
        // Some queries (e.g. get-bucket-logging without logging) print nothing
        let body = if stdout.trim().is_empty() {
            "{}"
        } else {
            stdout.as_str()
        };
        Ok(serde_json::from_str(body)?)
    }

    fn spawn_error(&self, e: std::io::Error) -> InfraError {
        match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => InfraError::MissingTool {
                tool: self.binary.clone(),
                reason: e.to_string(),
            },
            _ => InfraError::Io(e),
        }
    }
}

/// Maps a "does not exist" failure to Ok(false) and passes everything else on.
fn absent_on(result: Result<String>, markers: &[&str]) -> Result<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(InfraError::CommandFailed { stderr, .. })
            if markers.iter().any(|m| stderr.contains(m)) =>
        {
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

impl CloudProvider for AwsCli {
    fn check_tooling(&self) -> Result<()> {
        self.run(&["--version"]).map(|_| ())
    }

    fn caller_identity(&self) -> Result<CallerIdentity> {
        self.run_json(&["sts", "get-caller-identity"])
            .map_err(|e| match e {
                InfraError::CommandFailed { stderr, .. } => InfraError::MissingCredentials(stderr),
                other => other,
            })
    }

    fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        absent_on(
            self.run(&["s3api", "head-bucket", "--bucket", bucket]),
            &["404", "Not Found", "NoSuchBucket"],
        )
    }

    fn create_bucket(&self, bucket: &str, region: &str) -> Result<()> {
        let constraint = format!("LocationConstraint={region}");
        let mut args = vec![
            "s3api",
            "create-bucket",
            "--bucket",
            bucket,
            "--object-ownership",
            "ObjectWriter",
        ];
        if region != DEFAULT_BUCKET_REGION {
            args.extend(["--create-bucket-configuration", constraint.as_str()]);
        }
        self.run(&args).map(|_| ())
    }

    fn put_bucket_canned_acl(&self, bucket: &str, acl: CannedAcl) -> Result<()> {
        // New buckets block public ACLs; lift that before granting public-read
        if acl == CannedAcl::PublicRead {
            self.run(&["s3api", "delete-public-access-block", "--bucket", bucket])?;
        }
        self.run(&[
            "s3api",
            "put-bucket-acl",
            "--bucket",
            bucket,
            "--acl",
            acl.as_str(),
        ])
        .map(|_| ())
    }

    fn get_bucket_acl(&self, bucket: &str) -> Result<AccessControlPolicy> {
        self.run_json(&["s3api", "get-bucket-acl", "--bucket", bucket])
    }

    fn put_bucket_acl(&self, bucket: &str, policy: &AccessControlPolicy) -> Result<()> {
        let policy = serde_json::to_string(policy)?;
        self.run(&[
            "s3api",
            "put-bucket-acl",
            "--bucket",
            bucket,
            "--access-control-policy",
            &policy,
        ])
        .map(|_| ())
    }

    fn get_bucket_logging(&self, bucket: &str) -> Result<BucketLoggingStatus> {
        self.run_json(&["s3api", "get-bucket-logging", "--bucket", bucket])
    }

    fn put_bucket_logging(&self, bucket: &str, status: &BucketLoggingStatus) -> Result<()> {
        let status = serde_json::to_string(status)?;
        self.run(&[
            "s3api",
            "put-bucket-logging",
            "--bucket",
            bucket,
            "--bucket-logging-status",
            &status,
        ])
        .map(|_| ())
    }

    fn put_bucket_website(&self, bucket: &str, website: &WebsiteConfiguration) -> Result<()> {
        let website = serde_json::to_string(website)?;
        self.run(&[
            "s3api",
            "put-bucket-website",
            "--bucket",
            bucket,
            "--website-configuration",
            &website,
        ])
        .map(|_| ())
    }

    fn distribution_exists(&self, id: &str) -> Result<bool> {
        absent_on(
            self.run(&["cloudfront", "get-distribution", "--id", id]),
            &["NoSuchDistribution"],
        )
    }

    fn find_distribution(&self, domain: &str, origin: &str) -> Result<Option<String>> {
        let output: ListDistributionsOutput = self.run_json(&["cloudfront", "list-distributions"])?;
        Ok(output
            .distribution_list
            .unwrap_or_default()
            .items
            .into_iter()
            .find(|d| d.serves(domain, origin))
            .map(|d| d.id))
    }

    fn create_distribution(&self, config: &DistributionConfig) -> Result<String> {
        let config = serde_json::to_string(config)?;
        let output: CreateDistributionOutput = self.run_json(&[
            "cloudfront",
            "create-distribution",
            "--distribution-config",
            &config,
        ])?;
        debug!(
            "Distribution {} available at {}",
            output.distribution.id, output.distribution.domain_name
        );
        Ok(output.distribution.id)
    }

    fn sync_site(&self, dir: &Path, bucket: &str) -> Result<()> {
        let source = dir.to_string_lossy();
        let target = bucket_uri(bucket);
        self.run(&["s3", "sync", &source, &target, "--delete"])
            .map(|_| ())
    }

    fn create_invalidation(&self, distribution_id: &str, paths: &[&str]) -> Result<()> {
        let mut args = vec![
            "cloudfront",
            "create-invalidation",
            "--distribution-id",
            distribution_id,
            "--paths",
        ];
        args.extend_from_slice(paths);
        self.run(&args).map(|_| ())
    }
}
