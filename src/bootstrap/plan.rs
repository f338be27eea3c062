use std::fmt;
use std::path::PathBuf;

use crate::models::{CannedAcl, Permission, Preconditions, SiteConfig};

/// One idempotent unit of convergence work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    CreateBucket {
        bucket: String,
        acl: CannedAcl,
    },
    GrantLogDelivery {
        bucket: String,
        permission: Permission,
    },
    EnableLogging {
        bucket: String,
        target_bucket: String,
        target_prefix: String,
    },
    WriteWebsiteDocument {
        path: PathBuf,
    },
    /// Always planned; putting the same website configuration again is harmless.
    ApplyWebsite {
        bucket: String,
        path: PathBuf,
    },
    WriteDistributionDocument {
        path: PathBuf,
    },
    CreateDistribution {
        path: PathBuf,
    },
}

impl Step {
    /// False only for steps that run on every invocation regardless of state.
    pub fn is_change(&self) -> bool {
        !matches!(self, Step::ApplyWebsite { .. })
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::CreateBucket { bucket, acl } => {
                write!(f, "create bucket {bucket} ({})", acl.as_str())
            }
            Step::GrantLogDelivery { bucket, permission } => {
                write!(f, "grant {permission} on {bucket} to log delivery")
            }
            Step::EnableLogging {
                bucket,
                target_bucket,
                target_prefix,
            } => write!(
                f,
                "log {bucket} access to {target_bucket} under prefix '{target_prefix}'"
            ),
            Step::WriteWebsiteDocument { path } => {
                write!(f, "write website configuration {}", path.display())
            }
            Step::ApplyWebsite { bucket, path } => {
                write!(f, "apply {} to {bucket}", path.display())
            }
            Step::WriteDistributionDocument { path } => {
                write!(f, "write distribution configuration {}", path.display())
            }
            Step::CreateDistribution { path } => {
                write!(f, "create distribution from {}", path.display())
            }
        }
    }
}

/// Turn inspected preconditions into the ordered list of steps that
/// converges the infrastructure.
///
/// Order: buckets, log bucket grants, content bucket logging, website
/// document and configuration, then the CDN distribution.
pub fn plan(pre: &Preconditions, config: &SiteConfig) -> Vec<Step> {
    let content_bucket = config.content_bucket();
    let log_bucket = config.log_bucket();
    let mut steps = Vec::new();

    if !pre.content_bucket_exists {
        steps.push(Step::CreateBucket {
            bucket: content_bucket.clone(),
            acl: CannedAcl::PublicRead,
        });
    }
    if !pre.log_bucket_exists {
        steps.push(Step::CreateBucket {
            bucket: log_bucket.clone(),
            acl: CannedAcl::Private,
        });
    }

    // A bucket created in this run has no grants yet, whatever the flags say
    let granted = |flag: bool| pre.log_bucket_exists && flag;
    for (permission, flag) in [
        (Permission::ReadAcp, pre.acl_has_read_acp_grant),
        (Permission::Write, pre.acl_has_write_grant),
    ] {
        if !granted(flag) {
            steps.push(Step::GrantLogDelivery {
                bucket: log_bucket.clone(),
                permission,
            });
        }
    }

    if !(pre.content_bucket_exists && pre.logging_correct()) {
        steps.push(Step::EnableLogging {
            bucket: content_bucket.clone(),
            target_bucket: log_bucket,
            target_prefix: config.log_prefix(),
        });
    }

    if !pre.website_document_present {
        steps.push(Step::WriteWebsiteDocument {
            path: config.website_document.clone(),
        });
    }
    steps.push(Step::ApplyWebsite {
        bucket: content_bucket,
        path: config.website_document.clone(),
    });

    if config.cdn.enabled {
        if !pre.distribution_document_present {
            steps.push(Step::WriteDistributionDocument {
                path: config.distribution_document.clone(),
            });
        }
        if !pre.distribution_exists {
            steps.push(Step::CreateDistribution {
                path: config.distribution_document.clone(),
            });
        }
    }

    steps
}
