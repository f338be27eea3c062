use log::{debug, warn};

use crate::error::Result;
use crate::models::{LOG_DELIVERY_URI, Permission, Preconditions, SiteConfig};
use crate::provider::CloudProvider;

/// Query the provider and record which preconditions already hold.
///
/// Read-only. A missing resource or a query that fails counts as "unmet";
/// nothing here aborts the run.
pub fn inspect<P: CloudProvider>(provider: &P, config: &SiteConfig) -> Preconditions {
    let content_bucket = config.content_bucket();
    let log_bucket = config.log_bucket();

    let mut pre = Preconditions {
        content_bucket_exists: unmet_on_error(
            "bucket existence",
            provider.bucket_exists(&content_bucket),
        ),
        log_bucket_exists: unmet_on_error(
            "bucket existence",
            provider.bucket_exists(&log_bucket),
        ),
        website_document_present: config.website_document.is_file(),
        distribution_document_present: config.distribution_document.is_file(),
        ..Default::default()
    };

    if pre.log_bucket_exists {
        match provider.get_bucket_acl(&log_bucket) {
            Ok(policy) => {
                pre.acl_has_read_acp_grant =
                    policy.has_group_grant(LOG_DELIVERY_URI, Permission::ReadAcp);
                pre.acl_has_write_grant =
                    policy.has_group_grant(LOG_DELIVERY_URI, Permission::Write);
            }
            Err(e) => warn!("Could not read ACL of '{log_bucket}': {e}"),
        }
    }

    if pre.content_bucket_exists {
        match provider.get_bucket_logging(&content_bucket) {
            Ok(status) => {
                pre.logging_target_bucket_correct =
                    status.target_bucket() == Some(log_bucket.as_str());
                pre.logging_target_prefix_correct =
                    status.target_prefix() == Some(config.log_prefix().as_str());
            }
            Err(e) => {
                warn!("Could not read logging configuration of '{content_bucket}': {e}")
            }
        }
    }

    if config.cdn.enabled {
        pre.distribution_exists = match &config.cdn.distribution_id {
            Some(id) => unmet_on_error("distribution lookup", provider.distribution_exists(id)),
            None => unmet_on_error(
                "distribution lookup",
                provider
                    .find_distribution(&config.domain, &config.website_endpoint())
                    .map(|id| id.is_some()),
            ),
        };
    }

    debug!("Inspected preconditions: {pre:?}");
    pre
}

fn unmet_on_error(what: &str, result: Result<bool>) -> bool {
    result.unwrap_or_else(|e| {
        debug!("Treating failed {what} query as unmet: {e}");
        false
    })
}
