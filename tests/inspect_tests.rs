//! Tests for precondition inspection

mod common;

use blog_infra::bootstrap::{Step, inspect, plan};
use blog_infra::models::{BucketLoggingStatus, Permission, Preconditions, ResourceState};
use blog_infra::provider::MemoryProvider;
use blog_infra::provider::memory::MemoryBucket;
use common::{DOMAIN, LOG_BUCKET, configured_provider, log_bucket_with, site_config};

#[test]
fn test_nothing_exists_means_everything_unmet() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());

    let pre = inspect(&MemoryProvider::new(), &config);

    assert_eq!(pre, Preconditions::default());
    assert_eq!(pre.content_bucket_state(), ResourceState::Missing);
    assert_eq!(pre.log_bucket_state(), ResourceState::Missing);
}

#[test]
fn test_configured_state_meets_everything() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let provider = configured_provider(&config);

    let pre = inspect(&provider, &config);

    assert!(pre.content_bucket_exists && pre.log_bucket_exists);
    assert!(pre.log_delivery_granted());
    assert!(pre.logging_correct());
    assert!(pre.website_document_present && pre.distribution_document_present);
    assert!(pre.distribution_exists);
    assert_eq!(pre.content_bucket_state(), ResourceState::Configured);
    assert!(provider.calls().is_empty(), "inspection must not mutate");
}

#[test]
fn test_partial_grants_and_wrong_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let provider = MemoryProvider::new();
    provider.add_bucket(LOG_BUCKET, log_bucket_with(&[Permission::ReadAcp]));
    provider.add_bucket(
        DOMAIN,
        MemoryBucket {
            logging: BucketLoggingStatus::enabled(LOG_BUCKET, "logs/"),
            ..Default::default()
        },
    );

    let pre = inspect(&provider, &config);

    assert!(pre.acl_has_read_acp_grant);
    assert!(!pre.acl_has_write_grant);
    assert!(pre.logging_target_bucket_correct);
    assert!(!pre.logging_target_prefix_correct);
    assert_eq!(pre.log_bucket_state(), ResourceState::Created);
    assert_eq!(pre.content_bucket_state(), ResourceState::Created);
}

#[test]
fn test_distribution_lookup_by_configured_id() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = site_config(dir.path());
    let provider = configured_provider(&config);

    config.cdn.distribution_id = Some("EUNKNOWN".to_string());
    assert!(!inspect(&provider, &config).distribution_exists);

    config.cdn.distribution_id = Some("EEXISTING".to_string());
    assert!(inspect(&provider, &config).distribution_exists);
}

#[test]
fn test_cdn_disabled_skips_distribution_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = site_config(dir.path());
    let provider = configured_provider(&config);
    config.cdn.enabled = false;

    assert!(!inspect(&provider, &config).distribution_exists);
}

#[test]
fn test_failed_queries_on_existing_resources_count_as_unmet() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let configured = configured_provider(&config);
    let provider = MemoryProvider::new()
        .failing_query("GetBucketAcl")
        .failing_query("GetBucketLogging")
        .failing_query("FindDistribution");
    for bucket in [DOMAIN, LOG_BUCKET] {
        provider.add_bucket(bucket, configured.bucket(bucket).unwrap());
    }

    let pre = inspect(&provider, &config);

    assert!(pre.content_bucket_exists && pre.log_bucket_exists);
    assert!(!pre.acl_has_read_acp_grant && !pre.acl_has_write_grant);
    assert!(!pre.logging_target_bucket_correct && !pre.logging_target_prefix_correct);
    assert!(!pre.distribution_exists);

    let steps = plan(&pre, &config);
    assert!(!steps.iter().any(|s| matches!(s, Step::CreateBucket { .. })));
    assert_eq!(
        steps
            .iter()
            .filter(|s| matches!(s, Step::GrantLogDelivery { .. }))
            .count(),
        2
    );
    assert!(steps.iter().any(|s| matches!(s, Step::EnableLogging { .. })));
    assert!(steps.iter().any(|s| matches!(s, Step::CreateDistribution { .. })));
}
