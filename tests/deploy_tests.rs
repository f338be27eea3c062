//! Tests for publishing the generated site

mod common;

use blog_infra::InfraError;
use blog_infra::deploy::deploy;
use blog_infra::provider::{Call, MemoryProvider};
use common::{DOMAIN, configured_provider, site_config};

#[test]
fn test_deploy_syncs_and_invalidates() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    std::fs::create_dir(&config.site_dir).unwrap();
    std::fs::write(config.site_dir.join("index.html"), "<h1>hello</h1>").unwrap();
    let provider = configured_provider(&config);

    let invalidated = deploy(&provider, &config).unwrap();

    assert_eq!(invalidated.as_deref(), Some("EEXISTING"));
    assert_eq!(
        provider.calls(),
        vec![
            Call::SyncSite(DOMAIN.into()),
            Call::CreateInvalidation("EEXISTING".into()),
        ]
    );
}

#[test]
fn test_deploy_without_distribution_skips_invalidation() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    std::fs::create_dir(&config.site_dir).unwrap();
    let provider = MemoryProvider::new();
    provider.add_bucket(DOMAIN, Default::default());

    assert_eq!(deploy(&provider, &config).unwrap(), None);
    assert_eq!(provider.calls(), vec![Call::SyncSite(DOMAIN.into())]);
}

#[test]
fn test_deploy_missing_site_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let provider = configured_provider(&config);

    let err = deploy(&provider, &config).unwrap_err();

    assert!(matches!(err, InfraError::CommandFailed { .. }));
    assert!(provider.calls().is_empty());
}
