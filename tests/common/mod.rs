#![allow(dead_code)]

use std::path::Path;

use blog_infra::SiteConfig;
use blog_infra::models::cloudfront::DistributionConfig;
use blog_infra::models::s3::Owner;
use blog_infra::models::{
    AccessControlPolicy, BucketLoggingStatus, CannedAcl, Grant, Permission, WebsiteConfiguration,
};
use blog_infra::provider::MemoryProvider;
use blog_infra::provider::memory::MemoryBucket;

pub const DOMAIN: &str = "blog.example.com";
pub const LOG_BUCKET: &str = "blog.example.com-logs";

/// Config whose generated documents live in `dir`.
pub fn site_config(dir: &Path) -> SiteConfig {
    SiteConfig {
        domain: DOMAIN.to_string(),
        website_document: dir.join("website.json"),
        distribution_document: dir.join("distribution.json"),
        site_dir: dir.join("public"),
        settle_interval_ms: 1,
        ..Default::default()
    }
}

pub fn owner() -> Owner {
    Owner {
        id: "owner-id".to_string(),
        display_name: Some("owner".to_string()),
    }
}

pub fn log_bucket_with(permissions: &[Permission]) -> MemoryBucket {
    MemoryBucket {
        canned_acl: Some(CannedAcl::Private),
        acl: AccessControlPolicy {
            grants: permissions.iter().map(|p| Grant::log_delivery(*p)).collect(),
            owner: Some(owner()),
        },
        ..Default::default()
    }
}

/// Provider and documents matching the desired state exactly.
pub fn configured_provider(config: &SiteConfig) -> MemoryProvider {
    let provider = MemoryProvider::new();
    let website = WebsiteConfiguration::for_site("index.html", "404.html");

    provider.add_bucket(
        DOMAIN,
        MemoryBucket {
            canned_acl: Some(CannedAcl::PublicRead),
            logging: BucketLoggingStatus::enabled(LOG_BUCKET, DOMAIN),
            website: Some(website.clone()),
            ..Default::default()
        },
    );
    provider.add_bucket(
        LOG_BUCKET,
        log_bucket_with(&[Permission::ReadAcp, Permission::Write]),
    );

    let distribution = DistributionConfig::for_site(config, "existing".to_string());
    provider.add_distribution("EEXISTING", distribution.clone());

    write_json(&config.website_document, &website);
    write_json(&config.distribution_document, &distribution);
    provider
}

pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}
