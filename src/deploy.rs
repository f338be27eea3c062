//! Publish a generated site and refresh the CDN.

use log::{info, warn};

use crate::bootstrap::preflight;
use crate::error::Result;
use crate::models::SiteConfig;
use crate::provider::CloudProvider;

/// Paths invalidated after every deploy.
const INVALIDATION_PATHS: [&str; 1] = ["/*"];

/// Sync `config.site_dir` into the content bucket, then invalidate the
/// distribution cache. Returns the invalidated distribution id, if any.
pub fn deploy<P: CloudProvider>(provider: &P, config: &SiteConfig) -> Result<Option<String>> {
    preflight(provider, config)?;

    let bucket = config.content_bucket();
    info!("Syncing {} to {bucket}", config.site_dir.display());
    provider.sync_site(&config.site_dir, &bucket)?;

    if !config.cdn.enabled {
        return Ok(None);
    }

    let distribution_id = match &config.cdn.distribution_id {
        Some(id) => Some(id.clone()),
        None => provider.find_distribution(&config.domain, &config.website_endpoint())?,
    };

    match &distribution_id {
        Some(id) => {
            info!("Invalidating {} on distribution {id}", INVALIDATION_PATHS.join(" "));
            provider.create_invalidation(id, &INVALIDATION_PATHS)?;
        }
        None => warn!("No distribution serves {}, skipping invalidation", config.domain),
    }

    Ok(distribution_id)
}
