use chrono::Utc;
use log::{debug, info};
use std::thread;

use super::plan::Step;
use crate::error::{InfraError, Result};
use crate::models::{
    BucketLoggingStatus, DistributionConfig, Grant, SiteConfig, WebsiteConfiguration,
};
use crate::provider::CloudProvider;
use crate::utils::{read_document, write_if_absent};

/// What executing a step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// State was changed.
    Changed,
    /// Unconditional overwrite with the desired value.
    Reapplied,
    /// The step found its goal already met when it ran.
    AlreadySatisfied,
}

/// Steps executed by one convergence run, in order.
#[derive(Debug, Default)]
pub struct Outcome {
    pub executed: Vec<(Step, Effect)>,
}

impl Outcome {
    pub fn changes(&self) -> impl Iterator<Item = &Step> {
        self.executed
            .iter()
            .filter(|(_, e)| *e == Effect::Changed)
            .map(|(s, _)| s)
    }

    pub fn change_count(&self) -> usize {
        self.changes().count()
    }
}

/// Execute `steps` in order, stopping at the first failure.
pub fn converge<P: CloudProvider>(
    provider: &P,
    config: &SiteConfig,
    steps: Vec<Step>,
) -> Result<Outcome> {
    let mut outcome = Outcome::default();
    for step in steps {
        info!("Step: {step}");
        let effect = execute_step(provider, config, &step)?;
        debug!("Step finished: {effect:?}");
        outcome.executed.push((step, effect));
    }
    info!(
        "Convergence finished: {} change(s), {} step(s) executed",
        outcome.change_count(),
        outcome.executed.len()
    );
    Ok(outcome)
}

/// Execute a single step. Every step may be run again on its own.
pub fn execute_step<P: CloudProvider>(
    provider: &P,
    config: &SiteConfig,
    step: &Step,
) -> Result<Effect> {
    match step {
        Step::CreateBucket { bucket, acl } => {
            if provider.bucket_exists(bucket).unwrap_or(false) {
                return Ok(Effect::AlreadySatisfied);
            }
            provider.create_bucket(bucket, &config.region)?;
            wait_for_bucket(provider, config, bucket)?;
            provider.put_bucket_canned_acl(bucket, *acl)?;
            Ok(Effect::Changed)
        }

        Step::GrantLogDelivery { bucket, permission } => {
            // put-bucket-acl replaces the whole policy, so extend the current one
            let mut policy = provider.get_bucket_acl(bucket)?;
            if !policy.add_grant(Grant::log_delivery(*permission)) {
                return Ok(Effect::AlreadySatisfied);
            }
            provider.put_bucket_acl(bucket, &policy)?;
            Ok(Effect::Changed)
        }

        Step::EnableLogging {
            bucket,
            target_bucket,
            target_prefix,
        } => {
            let status = BucketLoggingStatus::enabled(target_bucket, target_prefix);
            if let Ok(current) = provider.get_bucket_logging(bucket)
                && current == status
            {
                return Ok(Effect::AlreadySatisfied);
            }
            provider.put_bucket_logging(bucket, &status)?;
            Ok(Effect::Changed)
        }

        Step::WriteWebsiteDocument { path } => {
            let website =
                WebsiteConfiguration::for_site(&config.index_document, &config.error_document);
            Ok(written(write_if_absent(path, &website)?))
        }

        Step::ApplyWebsite { bucket, path } => {
            let website: WebsiteConfiguration = read_document(path)?;
            provider.put_bucket_website(bucket, &website)?;
            Ok(Effect::Reapplied)
        }

        Step::WriteDistributionDocument { path } => {
            let caller_reference = format!("{}-{}", config.domain, Utc::now().timestamp());
            let distribution = DistributionConfig::for_site(config, caller_reference);
            Ok(written(write_if_absent(path, &distribution)?))
        }

        Step::CreateDistribution { path } => {
            let distribution: DistributionConfig = read_document(path)?;
            let id = provider.create_distribution(&distribution)?;
            info!("Created distribution {id} for {}", config.domain);
            Ok(Effect::Changed)
        }
    }
}

fn written(wrote: bool) -> Effect {
    if wrote {
        Effect::Changed
    } else {
        Effect::AlreadySatisfied
    }
}

/// Poll until a freshly created bucket is visible to follow-up calls.
fn wait_for_bucket<P: CloudProvider>(
    provider: &P,
    config: &SiteConfig,
    bucket: &str,
) -> Result<()> {
    let attempts = config.settle_attempts.max(1);
    for attempt in 1..=attempts {
        match provider.bucket_exists(bucket) {
            Ok(true) => {
                debug!("Bucket '{bucket}' visible after {attempt} poll(s)");
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => debug!("Polling bucket '{bucket}' failed: {e}"),
        }
        if attempt < attempts {
            thread::sleep(config.settle_interval());
        }
    }
    Err(InfraError::BucketNotReady {
        bucket: bucket.to_string(),
        attempts,
    })
}
