//! Idempotent infrastructure bootstrap.
//!
//! Three phases, strictly in sequence:
//! - [`inspect`] reads provider state into a [`Preconditions`] record,
//! - [`plan`] turns that record into an ordered list of [`Step`]s (pure),
//! - [`converge`] executes the steps, aborting on the first failure.
//!
//! Running the bootstrap twice yields no changes on the second run.

mod converge;
mod inspect;
mod plan;

pub use converge::{Effect, Outcome, converge, execute_step};
pub use inspect::inspect;
pub use plan::{Step, plan};

use log::info;

use crate::error::Result;
use crate::models::{Preconditions, SiteConfig};
use crate::provider::CloudProvider;
use crate::utils::validate_bucket_name;

/// Fail fast on missing tooling, bad credentials or unusable bucket names.
pub fn preflight<P: CloudProvider>(provider: &P, config: &SiteConfig) -> Result<()> {
    validate_bucket_name(&config.content_bucket())?;
    validate_bucket_name(&config.log_bucket())?;
    provider.check_tooling()?;
    let identity = provider.caller_identity()?;
    info!("Using account {} ({})", identity.account, identity.arn);
    Ok(())
}

/// Inspect and plan without touching anything.
pub fn dry_run<P: CloudProvider>(
    provider: &P,
    config: &SiteConfig,
) -> Result<(Preconditions, Vec<Step>)> {
    preflight(provider, config)?;
    let pre = inspect(provider, config);
    let steps = plan(&pre, config);
    Ok((pre, steps))
}

/// Full bootstrap: preflight, inspect, plan, converge.
pub fn run<P: CloudProvider>(provider: &P, config: &SiteConfig) -> Result<Outcome> {
    let (pre, steps) = dry_run(provider, config)?;
    info!(
        "Content bucket {:?}, log bucket {:?}, {} step(s) planned",
        pre.content_bucket_state(),
        pre.log_bucket_state(),
        steps.len()
    );
    converge(provider, config, steps)
}
