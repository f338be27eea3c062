use clap::{Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

use blog_infra::bootstrap;
use blog_infra::deploy::deploy;
use blog_infra::provider::AwsCli;
use blog_infra::utils::initialize_logger;
use blog_infra::{Result, SiteConfig};

#[derive(Parser)]
#[command(
    name = "blog-infra",
    version,
    about = "Provision and deploy the blog's S3/CloudFront stack"
)]
struct Cli {
    /// Config file; built-in defaults are used when it does not exist
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Default)]
enum Commands {
    /// Converge buckets, logging, website and distribution (default)
    #[default]
    Bootstrap,
    /// Show what bootstrap would do without changing anything
    Plan,
    /// Sync the generated site and invalidate the CDN cache
    Deploy,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match SiteConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to read config file {}: {e}", cli.config.display());
            return ExitCode::from(1);
        }
    };

    if let Err(e) = initialize_logger(config.log_path.as_deref(), &config.log_level) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::from(1);
    }

    match execute(cli.command.unwrap_or_default(), &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(1)
        }
    }
}

fn execute(command: Commands, config: &SiteConfig) -> Result<()> {
    let provider = AwsCli::from_config(config);

    match command {
        Commands::Bootstrap => {
            let outcome = bootstrap::run(&provider, config)?;
            for step in outcome.changes() {
                println!("changed: {step}");
            }
            println!("{} change(s)", outcome.change_count());
        }
        Commands::Plan => {
            let (_, steps) = bootstrap::dry_run(&provider, config)?;
            for step in steps.iter() {
                let marker = if step.is_change() { "+" } else { "=" };
                println!("{marker} {step}");
            }
        }
        Commands::Deploy => {
            if let Some(id) = deploy(&provider, config)? {
                println!("invalidated distribution {id}");
            }
        }
    }

    Ok(())
}
