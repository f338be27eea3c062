use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

const DEFAULT_DOMAIN: &str = "example.com";
const DEFAULT_REGION: &str = "us-east-1";

/// Regions whose website endpoint is `s3-website-<region>`; all others use
/// `s3-website.<region>`.
const DASH_WEBSITE_REGIONS: &[&str] = &[
    "us-east-1",
    "us-west-1",
    "us-west-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "eu-west-1",
    "sa-east-1",
    "us-gov-west-1",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub domain: String,
    pub region: String,
    pub content_bucket: Option<String>, // Defaults to the domain
    pub log_bucket: Option<String>,     // Defaults to "<content bucket>-logs"
    pub log_prefix: Option<String>,     // Defaults to the content bucket name
    pub index_document: String,
    pub error_document: String,
    pub website_document: PathBuf,
    pub distribution_document: PathBuf,
    pub aws_binary: String,
    pub profile: Option<String>,
    pub settle_attempts: u32,
    pub settle_interval_ms: u64,
    pub log_path: Option<PathBuf>,
    pub log_level: String,
    pub site_dir: PathBuf,
    pub cdn: CdnConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CdnConfig {
    pub enabled: bool,
    pub distribution_id: Option<String>,
    pub certificate_arn: Option<String>,
    pub price_class: String,
    pub aliases: Vec<String>, // Extra aliases besides the domain
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            region: DEFAULT_REGION.to_string(),
            content_bucket: None,
            log_bucket: None,
            log_prefix: None,
            index_document: "index.html".to_string(),
            error_document: "404.html".to_string(),
            website_document: PathBuf::from("website.json"),
            distribution_document: PathBuf::from("distribution.json"),
            aws_binary: "aws".to_string(),
            profile: None,
            settle_attempts: 20,
            settle_interval_ms: 1000,
            log_path: None,
            log_level: "info".to_string(),
            site_dir: PathBuf::from("public"),
            cdn: CdnConfig::default(),
        }
    }
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            distribution_id: None,
            certificate_arn: None,
            price_class: "PriceClass_100".to_string(),
            aliases: Vec::new(),
        }
    }
}

impl SiteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Reads the config file if it exists, otherwise falls back to the built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn content_bucket(&self) -> String {
        self.content_bucket
            .clone()
            .unwrap_or_else(|| self.domain.clone())
    }

    pub fn log_bucket(&self) -> String {
        self.log_bucket
            .clone()
            .unwrap_or_else(|| format!("{}-logs", self.content_bucket()))
    }

    pub fn log_prefix(&self) -> String {
        self.log_prefix
            .clone()
            .unwrap_or_else(|| self.content_bucket())
    }

    pub fn settle_interval(&self) -> Duration {
        Duration::from_millis(self.settle_interval_ms)
    }

    /// Domain followed by any extra CDN aliases, without duplicates.
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases = vec![self.domain.clone()];
        for alias in &self.cdn.aliases {
            if !aliases.contains(alias) {
                aliases.push(alias.clone());
            }
        }
        aliases
    }

    /// S3 static website endpoint for the content bucket.
    pub fn website_endpoint(&self) -> String {
        let separator = if DASH_WEBSITE_REGIONS.contains(&self.region.as_str()) {
            '-'
        } else {
            '.'
        };
        format!(
            "{}.s3-website{separator}{}.amazonaws.com",
            self.content_bucket(),
            self.region
        )
    }
}
