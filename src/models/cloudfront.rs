use serde::{Deserialize, Serialize};

use crate::models::SiteConfig;

const ORIGIN_ID: &str = "s3-website";

/// CloudFront `DistributionConfig` as accepted by `create-distribution`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionConfig {
    pub caller_reference: String,
    pub aliases: Items<String>,
    pub default_root_object: String,
    pub origins: Items<Origin>,
    pub default_cache_behavior: DefaultCacheBehavior,
    pub custom_error_responses: Items<CustomErrorResponse>,
    pub comment: String,
    pub price_class: String,
    pub enabled: bool,
    pub viewer_certificate: ViewerCertificate,
}

/// CloudFront's `{Quantity, Items}` list wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Items<T> {
    pub quantity: usize,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> From<Vec<T>> for Items<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            quantity: items.len(),
            items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Origin {
    pub id: String,
    pub domain_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_origin_config: Option<CustomOriginConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomOriginConfig {
    #[serde(rename = "HTTPPort")]
    pub http_port: u16,
    #[serde(rename = "HTTPSPort")]
    pub https_port: u16,
    #[serde(rename = "OriginProtocolPolicy")]
    pub origin_protocol_policy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefaultCacheBehavior {
    pub target_origin_id: String,
    pub viewer_protocol_policy: String,
    pub compress: bool,
    pub forwarded_values: ForwardedValues,
    pub trusted_signers: TrustedSigners,
    #[serde(rename = "MinTTL")]
    pub min_ttl: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForwardedValues {
    pub query_string: bool,
    pub cookies: Cookies,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Cookies {
    pub forward: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrustedSigners {
    pub enabled: bool,
    pub quantity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomErrorResponse {
    pub error_code: u16,
    pub response_page_path: String,
    pub response_code: String,
    #[serde(rename = "ErrorCachingMinTTL")]
    pub error_caching_min_ttl: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerCertificate {
    #[serde(rename = "ACMCertificateArn", skip_serializing_if = "Option::is_none")]
    pub acm_certificate_arn: Option<String>,
    #[serde(rename = "SSLSupportMethod", skip_serializing_if = "Option::is_none")]
    pub ssl_support_method: Option<String>,
    #[serde(
        rename = "MinimumProtocolVersion",
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum_protocol_version: Option<String>,
    #[serde(
        rename = "CloudFrontDefaultCertificate",
        skip_serializing_if = "Option::is_none"
    )]
    pub cloudfront_default_certificate: Option<bool>,
}

impl DistributionConfig {
    /// Distribution fronting the content bucket's website endpoint.
    ///
    /// Aliases require a certificate; without one the distribution is only
    /// reachable on its `*.cloudfront.net` name.
    pub fn for_site(config: &SiteConfig, caller_reference: String) -> Self {
        let (aliases, viewer_certificate) = match &config.cdn.certificate_arn {
            Some(arn) => (
                config.aliases(),
                ViewerCertificate {
                    acm_certificate_arn: Some(arn.clone()),
                    ssl_support_method: Some("sni-only".to_string()),
                    minimum_protocol_version: Some("TLSv1.2_2021".to_string()),
                    cloudfront_default_certificate: None,
                },
            ),
            None => (
                Vec::new(),
                ViewerCertificate {
                    acm_certificate_arn: None,
                    ssl_support_method: None,
                    minimum_protocol_version: None,
                    cloudfront_default_certificate: Some(true),
                },
            ),
        };

        Self {
            caller_reference,
            aliases: aliases.into(),
            default_root_object: config.index_document.clone(),
            origins: vec![Origin {
                id: ORIGIN_ID.to_string(),
                domain_name: config.website_endpoint(),
                custom_origin_config: Some(CustomOriginConfig {
                    http_port: 80,
                    https_port: 443,
                    // S3 website endpoints only speak plain HTTP
                    origin_protocol_policy: "http-only".to_string(),
                }),
            }]
            .into(),
            default_cache_behavior: DefaultCacheBehavior {
                target_origin_id: ORIGIN_ID.to_string(),
                viewer_protocol_policy: "redirect-to-https".to_string(),
                compress: true,
                forwarded_values: ForwardedValues {
                    query_string: false,
                    cookies: Cookies {
                        forward: "none".to_string(),
                    },
                },
                trusted_signers: TrustedSigners {
                    enabled: false,
                    quantity: 0,
                },
                min_ttl: 0,
            },
            custom_error_responses: vec![CustomErrorResponse {
                error_code: 404,
                response_page_path: format!("/{}", config.error_document),
                response_code: "404".to_string(),
                error_caching_min_ttl: 300,
            }]
            .into(),
            comment: config.domain.clone(),
            price_class: config.cdn.price_class.clone(),
            enabled: true,
            viewer_certificate,
        }
    }
}

// list-distributions

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListDistributionsOutput {
    #[serde(default)]
    pub distribution_list: Option<DistributionList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionList {
    #[serde(default)]
    pub items: Vec<DistributionSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionSummary {
    pub id: String,
    pub domain_name: String,
    pub aliases: Items<String>,
    pub origins: Items<OriginSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginSummary {
    pub domain_name: String,
}

impl DistributionSummary {
    /// True if the distribution answers for `domain` or pulls from `origin`.
    pub fn serves(&self, domain: &str, origin: &str) -> bool {
        self.aliases.items.iter().any(|a| a == domain)
            || self.origins.items.iter().any(|o| o.domain_name == origin)
    }
}

// create-distribution

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDistributionOutput {
    pub distribution: CreatedDistribution,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatedDistribution {
    pub id: String,
    pub domain_name: String,
}
