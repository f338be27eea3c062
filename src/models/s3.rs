use serde::{Deserialize, Serialize};
use std::fmt;

/// Group URI of the S3 server access log delivery principal.
pub const LOG_DELIVERY_URI: &str = "http://acs.amazonaws.com/groups/s3/LogDelivery";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    FullControl,
    Write,
    WriteAcp,
    Read,
    ReadAcp,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::FullControl => "FULL_CONTROL",
            Permission::Write => "WRITE",
            Permission::WriteAcp => "WRITE_ACP",
            Permission::Read => "READ",
            Permission::ReadAcp => "READ_ACP",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedAcl {
    Private,
    PublicRead,
}

impl CannedAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            CannedAcl::Private => "private",
            CannedAcl::PublicRead => "public-read",
        }
    }
}

// get-bucket-acl / put-bucket-acl

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessControlPolicy {
    #[serde(default)]
    pub grants: Vec<Grant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Owner {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Grant {
    pub grantee: Grantee,
    pub permission: Permission,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grantee {
    #[serde(rename = "Type")]
    pub grantee_type: String,
    #[serde(rename = "URI", skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "DisplayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Grant {
    pub fn log_delivery(permission: Permission) -> Self {
        Self {
            grantee: Grantee {
                grantee_type: "Group".to_string(),
                uri: Some(LOG_DELIVERY_URI.to_string()),
                id: None,
                display_name: None,
            },
            permission,
        }
    }
}

impl AccessControlPolicy {
    pub fn has_group_grant(&self, uri: &str, permission: Permission) -> bool {
        self.grants
            .iter()
            .any(|g| g.permission == permission && g.grantee.uri.as_deref() == Some(uri))
    }

    /// Adds the grant unless an identical one is already present.
    /// Returns true if the policy changed.
    pub fn add_grant(&mut self, grant: Grant) -> bool {
        if self.grants.contains(&grant) {
            return false;
        }
        self.grants.push(grant);
        true
    }
}

// get-bucket-logging / put-bucket-logging

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketLoggingStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging_enabled: Option<LoggingEnabled>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingEnabled {
    pub target_bucket: String,
    pub target_prefix: String,
}

impl BucketLoggingStatus {
    pub fn enabled(target_bucket: &str, target_prefix: &str) -> Self {
        Self {
            logging_enabled: Some(LoggingEnabled {
                target_bucket: target_bucket.to_string(),
                target_prefix: target_prefix.to_string(),
            }),
        }
    }

    pub fn target_bucket(&self) -> Option<&str> {
        self.logging_enabled
            .as_ref()
            .map(|l| l.target_bucket.as_str())
    }

    pub fn target_prefix(&self) -> Option<&str> {
        self.logging_enabled
            .as_ref()
            .map(|l| l.target_prefix.as_str())
    }
}

// put-bucket-website

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebsiteConfiguration {
    pub index_document: IndexDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_document: Option<ErrorDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routing_rules: Vec<RoutingRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexDocument {
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorDocument {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoutingRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<RoutingCondition>,
    pub redirect: Redirect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoutingCondition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_prefix_equals: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Redirect {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_key_with: Option<String>,
}

impl WebsiteConfiguration {
    /// Index and error documents plus the "/" → index redirect.
    pub fn for_site(index: &str, error: &str) -> Self {
        Self {
            index_document: IndexDocument {
                suffix: index.to_string(),
            },
            error_document: Some(ErrorDocument {
                key: error.to_string(),
            }),
            routing_rules: vec![RoutingRule {
                condition: Some(RoutingCondition {
                    key_prefix_equals: Some("/".to_string()),
                }),
                redirect: Redirect {
                    replace_key_with: Some(index.to_string()),
                },
            }],
        }
    }
}

// sts get-caller-identity

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallerIdentity {
    pub account: String,
    pub arn: String,
}
