use crate::error::{InfraError, Result};

/// Check a bucket name against the S3 naming rules.
/// Returns Ok(name) if valid, otherwise InvalidBucketName.
pub fn validate_bucket_name(bucket: &str) -> Result<&str> {
    let valid_chars = bucket
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
    let valid_ends = bucket
        .chars()
        .next()
        .zip(bucket.chars().last())
        .is_some_and(|(first, last)| first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric());

    if (3..=63).contains(&bucket.len()) && valid_chars && valid_ends && !bucket.contains("..") {
        Ok(bucket)
    } else {
        Err(InfraError::InvalidBucketName(bucket.to_string()))
    }
}

/// `s3://bucket` form used by the high-level `aws s3` commands.
pub fn bucket_uri(bucket: &str) -> String {
    format!("s3://{bucket}")
}
