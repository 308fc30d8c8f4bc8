use anyhow::bail;

use crate::parse_or;

/// Signing secrets and lifetimes (seconds) for session credentials.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// HMAC secret for access credentials
    pub secret: String,
    /// HMAC secret for refresh credentials
    pub refresh_secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
    /// Ledger expiry written when a login rotates the refresh credential
    pub refresh_record_expiry: i64,
    /// Ledger expiry of the email-verification record created at registration
    pub verification_record_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_source<F>(var: &F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            secret: required_secret(var, "JWT_SECRET")?,
            refresh_secret: required_secret(var, "JWT_REFRESH_SECRET")?,
            access_token_expiry: parse_or(var, "JWT_ACCESS_EXPIRY", 2_592_000)?, // 30 days
            refresh_token_expiry: parse_or(var, "JWT_REFRESH_EXPIRY", 604_800)?, // 7 days
            refresh_record_expiry: parse_or(var, "REFRESH_RECORD_EXPIRY", 2_592_000)?,
            verification_record_expiry: parse_or(var, "VERIFICATION_RECORD_EXPIRY", 604_800)?,
        })
    }
}

fn required_secret<F>(var: &F, key: &str) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => bail!("{} must not be empty", key),
        None => bail!("{} must be set", key),
    }
}
