use crate::parse_or;

#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
    /// Public base URL the confirmation link points at
    pub app_url: String,
}

impl EmailConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_source<F>(var: &F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(var, "PORT", 8080)?;

        Ok(Self {
            enabled: var("SMTP_ENABLED")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            smtp_host: var("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
            smtp_port: parse_or(var, "SMTP_PORT", 587)?,
            smtp_username: var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: var("SMTP_PASSWORD").unwrap_or_default(),
            from_email: var("FROM_EMAIL").unwrap_or_else(|| "noreply@staybook.dev".to_string()),
            from_name: var("FROM_NAME").unwrap_or_else(|| "Staybook".to_string()),
            app_url: var("APP_URL").unwrap_or_else(|| format!("http://localhost:{}", port)),
        })
    }
}
