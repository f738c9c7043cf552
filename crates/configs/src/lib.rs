use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub usage: UsageConfig,
}

/// Connection settings for the backend-as-a-service instance.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { base_url: "http://127.0.0.1:8090".into(), default_per_page: default_per_page() }
    }
}

/// Day thresholds for classifying how recently a song was used.
/// A song used within `recent_days` is "recent", within `stale_days`
/// "available", otherwise "stale".
#[derive(Debug, Clone, Deserialize)]
pub struct UsageConfig {
    #[serde(default = "default_recent_days")]
    pub recent_days: i64,
    #[serde(default = "default_stale_days")]
    pub stale_days: i64,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self { recent_days: default_recent_days(), stale_days: default_stale_days() }
    }
}

fn default_per_page() -> u32 { 20 }
fn default_recent_days() -> i64 { 14 }
fn default_stale_days() -> i64 { 180 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.backend.normalize_from_env();
        self.backend.validate()?;
        self.usage.validate()?;
        Ok(())
    }
}

impl BackendConfig {
    /// Fill the base URL from `BACKEND_URL` when the config file left it empty.
    pub fn normalize_from_env(&mut self) {
        if self.base_url.trim().is_empty() {
            if let Ok(url) = std::env::var("BACKEND_URL") {
                self.base_url = url;
            }
        }
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(anyhow!("backend.base_url must start with http(s)"));
        }
        if self.default_per_page == 0 || self.default_per_page > 500 {
            return Err(anyhow!("backend.default_per_page must be in 1..=500"));
        }
        Ok(())
    }
}

impl UsageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.recent_days <= 0 || self.stale_days <= self.recent_days {
            return Err(anyhow!("usage thresholds must satisfy 0 < recent_days < stale_days"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.backend.default_per_page, 20);
        assert_eq!(cfg.usage.recent_days, 14);
        assert_eq!(cfg.usage.stale_days, 180);
    }

    #[test]
    fn normalize_strips_trailing_slash() {
        let mut b = BackendConfig { base_url: "http://pb.local/".into(), default_per_page: 20 };
        b.normalize_from_env();
        assert_eq!(b.base_url, "http://pb.local");
    }

    #[test]
    fn validate_rejects_bad_thresholds() {
        let u = UsageConfig { recent_days: 30, stale_days: 14 };
        assert!(u.validate().is_err());
    }

    #[test]
    fn parse_minimal_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [backend]
            base_url = "https://api.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.backend.base_url, "https://api.example.com");
        assert_eq!(cfg.backend.default_per_page, 20);
    }
}
