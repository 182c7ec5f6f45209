use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Provider {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cache {
    pub ttl_secs: u64,
    pub max_entries: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub provider: Provider,
    pub cache: Cache,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("api.port", 8080)?
            .set_default("provider.base_url", "https://query1.finance.yahoo.com")?
            .set_default("provider.timeout_secs", 15)?
            .set_default("cache.ttl_secs", 900)?
            .set_default("cache.max_entries", 64)?
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix("MARKETLENS")
                    .separator("__")
                    .try_parsing(true),
            );

        let s = builder.build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_a_config_file() {
        let settings = Settings::new().unwrap();
        assert_eq!(settings.api.port, 8080);
        assert_eq!(settings.cache.ttl_secs, 900);
        assert!(settings.provider.base_url.starts_with("https://"));
    }
}
