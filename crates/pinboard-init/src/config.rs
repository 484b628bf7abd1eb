use std::path::PathBuf;

use anyhow::{Result, bail};

/// Placeholder secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "secret",
];

pub struct Config {
    pub db_path: PathBuf,
    pub secret_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secret_key = lookup("PINBOARD_SECRET_KEY").unwrap_or_default();
        if secret_key.is_empty() || PLACEHOLDER_SECRETS.contains(&secret_key.as_str()) {
            bail!("PINBOARD_SECRET_KEY is unset or still a placeholder");
        }

        let db_path = lookup("PINBOARD_DB_PATH")
            .unwrap_or_else(|| "pinboard.db".into())
            .into();

        Ok(Self {
            db_path,
            secret_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let cfg = config(&[("PINBOARD_SECRET_KEY", "a-real-secret")]).unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("pinboard.db"));
    }

    #[test]
    fn missing_or_placeholder_secret_is_fatal() {
        assert!(config(&[]).is_err());
        assert!(config(&[("PINBOARD_SECRET_KEY", "dev-secret-change-me")]).is_err());
    }

    #[test]
    fn overrides_are_read() {
        let cfg = config(&[
            ("PINBOARD_SECRET_KEY", "a-real-secret"),
            ("PINBOARD_DB_PATH", "/tmp/boards.db"),
        ])
        .unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/boards.db"));
        assert_eq!(cfg.secret_key, "a-real-secret");
    }
}
