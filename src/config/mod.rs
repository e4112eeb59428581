//! CLI configuration: named environments in a TOML file.
//!
//! Lives at `~/.config/spo-cli/config.toml`. Credentials are stored in the
//! file as-is; the file is created with the user's default permissions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::CredentialSet;

/// One SharePoint site plus the credentials to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub url: String,
    pub credentials: CredentialSet,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub current_environment: Option<String>,
    #[serde(default)]
    pub environments: BTreeMap<String, Environment>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("no config directory on this platform")?;
        Ok(base.join("spo-cli").join("config.toml"))
    }

    pub fn add_environment(&mut self, name: String, environment: Environment) {
        if self.current_environment.is_none() {
            self.current_environment = Some(name.clone());
        }
        self.environments.insert(name, environment);
    }

    pub fn remove_environment(&mut self, name: &str) -> Result<()> {
        self.environments
            .remove(name)
            .with_context(|| format!("environment '{}' not found", name))?;
        if self.current_environment.as_deref() == Some(name) {
            self.current_environment = self.environments.keys().next().cloned();
        }
        Ok(())
    }

    pub fn select_environment(&mut self, name: &str) -> Result<()> {
        if !self.environments.contains_key(name) {
            anyhow::bail!("environment '{}' not found", name);
        }
        self.current_environment = Some(name.to_string());
        Ok(())
    }

    /// The environment to use for this invocation: an explicit name wins,
    /// otherwise the configured current environment.
    pub fn resolve_environment<'a>(
        &'a self,
        explicit: Option<&'a str>,
    ) -> Result<(&'a str, &'a Environment)> {
        let name = explicit
            .or(self.current_environment.as_deref())
            .context("no environment selected; run 'spo-cli auth setup' first")?;
        let environment = self
            .environments
            .get(name)
            .with_context(|| format!("environment '{}' not found", name))?;
        Ok((name, environment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Environment {
        Environment {
            url: "https://contoso.sharepoint.com/sites/intranet".to_string(),
            credentials: CredentialSet {
                username: "admin@contoso.com".to_string(),
                password: "hunter2".to_string(),
                client_id: "client".to_string(),
                client_secret: "secret".to_string(),
            },
        }
    }

    #[test]
    fn test_first_environment_becomes_current() {
        let mut config = Config::default();
        config.add_environment("prod".to_string(), sample());
        assert_eq!(config.current_environment.as_deref(), Some("prod"));
    }

    #[test]
    fn test_resolve_prefers_explicit_name() {
        let mut config = Config::default();
        config.add_environment("prod".to_string(), sample());
        config.add_environment("test".to_string(), sample());
        config.select_environment("prod").unwrap();
        let (name, _) = config.resolve_environment(Some("test")).unwrap();
        assert_eq!(name, "test");
    }

    #[test]
    fn test_remove_current_falls_back() {
        let mut config = Config::default();
        config.add_environment("prod".to_string(), sample());
        config.add_environment("test".to_string(), sample());
        config.remove_environment("prod").unwrap();
        assert_eq!(config.current_environment.as_deref(), Some("test"));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let mut config = Config::default();
        config.add_environment("prod".to_string(), sample());
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.current_environment.as_deref(), Some("prod"));
        assert!(parsed.environments.contains_key("prod"));
    }
}
