use std::{net::SocketAddr, path::Path};

use anyhow::Context;
use clap::ValueEnum;
use derivative::Derivative;
use serde::Deserialize;

use crate::{error::ErrorVerbosity, utils::mask_fmt};

/// Selects which database the server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Environment {
    #[default]
    Development,
    /// Uses [`DatabaseConfig::test_url`].
    Test,
}

#[derive(Derivative, Clone, Deserialize)]
#[derivative(Debug)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `sqlite://bookshelf.db`.
    #[derivative(Debug(format_with = "mask_fmt"))]
    pub url: String,
    /// Connection URL used when running in [`Environment::Test`].
    #[derivative(Debug(format_with = "mask_fmt"))]
    #[serde(default = "DatabaseConfig::default_test_url")]
    pub test_url: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    fn default_test_url() -> String {
        "sqlite::memory:".to_string()
    }

    fn default_max_connections() -> u32 {
        5
    }

    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        Self {
            url: Self::default_test_url(),
            test_url: Self::default_test_url(),
            max_connections: 1,
        }
    }

    /// Returns a copy pointing at the database for the given environment.
    pub fn for_environment(&self, environment: Environment) -> Self {
        match environment {
            Environment::Development => self.clone(),
            Environment::Test => Self {
                url: self.test_url.clone(),
                ..self.clone()
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub socket_address: SocketAddr,
    pub error_verbosity: ErrorVerbosity,
    /// Logs every response body at `TRACE`. Expensive.
    #[serde(default)]
    pub trace_response_body: bool,
    pub database: DatabaseConfig,
}

impl ServerConfig {
    pub async fn from_config_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(content)?;

        Ok(config)
    }

    pub fn with_environment(self, environment: Environment) -> Self {
        Self {
            database: self.database.for_environment(environment),
            ..self
        }
    }
}
