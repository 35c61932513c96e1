use crate::parameters::NamingConfig;
use crate::utils::is_safe_identifier;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Statement builder configuration with validation
#[derive(Clone, Debug, PartialEq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Upper bound on `suffix__xxxx` candidates tried per unique name (26^4 at most)
    #[validate(range(
        min = 1,
        max = 456976,
        message = "Max name attempts must be between 1 and 456976"
    ))]
    pub max_name_attempts: u32,

    /// Width of the generated alphabetic suffix
    #[validate(range(min = 1, max = 6, message = "Name suffix width must be between 1 and 6"))]
    pub name_suffix_width: u8,

    /// Identifier bound to the root entity of eager loads
    #[validate(custom(function = "validate_root_identifier"))]
    pub root_identifier: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        let naming = NamingConfig::default();
        Self {
            max_name_attempts: naming.max_attempts,
            name_suffix_width: naming.suffix_width,
            root_identifier: "n".to_string(),
        }
    }
}

impl BuilderConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            max_name_attempts: parse_env_var("CYPHERWEAVE_MAX_NAME_ATTEMPTS", "10000")?,
            name_suffix_width: parse_env_var("CYPHERWEAVE_NAME_SUFFIX_WIDTH", "4")?,
            root_identifier: env::var("CYPHERWEAVE_ROOT_IDENTIFIER")
                .unwrap_or_else(|_| "n".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by whatever was given on the command line
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.merge(cli)?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI overrides (CLI wins over file and environment)
    pub fn merge(&mut self, cli: CliConfig) -> Result<(), ConfigError> {
        if let Some(attempts) = cli.max_name_attempts {
            self.max_name_attempts = attempts;
        }
        if let Some(width) = cli.name_suffix_width {
            self.name_suffix_width = width;
        }
        if let Some(root) = cli.root_identifier {
            self.root_identifier = root;
        }
        self.validate()?;
        Ok(())
    }

    /// Unique-name bounds for new parameter tables
    pub fn naming(&self) -> NamingConfig {
        NamingConfig {
            max_attempts: self.max_name_attempts,
            suffix_width: self.name_suffix_width,
        }
    }
}

/// CLI overrides; `None` keeps the configured value
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub max_name_attempts: Option<u32>,
    pub name_suffix_width: Option<u8>,
    pub root_identifier: Option<String>,
}

fn validate_root_identifier(identifier: &str) -> Result<(), ValidationError> {
    if is_safe_identifier(identifier) {
        Ok(())
    } else {
        let mut error = ValidationError::new("root_identifier");
        error.message = Some("Root identifier must match ^[A-Za-z_][A-Za-z0-9_]*$".into());
        Err(error)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
