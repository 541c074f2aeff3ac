//! Configuration System
//!
//! Layered configuration for the verification client and logging. Sources, lowest
//! to highest precedence: built-in defaults, the user config file, an explicit
//! config file, `SLOTHFRAME_*` environment variables, and `SLOTHFRAME_AUTH_URL`
//! (or its older name `SLOTHDEV_AUTH_URL`). A blank endpoint counts as unset.
//!
//! The operating mode is deliberately absent here: the gate re-reads
//! `OPERATING_MODE` on every unlock attempt.

use crate::error::FrameError;
use crate::logging::LoggingConfig;
use crate::verification::endpoint_from_env;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub use crate::verification::VerificationConfig;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlothConfig {
    /// Verification authority settings
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SlothConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), FrameError> {
        self.verification
            .validate()
            .map_err(|e| FrameError::Config(format!("verification: {}", e)))
    }
}

/// Path to the user-level config file, e.g. `~/.config/slothframe/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "slothframe").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Loads `SlothConfig` from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the user config file (if present), an optional explicit file, and the environment.
    pub fn load(config_path: Option<&Path>) -> Result<SlothConfig, FrameError> {
        let mut builder = config::Config::builder();

        if let Some(user_path) = user_config_path() {
            if user_path.exists() {
                debug!(config_path = %user_path.display(), "Loading user configuration");
                builder = builder.add_source(File::from(user_path).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        Self::finish(builder)
    }

    /// Load from a single file plus the environment, skipping the user config file.
    pub fn load_from_file(path: &Path) -> Result<SlothConfig, FrameError> {
        let builder =
            config::Config::builder().add_source(File::from(path.to_path_buf()).required(true));
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<SlothConfig, FrameError> {
        let mut config: SlothConfig = builder
            .add_source(
                Environment::with_prefix("SLOTHFRAME")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("verification.endpoint", endpoint_from_env())?
            .build()?
            .try_deserialize()?;

        config.verification.normalize();
        config.validate()?;
        Ok(config)
    }
}
