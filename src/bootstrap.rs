//! Engine environment bootstrap
//!
//! The engine reads its home directory (and optionally a module search
//! path) from environment variables. These must be set exactly once, before
//! anything talks to the engine; finding the home variable already set is
//! fatal.

use std::env;

use crate::config::BootstrapConfig;

/// Error setting an engine environment variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    /// The variable already had a non-empty value
    AlreadySet(String),
}

impl std::fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootstrapError::AlreadySet(var) => {
                write!(f, "Failed to set {} environment variable: already set", var)
            }
        }
    }
}

impl std::error::Error for BootstrapError {}

/// Set `var` to `value`, failing if it already has a non-empty value
pub fn set_engine_var(var: &str, value: &str) -> Result<(), BootstrapError> {
    match env::var_os(var) {
        Some(existing) if !existing.is_empty() => Err(BootstrapError::AlreadySet(var.to_string())),
        _ => {
            env::set_var(var, value);
            log::debug!("Set {}={}", var, value);
            Ok(())
        }
    }
}

/// Apply the configured engine environment
///
/// Does nothing when bootstrap is disabled.
pub fn bootstrap(config: &BootstrapConfig) -> Result<(), BootstrapError> {
    if !config.enabled {
        return Ok(());
    }
    set_engine_var(&config.home_var, &config.home)?;
    if let Some(path) = &config.path {
        set_engine_var(&config.path_var, path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BootstrapError::AlreadySet("ENGINE_HOME".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("ENGINE_HOME"));
        assert!(msg.contains("already set"));
    }

    #[test]
    fn test_disabled_is_noop() {
        let config = BootstrapConfig {
            home_var: "SCENESCRIPT_TEST_DISABLED_HOME".to_string(),
            home: "/opt/engine".to_string(),
            ..BootstrapConfig::default()
        };
        bootstrap(&config).unwrap();
        assert!(env::var_os("SCENESCRIPT_TEST_DISABLED_HOME").is_none());
    }
}
