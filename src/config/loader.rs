//! Configuration loading functionality.
//!
//! This module provides the [`DefaultsLoader`] type for loading the
//! engine defaults from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::EngineDefaults;

/// Loads and provides access to the engine defaults.
///
/// # File layout
///
/// ```text
/// config/defaults.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::DefaultsLoader;
///
/// let loader = DefaultsLoader::load("./config/defaults.yaml").unwrap();
/// println!("late tolerance: {} min", loader.defaults().tolerance_late_minutes);
/// ```
#[derive(Debug, Clone)]
pub struct DefaultsLoader {
    defaults: EngineDefaults,
}

impl DefaultsLoader {
    /// Loads the defaults file from the specified path.
    ///
    /// Fails with [`EngineError::ConfigNotFound`] when the file is
    /// missing and [`EngineError::ConfigParseError`] when it is not
    /// valid YAML for [`EngineDefaults`]. The engine refuses to start
    /// without it.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml(&content, &path_str)
    }

    /// Parses defaults from a YAML string.
    pub fn from_yaml(content: &str, origin: &str) -> EngineResult<Self> {
        let defaults: EngineDefaults =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { defaults })
    }

    /// Returns the loaded defaults.
    pub fn defaults(&self) -> &EngineDefaults {
        &self.defaults
    }
}
