//! Configuration of an analysis service.

use std::path::PathBuf;
use std::time::Duration;

use smol_str::SmolStr;
use thiserror::Error;

use crate::project::DEFAULT_IMPORTS;
use crate::syntax::TranslateOptions;

/// Errors found by [`AnalysisConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A scaffolding name is not a valid identifier.
    #[error("{field} must be an identifier, got {value:?}")]
    InvalidIdentifier { field: &'static str, value: SmolStr },

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,

    #[error("max backlog must be at least 1")]
    ZeroBacklog,

    /// A default import is not a dotted package name.
    #[error("invalid default import {0:?}")]
    InvalidPackage(SmolStr),
}

/// Settings an [`AnalysisService`](super::AnalysisService) is built from.
///
/// Constructed by the host and handed over once; the service never reads
/// global state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisConfig {
    /// Name of the generated class wrapping the sketch.
    pub class_name: SmolStr,
    /// Class the generated class extends.
    pub base_class: SmolStr,
    /// How often the worker looks at the backlog.
    pub tick_interval: Duration,
    /// Upper bound of the pending-cycle counter.
    pub max_backlog: usize,
    /// Run the semantic phase after a clean syntax phase.
    pub semantic_checks: bool,
    /// Directories scanned for library jars.
    pub library_roots: Vec<PathBuf>,
    /// Sketch-local folder whose jars are added when an import is not found.
    pub code_folder: Option<PathBuf>,
    /// Packages visible in every sketch without an import.
    pub default_imports: Vec<SmolStr>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            class_name: SmolStr::new_static("Sketch"),
            base_class: SmolStr::new_static("PApplet"),
            tick_interval: Duration::from_secs(1),
            max_backlog: 2,
            semantic_checks: true,
            library_roots: Vec::new(),
            code_folder: None,
            default_imports: DEFAULT_IMPORTS.iter().map(|p| SmolStr::new(p)).collect(),
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.class_name = name.into();
        self
    }

    pub fn with_base_class(mut self, name: impl Into<SmolStr>) -> Self {
        self.base_class = name.into();
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_max_backlog(mut self, max: usize) -> Self {
        self.max_backlog = max;
        self
    }

    pub fn with_semantic_checks(mut self, enabled: bool) -> Self {
        self.semantic_checks = enabled;
        self
    }

    pub fn with_library_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.library_roots.push(root.into());
        self
    }

    pub fn with_code_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.code_folder = Some(folder.into());
        self
    }

    pub fn with_default_imports<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.default_imports = packages.into_iter().map(Into::into).collect();
        self
    }

    /// Check the settings before a service is started.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("class_name", &self.class_name),
            ("base_class", &self.base_class),
        ] {
            if !is_identifier(value) {
                return Err(ConfigError::InvalidIdentifier {
                    field,
                    value: value.clone(),
                });
            }
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.max_backlog == 0 {
            return Err(ConfigError::ZeroBacklog);
        }
        if let Some(bad) = self
            .default_imports
            .iter()
            .find(|p| p.is_empty() || !p.split('.').all(is_identifier))
        {
            return Err(ConfigError::InvalidPackage(bad.clone()));
        }
        Ok(())
    }

    pub fn translate_options(&self) -> TranslateOptions {
        TranslateOptions {
            class_name: self.class_name.clone(),
            base_class: self.base_class.clone(),
        }
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c == '$' || unicode_ident::is_xid_start(c))
        && chars.all(|c| c == '_' || c == '$' || unicode_ident::is_xid_continue(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = AnalysisConfig::default();
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.max_backlog, 2);
        assert!(config.default_imports.iter().any(|p| p == "processing.core"));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_builder() {
        let config = AnalysisConfig::new()
            .with_class_name("MySketch")
            .with_tick_interval(Duration::from_millis(20))
            .with_library_root("/libs")
            .with_code_folder("/sketch/code")
            .with_semantic_checks(false);
        assert_eq!(config.translate_options().class_name, "MySketch");
        assert_eq!(config.library_roots, vec![PathBuf::from("/libs")]);
        assert!(!config.semantic_checks);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            AnalysisConfig::new().with_class_name("my sketch").validate(),
            Err(ConfigError::InvalidIdentifier { field: "class_name", .. })
        ));
        assert_eq!(
            AnalysisConfig::new()
                .with_tick_interval(Duration::ZERO)
                .validate(),
            Err(ConfigError::ZeroTickInterval)
        );
        assert_eq!(
            AnalysisConfig::new().with_max_backlog(0).validate(),
            Err(ConfigError::ZeroBacklog)
        );
        assert_eq!(
            AnalysisConfig::new()
                .with_default_imports(["java.util", "bad..pkg"])
                .validate(),
            Err(ConfigError::InvalidPackage("bad..pkg".into()))
        );
    }
}
