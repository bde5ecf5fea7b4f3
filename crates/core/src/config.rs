use crate::error::{AutofactoryError, Result};
use crate::resource::ResourceLayout;
use crate::scanner::DEFAULT_TYPE_SUFFIX;
use autofactory_api::NamespacePath;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_BASE_NAMESPACE: &str = "AUTOFACTORY_BASE";
pub const ENV_RESOURCE_ROOT: &str = "AUTOFACTORY_ROOT";
pub const ENV_LAYOUT: &str = "AUTOFACTORY_LAYOUT";
pub const ENV_USE_CACHE: &str = "AUTOFACTORY_CACHE";
pub const ENV_TYPE_SUFFIX: &str = "AUTOFACTORY_SUFFIX";

/// Scanner settings: where the types live and how results are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Namespace the scan starts from
    pub base_namespace: NamespacePath,
    /// Directory or archive holding the type resources
    pub resource_root: PathBuf,
    pub layout: ResourceLayout,
    /// Reuse scan results per marker for the scanner's lifetime
    pub use_cache: bool,
    /// Suffix of type resources inside archives
    pub type_suffix: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            base_namespace: NamespacePath::root(),
            resource_root: PathBuf::from("."),
            layout: ResourceLayout::Auto,
            use_cache: true,
            type_suffix: DEFAULT_TYPE_SUFFIX.to_string(),
        }
    }
}

impl ScannerConfig {
    pub fn new(base_namespace: NamespacePath, resource_root: impl Into<PathBuf>) -> Self {
        Self {
            base_namespace,
            resource_root: resource_root.into(),
            ..Self::default()
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with `AUTOFACTORY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values produced by `lookup` for the `AUTOFACTORY_*` keys.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(base) = lookup(ENV_BASE_NAMESPACE) {
            self.base_namespace = NamespacePath::parse(&base)
                .map_err(|e| AutofactoryError::Config(format!("{}: {}", ENV_BASE_NAMESPACE, e)))?;
        }
        if let Some(root) = lookup(ENV_RESOURCE_ROOT) {
            self.resource_root = PathBuf::from(root);
        }
        if let Some(layout) = lookup(ENV_LAYOUT) {
            self.layout = layout
                .parse()
                .map_err(|e| AutofactoryError::Config(format!("{}: {}", ENV_LAYOUT, e)))?;
        }
        if let Some(flag) = lookup(ENV_USE_CACHE) {
            self.use_cache = parse_flag(&flag).ok_or_else(|| {
                AutofactoryError::Config(format!("{}: expected a boolean, got `{}`", ENV_USE_CACHE, flag))
            })?;
        }
        if let Some(suffix) = lookup(ENV_TYPE_SUFFIX) {
            self.type_suffix = suffix;
        }
        self.validate()?;
        Ok(self)
    }

    /// Rejects an empty type suffix.
    pub fn validate(&self) -> Result<()> {
        if self.type_suffix.is_empty() {
            return Err(AutofactoryError::Config(format!(
                "{}: type suffix must not be empty",
                ENV_TYPE_SUFFIX
            )));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
