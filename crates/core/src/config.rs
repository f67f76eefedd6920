//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into services. Library code
//! never reads environment variables while handling a request.

use crate::constants::MAX_TAXONOMY_FILE_BYTES;
use crate::{IpcError, IpcResult};
use body_sites::Taxonomy;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    taxonomy_path: Option<PathBuf>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `taxonomy_path`, when given, must be a regular YAML file (`.yaml` / `.yml`) no larger
    /// than [`MAX_TAXONOMY_FILE_BYTES`].
    pub fn new(taxonomy_path: Option<PathBuf>) -> IpcResult<Self> {
        if let Some(path) = taxonomy_path.as_deref() {
            validate_taxonomy_file(path)?;
        }
        Ok(Self { taxonomy_path })
    }

    /// Build from the raw value of `IPC_BODY_SITE_TAXONOMY`.
    ///
    /// `None` or an empty/whitespace value selects the built-in taxonomy.
    pub fn from_env_value(value: Option<String>) -> IpcResult<Self> {
        let path = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::new(path)
    }

    pub fn taxonomy_path(&self) -> Option<&Path> {
        self.taxonomy_path.as_deref()
    }

    /// Load the configured taxonomy: the override file if set, otherwise the built-in asset.
    pub fn load_taxonomy(&self) -> IpcResult<Cow<'static, Taxonomy>> {
        match self.taxonomy_path.as_deref() {
            Some(path) => {
                let taxonomy = Taxonomy::load(path)?;
                tracing::info!("using body-site taxonomy override {}", path.display());
                Ok(Cow::Owned(taxonomy))
            }
            None => Ok(Cow::Borrowed(Taxonomy::builtin()?)),
        }
    }
}

fn validate_taxonomy_file(path: &Path) -> IpcResult<()> {
    let metadata = std::fs::metadata(path).map_err(IpcError::FileRead)?;

    if !metadata.is_file() {
        return Err(IpcError::InvalidInput(format!(
            "taxonomy override {} is not a regular file",
            path.display()
        )));
    }

    if metadata.len() > MAX_TAXONOMY_FILE_BYTES {
        return Err(IpcError::InvalidInput(format!(
            "taxonomy override {} exceeds maximum size of {} bytes",
            path.display(),
            MAX_TAXONOMY_FILE_BYTES
        )));
    }

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if !is_yaml {
        return Err(IpcError::InvalidInput(format!(
            "taxonomy override {} must be a .yaml or .yml file",
            path.display()
        )));
    }

    Ok(())
}
