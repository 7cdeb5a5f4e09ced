//! Persistent credential storage.

use coinscope_types::{Credentials, Tier, TierParseError};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the stored API key.
pub const API_KEY_ENV: &str = "COINSCOPE_API_KEY";

/// Environment variable overriding the stored tier.
pub const TIER_ENV: &str = "COINSCOPE_TIER";

const CREDENTIALS_FILE: &str = "credentials.json";

/// Errors that can occur during credential storage operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create a directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to delete a file.
    #[error("Failed to delete file '{path}': {source}")]
    DeleteFile {
        /// The path that could not be deleted.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse JSON.
    #[error("Failed to parse credentials file '{path}': {source}")]
    ParseJson {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Failed to serialize JSON.
    #[error("Failed to serialize credentials: {0}")]
    SerializeJson(#[from] serde_json::Error),

    /// An environment override named an unknown tier.
    #[error("Invalid {TIER_ENV}: {0}")]
    InvalidTier(#[from] TierParseError),
}

/// Result type for credential store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Reads and writes the credentials file.
///
/// Credentials are stored as JSON in `<config dir>/credentials.json`.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    /// Directory holding the credentials file.
    base_path: PathBuf,
}

impl CredentialStore {
    /// Creates a store rooted at the given directory.
    ///
    /// Creates the directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_path: PathBuf) -> Result<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| StoreError::CreateDir {
                path: base_path.clone(),
                source: e,
            })?;
        }
        Ok(Self { base_path })
    }

    /// Returns the default directory for coinscope configuration.
    ///
    /// Uses the `directories` crate to find the appropriate location:
    /// - Linux: `~/.config/coinscope/`
    /// - macOS: `~/Library/Application Support/coinscope/`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\coinscope\config\`
    ///
    /// Falls back to `~/.coinscope/` if the platform-specific location
    /// cannot be determined.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "coinscope").map_or_else(dirs_fallback, |proj_dirs| {
            proj_dirs.config_dir().to_path_buf()
        })
    }

    /// Creates a store at the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn with_default_path() -> Result<Self> {
        Self::new(Self::default_path())
    }

    /// Returns the directory holding the credentials file.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the path to the credentials file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.base_path.join(CREDENTIALS_FILE)
    }

    /// Loads stored credentials.
    ///
    /// Returns anonymous demo-tier credentials if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Credentials> {
        let path = self.path();
        if !path.exists() {
            debug!(path = %path.display(), "no stored credentials");
            return Ok(Credentials::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| StoreError::ReadFile {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| StoreError::ParseJson { path, source: e })
    }

    /// Loads stored credentials and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or an override names an unknown tier.
    pub fn load_with_env(&self) -> Result<Credentials> {
        let stored = self.load()?;
        apply_overrides(stored, |name| std::env::var(name).ok())
    }

    /// Saves credentials, replacing any stored ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be serialized or written.
    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        let path = self.path();
        let json = serde_json::to_string_pretty(credentials)?;

        fs::write(&path, json).map_err(|e| StoreError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        restrict_permissions(&path)?;
        debug!(path = %path.display(), tier = %credentials.tier, "saved credentials");
        Ok(())
    }

    /// Deletes stored credentials.
    ///
    /// Returns `true` if a credentials file was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be deleted.
    pub fn clear(&self) -> Result<bool> {
        let path = self.path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|e| StoreError::DeleteFile { path, source: e })?;
        Ok(true)
    }
}

/// Applies `COINSCOPE_API_KEY` and `COINSCOPE_TIER` from `lookup` on top of
/// stored credentials. Empty values are ignored.
///
/// # Errors
///
/// Returns [`StoreError::InvalidTier`] if the tier override is unknown.
pub(crate) fn apply_overrides(
    mut credentials: Credentials,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Credentials> {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty(API_KEY_ENV) {
        credentials.api_key = Some(key.trim().to_string());
    }
    if let Some(tier) = non_empty(TIER_ENV) {
        credentials.tier = tier.parse::<Tier>()?;
    }
    Ok(credentials)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| {
        StoreError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// Fallback path when platform directories cannot be determined.
fn dirs_fallback() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".coinscope")
}
