/**
 * Token Store
 *
 * Persists the bearer token between runs in a single file: an explicit
 * path, or `<config dir>/blogify/token` from `dirs`.
 */

use std::path::{Path, PathBuf};

use crate::client::error::{ClientError, ClientResult};

const APP_DIR: &str = "blogify";
const TOKEN_FILE: &str = "token";

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store at an explicit file path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform configuration directory
    pub fn in_config_dir() -> ClientResult<Self> {
        let mut path = dirs::config_dir().ok_or(ClientError::NoConfigDir)?;
        path.push(APP_DIR);
        path.push(TOKEN_FILE);
        Ok(Self { path })
    }

    /// Explicit path if given, config directory otherwise
    pub fn resolve(explicit: Option<&Path>) -> ClientResult<Self> {
        match explicit {
            Some(path) => Ok(Self::at(path)),
            None => Self::in_config_dir(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored token, `None` if there is no (non-empty) token file
    pub async fn load(&self) -> ClientResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, token: &str) -> ClientResult<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&self.path, token).await?;
        tracing::debug!("Saved token to {}", self.path.display());
        Ok(())
    }

    /// Remove the token file; a missing file is not an error
    pub async fn clear(&self) -> ClientResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
