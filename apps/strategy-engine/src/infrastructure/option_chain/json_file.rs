//! Option chain backed by a JSON file.
//!
//! The file is a JSON array of contracts, read once at startup. A file that
//! cannot be read or parsed leaves the adapter serving
//! [`OptionChainError`] so the HTTP layer can answer 503 while the
//! strategy endpoints keep working.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::application::ports::{OptionChainError, OptionChainPort, OptionContract};

/// JSON file option chain.
#[derive(Debug)]
pub struct JsonFileOptionChain {
    path: PathBuf,
    contracts: Result<Vec<OptionContract>, OptionChainError>,
}

impl JsonFileOptionChain {
    /// Read and parse the chain at `path`.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the file cannot be read, `Malformed` if it does not
    /// parse as a contract array.
    pub async fn try_load(path: impl AsRef<Path>) -> Result<Self, OptionChainError> {
        let path = path.as_ref().to_path_buf();
        let contracts = read_contracts(&path).await?;
        tracing::info!(path = %path.display(), contracts = contracts.len(), "Option chain loaded");
        Ok(Self {
            path,
            contracts: Ok(contracts),
        })
    }

    /// Like [`Self::try_load`], but a failure is logged and kept as the
    /// adapter's answer instead of aborting startup.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match Self::try_load(&path).await {
            Ok(chain) => chain,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "Option chain unavailable");
                Self {
                    path,
                    contracts: Err(error),
                }
            }
        }
    }

    /// Source path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the chain loaded successfully.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.contracts.is_ok()
    }
}

async fn read_contracts(path: &Path) -> Result<Vec<OptionContract>, OptionChainError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| OptionChainError::Unavailable {
            message: format!("{}: {e}", path.display()),
        })?;
    serde_json::from_str(&raw).map_err(|e| OptionChainError::Malformed {
        message: format!("{}: {e}", path.display()),
    })
}

#[async_trait]
impl OptionChainPort for JsonFileOptionChain {
    async fn list_instruments(&self) -> Result<Vec<OptionContract>, OptionChainError> {
        self.contracts.clone()
    }
}
