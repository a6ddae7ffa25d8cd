use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, instrument};

/// Reads a JSON document, falling back to the default value when the file does not exist yet.
#[instrument]
pub async fn read_or_default<T>(path: &Path) -> Result<T, HistoryError>
where
    T: DeserializeOwned + Default,
{
    match fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content).map_err(|source| HistoryError::Json {
            source,
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("💾 No stored data yet, starting empty");
            Ok(T::default())
        }
        Err(source) => Err(HistoryError::Io {
            source,
            path: path.to_path_buf(),
        }),
    }
}

#[instrument(skip(value))]
pub async fn write<T: Serialize>(path: &Path, value: &T) -> Result<(), HistoryError> {
    let content = serde_json::to_string_pretty(value).map_err(|source| HistoryError::Json {
        source,
        path: path.to_path_buf(),
    })?;

    fs::write(path, content).await.map_err(|source| HistoryError::Io {
        source,
        path: path.to_path_buf(),
    })
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("unable to access '{}': {}", path.display(), source)]
    Io { source: io::Error, path: PathBuf },
    #[error("invalid data in '{}': {}", path.display(), source)]
    Json { source: serde_json::Error, path: PathBuf },
}
