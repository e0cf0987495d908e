use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::application::ports::UploadStagingPort;
use crate::domain::errors::{DomainError, DomainResult};

const DEFAULT_EXT: &str = "jpg";

/// Directorio donde se guardan las imágenes subidas antes de la inferencia.
pub struct DirUploadStaging {
    dir: PathBuf,
}

impl DirUploadStaging {
    pub async fn new(dir: impl Into<PathBuf>) -> DomainResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }
}

/// Extensión del nombre original si es alfanumérica; si no, `jpg`.
fn extension_of(original_name: Option<&str>) -> String {
    original_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 5 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_EXT.to_string())
}

#[async_trait]
impl UploadStagingPort for DirUploadStaging {
    async fn stage(&self, bytes: &[u8], original_name: Option<&str>) -> DomainResult<PathBuf> {
        let path = self
            .dir
            .join(format!("{}.{}", Uuid::new_v4(), extension_of(original_name)));
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            DomainError::Storage(format!("no se pudo guardar la subida en {}: {e}", path.display()))
        })?;
        Ok(path)
    }

    async fn discard(&self, path: &Path) -> DomainResult<()> {
        tokio::fs::remove_file(path).await?;
        Ok(())
    }
}
