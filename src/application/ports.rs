use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::domain::{
    detection::DetectionFrame,
    errors::DomainResult,
    model::YoloParams,
    record::{RecordFields, StoredRecord},
};

#[async_trait]
pub trait DetectorPort: Send + Sync {
    /// Un frame por imagen procesada.
    async fn detect(&self, image: &Path, params: &YoloParams) -> DomainResult<Vec<DetectionFrame>>;
}

#[async_trait]
pub trait UploadStagingPort: Send + Sync {
    /// Guarda la subida con un nombre único y devuelve la ruta.
    async fn stage(&self, bytes: &[u8], original_name: Option<&str>) -> DomainResult<PathBuf>;
    async fn discard(&self, path: &Path) -> DomainResult<()>;
}

/// Colección de registros persistidos. Sólo lectura completa y añadido al final;
/// no hay actualización ni borrado.
#[async_trait]
pub trait RecordStorePort: Send + Sync {
    /// Registros tal y como están guardados; pueden venir de otras herramientas
    /// y no se validan.
    async fn load_all(&self) -> DomainResult<Vec<Value>>;
    /// Lee, asigna `id = len + 1`, añade y reescribe la colección entera.
    async fn append(&self, fields: RecordFields, detected_at: NaiveDateTime) -> DomainResult<StoredRecord>;
}
