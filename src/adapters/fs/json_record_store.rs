use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::info;

use crate::application::ports::RecordStorePort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::record::{RecordFields, StoredRecord};

/// Almacén en un único fichero JSON con un array de registros.
///
/// Cada `append` lee el fichero entero, añade y lo reescribe. El mutex sólo
/// serializa escrituras dentro de este proceso; otro proceso sobre el mismo
/// fichero puede producir ids duplicados o perder registros.
pub struct JsonFileRecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileRecordStore {
    /// Crea el fichero con `[]` si no existe.
    pub async fn open(path: impl Into<PathBuf>) -> DomainResult<Self> {
        let path = path.into();
        if !tokio::fs::try_exists(&path).await? {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, b"[]").await?;
            info!("Creado almacén vacío en {}", path.display());
        }
        Ok(Self { path, write_lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> DomainResult<Vec<Value>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            DomainError::Storage(format!("no se pudo leer {}: {e}", self.path.display()))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_records(&self, records: &[Value]) -> DomainResult<()> {
        // serde_json deja el UTF-8 literal, sin escapes \uXXXX.
        let json = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            DomainError::Storage(format!("no se pudo escribir {}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl RecordStorePort for JsonFileRecordStore {
    async fn load_all(&self) -> DomainResult<Vec<Value>> {
        self.read_records().await
    }

    async fn append(&self, fields: RecordFields, detected_at: NaiveDateTime) -> DomainResult<StoredRecord> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_records().await?;
        let record = StoredRecord {
            fields,
            detected_at,
            id: records.len() as u64 + 1,
        };
        records.push(serde_json::to_value(&record)?);
        self.write_records(&records).await?;
        Ok(record)
    }
}
