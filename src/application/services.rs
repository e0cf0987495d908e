use chrono::SubsecRound;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    application::ports::{DetectorPort, RecordStorePort, UploadStagingPort},
    domain::{
        detection::{normalize_frames, Detection},
        errors::{DomainError, DomainResult},
        model::YoloParams,
        record::{SaveRequest, StoredRecord},
        share::{garbage_percent, GarbagePercent},
    },
};

/// Caso de uso de `/predict`: guardar la imagen, pasarla por el modelo y
/// normalizar las cajas.
#[derive(Clone)]
pub struct DetectionService {
    detector: Arc<dyn DetectorPort>,
    uploads: Arc<dyn UploadStagingPort>,
    params: YoloParams,
    keep_uploads: bool,
}

impl DetectionService {
    pub fn new(
        detector: Arc<dyn DetectorPort>,
        uploads: Arc<dyn UploadStagingPort>,
        params: YoloParams,
        keep_uploads: bool,
    ) -> Self {
        Self { detector, uploads, params, keep_uploads }
    }

    pub async fn predict(
        &self,
        bytes: &[u8],
        original_name: Option<&str>,
        conf: Option<f32>,
    ) -> DomainResult<Vec<Detection>> {
        if bytes.is_empty() {
            return Err(DomainError::InvalidInput("archivo vacío".into()));
        }
        let params = match conf {
            Some(c) => self.params.with_conf_threshold(c)?,
            None => self.params.clone(),
        };

        let path = self.uploads.stage(bytes, original_name).await?;
        let result = self.detector.detect(&path, &params).await;

        if !self.keep_uploads {
            if let Err(e) = self.uploads.discard(&path).await {
                warn!("No se pudo borrar {}: {}", path.display(), e);
            }
        }

        let detections = normalize_frames(&result?);
        info!("{} detecciones (conf >= {})", detections.len(), params.conf_threshold);
        Ok(detections)
    }
}

/// Resultado de `/save`.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// `class_id == -1`: no se persiste y se devuelve el cuerpo original sin tocar.
    Unclassified(Value),
    Saved(StoredRecord),
}

/// Persistencia de resultados aceptados y cálculo de porcentajes.
#[derive(Clone)]
pub struct StorageService {
    store: Arc<dyn RecordStorePort>,
}

impl StorageService {
    pub fn new(store: Arc<dyn RecordStorePort>) -> Self {
        Self { store }
    }

    /// No deduplica: dos llamadas idénticas generan dos registros con ids distintos.
    pub async fn save(&self, request: SaveRequest) -> DomainResult<SaveOutcome> {
        if request.fields.is_unclassified() {
            warn!("Registro sin clasificar, no se guarda");
            return Ok(SaveOutcome::Unclassified(request.original));
        }

        // Microsegundos, como el isoformat() del cliente.
        let detected_at = chrono::Local::now().naive_local().trunc_subsecs(6);
        let record = self.store.append(request.fields.without_reserved(), detected_at).await?;
        info!("Registro guardado id={} class_id={}", record.id, record.fields.class_id);
        Ok(SaveOutcome::Saved(record))
    }

    pub async fn garbage_percent(&self) -> DomainResult<GarbagePercent> {
        let records = self.store.load_all().await?;
        Ok(garbage_percent(&records))
    }
}
