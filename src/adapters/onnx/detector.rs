use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::onnx::yolo_engine::OnnxYoloEngine;
use crate::application::ports::DetectorPort;
use crate::domain::{
    detection::DetectionFrame,
    errors::{DomainError, DomainResult},
    model::YoloParams,
};

/// Adaptador del motor ONNX al puerto de detección.
/// La sesión es única; las peticiones simultáneas esperan en el mutex.
pub struct OnnxDetector {
    engine: Arc<Mutex<OnnxYoloEngine>>,
}

impl OnnxDetector {
    pub fn new(engine: OnnxYoloEngine) -> Self {
        Self { engine: Arc::new(Mutex::new(engine)) }
    }
}

#[async_trait]
impl DetectorPort for OnnxDetector {
    async fn detect(&self, image: &Path, params: &YoloParams) -> DomainResult<Vec<DetectionFrame>> {
        let engine = self.engine.clone();
        let image_path = image.to_path_buf();
        let params = params.clone();

        // Decodificar e inferir bloquea; fuera del runtime async.
        tokio::task::spawn_blocking(move || -> DomainResult<Vec<DetectionFrame>> {
            let rgb = image::open(&image_path)
                .map_err(|e| DomainError::Storage(format!("imagen ilegible {}: {e}", image_path.display())))?
                .to_rgb8();
            let mut eng = engine
                .lock()
                .map_err(|_| DomainError::OperationFailed("Lock del motor fallido".into()))?;
            let boxes = eng
                .infer(&rgb, &params)
                .map_err(|e| DomainError::Inference(format!("{e:#}")))?;
            Ok(vec![DetectionFrame { boxes }])
        })
        .await
        .map_err(|e| DomainError::OperationFailed(format!("tarea de inferencia abortada: {e}")))?
    }
}
