use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelId {
    pub name: String,       // logical name, e.g. "3garbage_best"
    pub onnx_path: String,  // filesystem path
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoloParams {
    pub input_size: u32,        // 640 typical
    pub conf_threshold: f32,    // 0..1
    pub iou_threshold: f32,     // 0..1
    pub max_detections: usize,  // e.g. 300
}

impl YoloParams {
    /// Copia con otro umbral de confianza, validado en [0, 1].
    pub fn with_conf_threshold(&self, conf: f32) -> DomainResult<Self> {
        if !(0.0..=1.0).contains(&conf) {
            return Err(DomainError::InvalidInput(format!(
                "conf debe estar entre 0 y 1, recibido {conf}"
            )));
        }
        Ok(Self { conf_threshold: conf, ..self.clone() })
    }
}

impl Default for YoloParams {
    fn default() -> Self {
        Self {
            input_size: 640,
            conf_threshold: 0.25,
            iou_threshold: 0.7,
            max_detections: 300,
        }
    }
}
