use serde::{Deserialize, Serialize};

use crate::domain::detection::Detection;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictQuery {
    /// Umbral de confianza opcional; si falta se usa el configurado.
    pub conf: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub detections: Vec<Detection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse<T: Serialize> {
    pub message: String,
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
