use std::sync::Arc;
use crate::application::services::{DetectionService, StorageService};

/// Estado compartido del servicio de detección.
#[derive(Clone)]
pub struct DetectionState {
    /// Caso de uso de `/predict`.
    pub detection: Arc<DetectionService>,
}

/// Estado compartido del servicio de almacenamiento.
#[derive(Clone)]
pub struct StorageState {
    /// Guardado de registros y agregado de porcentajes.
    pub storage: Arc<StorageService>,
}
