use serde::{Deserialize, Serialize};

/// Clase reservada para "sin clasificar".
pub const UNCLASSIFIED: i64 = -1;

/// Caja tal y como sale del modelo, en píxeles de la imagen original.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub score: f32,
    pub class_id: usize,
}

impl RawBox {
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    pub fn iou(&self, other: &RawBox) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - inter;
        if union <= 0.0 { 0.0 } else { inter / union }
    }
}

/// Resultado del modelo para una imagen.
#[derive(Debug, Clone, Default)]
pub struct DetectionFrame {
    pub boxes: Vec<RawBox>,
}

/// Detección normalizada que se devuelve al cliente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_id: i64,
    pub confidence: f64,
    pub bbox: [f64; 4],
}

impl From<&RawBox> for Detection {
    fn from(b: &RawBox) -> Self {
        Self {
            class_id: b.class_id as i64,
            confidence: round_to(f64::from(b.score), 3),
            bbox: [b.x1, b.y1, b.x2, b.y2].map(|v| round_to(f64::from(v), 2)),
        }
    }
}

/// Aplana todos los frames en una única lista de detecciones normalizadas.
pub fn normalize_frames(frames: &[DetectionFrame]) -> Vec<Detection> {
    frames
        .iter()
        .flat_map(|f| f.boxes.iter().map(Detection::from))
        .collect()
}

/// Redondeo a `decimals` cifras decimales (mitades lejos de cero).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
