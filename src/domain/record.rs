use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::detection::UNCLASSIFIED;
use super::errors::{DomainError, DomainResult};

/// Claves que asigna el almacén; nunca se aceptan del cliente.
const RESERVED_KEYS: [&str; 2] = ["id", "detected_at"];

/// Cuerpo de `/save`: una detección con `class_id` obligatorio.
/// El resto de claves que envíe el cliente se conservan tal cual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFields {
    pub class_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecordFields {
    pub fn is_unclassified(&self) -> bool {
        self.class_id == UNCLASSIFIED
    }

    /// Quita `id` y `detected_at` si el cliente los mandó.
    pub fn without_reserved(mut self) -> Self {
        for key in RESERVED_KEYS {
            self.extra.remove(key);
        }
        self
    }
}

/// Petición de `/save`: los campos validados junto al cuerpo original,
/// que es lo que se devuelve intacto cuando no hay clasificación.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub fields: RecordFields,
    pub original: Value,
}

impl TryFrom<Value> for SaveRequest {
    type Error = DomainError;

    fn try_from(original: Value) -> DomainResult<Self> {
        let fields = serde_json::from_value::<RecordFields>(original.clone())
            .map_err(|e| DomainError::InvalidInput(format!("registro inválido: {e}")))?;
        Ok(Self { fields, original })
    }
}

/// `class_id` de un registro tal y como está en disco; `None` si falta o no es entero.
pub fn stored_class_id(record: &Value) -> Option<i64> {
    record.get("class_id").and_then(Value::as_i64)
}

/// Registro persistido: la detección más el id secuencial y la marca de tiempo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(flatten)]
    pub fields: RecordFields,
    pub detected_at: NaiveDateTime,
    pub id: u64,
}
