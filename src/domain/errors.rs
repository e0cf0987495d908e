use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),
    #[error("Error de almacenamiento: {0}")]
    Storage(String),
    #[error("Error de inferencia: {0}")]
    Inference(String),
    #[error("Error de operación: {0}")]
    OperationFailed(String),
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Storage(format!("JSON inválido: {e}"))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
