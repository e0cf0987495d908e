use axum::{
    extract::{
        multipart::Multipart,
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::{
    error::ApiError,
    state::{DetectionState, StorageState},
};
use crate::application::dto::{MessageResponse, PredictQuery, PredictResponse, SaveResponse};
use crate::application::services::SaveOutcome;
use crate::domain::{errors::DomainError, record::SaveRequest, share::GarbagePercent};

pub const RUNNING_MESSAGE: &str = "ゴミ分類ストレージAPIは稼働中です";
pub const DETECT_RUNNING_MESSAGE: &str = "ゴミ分類検出APIは稼働中です";
pub const SAVED_MESSAGE: &str = "保存しました";
pub const UNCLASSIFIED_MESSAGE: &str = "分類できませんでした";

const UPLOAD_FIELD: &str = "file";

pub async fn predict(
    State(st): State<DetectionState>,
    query: Result<Query<PredictQuery>, QueryRejection>,
    mut multipart: Multipart,
) -> Result<Json<PredictResponse>, ApiError> {
    let Query(query) = query.map_err(|e| DomainError::InvalidInput(e.body_text()))?;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::InvalidInput(format!("multipart inválido: {e}")))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| DomainError::InvalidInput(format!("no se pudo leer la subida: {e}")))?;
            upload = Some((file_name, bytes));
            break;
        }
    }

    let Some((file_name, bytes)) = upload else {
        return Err(DomainError::InvalidInput(format!("falta el campo '{UPLOAD_FIELD}'")).into());
    };

    let detections = st
        .detection
        .predict(&bytes, file_name.as_deref(), query.conf)
        .await?;
    Ok(Json(PredictResponse { detections }))
}

pub async fn detection_root() -> Json<MessageResponse> {
    Json(MessageResponse { message: DETECT_RUNNING_MESSAGE.into() })
}

pub async fn storage_root() -> Json<MessageResponse> {
    Json(MessageResponse { message: RUNNING_MESSAGE.into() })
}

pub async fn save(
    State(st): State<StorageState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(|e| DomainError::InvalidInput(e.body_text()))?;
    let request = SaveRequest::try_from(body)?;

    let res = match st.storage.save(request).await? {
        SaveOutcome::Saved(record) => Json(SaveResponse {
            message: SAVED_MESSAGE.into(),
            data: record,
        })
        .into_response(),
        SaveOutcome::Unclassified(original) => Json(SaveResponse {
            message: UNCLASSIFIED_MESSAGE.into(),
            data: original,
        })
        .into_response(),
    };
    Ok(res)
}

pub async fn garbage_percent(State(st): State<StorageState>) -> Result<Json<GarbagePercent>, ApiError> {
    Ok(Json(st.storage.garbage_percent().await?))
}
