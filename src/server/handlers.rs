use super::types::{ApiError, ApiResponse, ConvertParams};
use crate::convert::{ConversionRequest, Converted, Dispatcher, TargetFormat};
use axum::{
    Json,
    extract::{
        Multipart, Query, State,
        multipart::MultipartRejection,
        rejection::QueryRejection,
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::{path::Path, sync::Arc};
use tracing::{error, info, warn};
use uuid::Uuid;

const FILE_FIELD: &str = "file";
const DEFAULT_STEM: &str = "converted_file";
const NO_FILE: &str = "No file uploaded";

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

pub async fn health() -> Json<ApiResponse> {
    Json(ApiResponse::success("ok", None))
}

pub async fn convert(
    State(state): State<AppState>,
    params: Result<Query<ConvertParams>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();

    let Query(params) = params.map_err(|e| {
        warn!(%request_id, "Rejected query string: {}", e);
        ApiError::new(StatusCode::BAD_REQUEST, e.body_text())
    })?;
    info!(%request_id, "Received conversion request, format={:?}", params.format);

    // Not multipart at all: answered like a form without a file.
    let multipart = multipart.map_err(|e| {
        warn!(%request_id, "Rejected upload: {}", e);
        ApiError::new(StatusCode::BAD_REQUEST, NO_FILE)
    })?;

    let (filename, data) = read_upload(multipart).await.map_err(|e| {
        warn!(%request_id, "Rejected upload: {}", e.body.message);
        e
    })?;

    let request = ConversionRequest {
        data,
        filename: filename.clone(),
        format: params.format,
    };

    match state.dispatcher.convert(request).await {
        Ok(converted) => {
            info!(
                %request_id,
                "Conversion succeeded via {}: {} bytes",
                converted.route,
                converted.payload.len()
            );
            Ok(attachment(converted, filename.as_deref()))
        }
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                error!(%request_id, "Conversion failed: {}", e);
            } else {
                warn!(%request_id, "Conversion rejected: {}", e);
            }
            Err(ApiError::new(status, e.to_string()))
        }
    }
}

/// Reads the `file` field. Other fields are skipped.
async fn read_upload(mut multipart: Multipart) -> Result<(Option<String>, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), format!("Unable to parse the file: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), format!("Unable to read the file: {}", e)))?;

        return Ok((filename, data.to_vec()));
    }

    Err(ApiError::new(StatusCode::BAD_REQUEST, NO_FILE))
}

fn attachment(converted: Converted, filename: Option<&str>) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        download_name(filename, converted.format)
    );
    let content_type = converted.format.content_type();

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        converted.payload.into_bytes(),
    )
        .into_response()
}

/// `<upload stem>.<target extension>`, restricted to header-safe characters.
pub fn download_name(filename: Option<&str>, format: TargetFormat) -> String {
    let stem: String = filename
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .map(|stem| {
            stem.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                        c
                    } else {
                        '_'
                    }
                })
                .collect::<String>()
        })
        .filter(|stem| !stem.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_STEM.to_string());

    format!("{}.{}", stem, format.extension())
}
