use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::RawDocument;
use crate::models::NormalizedResume;
use crate::normalize::normalize;
use crate::render::{RenderedDocument, Renderer};
use crate::state::AppState;
use crate::store::RecordId;

/// Multipart field carrying the uploaded document.
pub const UPLOAD_FIELD: &str = "resume";

/// Field names follow the upload contract existing clients already read.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: RecordId,
    pub message: &'static str,
    #[serde(rename = "parsedData")]
    pub parsed_data: NormalizedResume,
}

/// POST /upload
///
/// Extract → normalize → save. Each stage runs only if the previous one
/// succeeded, so a failed normalization never writes to the store.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let document = read_upload(&mut multipart).await?.ok_or_else(|| {
        AppError::Validation(format!("No file was uploaded (expected field '{UPLOAD_FIELD}')"))
    })?;

    let text = state.extractor.extract(document).await?;
    let record = normalize(&text, state.llm.as_ref()).await?;
    let id = state.store.save(&record).await?;
    info!(%id, "Resume parsed and saved");

    Ok(Json(UploadResponse {
        id,
        message: "Resume parsed and saved successfully.",
        parsed_data: record,
    }))
}

/// Reads the first `resume` file field; other fields are drained and ignored.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<RawDocument>, AppError> {
    let mut document = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed multipart body", e))?
    {
        if field.name() != Some(UPLOAD_FIELD) || document.is_some() {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let declared_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Could not read upload", e))?;
        document = Some(RawDocument {
            bytes,
            declared_type,
            filename,
        });
    }
    Ok(document)
}

/// Keeps the body-limit rejection distinct from a malformed request.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    let detail = format!("{context}: {}", e.body_text());
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(detail)
    } else {
        AppError::Validation(detail)
    }
}

/// POST /render
///
/// Renders a caller-supplied record. The body must be JSON; a record with
/// wrongly typed fields fails with `RenderFailed`.
pub async fn handle_render(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Request body is not valid JSON: {e}")))?;

    let renderer = state.renderer.clone();
    let document = run_render(move || renderer.render_value(value)).await?;
    Ok(pdf_response(document))
}

/// GET /resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NormalizedResume>, AppError> {
    let record = state.store.load(parse_id(&id)?).await?;
    Ok(Json(record))
}

/// GET /resumes/:id/pdf
pub async fn handle_get_resume_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let record = state.store.load(parse_id(&id)?).await?;
    let renderer = state.renderer.clone();
    let document = run_render(move || renderer.render(&record)).await?;
    Ok(pdf_response(document))
}

fn parse_id(raw: &str) -> Result<RecordId, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("'{raw}' is not a valid resume id")))
}

/// Layout and encoding are CPU-bound; keep them off the async workers.
async fn run_render<F>(job: F) -> Result<RenderedDocument, AppError>
where
    F: FnOnce() -> Result<RenderedDocument, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| AppError::RenderFailed(format!("render task aborted: {e}")))?
}

fn pdf_response(document: RenderedDocument) -> Response {
    (
        [
            (header::CONTENT_TYPE, document.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.filename),
            ),
        ],
        document.bytes,
    )
        .into_response()
}
