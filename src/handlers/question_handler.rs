use std::sync::Arc;

use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpRequest, HttpResponse};
use futures::StreamExt;

use crate::{
    app_state::AppState,
    errors::{AppError, AppResult},
    middleware::get_request_id,
    models::{
        domain::ExamRequest,
        dto::{request::GenerateQuestionsRequestDto, response::GenerateQuestionsResponseDto},
    },
    services::pdf_service::{extract_pdf_text, PdfUpload},
};

const PDF_FIELD: &str = "pdf_file";

pub async fn generate_questions_json(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    body: web::Json<GenerateQuestionsRequestDto>,
) -> Result<HttpResponse, AppError> {
    let request = ExamRequest::try_from(body.into_inner())?;
    respond(&req, &state, request).await
}

pub async fn generate_questions_multipart(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let (mut dto, upload) = read_form(payload, state.config.max_upload_bytes).await?;
    dto.ensure_required()?;

    // A PDF, when sent, replaces any typed text as context.
    if let Some(upload) = &upload {
        upload.ensure_present()?;
        dto.text = None;
    }

    let mut request = ExamRequest::try_from(dto)?;
    if let Some(upload) = upload {
        let text = extract_pdf_text(upload).await?;
        request = request.with_context(text);
    }

    respond(&req, &state, request).await
}

async fn respond(
    req: &HttpRequest,
    state: &AppState,
    request: ExamRequest,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(req).unwrap_or_default();
    log::info!(
        "[{}] Generating {} {} question(s) for '{}' ({})",
        request_id,
        request.num_questions,
        request.question_type,
        request.subject,
        request.level
    );

    let questions = state.question_service.generate_exam(&request).await?;

    log::info!("[{}] Generated {} question(s)", request_id, questions.len());
    Ok(HttpResponse::Ok().json(GenerateQuestionsResponseDto::new(request, questions)))
}

/// Collects the text fields and the optional `pdf_file` part.
async fn read_form(
    mut payload: Multipart,
    max_bytes: usize,
) -> AppResult<(GenerateQuestionsRequestDto, Option<PdfUpload>)> {
    let mut dto = GenerateQuestionsRequestDto::default();
    let mut upload = None;

    while let Some(field) = payload.next().await {
        let field = field?;
        let name = field.name().unwrap_or_default().to_string();

        if name == PDF_FIELD {
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .unwrap_or_default()
                .to_string();
            let bytes = read_field(field, max_bytes).await?;
            upload = Some(PdfUpload { filename, bytes });
        } else {
            let bytes = read_field(field, max_bytes).await?;
            let value = String::from_utf8(bytes).map_err(|_| {
                AppError::InputError(format!("Field '{}' harus berupa teks UTF-8.", name))
            })?;
            dto.set_form_field(&name, value)?;
        }
    }

    Ok((dto, upload))
}

async fn read_field(mut field: Field, max_bytes: usize) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if bytes.len() + chunk.len() > max_bytes {
            return Err(AppError::InputError(format!(
                "Ukuran unggahan melebihi batas {} byte.",
                max_bytes
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
