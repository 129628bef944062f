//! Document Routes
//!
//! Endpoints:
//! - POST /api/v1/sessions/:id/document - Upload a document (multipart `file`)
//! - POST /api/v1/sessions/:id/document/password - Retry a locked PDF

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::document::Document;
use crate::error::{AppError, Result};
use crate::session::UploadOutcome;
use crate::state::AppState;

/// Room for multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

const GENERIC_MIME: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    pub password: String,
}

pub fn router(max_upload: usize) -> Router<AppState> {
    Router::new()
        .route("/:id/document", post(upload_document))
        .route("/:id/document/password", post(submit_password))
        .layer(DefaultBodyLimit::max(max_upload.saturating_add(MULTIPART_OVERHEAD)))
}

/// Upload a document and extract it
async fn upload_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<UploadOutcome>> {
    let document = read_document(multipart, state.config().max_upload_bytes()).await?;

    let outcome = state
        .sessions()
        .upload(id, document, state.extractor())
        .await?;

    Ok(Json(outcome))
}

/// Retry the pending document with a password
async fn submit_password(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PasswordRequest>,
) -> Result<Json<UploadOutcome>> {
    let outcome = state
        .sessions()
        .submit_password(id, &request.password, state.extractor())
        .await?;

    Ok(Json(outcome))
}

/// Read the `file` part into a document
async fn read_document(mut multipart: Multipart, max_bytes: usize) -> Result<Document> {
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        let file_name = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());

        tracing::debug!(
            "Received field: name='{}', filename={:?}, content_type={:?}",
            name,
            file_name,
            content_type
        );

        if name != "file" {
            continue;
        }

        let file_name = file_name.unwrap_or_else(|| "upload".to_string());
        let mime_type = resolve_mime(content_type.as_deref(), &file_name);

        let data = field.bytes().await?;
        if data.len() > max_bytes {
            return Err(AppError::PayloadTooLarge {
                size: data.len(),
                max: max_bytes,
            });
        }

        tracing::debug!("Read {} bytes of {:?} ({})", data.len(), file_name, mime_type);

        return Ok(Document::new(file_name, mime_type, data.to_vec()));
    }

    Err(AppError::BadRequest("Missing 'file' field".to_string()))
}

/// Declared content type, or a guess from the file name when it is missing
/// or generic
fn resolve_mime(declared: Option<&str>, file_name: &str) -> String {
    match declared.map(str::trim) {
        Some(mime) if !mime.is_empty() && !mime.eq_ignore_ascii_case(GENERIC_MIME) => mime.to_string(),
        _ => mime_guess::from_path(file_name)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::document::DOCX_MIME;
    use crate::ocr::MockProvider;
    use crate::pdf::{fixtures::build_pdf, MockPage, MockPdfEngine, MupdfEngine, PdfEngine};
    use crate::routes::{router, testing};
    use crate::transport::MockTransport;

    async fn app_with_session(engine: impl PdfEngine + 'static, ocr: Vec<std::result::Result<String, String>>) -> (Router, Uuid) {
        let state = testing::state_with(
            engine,
            Arc::new(MockProvider::new(ocr)),
            Arc::new(MockTransport::new(vec![])),
        );
        let id = state.sessions().create().await;
        (router(state), id)
    }

    fn password_request(id: Uuid, password: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/sessions/{}/document/password", id))
            .header("content-type", "application/json")
            .body(Body::from(json!({ "password": password }).to_string()))
            .unwrap()
    }

    #[test]
    fn test_resolve_mime() {
        assert_eq!(resolve_mime(Some("text/plain"), "a.pdf"), "text/plain");
        assert_eq!(resolve_mime(None, "letter.docx"), DOCX_MIME);
        assert_eq!(resolve_mime(Some("application/octet-stream"), "report.pdf"), "application/pdf");
        assert_eq!(resolve_mime(Some(""), "notes.txt"), "text/plain");
        assert_eq!(resolve_mime(None, "no-extension"), "");
    }

    #[tokio::test]
    async fn test_upload_pdf_loads_context() {
        let (app, id) = app_with_session(MupdfEngine::new(), vec![]).await;
        let pdf = build_pdf(&["Alpha", "Beta", "Gamma"]);

        let response = app
            .oneshot(testing::multipart_upload(
                &format!("/api/v1/sessions/{}/document", id),
                "report.pdf",
                Some("application/pdf"),
                &pdf,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = testing::json_body(response).await;
        assert_eq!(body["state"], "contextLoaded");
        assert_eq!(body["pageCount"], 3);
        assert_eq!(body["characterCount"], 17);
    }

    #[tokio::test]
    async fn test_upload_without_content_type_uses_file_name() {
        let (app, id) = app_with_session(MockPdfEngine::new(vec![]), vec![]).await;

        let response = app
            .oneshot(testing::multipart_upload(
                &format!("/api/v1/sessions/{}/document", id),
                "notes.txt",
                None,
                b"plain words",
            ))
            .await
            .unwrap();

        let body = testing::json_body(response).await;
        assert_eq!(body["state"], "contextLoaded");
        assert_eq!(body["fileName"], "notes.txt");
    }

    #[tokio::test]
    async fn test_locked_pdf_password_flow() {
        let engine = MockPdfEngine::new(vec![MockPage::Scanned(vec![7])]).with_password("secret");
        let (app, id) = app_with_session(engine, vec![Ok("OCR page".into())]).await;

        let response = app
            .clone()
            .oneshot(testing::multipart_upload(
                &format!("/api/v1/sessions/{}/document", id),
                "scan.pdf",
                Some("application/pdf"),
                b"%PDF",
            ))
            .await
            .unwrap();
        let body = testing::json_body(response).await;
        assert_eq!(body["state"], "passwordPrompted");
        assert!(body["message"].as_str().unwrap().starts_with("🔒"));

        let body = testing::json_body(app.clone().oneshot(password_request(id, "nope")).await.unwrap()).await;
        assert_eq!(body["state"], "passwordPrompted");
        assert_eq!(body["message"], "❌ File processing error: Password required for this PDF");

        let body = testing::json_body(app.oneshot(password_request(id, "secret")).await.unwrap()).await;
        assert_eq!(body["state"], "contextLoaded");
        assert_eq!(body["characterCount"], 9);
    }

    #[tokio::test]
    async fn test_password_errors() {
        let (app, id) = app_with_session(MockPdfEngine::new(vec![]), vec![]).await;

        let response = app.clone().oneshot(password_request(id, "   ")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.oneshot(password_request(id, "secret")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body: Value = testing::json_body(response).await;
        assert_eq!(body["error"], "no_pending_document");
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_reported_not_rejected() {
        let (app, id) = app_with_session(MockPdfEngine::new(vec![]), vec![]).await;

        let response = app
            .oneshot(testing::multipart_upload(
                &format!("/api/v1/sessions/{}/document", id),
                "image.png",
                Some("image/png"),
                &[0x89, b'P', b'N', b'G'],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = testing::json_body(response).await;
        assert_eq!(body["state"], "failed");
        assert_eq!(
            body["message"],
            "❌ File processing error: Unsupported file type. Please upload PDF, DOCX, or TXT."
        );
    }

    #[tokio::test]
    async fn test_upload_to_unknown_session() {
        let (app, _) = app_with_session(MockPdfEngine::new(vec![]), vec![]).await;

        let response = app
            .oneshot(testing::multipart_upload(
                &format!("/api/v1/sessions/{}/document", Uuid::new_v4()),
                "notes.txt",
                Some("text/plain"),
                b"hi",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_file_field() {
        let (app, id) = app_with_session(MockPdfEngine::new(vec![]), vec![]).await;
        let boundary = "b";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{b}--\r\n",
            b = boundary
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/sessions/{}/document", id))
                    .header("content-type", format!("multipart/form-data; boundary={}", boundary))
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
