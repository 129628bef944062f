//! OCR Routes
//!
//! Endpoints:
//! - GET /api/v1/ocr/providers - OCR providers that are reachable right now

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::ocr::OcrProvider;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OcrProvidersResponse {
    pub providers: Vec<OcrProvider>,
    pub language: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/providers", get(list_providers))
}

async fn list_providers(State(state): State<AppState>) -> Json<OcrProvidersResponse> {
    let ocr = state.extractor().ocr();

    Json(OcrProvidersResponse {
        providers: ocr.available_providers().await,
        language: ocr.default_language().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;
    use serde_json::Value;

    use crate::ocr::MockProvider;
    use crate::pdf::MockPdfEngine;
    use crate::routes::{router, testing};
    use crate::transport::MockTransport;

    #[tokio::test]
    async fn test_list_providers() {
        let state = testing::state_with(
            MockPdfEngine::new(vec![]),
            Arc::new(MockProvider::new(vec![])),
            Arc::new(MockTransport::new(vec![])),
        );
        let server = TestServer::new(router(state)).unwrap();

        let body: Value = server.get("/api/v1/ocr/providers").await.json();

        assert_eq!(body["providers"], serde_json::json!(["tesseract"]));
        assert_eq!(body["language"], "eng");
    }
}
