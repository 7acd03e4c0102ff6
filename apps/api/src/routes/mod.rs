pub mod download;
pub mod health;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::records::handlers as records;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stored inputs
        .route("/api/v1/candidates", post(records::handle_create_candidate))
        .route("/api/v1/resumes", post(records::handle_create_resume))
        .route("/api/v1/resumes/upload", post(records::handle_upload_resume))
        .route("/api/v1/jobs", post(records::handle_create_job))
        // Analysis
        .route("/api/v1/analyze", post(analysis::handle_analyze_stored))
        .route("/api/v1/analyze/text", post(analysis::handle_analyze_text))
        .route("/api/v1/analyze/upload", post(analysis::handle_analyze_upload))
        // Export
        .route("/api/v1/download/txt", post(download::handle_download_txt))
        .route("/api/v1/download/docx", post(download::handle_download_docx))
        .route("/api/v1/download/pdf", post(download::handle_download_pdf))
        .layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::analysis::pipeline::tests::{advice, rewritten, similarity_80, Fake, Rewritten};
    use crate::analysis::pipeline::AnalysisPipeline;
    use crate::analysis::providers::ServiceError;
    use crate::config::Config;

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/resume_match_test".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            hf_api_url: "http://127.0.0.1:9".to_string(),
            hf_token: None,
            embedding_model: "test-model".to_string(),
            groq_api_url: "http://127.0.0.1:9".to_string(),
            groq_api_key: None,
            analysis_timeout_secs: 5,
            missing_keyword_penalty: 1.5,
        }
    }

    /// Router over fake model services. The pool is lazy, so routes that never
    /// touch the database work without Postgres.
    fn test_app(pipeline: AnalysisPipeline) -> Router {
        let config = test_config();
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        build_router(AppState {
            db,
            config,
            pipeline,
        })
    }

    fn happy_pipeline() -> AnalysisPipeline {
        AnalysisPipeline::new(
            Fake::new(similarity_80),
            Fake::new(advice),
            Fake::new(rewritten),
        )
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app(happy_pipeline())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_analyze_text() {
        let request = post_json(
            "/api/v1/analyze/text",
            json!({
                "resume_text": "Experienced in Python and SQL",
                "job_description": "Looking for Python, SQL, and Tableau skills",
                "job_id": 3
            }),
        );
        let response = test_app(happy_pipeline()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["jobId"], 3);
        let fit = &json["jobFitAnalysis"];
        assert_eq!(fit["missingKeywords"], json!(["looking", "skills", "tableau"]));
        assert_eq!(fit["matchScore"], 75.5);
        assert_eq!(fit["semanticSimilarity"], 80.0);
        assert_eq!(fit["recruiterSummary"], "SUMMARY\n  Data analyst");
    }

    #[tokio::test]
    async fn test_analyze_text_rejects_empty_resume() {
        let similarity = Fake::new(similarity_80);
        let pipeline = AnalysisPipeline::new(
            similarity.clone(),
            Fake::new(advice),
            Fake::new(rewritten),
        );
        let request = post_json(
            "/api/v1/analyze/text",
            json!({ "resume_text": "   ", "job_description": "Python" }),
        );
        let response = test_app(pipeline).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(similarity.calls(), 0);
    }

    #[tokio::test]
    async fn test_rewrite_auth_failure_is_bad_gateway() {
        let pipeline = AnalysisPipeline::new(
            Fake::new(similarity_80),
            Fake::new(advice),
            Fake::<Rewritten>::new(|| {
                Err(ServiceError::Authentication {
                    service: "groq",
                    status: 401,
                    message: "invalid api key".to_string(),
                })
            }),
        );
        let request = post_json(
            "/api/v1/analyze/text",
            json!({ "resume_text": "Python", "job_description": "Python" }),
        );
        let response = test_app(pipeline).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"]["code"], "UPSTREAM_AUTH_ERROR");
    }

    #[tokio::test]
    async fn test_download_txt() {
        let request = post_json("/api/v1/download/txt", json!({ "text": "SUMMARY\n  Analyst" }));
        let response = test_app(happy_pipeline()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Optimized_Resume.txt\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"SUMMARY\n  Analyst");
    }

    #[tokio::test]
    async fn test_download_pdf() {
        let request = post_json("/api/v1/download/pdf", json!({ "text": "SUMMARY\n  Analyst" }));
        let response = test_app(happy_pipeline()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Optimized_Resume.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..4], b"%PDF");
    }

    #[tokio::test]
    async fn test_download_empty_text_gives_empty_file() {
        let request = post_json("/api/v1/download/txt", json!({ "text": "" }));
        let response = test_app(happy_pipeline()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());

        let request = post_json("/api/v1/download/docx", json!({}));
        let response = test_app(happy_pipeline()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = test_app(happy_pipeline())
            .oneshot(Request::get("/api/v1/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
