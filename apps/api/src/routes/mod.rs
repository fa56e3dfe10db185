pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::cv::handlers as cv;
use crate::ranking::handlers as ranking;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // CV API
        .route(
            "/api/v1/cvs/analyze",
            post(cv::handle_analyze).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/cvs", get(cv::handle_list_cvs))
        // Jobs & ranking API
        .route(
            "/api/v1/jobs",
            get(ranking::handle_list_jobs).post(ranking::handle_create_job),
        )
        .route("/api/v1/ranking", get(ranking::handle_ranking))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::cv::ingest::tests::ScriptedModel;
    use crate::store::{CandidateStore, MemoryCandidateStore};

    const BOUNDARY: &str = "talentrank-test-boundary";

    fn test_config() -> Config {
        Config {
            database_url: None,
            gemini_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            max_upload_bytes: 1024 * 1024,
        }
    }

    fn test_state(model: ScriptedModel, store: Arc<MemoryCandidateStore>) -> AppState {
        AppState {
            store,
            llm: Arc::new(model),
            config: test_config(),
        }
    }

    fn multipart_body(file: Option<(&str, &str)>, job_title: Option<&str>) -> Body {
        let mut body = String::new();
        if let Some(title) = job_title {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"job_title\"\r\n\r\n{title}\r\n"
            ));
        }
        if let Some((file_name, content)) = file {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        Body::from(body)
    }

    fn analyze_request(file: Option<(&str, &str)>, job_title: Option<&str>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/cvs/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(multipart_body(file, job_title))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state(
            ScriptedModel::replying(&[]),
            Arc::new(MemoryCandidateStore::new()),
        ));
        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_analyze_stores_cv_with_job_title() {
        let store = Arc::new(MemoryCandidateStore::new());
        let model = ScriptedModel::replying(&[
            "```json\n{\"name\": \"Ada\", \"email\": \"ada@example.com\", \"skills\": [\"Rust\"]}\n```",
        ]);
        let app = build_router(test_state(model, store.clone()));

        let response = app
            .oneshot(analyze_request(
                Some(("cv.txt", "Ada Lovelace, analyst")),
                Some("Backend Developer"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["parse_failed"], false);
        assert_eq!(body["data"]["name"], "Ada");
        assert_eq!(body["data"]["job_title"], "Backend Developer");

        let stored = store.fetch_all_candidates().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(body["cv_id"], json!(stored[0].id));
    }

    #[tokio::test]
    async fn test_analyze_without_file_is_rejected() {
        let app = build_router(test_state(
            ScriptedModel::replying(&[]),
            Arc::new(MemoryCandidateStore::new()),
        ));
        let response = app
            .oneshot(analyze_request(None, Some("Backend Developer")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_analyze_unsupported_format() {
        let app = build_router(test_state(
            ScriptedModel::replying(&[]),
            Arc::new(MemoryCandidateStore::new()),
        ));
        let response = app
            .oneshot(analyze_request(Some(("cv.rtf", "{\\rtf1}")), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_analyze_model_failure_is_bad_gateway() {
        let store = Arc::new(MemoryCandidateStore::new());
        // No scripted replies: the model reports empty content.
        let app = build_router(test_state(ScriptedModel::replying(&[]), store.clone()));
        let response = app
            .oneshot(analyze_request(Some(("cv.txt", "text")), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(store.fetch_all_candidates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_jobs_and_ranking_flow() {
        let store = Arc::new(MemoryCandidateStore::new());
        let model = ScriptedModel::replying(&[
            r#"{"name": "First", "skills": ["node", "sql"]}"#,
            r#"{"name": "Second", "skills": ["node"]}"#,
            r#"{"name": "Elsewhere", "skills": ["node", "sql", "docker"]}"#,
        ]);
        let app = build_router(test_state(model, store.clone()));

        let create = Request::builder()
            .method("POST")
            .uri("/api/v1/jobs")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "title": "Backend Developer", "required_skills": ["node", "sql", "docker"] })
                    .to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(create).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        for (cv, title) in [
            ("first", Some("backend developer")),
            ("second", Some("Backend Developer")),
            ("third", None),
        ] {
            let response = app
                .clone()
                .oneshot(analyze_request(Some(("cv.txt", cv)), title))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.oneshot(get_request("/api/v1/ranking")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let groups = body.as_array().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["job_title"], "Backend Developer");

        let candidates = groups[0]["candidates"].as_array().unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0]["name"], "First");
        assert_eq!(candidates[0]["score"], 67);
        assert_eq!(candidates[0]["matched"], json!(["node", "sql"]));
        assert_eq!(candidates[1]["name"], "Second");
        assert_eq!(candidates[1]["score"], 33);
    }

    #[tokio::test]
    async fn test_create_job_rejects_blank_title() {
        let app = build_router(test_state(
            ScriptedModel::replying(&[]),
            Arc::new(MemoryCandidateStore::new()),
        ));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/jobs")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "title": "  " }).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_cvs_newest_first() {
        let store = Arc::new(MemoryCandidateStore::new());
        let model = ScriptedModel::replying(&[r#"{"name": "Older"}"#, r#"{"name": "Newer"}"#]);
        let app = build_router(test_state(model, store));

        for cv in ["one", "two"] {
            app.clone()
                .oneshot(analyze_request(Some(("cv.txt", cv)), None))
                .await
                .unwrap();
        }

        let response = app.oneshot(get_request("/api/v1/cvs")).await.unwrap();
        let body = body_json(response).await;
        let names: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|cv| cv["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Newer", "Older"]);
    }
}
