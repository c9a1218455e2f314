//! API route definitions
//!
//! Organizes the analysis endpoints:
//! - /api/v1/health - liveness and version
//! - /api/v1/analyze - multipart capture upload, full pipeline
//! - /api/v1/overlay - re-bucket stored abnormal ranges

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, ApiState};

/// Create all API routes for the engine.
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/analyze", post(handlers::analyze))
        .route("/overlay", post(handlers::overlay))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::decoder::{DATA_START_MARKER, MIN_ROW_FIELDS};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn create_test_state() -> ApiState {
        ApiState::from_config(&EngineConfig::default())
    }

    fn healthy_capture() -> String {
        let mut text = String::new();
        let mut marker = vec![""; MIN_ROW_FIELDS];
        marker[0] = DATA_START_MARKER;
        text.push_str(&marker.join(","));
        text.push('\n');
        for _ in 0..50 {
            let mut fields = vec![String::from("0"); MIN_ROW_FIELDS];
            for ch in 0..6 {
                fields[ch] = "2.0".to_string();
                fields[7 + ch] = "120.0".to_string();
                fields[14 + 2 * ch] = "50.0".to_string();
                fields[15 + 2 * ch] = "100.0".to_string();
            }
            text.push_str(&fields.join(","));
            text.push('\n');
        }
        text
    }

    fn multipart_body(boundary: &str, parts: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, content) in parts {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{name}.csv\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{boundary}--\r\n"));
        body
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = api_routes(create_test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let v = body_json(response).await;
        assert_eq!(v["data"]["status"], "ok");
        assert_eq!(v["data"]["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(v["meta"]["version"], "1");
    }

    #[tokio::test]
    async fn test_analyze_route_healthy_capture() {
        let app = api_routes(create_test_state());
        let boundary = "dcrm-test-boundary";
        let body = multipart_body(boundary, &[("test_file", &healthy_capture())]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let v = body_json(response).await;
        assert_eq!(v["data"]["assessment"], "HEALTHY");
        assert_eq!(v["data"]["decodeReport"]["rowsDecoded"], 50);
        assert!(v["data"].get("comparison").is_none());
    }

    #[tokio::test]
    async fn test_analyze_route_with_reference() {
        let app = api_routes(create_test_state());
        let boundary = "dcrm-test-boundary";
        let capture = healthy_capture();
        let body = multipart_body(
            boundary,
            &[("test_file", &capture), ("reference_file", &capture)],
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let v = body_json(response).await;
        // Identical captures: comparison attaches and reports no deviations.
        assert!(v["data"]["comparison"]["abnormalityReport"]
            .as_str()
            .unwrap()
            .contains("No significant deviations"));
    }

    #[tokio::test]
    async fn test_analyze_route_missing_marker_is_422() {
        let app = api_routes(create_test_state());
        let boundary = "dcrm-test-boundary";
        let body = multipart_body(boundary, &[("test_file", "a,b,c\n1,2,3\n")]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let v = body_json(response).await;
        assert_eq!(v["error"]["code"], "UNUSABLE_CAPTURE");
    }

    #[tokio::test]
    async fn test_analyze_route_missing_test_file_is_400() {
        let app = api_routes(create_test_state());
        let boundary = "dcrm-test-boundary";
        let body = multipart_body(boundary, &[("reference_file", &healthy_capture())]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let v = body_json(response).await;
        assert_eq!(v["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_overlay_route() {
        let app = api_routes(create_test_state());
        let payload = serde_json::json!([
            {"start_ms": 100.0, "end_ms": 150.0, "type": "resistance", "severity": 0.8}
        ]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/overlay")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let v = body_json(response).await;
        assert_eq!(v["data"]["bucketWidthMs"], 10.0);
        // 0..=500 ms at 10 ms width.
        assert_eq!(v["data"]["resistance"].as_array().unwrap().len(), 51);
        assert_eq!(v["data"]["resistance"][10], 0.8);
    }

    #[tokio::test]
    async fn test_overlay_route_bad_json_is_400() {
        let app = api_routes(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/overlay")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let v = body_json(response).await;
        assert_eq!(v["error"]["code"], "BAD_REQUEST");
    }
}
