/// Integration tests with a mocked prediction service
/// Tests the client and the form controller end to end without a real backend
use course_load_evaluator::core::errors::AppError;
use course_load_evaluator::core::form::{FormController, Status};
use course_load_evaluator::integrations::api_client::RiskApiClient;
use course_load_evaluator::integrations::models::{FeatureValue, PredictRequest};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn meta_body(names: &[&str]) -> serde_json::Value {
    json!({
        "model_tag": "baseline_v1",
        "feature_names": names,
        "meta": {"model_tag": "baseline_v1", "risk_thresholds": {"low": 0.33, "high": 0.66}}
    })
}

fn prediction_body(score: f64, level: &str) -> serde_json::Value {
    json!({
        "model_tag": "baseline_v1",
        "risk_score": score,
        "risk_level": level,
        "details": null
    })
}

async fn mount_meta(server: &MockServer, names: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/meta"))
        .respond_with(ResponseTemplate::new(200).set_body_json(meta_body(names)))
        .mount(server)
        .await;
}

async fn loaded_controller(server: &MockServer, names: &[&str]) -> FormController {
    mount_meta(server, names).await;
    let client = RiskApiClient::new(server.uri(), None).unwrap();
    let mut controller = FormController::new(client);
    controller.load().await;
    controller
}

#[tokio::test]
async fn test_get_meta_success() {
    let mock_server = MockServer::start().await;
    mount_meta(&mock_server, &["credits", "gpa", "work_hours"]).await;

    let client = RiskApiClient::new(mock_server.uri(), None).unwrap();
    let meta = client.get_meta().await.unwrap();

    assert_eq!(meta.model_tag, "baseline_v1");
    assert_eq!(meta.feature_names(), ["credits", "gpa", "work_hours"]);
    assert_eq!(meta.meta["risk_thresholds"]["high"], 0.66);
}

#[tokio::test]
async fn test_get_meta_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/meta"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .mount(&mock_server)
        .await;

    let client = RiskApiClient::new(mock_server.uri(), None).unwrap();
    let err = client.get_meta().await.unwrap_err();

    assert_eq!(err, AppError::MetadataFetch);
    assert_eq!(err.to_string(), "Failed to fetch /meta");
}

#[tokio::test]
async fn test_load_failure_moves_to_error_without_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/meta"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RiskApiClient::new(mock_server.uri(), None).unwrap();
    let mut controller = FormController::new(client);
    assert_eq!(controller.status(), Status::Loading);

    controller.load().await;

    assert_eq!(controller.status(), Status::Error);
    assert_eq!(controller.error_message(), "Failed to fetch /meta");
    assert!(!controller.form_visible());
}

#[tokio::test]
async fn test_load_transport_failure_carries_network_message() {
    // Reserve a port, then free it so nothing is listening there.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let client = RiskApiClient::new(uri, None).unwrap();
    let mut controller = FormController::new(client);
    controller.load().await;

    assert_eq!(controller.status(), Status::Error);
    assert!(!controller.error_message().is_empty());
    assert_ne!(controller.error_message(), "Failed to fetch /meta");
}

#[tokio::test]
async fn test_load_initializes_inputs() {
    let mock_server = MockServer::start().await;
    let controller = loaded_controller(&mock_server, &["credits", "gpa", "work_hours"]).await;

    assert_eq!(controller.status(), Status::Ready);
    let names: Vec<&str> = controller.form().names().collect();
    assert_eq!(names, vec!["credits", "gpa", "work_hours"]);
    assert!(controller.form().fields().iter().all(|f| f.value.is_empty()));
}

#[tokio::test]
async fn test_predict_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"features": {"credits": 18, "gpa": 3.2, "major": "cs"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction_body(0.42, "medium")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RiskApiClient::new(mock_server.uri(), None).unwrap();
    let request = PredictRequest::new(vec![
        (
            "credits".to_string(),
            FeatureValue::Number(serde_json::Number::from(18)),
        ),
        (
            "gpa".to_string(),
            FeatureValue::Number(serde_json::Number::from_f64(3.2).unwrap()),
        ),
        ("major".to_string(), FeatureValue::Text("cs".to_string())),
    ]);
    let prediction = client.predict(&request).await.unwrap();

    assert_eq!(prediction.risk_score, Some(0.42));
    assert_eq!(prediction.risk_level, "medium");
}

#[tokio::test]
async fn test_predict_error_uses_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "bad feature"})))
        .mount(&mock_server)
        .await;

    let mut controller = loaded_controller(&mock_server, &["credits"]).await;
    controller.change("credits", "18");
    let err = controller.submit().await.unwrap_err();

    assert_eq!(err, AppError::Prediction("bad feature".to_string()));
    assert_eq!(controller.status(), Status::Error);
    assert_eq!(controller.error_message(), "bad feature");
    assert!(controller.result().is_none());
}

#[tokio::test]
async fn test_predict_error_without_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = RiskApiClient::new(mock_server.uri(), None).unwrap();
    let err = client
        .predict(&PredictRequest::new(Vec::new()))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Prediction failed");
}

#[tokio::test]
async fn test_predict_error_with_structured_detail_is_generic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"detail": [{"loc": ["body", "features"], "msg": "field required"}]})),
        )
        .mount(&mock_server)
        .await;

    let client = RiskApiClient::new(mock_server.uri(), None).unwrap();
    let err = client
        .predict(&PredictRequest::new(Vec::new()))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Prediction failed");
}

#[tokio::test]
async fn test_blank_fields_never_reach_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction_body(0.5, "medium")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let names = ["f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9", "f10"];
    let mut controller = loaded_controller(&mock_server, &names).await;
    controller.change("f1", "1");

    let err = controller.submit().await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Missing values for: f2, f3, f4, f5, f6, f7, f8, f9..."
    );
    assert_eq!(controller.status(), Status::Ready);
}

#[tokio::test]
async fn test_submit_coerces_numbers_and_stores_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({
            "features": {"credits": 18, "gpa": 3.2, "work_hours": 100, "delta": -5, "major": "abc"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction_body(0.81, "high")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut controller =
        loaded_controller(&mock_server, &["credits", "gpa", "work_hours", "delta", "major"]).await;
    controller.change("credits", "18");
    controller.change("gpa", "3.2");
    controller.change("work_hours", "1e2");
    controller.change("delta", "-5");
    controller.change("major", "abc");

    controller.submit().await.unwrap();

    assert_eq!(controller.status(), Status::Ready);
    let result = controller.result().unwrap();
    assert_eq!(result.risk_score, Some(0.81));
    assert_eq!(result.risk_level, "high");
}

#[tokio::test]
async fn test_partial_prediction_body_is_still_a_result() {
    let mock_server = MockServer::start().await;

    let body = json!({"risk_score": 0.7, "details": null, "note": "level withheld"});
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut controller = loaded_controller(&mock_server, &["credits"]).await;
    controller.change("credits", "18");

    controller.submit().await.unwrap();

    assert_eq!(controller.status(), Status::Ready);
    assert_eq!(controller.error_message(), "");
    let result = controller.result().unwrap();
    assert_eq!(result.risk_score, Some(0.7));
    assert_eq!(result.risk_level, "");
    assert_eq!(result.raw, body);
}

#[tokio::test]
async fn test_non_json_prediction_body_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&mock_server)
        .await;

    let mut controller = loaded_controller(&mock_server, &["credits"]).await;
    controller.change("credits", "18");

    let err = controller.submit().await.unwrap_err();

    assert!(matches!(err, AppError::Transport(_)));
    assert_eq!(controller.status(), Status::Error);
}

#[tokio::test]
async fn test_fill_example_then_submit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({"features": {"credits": 18, "gpa": 3.2, "unrelated": 0}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction_body(0.3, "low")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut controller = loaded_controller(&mock_server, &["credits", "gpa", "unrelated"]).await;
    assert!(controller.fill_example());
    controller.submit().await.unwrap();

    assert_eq!(controller.result().unwrap().risk_level, "low");
}

#[tokio::test]
async fn test_repeated_submissions_are_independent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model_tag": "baseline_v1",
            "risk_score": 0.2,
            "risk_level": "low",
            "details": {"first": true}
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction_body(0.9, "high")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut controller = loaded_controller(&mock_server, &["credits"]).await;
    controller.change("credits", "18");

    controller.submit().await.unwrap();
    assert_eq!(controller.result().unwrap().risk_level, "low");

    controller.submit().await.unwrap();
    let result = controller.result().unwrap();
    assert_eq!(result.risk_level, "high");
    assert!(result.details.is_none());
}

#[tokio::test]
async fn test_error_then_successful_retry_returns_to_ready() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "bad feature"})))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction_body(0.5, "medium")))
        .mount(&mock_server)
        .await;

    let mut controller = loaded_controller(&mock_server, &["credits"]).await;
    controller.change("credits", "18");

    assert!(controller.submit().await.is_err());
    assert_eq!(controller.status(), Status::Error);
    assert!(controller.can_submit());

    controller.submit().await.unwrap();
    assert_eq!(controller.status(), Status::Ready);
    assert_eq!(controller.error_message(), "");
}

#[tokio::test]
async fn test_submit_until_cancels_slow_prediction() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(prediction_body(0.5, "medium"))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;

    let mut controller = loaded_controller(&mock_server, &["credits"]).await;
    controller.change("credits", "18");

    let err = controller
        .submit_until(tokio::time::sleep(Duration::from_millis(50)))
        .await
        .unwrap_err();

    assert_eq!(err, AppError::Cancelled);
    assert_eq!(controller.status(), Status::Error);
    assert_eq!(controller.error_message(), "Prediction cancelled");
    assert!(controller.result().is_none());
}

#[tokio::test]
async fn test_configured_timeout_surfaces_as_error() {
    let mock_server = MockServer::start().await;
    mount_meta(&mock_server, &["credits"]).await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(prediction_body(0.5, "medium"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = RiskApiClient::new(mock_server.uri(), Some(Duration::from_millis(100))).unwrap();
    let mut controller = FormController::new(client);
    controller.load().await;
    controller.change("credits", "18");

    let err = controller.submit().await.unwrap_err();

    assert!(matches!(err, AppError::Transport(_)));
    assert_eq!(controller.status(), Status::Error);
}

#[tokio::test]
async fn test_health() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = RiskApiClient::new(mock_server.uri(), None).unwrap();
    let body = client.health().await.unwrap();

    assert_eq!(body, json!({"ok": true}));
}
