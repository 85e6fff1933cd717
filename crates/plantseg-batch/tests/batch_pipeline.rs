//! End-to-end batch runs against a mock inference service.

use chrono::NaiveDate;
use plantseg_batch::BatchOrchestrator;
use plantseg_ml_client::{MlClientConfig, PredictClient};
use plantseg_models::SourceImage;
use plantseg_report::{build_rows, export_on, ExportCell};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 20).unwrap()
}

fn orchestrator_for(server: &MockServer) -> BatchOrchestrator<PredictClient> {
    let config = MlClientConfig::default().with_base_url(server.uri());
    BatchOrchestrator::new(PredictClient::new(config).expect("client"))
}

fn image(name: &str) -> SourceImage {
    SourceImage::new(name, b"fake-image-bytes".to_vec())
}

async fn mount_for_file(server: &MockServer, file_name: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_string_contains(format!("filename=\"{}\"", file_name)))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_failure_does_not_affect_other_images() {
    let server = MockServer::start().await;
    mount_for_file(
        &server,
        "rucola_1.png",
        ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [
                {"class": "root", "confidence": 0.9, "area_cm2": 2.0, "length_cm": 5.0},
                {"class": "root", "confidence": 0.7, "area_cm2": 3.0}
            ]
        })),
    )
    .await;
    mount_for_file(
        &server,
        "broken.jpg",
        ResponseTemplate::new(400)
            .set_body_json(json!({"detail": "Не удалось прочитать изображение"})),
    )
    .await;
    mount_for_file(
        &server,
        "wheat_2.jpeg",
        ResponseTemplate::new(200).set_body_json(json!({"predictions": []})),
    )
    .await;

    let images = vec![image("rucola_1.png"), image("broken.jpg"), image("wheat_2.jpeg")];
    let report = orchestrator_for(&server)
        .run_batch(&images, Some("11.2"))
        .await
        .expect("batch");

    assert_eq!(report.len(), 3);
    let results = report.results();
    assert_eq!(results[0].file_name, "rucola_1.png");
    assert_eq!(results[0].detections.len(), 2);
    assert_eq!(
        results[1].error.as_deref(),
        Some("Не удалось прочитать изображение")
    );
    assert!(results[2].error.is_none());
    assert!(results[2].detections.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests
        .iter()
        .all(|r| String::from_utf8_lossy(&r.body).contains("name=\"scale\"")));

    let rows = build_rows(&report);
    assert_eq!(rows[0].cells[2], ExportCell::Decimal(70.0));
    assert_eq!(rows[0].cells[5], ExportCell::Number(5.0));
    assert_eq!(rows[0].cells[8], ExportCell::Number(3.0));

    let artifact = export_on(&report, fixed_date())
        .expect("export")
        .expect("report has detections");
    assert_eq!(artifact.file_name, "PlantSeg_Сводка_2026-05-20.xlsx");
}

#[tokio::test]
async fn test_invalid_scale_is_omitted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"predictions": []})))
        .mount(&server)
        .await;

    let orchestrator = orchestrator_for(&server);
    for scale in [Some(""), Some("abc"), None] {
        orchestrator
            .run_batch(&[image("a.png")], scale)
            .await
            .expect("batch");
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests
        .iter()
        .all(|r| !String::from_utf8_lossy(&r.body).contains("name=\"scale\"")));
}

#[tokio::test]
async fn test_all_empty_results_skip_export() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let report = orchestrator_for(&server)
        .run_batch(&[image("a.png"), image("b.png")], None)
        .await
        .expect("batch");

    assert!(!report.has_detections());
    assert!(export_on(&report, fixed_date()).expect("export").is_none());
}

#[tokio::test]
async fn test_unreachable_service_records_errors_for_every_image() {
    let config = MlClientConfig::default().with_base_url("http://127.0.0.1:1");
    let orchestrator = BatchOrchestrator::new(PredictClient::new(config).expect("client"));

    let report = orchestrator
        .run_batch(&[image("a.png"), image("b.png")], Some("9"))
        .await
        .expect("batch never fails on per-image errors");

    assert_eq!(report.len(), 2);
    assert_eq!(report.error_count(), 2);
    assert!(report
        .iter()
        .all(|r| r.error.as_deref().is_some_and(|e| !e.is_empty())));
}
