//! Gemini バックエンドテスト
//!
//! mockito のHTTPサーバーに対してリクエスト形式とエラー変換を検証

use civil_sentinel::config::Config;
use civil_sentinel::inference::{GeminiBackend, ImageInput, InferenceClient};
use civil_sentinel::shell::Session;
use civil_sentinel_common::{InferenceError, Severity};
use mockito::Matcher;
use serde_json::json;

const MODEL: &str = "gemini-test";
const PATH: &str = "/v1beta/models/gemini-test:generateContent";
const VALID_PAYLOAD: &str = r#"{"risk_score":72,"primary_defect":"Shear Crack","severity":"High","reasoning_chain":"...","recommendation":"Evacuate."}"#;

fn client_for(url: &str, api_key: Option<&str>) -> InferenceClient<GeminiBackend> {
    let config = Config {
        endpoint: url.to_string(),
        model: MODEL.to_string(),
        ..Default::default()
    };
    let backend = GeminiBackend::new(&config, api_key.map(str::to_string)).expect("バックエンド生成失敗");
    InferenceClient::new(backend).with_temperature(config.temperature)
}

fn candidate_body(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

fn image() -> ImageInput {
    ImageInput::new("beam.jpg", "image/jpeg", b"hello".to_vec())
}

/// 正常応答 → 診断結果
#[tokio::test]
async fn test_generate_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "type": "OBJECT" }
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body(VALID_PAYLOAD))
        .create_async()
        .await;

    let client = client_for(&server.url(), Some("test-key"));
    let result = client.analyze(&image()).await.expect("解析失敗");

    assert_eq!(result.risk_score, 72.0);
    assert_eq!(result.severity, Severity::High);
    assert_eq!(result.recommendation, "Evacuate.");
    mock.assert_async().await;
}

/// 画像と指示文が1回のリクエストに含まれる
#[tokio::test]
async fn test_request_carries_image_and_instruction() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""mime_type":"image/jpeg""#.into()),
            Matcher::Regex(r#""data":"aGVsbG8=""#.into()),
            Matcher::Regex("Forensic Civil Engineer".into()),
            Matcher::Regex("CivilAI Sentinel".into()),
            Matcher::Regex(r#""enum":\["Low","Medium","High"\]"#.into()),
        ]))
        .with_status(200)
        .with_body(candidate_body(VALID_PAYLOAD))
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server.url(), Some("test-key"));
    client.analyze(&image()).await.expect("解析失敗");
    mock.assert_async().await;
}

/// クォータ超過 → サービスのメッセージをそのまま返す
#[tokio::test]
async fn test_quota_error_message_propagated() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"code":429,"message":"quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server.url(), Some("test-key"));
    let result = client.analyze(&image()).await;

    assert_eq!(result, Err(InferenceError::Transport("quota exceeded".to_string())));
    // リトライしない
    mock.assert_async().await;
}

/// Gemini形式でないエラー本文 → ステータス付きメッセージ
#[tokio::test]
async fn test_plain_error_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let client = client_for(&server.url(), Some("test-key"));
    match client.analyze(&image()).await {
        Err(InferenceError::Transport(msg)) => {
            assert!(msg.contains("503"));
            assert!(msg.contains("Service Unavailable"));
        }
        other => panic!("Expected Transport error, got {:?}", other),
    }
}

/// 候補なし → EmptyResponse
#[tokio::test]
async fn test_no_candidates_is_empty_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(r#"{"candidates":[],"promptFeedback":{"blockReason":"SAFETY"}}"#)
        .create_async()
        .await;

    let client = client_for(&server.url(), Some("test-key"));
    assert_eq!(
        client.analyze(&image()).await,
        Err(InferenceError::EmptyResponse)
    );
}

/// スキーマ外の深刻度 → Malformed
#[tokio::test]
async fn test_out_of_enum_severity_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let payload = r#"{"risk_score":95,"primary_defect":"Settlement","severity":"Severe","reasoning_chain":"...","recommendation":"Shore."}"#;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(candidate_body(payload))
        .create_async()
        .await;

    let client = client_for(&server.url(), Some("test-key"));
    assert!(matches!(
        client.analyze(&image()).await,
        Err(InferenceError::Malformed(_))
    ));
}

/// APIキー未設定 → 通信せずに TransportFailure
#[tokio::test]
async fn test_missing_api_key_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server.url(), None);
    assert!(matches!(
        client.analyze(&image()).await,
        Err(InferenceError::Transport(_))
    ));
    mock.assert_async().await;
}

/// 到達不能なエンドポイント → TransportFailure
#[tokio::test]
async fn test_unreachable_endpoint() {
    let client = client_for("http://127.0.0.1:1", Some("test-key"));
    assert!(matches!(
        client.analyze(&image()).await,
        Err(InferenceError::Transport(_))
    ));
}

/// 通信エラーのメッセージにAPIキーが含まれない
#[tokio::test]
async fn test_transport_error_does_not_expose_api_key() {
    let client = client_for("http://127.0.0.1:1", Some("SUPER-SECRET-KEY"));
    let mut session = Session::new();
    session.upload(image());

    session.scan(&client).await;

    let message = session.error().expect("エラーがない");
    assert!(!message.is_empty());
    assert!(!message.contains("SUPER-SECRET-KEY"), "{}", message);
}
