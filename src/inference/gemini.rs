//! Gemini API連携
//!
//! `POST {endpoint}/v1beta/models/{model}:generateContent`
//! APIキーはURLに載せず `x-goog-api-key` ヘッダで送る。
//! 画像はinline_dataで、出力スキーマはgenerationConfig.responseSchemaで送る。

use super::request::AnalysisRequest;
use super::InferenceBackend;
use crate::config::Config;
use crate::error::{SentinelError, Result};
use async_trait::async_trait;
use civil_sentinel_common::InferenceError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

/// エラーレスポンス `{"error": {"code": 429, "message": "...", "status": "..."}}`
#[derive(Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GeminiRequest {
    fn from_analysis(request: &AnalysisRequest<'_>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.image.mime_type.clone(),
                            data: request.image.to_base64(),
                        },
                    },
                    Part::Text {
                        text: request.instruction.clone(),
                    },
                ],
            }],
            system_instruction: Content {
                parts: vec![Part::Text {
                    text: request.system_instruction.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: request.temperature,
                response_mime_type: request.response_mime_type.to_string(),
                response_schema: request.response_schema.clone(),
            },
        }
    }
}

impl GeminiResponse {
    /// 最初の候補のテキストパートを連結（思考パートは除く）
    fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

const API_KEY_HEADER: &str = "x-goog-api-key";

/// 通信エラー（URLはメッセージから除く）
fn transport_error(e: reqwest::Error) -> InferenceError {
    InferenceError::Transport(e.without_url().to_string())
}

/// 失敗レスポンスのメッセージ（Gemini形式ならmessageをそのまま）
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<GeminiErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => format!("HTTP {}: {}", status, body.trim()),
    }
}

#[derive(Debug, Clone)]
pub struct GeminiBackend {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiBackend {
    pub fn new(config: &Config, api_key: Option<String>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| SentinelError::Config(format!("HTTPクライアント生成失敗: {}", e)))?;

        debug!(
            endpoint = %config.endpoint,
            model = %config.model,
            timeout = ?config.timeout_seconds,
            has_api_key = api_key.is_some(),
            "GeminiBackend 初期化"
        );

        Ok(Self {
            http_client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl InferenceBackend for GeminiBackend {
    async fn generate(&self, request: &AnalysisRequest<'_>) -> std::result::Result<Option<String>, InferenceError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            InferenceError::Transport(
                "API key is not configured. Set GEMINI_API_KEY or run `civil-sentinel config --set-api-key`."
                    .to_string(),
            )
        })?;

        let body = GeminiRequest::from_analysis(request);

        let response = self
            .http_client
            .post(self.url())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(transport_error)?;

        debug!(status = %status, bytes = text.len(), "Gemini応答");

        if !status.is_success() {
            return Err(InferenceError::Transport(error_message(status, &text)));
        }

        let response: GeminiResponse = serde_json::from_str(&text)
            .map_err(|e| InferenceError::Transport(format!("Gemini response decode error: {}", e)))?;

        Ok(response.text())
    }
}
