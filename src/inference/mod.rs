//! 推論クライアント
//!
//! 1枚の画像を1回の推論呼び出しで構造診断結果に変換する。
//! リトライ・キャッシュ・レート制限はしない。呼び出しごとに独立。

pub mod gemini;
pub mod image;
pub mod request;

pub use gemini::GeminiBackend;
pub use image::ImageInput;
pub use request::AnalysisRequest;

use async_trait::async_trait;
use civil_sentinel_common::prompts::DEFAULT_TEMPERATURE;
use civil_sentinel_common::{parse_analysis_response, AnalysisResult, InferenceError};
use tracing::{debug, info, warn};

/// 推論サービスの呼び出し口
///
/// `Ok(None)` は「呼び出しは成功したがテキストなし」。
/// 実装が返すエラーは `InferenceError::Transport` のみ。
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn generate(&self, request: &AnalysisRequest<'_>) -> Result<Option<String>, InferenceError>;
}

pub struct InferenceClient<B> {
    backend: B,
    temperature: f32,
}

impl<B: InferenceBackend> InferenceClient<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 画像を解析
    ///
    /// 推論呼び出しは必ず1回。空応答は EmptyResponse、スキーマ不一致は Malformed
    pub async fn analyze(&self, image: &ImageInput) -> Result<AnalysisResult, InferenceError> {
        let request = AnalysisRequest::new(image).with_temperature(self.temperature);

        debug!(
            file = %image.file_name,
            mime_type = %image.mime_type,
            bytes = image.len(),
            temperature = self.temperature,
            "推論リクエスト送信"
        );

        let text = match self.backend.generate(&request).await {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(file = %image.file_name, "推論応答が空");
                return Err(InferenceError::EmptyResponse);
            }
            Err(e) => {
                warn!(file = %image.file_name, error = %e, "推論呼び出し失敗");
                return Err(e);
            }
        };

        debug!(chars = text.len(), "推論応答受信");

        let result = parse_analysis_response(&text).inspect_err(|e| {
            let preview: String = text.chars().take(200).collect();
            warn!(error = %e, raw = %preview, "推論応答がスキーマに合わない");
        })?;

        info!(
            risk_score = result.risk_score,
            severity = %result.severity,
            defect = %result.primary_defect,
            "構造診断完了"
        );

        Ok(result)
    }
}
