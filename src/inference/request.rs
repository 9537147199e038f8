//! 推論リクエストの宣言
//!
//! 画像・指示文・出力スキーマ・温度をまとめたプロバイダ非依存の契約。
//! バックエンドはこれを各サービスのワイヤ形式に変換する。

use super::image::ImageInput;
use civil_sentinel_common::prompts::{
    build_analysis_instruction, DEFAULT_TEMPERATURE, RESPONSE_MIME_TYPE, SYSTEM_INSTRUCTION,
};
use civil_sentinel_common::response_schema;

#[derive(Debug, Clone)]
pub struct AnalysisRequest<'a> {
    pub image: &'a ImageInput,
    pub instruction: String,
    pub system_instruction: &'static str,
    pub response_schema: serde_json::Value,
    pub response_mime_type: &'static str,
    pub temperature: f32,
}

impl<'a> AnalysisRequest<'a> {
    pub fn new(image: &'a ImageInput) -> Self {
        Self {
            image,
            instruction: build_analysis_instruction(),
            system_instruction: SYSTEM_INSTRUCTION,
            response_schema: response_schema(),
            response_mime_type: RESPONSE_MIME_TYPE,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let image = ImageInput::new("slab.jpg", "image/jpeg", vec![1, 2, 3]);
        let request = AnalysisRequest::new(&image);

        assert_eq!(request.image.file_name, "slab.jpg");
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.response_mime_type, "application/json");
        assert!(request.instruction.contains("Forensic Civil Engineer"));
        assert_eq!(request.response_schema["required"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_request_with_temperature() {
        let image = ImageInput::new("slab.jpg", "image/jpeg", vec![]);
        let request = AnalysisRequest::new(&image).with_temperature(0.0);
        assert_eq!(request.temperature, 0.0);
    }
}
