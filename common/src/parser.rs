//! APIレスポンスパーサー
//!
//! 推論サービスの応答テキストを AnalysisResult に変換する。
//! スキーマに合わない応答（フィールド欠落、型違い、列挙外の深刻度、
//! JSON構文エラー）はすべて Malformed として扱い、部分的な結果は返さない。

use crate::error::{InferenceError, Result};
use crate::types::AnalysisResult;

/// 応答テキストからJSON本体を取り出す
///
/// コードフェンスで囲まれていればその中身（開始行の言語タグ `json` 等は読み飛ばす）、
/// なければ前後の空白を除いた全体。閉じフェンスがない場合も全体を返す
///
/// # Examples
/// ```
/// use civil_sentinel_common::extract_json;
///
/// let response = "```json\n{\"key\": \"value\"}\n```";
/// assert_eq!(extract_json(response), "{\"key\": \"value\"}");
/// ```
pub fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    if let Some(start_marker) = trimmed.find("```") {
        let after_fence = start_marker + 3; // "```" の長さ
        // 開始行の残り（言語タグ）を読み飛ばす
        let start = match trimmed[after_fence..].find('\n') {
            Some(newline) => after_fence + newline + 1,
            None => return trimmed,
        };
        if let Some(end_offset) = trimmed[start..].find("```") {
            return trimmed[start..start + end_offset].trim();
        }
    }

    trimmed
}

/// 解析応答をパース
///
/// # Arguments
/// * `response` - 推論サービスが返したテキスト
///
/// # Returns
/// * `Ok(AnalysisResult)` - 5フィールドすべてがスキーマ通り
/// * `Err(InferenceError::EmptyResponse)` - テキストが空
/// * `Err(InferenceError::Malformed)` - スキーマ不一致
pub fn parse_analysis_response(response: &str) -> Result<AnalysisResult> {
    let json_str = extract_json(response);
    if json_str.is_empty() {
        return Err(InferenceError::EmptyResponse);
    }

    serde_json::from_str::<AnalysisResult>(json_str)
        .map_err(|e| InferenceError::Malformed(e.to_string()))
}
