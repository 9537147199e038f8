//! プロンプト定義モジュール
//!
//! 推論サービスに送る固定テキスト:
//! - SYSTEM_INSTRUCTION: モデルの役割設定
//! - ANALYSIS_INSTRUCTION: 画像と一緒に送る解析指示
//! - DEFAULT_TEMPERATURE: 解析の再現性を優先した低温度

/// 既定モデル
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// 既定の生成温度
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// 応答MIMEタイプ（JSONのみ）
pub const RESPONSE_MIME_TYPE: &str = "application/json";

/// 調査対象の劣化兆候
pub const DISTRESS_SIGNS: &[&str] = &[
    "Shear cracks (45-degree)",
    "Corrosion",
    "Spalling",
    "Settlement",
];

/// 識別対象の材料
pub const MATERIALS: &[&str] = &["Concrete", "Brick", "Steel"];

pub const SYSTEM_INSTRUCTION: &str = "You are CivilAI Sentinel, a high-precision forensic structural analysis AI. \
Your output must be technical, objective, and strictly follow civil engineering terminology. \
Do not hallucinate defects if none are visible. If the image is unclear, note that in the reasoning.";

/// 解析指示を生成
///
/// 材料と劣化兆候のリストから固定の指示文を組み立てる
pub fn build_analysis_instruction() -> String {
    format!(
        "Analyze this structural image as a Forensic Civil Engineer. \
First, identify the material ({}). \
Then, scan for specific distress signs: {}. \
Determine the risk.",
        MATERIALS.join(", "),
        join_alternatives(DISTRESS_SIGNS),
    )
}

fn join_alternatives(items: &[&str]) -> String {
    match items.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    }
}
