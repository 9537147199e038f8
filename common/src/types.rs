//! 解析結果の型定義
//!
//! 推論サービスが返す構造診断の結果:
//! - Severity: 劣化の深刻度（Low/Medium/High）
//! - AnalysisResult: 1回のスキャンで得られる診断結果

use serde::{Deserialize, Serialize};
use std::fmt;

/// 深刻度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 構造診断結果
///
/// 5フィールドは常に揃って存在する。部分的な結果は作らない。
/// `risk_score` は 0〜100 を想定するが、クランプはしない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisResult {
    pub risk_score: f64,          // リスクスコア
    pub primary_defect: String,   // 主な欠陥
    pub severity: Severity,       // 深刻度
    pub reasoning_chain: String,  // 診断の推論過程
    pub recommendation: String,   // 推奨対応
}
