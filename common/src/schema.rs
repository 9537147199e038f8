//! 出力スキーマ
//!
//! 推論サービスに宣言する応答JSONの形。5フィールドすべて必須。

use crate::types::Severity;
use serde_json::{json, Value};

/// 必須フィールド（宣言順）
pub const REQUIRED_FIELDS: &[&str] = &[
    "risk_score",
    "primary_defect",
    "severity",
    "reasoning_chain",
    "recommendation",
];

/// 応答スキーマを生成
pub fn response_schema() -> Value {
    let severities: Vec<&str> = Severity::ALL.iter().map(|s| s.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "risk_score": {
                "type": "NUMBER",
                "description": "A calculated risk score from 0 (Safe) to 100 (Critical Failure Imminent)."
            },
            "primary_defect": {
                "type": "STRING",
                "description": "The most significant structural defect identified (e.g., 'Shear Crack', 'Spalling', 'Rebar Corrosion')."
            },
            "severity": {
                "type": "STRING",
                "enum": severities,
                "description": "Categorical severity of the defect."
            },
            "reasoning_chain": {
                "type": "STRING",
                "description": "A step-by-step forensic engineering analysis detailing observations and logical deductions."
            },
            "recommendation": {
                "type": "STRING",
                "description": "Immediate actionable advice for the site engineer."
            }
        },
        "required": REQUIRED_FIELDS,
        "propertyOrdering": REQUIRED_FIELDS,
    })
}
