//! Civil Sentinel Common Library
//!
//! 推論サービスとの契約（型・スキーマ・プロンプト・パーサー）と表示用の純粋関数

pub mod types;
pub mod error;
pub mod prompts;
pub mod schema;
pub mod parser;
pub mod gauge;

pub use types::{AnalysisResult, Severity};
pub use error::{InferenceError, Result};
pub use schema::{response_schema, REQUIRED_FIELDS};
pub use parser::{extract_json, parse_analysis_response};
pub use gauge::RiskBand;
