//! エラー型定義

use thiserror::Error;

/// 推論呼び出しのエラー
///
/// どの種類もプロセスを終了させない。シェル側で1つのメッセージに変換される。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// ネットワーク・認証・クォータ・サービス側エラー（原因メッセージをそのまま保持）
    #[error("{0}")]
    Transport(String),

    #[error("No response text received from the inference service.")]
    EmptyResponse,

    #[error("Malformed analysis response: {0}")]
    Malformed(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, InferenceError>;
