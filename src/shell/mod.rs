//! プレゼンテーションシェル
//!
//! UI状態（画像・解析中フラグ・結果・エラー）の唯一の所有者。
//! 状態の変更はすべて `&mut Session` 経由で行う。
//!
//! スキャン完了は世代番号で照合し、アップロードやクリアで古くなった
//! 呼び出しの結果は破棄する。

pub mod interactive;

use crate::inference::{ImageInput, InferenceBackend, InferenceClient};
use civil_sentinel_common::{AnalysisResult, InferenceError};
use std::sync::Arc;
use tracing::debug;

const FALLBACK_ERROR_MESSAGE: &str = "Failed to analyze structure. Try again.";

/// UI状態
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub image: Option<Arc<ImageInput>>,
    pub is_analyzing: bool,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
}

/// シェルの段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 画像なし
    Idle,
    /// 画像あり・未解析
    Ready,
    /// 推論呼び出し中
    Analyzing,
    /// 結果あり
    Complete,
    /// エラーあり
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Ready => "ready",
            Phase::Analyzing => "analyzing",
            Phase::Complete => "complete",
            Phase::Failed => "failed",
        }
    }
}

/// 実行中スキャンの控え
#[derive(Debug, Clone)]
pub struct ScanTicket {
    generation: u64,
    image: Arc<ImageInput>,
}

impl ScanTicket {
    pub fn image(&self) -> &ImageInput {
        &self.image
    }
}

#[derive(Debug, Default)]
pub struct Session {
    state: UiState,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn image(&self) -> Option<&ImageInput> {
        self.state.image.as_deref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.state.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        let state = &self.state;
        if state.is_analyzing {
            Phase::Analyzing
        } else if state.error.is_some() {
            Phase::Failed
        } else if state.result.is_some() {
            Phase::Complete
        } else if state.image.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    /// 画像を差し替える。どの段階でも結果・エラー・解析中フラグはリセット
    pub fn upload(&mut self, image: ImageInput) {
        debug!(file = %image.file_name, phase = self.phase().as_str(), "画像アップロード");
        self.generation += 1;
        self.state = UiState {
            image: Some(Arc::new(image)),
            ..Default::default()
        };
    }

    /// 画像・結果・エラーを破棄
    pub fn clear(&mut self) {
        debug!(phase = self.phase().as_str(), "バッファクリア");
        self.generation += 1;
        self.state = UiState::default();
    }

    pub fn can_scan(&self) -> bool {
        self.state.image.is_some() && !self.state.is_analyzing
    }

    /// スキャン開始
    ///
    /// 画像がない、または解析中なら何もせず `None`
    pub fn begin_scan(&mut self) -> Option<ScanTicket> {
        if !self.can_scan() {
            return None;
        }
        let image = self.state.image.clone()?;

        self.state.is_analyzing = true;
        self.state.result = None;
        self.state.error = None;

        Some(ScanTicket {
            generation: self.generation,
            image,
        })
    }

    /// スキャン完了を反映
    ///
    /// チケットが古い（開始後にアップロード・クリアがあった）場合は破棄して `false`
    pub fn finish_scan(
        &mut self,
        ticket: ScanTicket,
        outcome: Result<AnalysisResult, InferenceError>,
    ) -> bool {
        if ticket.generation != self.generation || !self.state.is_analyzing {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "古いスキャン結果を破棄"
            );
            return false;
        }

        self.state.is_analyzing = false;
        match outcome {
            Ok(result) => {
                self.state.result = Some(result);
                self.state.error = None;
            }
            Err(e) => {
                let message = e.to_string();
                self.state.result = None;
                self.state.error = Some(if message.trim().is_empty() {
                    FALLBACK_ERROR_MESSAGE.to_string()
                } else {
                    message
                });
            }
        }
        true
    }

    /// 開始から完了まで一括で実行。推論呼び出しを行ったら `true`
    pub async fn scan<B: InferenceBackend>(&mut self, client: &InferenceClient<B>) -> bool {
        let Some(ticket) = self.begin_scan() else {
            return false;
        };
        let outcome = client.analyze(ticket.image()).await;
        self.finish_scan(ticket, outcome);
        true
    }
}
