//! Civil Sentinel
//!
//! 構造物の写真をマルチモーダルモデルに送り、劣化診断（リスクスコア・
//! 欠陥分類・深刻度・推論過程・推奨対応）を得て表示する。

pub mod cli;
pub mod config;
pub mod error;
pub mod inference;
pub mod report;
pub mod shell;

pub use civil_sentinel_common as common;
