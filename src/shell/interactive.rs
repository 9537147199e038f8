//! 対話式シェル
//!
//! 画像読み込み → スキャン → 結果表示 を繰り返す。
//! スキャンは画像があり解析中でないときだけメニューに出る。

use super::{Phase, Session};
use crate::error::{SentinelError, Result};
use crate::inference::{ImageInput, InferenceBackend, InferenceClient};
use crate::report::{self, RenderOptions};
use dialoguer::{Input, Select};
use std::path::Path;

/// 対話アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    /// 画像を読み込む
    Load,
    /// スキャン開始
    Scan,
    /// バッファクリア
    Clear,
    /// 終了
    Quit,
}

impl ShellAction {
    pub fn label(&self) -> &'static str {
        match self {
            ShellAction::Load => "画像を読み込む",
            ShellAction::Scan => "フォレンジックスキャン開始",
            ShellAction::Clear => "バッファをクリア",
            ShellAction::Quit => "終了",
        }
    }
}

/// 現在の状態で選べるアクション
pub fn available_actions(session: &Session) -> Vec<ShellAction> {
    let mut actions = Vec::new();
    if session.can_scan() {
        actions.push(ShellAction::Scan);
    }
    actions.push(ShellAction::Load);
    if session.image().is_some() {
        actions.push(ShellAction::Clear);
    }
    actions.push(ShellAction::Quit);
    actions
}

/// 状態表示行
pub fn status_line(session: &Session) -> String {
    let image = session
        .image()
        .map(|img| format!("{} ({} bytes, {})", img.file_name, img.len(), img.mime_type))
        .unwrap_or_else(|| "なし".to_string());
    format!("状態: {} | 画像: {}", session.phase().as_str(), image)
}

/// 対話式シェルを実行
pub async fn run_interactive<B: InferenceBackend>(
    client: &InferenceClient<B>,
    initial_image: Option<&Path>,
    options: RenderOptions,
) -> Result<()> {
    let mut session = Session::new();

    if let Some(path) = initial_image {
        load_image(&mut session, path);
    }

    loop {
        println!("\n{}", status_line(&session));

        let actions = available_actions(&session);
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let selected = Select::new()
            .with_prompt("操作")
            .items(&labels[..])
            .default(0)
            .interact()
            .map_err(|e| SentinelError::CliExecution(e.to_string()))?;

        match actions[selected] {
            ShellAction::Load => {
                let input: String = Input::new()
                    .with_prompt("画像ファイルのパス")
                    .interact_text()
                    .map_err(|e| SentinelError::CliExecution(e.to_string()))?;
                load_image(&mut session, Path::new(input.trim()));
            }
            ShellAction::Scan => {
                let pb = report::spinner("PROCESSING_NEURAL_NET...");
                session.scan(client).await;
                pb.finish_and_clear();
                show_outcome(&session, options).await?;
            }
            ShellAction::Clear => {
                session.clear();
                println!("✔ バッファをクリアしました");
            }
            ShellAction::Quit => break,
        }
    }

    Ok(())
}

fn load_image(session: &mut Session, path: &Path) {
    match ImageInput::from_path(path) {
        Ok(image) => {
            println!("✔ 読み込み: {}", image.file_name);
            session.upload(image);
        }
        Err(e) => println!("✖ {}", e),
    }
}

async fn show_outcome(session: &Session, options: RenderOptions) -> Result<()> {
    match session.phase() {
        Phase::Complete => {
            if let Some(result) = session.result() {
                println!();
                report::render_result(result, options).await?;
            }
        }
        Phase::Failed => {
            if let Some(message) = session.error() {
                report::render_error(message);
            }
        }
        _ => {}
    }
    Ok(())
}
