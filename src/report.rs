//! 診断結果の端末表示
//!
//! - リスクゲージ（イージング付きカウントアップ）
//! - 深刻度バッジ
//! - 主な欠陥と推奨対応
//! - 推論ログ（タイプライター表示）

use civil_sentinel_common::gauge::{
    animated_score, gauge_fill, reveal, GAUGE_DURATION_MS, TYPEWRITER_CHAR_DELAY_MS,
};
use civil_sentinel_common::{AnalysisResult, RiskBand, Severity};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

const GAUGE_WIDTH: usize = 30;
const GAUGE_FRAME_MS: u64 = 16;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub animate: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { animate: true }
    }
}

/// ゲージ本体 `[██████░░░░]`
pub fn gauge_bar(value: f64, width: usize) -> String {
    let filled = gauge_fill(value, width).min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// ゲージ1行分（表示値と帯判定はスコア本体から）
pub fn gauge_line(display_value: i64, score: f64) -> String {
    let band = RiskBand::from_score(score);
    let mut line = format!(
        "{} {:>3}%  INTEGRITY RISK: {}",
        gauge_bar(display_value as f64, GAUGE_WIDTH),
        display_value,
        band.label()
    );
    if band.is_imminent() {
        line.push_str(" (FAILURE IMMINENT)");
    }
    line
}

pub fn severity_badge(severity: Severity) -> String {
    format!("SEVERITY: {}", severity)
}

/// 解析中スピナー
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn render_json(result: &AnalysisResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

pub fn render_error(message: &str) {
    // stderr への書き込み失敗は無視する
    let _ = write_error(&mut io::stderr(), message);
}

fn write_error(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "⚠ SYSTEM_ERROR")?;
    writeln!(out, "  {}", message)
}

/// 診断結果を表示
pub async fn render_result(result: &AnalysisResult, options: RenderOptions) -> io::Result<()> {
    let mut out = io::stdout();

    writeln!(out, "── RISK_ASSESSMENT ──")?;
    render_gauge(&mut out, result.risk_score, options).await?;
    writeln!(out, "{}", severity_badge(result.severity))?;
    writeln!(out)?;

    writeln!(out, "── DEFECT_CLASSIFICATION ──")?;
    writeln!(out, "検出された異常: {}", result.primary_defect)?;
    writeln!(out, "推奨対応: {}", result.recommendation)?;
    writeln!(out)?;

    writeln!(out, "── AI_REASONING_LOG ──")?;
    render_reasoning(&mut out, &result.reasoning_chain, options).await?;
    writeln!(out)?;
    out.flush()
}

async fn render_gauge(out: &mut impl Write, score: f64, options: RenderOptions) -> io::Result<()> {
    if options.animate {
        let mut elapsed = 0;
        while elapsed < GAUGE_DURATION_MS {
            let value = animated_score(score, elapsed, GAUGE_DURATION_MS);
            write!(out, "\r{}", gauge_line(value, score))?;
            out.flush()?;
            tokio::time::sleep(Duration::from_millis(GAUGE_FRAME_MS)).await;
            elapsed += GAUGE_FRAME_MS;
        }
        write!(out, "\r")?;
    }
    let final_value = animated_score(score, GAUGE_DURATION_MS, GAUGE_DURATION_MS);
    writeln!(out, "{}", gauge_line(final_value, score))
}

async fn render_reasoning(out: &mut impl Write, text: &str, options: RenderOptions) -> io::Result<()> {
    if !options.animate {
        return writeln!(out, "{}", text);
    }

    let total = text.chars().count();
    let mut shown = 0;
    for n in 1..=total {
        let prefix = reveal(text, n);
        out.write_all(&prefix.as_bytes()[shown..])?;
        out.flush()?;
        shown = prefix.len();
        tokio::time::sleep(Duration::from_millis(TYPEWRITER_CHAR_DELAY_MS)).await;
    }
    writeln!(out)
}
