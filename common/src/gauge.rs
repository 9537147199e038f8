//! 表示用の計算（CLI/将来のGUI共通）
//!
//! リスクゲージの色帯判定、カウントアップのイージング、
//! 推論ログのタイプライター表示で使う純粋関数

/// ゲージのカウントアップ時間（ミリ秒）
pub const GAUGE_DURATION_MS: u64 = 1000;

/// タイプライター表示の1文字あたりの間隔（ミリ秒）
pub const TYPEWRITER_CHAR_DELAY_MS: u64 = 15;

/// リスク帯
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    /// 0〜30
    Nominal,
    /// 30超
    Elevated,
    /// 70超
    High,
    /// 90超（破壊切迫）
    Critical,
}

impl RiskBand {
    pub fn from_score(score: f64) -> Self {
        if score > 90.0 {
            RiskBand::Critical
        } else if score > 70.0 {
            RiskBand::High
        } else if score > 30.0 {
            RiskBand::Elevated
        } else {
            RiskBand::Nominal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Nominal => "NOMINAL",
            RiskBand::Elevated => "ELEVATED",
            RiskBand::High => "HIGH",
            RiskBand::Critical => "CRITICAL",
        }
    }

    pub fn is_imminent(&self) -> bool {
        matches!(self, RiskBand::Critical)
    }
}

/// ease-out quart
pub fn ease_out_quart(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(4)
}

/// 経過時間に応じたゲージ表示値
///
/// 0 から `target` まで増え、`duration_ms` 経過後は `target` の切り捨て値で止まる
pub fn animated_score(target: f64, elapsed_ms: u64, duration_ms: u64) -> i64 {
    let progress = if duration_ms == 0 {
        1.0
    } else {
        elapsed_ms as f64 / duration_ms as f64
    };
    (target * ease_out_quart(progress)).floor() as i64
}

/// ゲージの塗りつぶしセル数
///
/// 描画のみ 0〜100 に収める（スコア自体は変更しない）
pub fn gauge_fill(score: f64, width: usize) -> usize {
    let ratio = score.clamp(0.0, 100.0) / 100.0;
    (ratio * width as f64).round() as usize
}

/// 先頭から `chars` 文字分を返す（文字境界を守る）
pub fn reveal(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
