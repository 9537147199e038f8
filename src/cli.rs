use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "civil-sentinel")]
#[command(about = "構造物写真のAI劣化診断ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 1枚の写真をスキャンして診断結果を表示
    Scan {
        /// 構造物の写真（JPEG/PNG/WEBP）
        #[arg(required = true)]
        image: PathBuf,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,

        /// アニメーションなしで表示
        #[arg(long)]
        no_animation: bool,
    },

    /// 対話式シェル（読み込み・スキャン・クリアを繰り返す）
    Shell {
        /// 最初に読み込む写真
        image: Option<PathBuf>,

        /// アニメーションなしで表示
        #[arg(long)]
        no_animation: bool,
    },

    /// 設定を表示・変更
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 推論サービスに送る指示文と出力スキーマを表示
    Schema,
}
