use clap::Parser;
use civil_sentinel::{cli, config, error, inference, report, shell};
use civil_sentinel_common::prompts::{build_analysis_instruction, SYSTEM_INSTRUCTION};
use civil_sentinel_common::response_schema;
use cli::{Cli, Commands};
use config::Config;
use error::{Result, SentinelError};
use inference::{GeminiBackend, ImageInput, InferenceClient};
use report::RenderOptions;
use shell::{Phase, Session};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "warn,civil_sentinel=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(config: &Config) -> Result<InferenceClient<GeminiBackend>> {
    // APIキーは起動時に1回だけ読む（未設定は初回呼び出しで失敗する）
    let backend = GeminiBackend::new(config, config.resolve_api_key())?;
    Ok(InferenceClient::new(backend).with_temperature(config.temperature))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Scan { image, json, no_animation } => {
            let client = build_client(&config)?;
            let input = ImageInput::from_path(&image)?;

            if !json {
                println!("🛡 civil-sentinel - 構造フォレンジックスキャン\n");
                println!("- 画像: {} ({} bytes)", input.file_name, input.len());
                println!("- モデル: {}\n", client.backend().model());
            }

            let mut session = Session::new();
            session.upload(input);

            let pb = (!json).then(|| report::spinner("PROCESSING_NEURAL_NET..."));
            session.scan(&client).await;
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }

            match (session.phase(), session.result(), session.error()) {
                (Phase::Complete, Some(result), _) => {
                    if json {
                        println!("{}", report::render_json(result)?);
                    } else {
                        let options = RenderOptions { animate: !no_animation };
                        report::render_result(result, options).await?;
                        println!("✅ スキャン完了");
                    }
                }
                (_, _, Some(message)) => {
                    // メッセージは1回だけ表示し、終了コードで失敗を返す
                    report::render_error(message);
                    std::process::exit(1);
                }
                _ => return Err(SentinelError::ScanFailed("スキャンが実行されませんでした".into())),
            }
        }

        Commands::Shell { image, no_animation } => {
            println!("🛡 civil-sentinel - 対話モード");
            let client = build_client(&config)?;
            let options = RenderOptions { animate: !no_animation };
            shell::interactive::run_interactive(&client, image.as_deref(), options).await?;
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  パス: {}", Config::config_path()?.display());
                println!("  モデル: {}", config.model);
                println!("  エンドポイント: {}", config.endpoint);
                println!("  温度: {}", config.temperature);
                match config.timeout_seconds {
                    Some(secs) => println!("  タイムアウト: {}秒", secs),
                    None => println!("  タイムアウト: なし（HTTPクライアント既定）"),
                }
                println!(
                    "  APIキー: {}",
                    if config.resolve_api_key().is_some() { "設定済み" } else { "未設定" }
                );
            }
        }

        Commands::Schema => {
            println!("# system instruction\n{}\n", SYSTEM_INSTRUCTION);
            println!("# instruction\n{}\n", build_analysis_instruction());
            println!("# response schema\n{}", serde_json::to_string_pretty(&response_schema())?);
        }
    }

    Ok(())
}
