use anyhow::Context;
use clap::Parser;
use dialoguer::Input;
use skin_scan::{analyzer, cli, config, error, report, responder, session};
use skin_scan::client::BackendClient;
use skin_scan_common::NormalizedResult;
use cli::{Cli, Commands};
use config::Config;
use error::ClientError;
use responder::Responder;
use session::AnalysisSession;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;
    let strategy = cli.chat_strategy.unwrap_or_else(|| config.chat_strategy());

    match cli.command {
        Commands::Analyze { path, context, output, chat } => {
            let client = BackendClient::from_config(&config)?;
            let context = context.as_deref().map(str::trim).filter(|c| !c.is_empty());

            if path.is_dir() {
                println!("🔍 skin-scan - フォルダ解析: {}\n", path.display());
                let outcomes = analyzer::analyze_folder(&client, &path, context, true)
                    .await
                    .map_err(user_facing)?;

                for outcome in &outcomes {
                    match (&outcome.result, &outcome.error) {
                        (Some(result), _) => println!(
                            "✔ {}: {} ({})",
                            outcome.file_name, result.condition_name, result.severity
                        ),
                        (None, Some(message)) => println!("✘ {}: {}", outcome.file_name, message),
                        (None, None) => {}
                    }
                }

                if let Some(output) = output {
                    let json = serde_json::to_string_pretty(&outcomes)?;
                    std::fs::write(&output, json)?;
                    println!("\n✔ 結果を保存: {}", output.display());
                }
                if chat {
                    println!("\n--chat は単一画像の解析でのみ使用できます");
                }
                return Ok(());
            }

            println!("🔍 skin-scan - 画像解析: {}\n", path.display());
            let session = Mutex::new(AnalysisSession::new());
            let result = analyzer::analyze_in_session(&client, &session, &path, context)
                .await
                .map_err(user_facing)?
                .context("解析結果が破棄されました")?;

            println!("{}\n", report::render(&result));

            if let Some(output) = output {
                let json = serde_json::to_string_pretty(&*result)?;
                std::fs::write(&output, json)?;
                println!("✔ 結果を保存: {}", output.display());
            }

            if chat {
                let responder = Responder::new(strategy, &client);
                run_chat_loop(&responder, &session, result).await?;
            }
        }

        Commands::Ask { result, question } => {
            let content = std::fs::read_to_string(&result)
                .with_context(|| format!("結果ファイルを読めません: {}", result.display()))?;
            let analysis: NormalizedResult = serde_json::from_str(&content)
                .with_context(|| format!("結果ファイルの形式が不正です: {}", result.display()))?;

            let client = BackendClient::from_config(&config)?;
            let responder = Responder::new(strategy, &client);
            let mut conversation = skin_scan_common::Conversation::new();

            let answer = responder
                .ask(&mut conversation, &question, &analysis)
                .await
                .map_err(user_facing)?;
            println!("{}", answer);
        }

        Commands::Health => {
            let client = BackendClient::from_config(&config)?;
            match client.health().await {
                Ok(health) if health.is_ok() => {
                    println!("✔ {} ({})", client.base_url(), health.message);
                }
                Ok(health) => {
                    println!("✘ {}: status={} {}", client.base_url(), health.status, health.message);
                }
                Err(e) => {
                    error!(error = %e, "health check failed");
                    println!("✘ {} に接続できません", client.base_url());
                }
            }
        }

        Commands::Config { set_base_url, set_chat_strategy, show } => {
            let mut config = config;

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ ベースURLを設定しました");
            }

            if let Some(strategy) = set_chat_strategy {
                config.set_chat_strategy(strategy)?;
                println!("✔ 応答方式を設定しました");
            }

            if show {
                println!("設定:");
                println!("  ベースURL: {}", config.base_url());
                println!("  応答方式: {:?}", config.chat_strategy());
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

/// フォローアップ質問の対話ループ（空行か exit で終了）
async fn run_chat_loop(
    responder: &Responder,
    session: &Mutex<AnalysisSession>,
    result: Arc<NormalizedResult>,
) -> anyhow::Result<()> {
    loop {
        let question: String = Input::new()
            .with_prompt("質問 (空行で終了)")
            .allow_empty(true)
            .interact_text()?;
        let question = question.trim();
        if question.is_empty() || question.eq_ignore_ascii_case("exit") {
            break;
        }

        let mut guard = session.lock().await;
        match responder.ask(guard.conversation_mut(), question, &result).await {
            Ok(answer) => {
                let time = guard
                    .conversation()
                    .turns()
                    .last()
                    .map(|t| t.timestamp.with_timezone(&chrono::Local).format("%H:%M").to_string())
                    .unwrap_or_default();
                println!("\n[{}] {}\n", time, answer);
            }
            Err(e) => println!("{}", user_facing(e)),
        }
    }
    Ok(())
}

/// 詳細はログへ、利用者には短いメッセージを返す
fn user_facing(e: ClientError) -> anyhow::Error {
    error!(error = %e, "request failed");
    anyhow::anyhow!(e.user_message())
}
