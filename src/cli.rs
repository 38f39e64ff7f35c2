use crate::config::ChatStrategy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skin-scan")]
#[command(about = "AI skin-condition screening: upload a photo, get a structured analysis", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// フォローアップ質問の応答方式（設定ファイルより優先）
    #[arg(long, global = true)]
    pub chat_strategy: Option<ChatStrategy>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像（またはフォルダ内の画像）を解析
    Analyze {
        /// 画像ファイルまたはフォルダのパス
        #[arg(required = true)]
        path: PathBuf,

        /// 症状の補足説明（いつから・かゆみの有無など）
        #[arg(short, long)]
        context: Option<String>,

        /// 結果をJSONで保存
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 解析後にフォローアップ質問を続ける（単一画像のみ）
        #[arg(long)]
        chat: bool,
    },

    /// 保存済みの解析結果に質問する
    Ask {
        /// analyze --output で保存したJSON
        #[arg(short, long, required = true)]
        result: PathBuf,

        /// 質問文
        #[arg(required = true)]
        question: String,
    },

    /// バックエンドの疎通確認
    Health,

    /// 設定の表示・変更
    Config {
        /// バックエンドのベースURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 応答方式を設定 (remote/local)
        #[arg(long)]
        set_chat_strategy: Option<ChatStrategy>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
