//! Flexion テーブルコンパイラのメインエントリーポイント
//!
//! このバイナリは、言語ごとの格変化ルールファイルからバイナリテーブルを
//! ビルドするためのサブコマンドと、ビルド済みテーブルの内容を確認する
//! サブコマンドを提供します。

mod build;
mod dump;

use clap::Parser;
use thiserror::Error;

use crate::{build::BuildError, dump::DumpError};

/// コマンドライン引数の構造体
#[derive(Parser, Debug)]
#[clap(name = "compile", version)]
struct Cli {
    /// 実行するサブコマンド
    #[clap(subcommand)]
    command: Command,
}

/// 利用可能なサブコマンド
#[derive(Parser, Debug)]
enum Command {
    /// ルールファイルからバイナリテーブルを構築します
    ///
    /// 言語ごとのルールファイル群をコンパイルし、zstd圧縮された
    /// テーブルファイルを出力します。
    Build(build::Args),

    /// ビルド済みテーブルの統計情報を表示します
    Dump(dump::Args),
}

/// コンパイラの実行中に発生する可能性のあるエラー
#[derive(Debug, Error)]
pub enum CompileError {
    /// テーブルビルド中のエラー
    #[error(transparent)]
    BuildError(#[from] BuildError),
    /// テーブル検査中のエラー
    #[error(transparent)]
    DumpError(#[from] DumpError),
}

fn main() -> Result<(), CompileError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Build(args) => Ok(build::run(args)?),
        Command::Dump(args) => Ok(dump::run(args)?),
    }
}
