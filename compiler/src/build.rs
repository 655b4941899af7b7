//! テーブルのビルドモジュール
//!
//! このモジュールは、言語ごとのルールファイル(`*.def`)から
//! zstd圧縮されたバイナリテーブルを構築する機能を提供します。

use std::fs::File;
use std::io;
use std::path::PathBuf;

use flexion::errors::FlexionError;
use flexion::{FlexData, LanguageConfig, RuleCompiler};

use clap::Parser;

/// ビルドコマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "build", about = "A program to build the flexion table.")]
pub struct Args {
    /// Rule files, one per language (*.def). May be repeated.
    #[clap(short = 'r', long, required = true)]
    rules_in: Vec<PathBuf>,

    /// File to which the binary table is output (in zstd).
    #[clap(short = 'o', long)]
    table_out: PathBuf,
}

/// ビルド処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// テーブル構築エラー
    #[error("Table building failed: {0}")]
    Flexion(#[from] FlexionError),
}

/// ビルドコマンドを実行する
///
/// 指定されたルールファイル群をコンパイルし、zstd圧縮したバイナリ形式で
/// 出力します。重複パターンの診断は標準エラー出力へ警告として表示され、
/// ビルドは継続します。
pub fn run(args: Args) -> Result<(), BuildError> {
    let mut compiler = RuleCompiler::new();

    for path in &args.rules_in {
        println!("Compiling {}...", path.display());
        let config = LanguageConfig::from_reader(File::open(path)?)?;
        let duplicates = compiler.compile_language(&config)?;
        for dup in &duplicates {
            eprintln!(
                "Warning: duplicate pattern '{}' in {} ignored (first rule '{}' wins)",
                dup.pattern,
                path.display(),
                dup.first_pattern,
            );
        }
    }

    println!("Writing the flexion table...");
    let data = FlexData::from_inner(compiler.finish());
    let file = File::create(&args.table_out)?;
    let mut encoder = zstd::Encoder::new(file, 19)?;
    data.write(&mut encoder)?;
    encoder.finish()?;

    println!(
        "Successfully built the table to {}",
        args.table_out.display()
    );
    Ok(())
}
