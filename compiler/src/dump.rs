//! テーブル検査モジュール
//!
//! ビルド済みテーブルの内容(格テーブル、言語ごとの配列サイズ)を
//! 表示します。コンパイル結果のデバッグ用です。

use std::fs::File;
use std::io;
use std::path::PathBuf;

use flexion::FlexData;
use flexion::errors::FlexionError;

use clap::Parser;

/// 検査コマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "dump", about = "A program to inspect a compiled flexion table.")]
pub struct Args {
    /// Compiled table file (in zstd).
    #[clap(short = 'i', long)]
    table_in: PathBuf,
}

/// 検査処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// テーブル読み込みエラー
    #[error("Table loading failed: {0}")]
    Flexion(#[from] FlexionError),
}

/// 検査コマンドを実行する
pub fn run(args: Args) -> Result<(), DumpError> {
    let data = FlexData::from_zstd_reader(File::open(&args.table_in)?)?;
    let data = data.as_ref();

    println!("cases: {}", data.num_cases());
    for case_id in 0..data.num_cases() as u32 {
        if let Some(name) = data.case_name(case_id) {
            println!("  {case_id}\t{name}");
        }
    }

    println!("language slots: {}", data.num_langs());
    for language_id in 0..data.num_langs() as u32 {
        let Some(lang) = data.lang(language_id) else {
            continue;
        };
        println!(
            "  lang {}: nodes={} transitions={} endings={} cases={} names_root={:?} surnames_root={:?} flexible=\"{}\"",
            language_id,
            lang.num_nodes(),
            lang.num_transitions(),
            lang.num_endings(),
            lang.case_count(),
            lang.names_root(),
            lang.surnames_root(),
            lang.flexible_symbols(),
        );
    }

    Ok(())
}
