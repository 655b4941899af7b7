//! # Flexion
//!
//! Flexionは、人名(名前・姓)の格変化ルールをフラットな参照テーブルへ
//! コンパイルするオフラインコンパイラと、そのテーブルを歩く高速な
//! 最長一致マッチャーの実装です。
//!
//! ## 概要
//!
//! 言語ごとの格変化ルール(語尾パターンと、文法格ごとの語尾)を、
//! 逆順接尾辞トライとして構築し、3つのフラットな配列(遷移、語尾、
//! ノード)へシリアライズします。rkyvシリアライゼーションフォーマットを
//! 使用することで、テーブルの読み込みと初期化を高速化し、ゼロコピーでの
//! データアクセスを実現しています。
//!
//! ## 主な機能
//!
//! - **ルールコンパイラ**: テキストのルールファイルからテーブルをビルド
//! - **ゼロコピーデシリアライゼーション**: rkyvを使用した高速なテーブル読み込み
//! - **最長一致マッチャー**: 逆順接尾辞トライによる語形変化の実行
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use flexion::{FlexData, Gender, Inflector, LanguageConfig, RuleCompiler, WordKind};
//!
//! let rules = "\
//! language ru 0
//! [surnames]
//! *ov,nom=ov;gen=ova,fixed
//! *ova,fixed,nom=ova;gen=ovoj
//! ";
//!
//! let config = LanguageConfig::from_reader(rules.as_bytes())?;
//! let mut compiler = RuleCompiler::new();
//! let duplicates = compiler.compile_language(&config)?;
//! assert!(duplicates.is_empty());
//!
//! let inflector = Inflector::new(FlexData::from_inner(compiler.finish()));
//! let gen_id = inflector.data().case_id("gen").unwrap();
//!
//! assert_eq!(
//!     inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Petrov"),
//!     "Petrova",
//! );
//! assert_eq!(
//!     inflector.inflect(0, WordKind::Surname, Gender::Female, gen_id, "Petrova"),
//!     "Petrovoj",
//! );
//! # Ok(())
//! # }
//! ```

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

/// ルールコンパイラ
pub mod compiler;

/// エラー型の定義
pub mod errors;

/// 語形変化マッチャーの実装
pub mod matcher;

/// コンパイル済みテーブルとファイルフォーマット
pub mod tables;

/// 内部ユーティリティ関数
pub mod utils;

#[cfg(test)]
mod tests;

// Re-exports
pub use compiler::{DuplicateRule, LanguageConfig, RuleCompiler};
pub use matcher::{Gender, Inflector, WordKind};
pub use tables::FlexData;

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
