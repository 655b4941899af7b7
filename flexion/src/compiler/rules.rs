//! ルールファイルの読み込み
//!
//! 1言語分の語形変化ルールを記述したテキストファイル(`*.def`)を解析します。
//!
//! ```text
//! # コメント行
//! language ru
//! flexible авеиймноуыья
//!
//! [names]
//! *й,nom=й;gen=я;dat=ю,fixed
//!
//! [surnames]
//! *ов|*ёв,nom=ов;gen=ова,fixed
//! *ова,fixed,nom=ова;gen=овой
//! ```
//!
//! ヘッダ行:
//!
//! - `language <code> [id]`: 言語コードと、省略可能な数値ID。
//!   IDを省略すると次の空きIDが割り当てられます。
//! - `flexible <symbols>`: 語形変化の対象となる末尾文字の集合。
//!   省略または空の場合は制限なしとして扱われます。
//!
//! ルール行はCSVで、`パターン列,男性形ルール,女性形ルール`の3フィールド
//! です。パターン列は`|`区切りで複数書けます。語尾ルールはリテラル
//! `fixed`、または`;`区切りの`格名=語尾`の並びです。

use std::io::{BufRead, BufReader, Read};

use crate::compiler::cases::EndingsRule;
use crate::errors::{FlexionError, Result};
use crate::utils::parse_csv_row;

/// ルール1行分。
#[derive(Clone, Debug)]
pub struct RuleEntry {
    /// このルールが適用されるパターンの列
    pub patterns: Vec<String>,
    /// 男性形の語尾ルール
    pub male: EndingsRule,
    /// 女性形の語尾ルール
    pub female: EndingsRule,
}

/// 1言語分のルール設定。
#[derive(Clone, Debug)]
pub struct LanguageConfig {
    /// 言語コード
    pub code: String,
    /// 明示的な数値言語ID
    pub language_id: Option<u32>,
    /// 語形変化対象の末尾文字集合
    pub flexible_symbols: String,
    /// 名前用ルール。セクションが無ければ`None`
    pub names: Option<Vec<RuleEntry>>,
    /// 姓用ルール。セクションが無ければ`None`
    pub surnames: Option<Vec<RuleEntry>>,
}

enum Section {
    None,
    Names,
    Surnames,
}

impl LanguageConfig {
    /// リーダーからルール設定を解析します。
    ///
    /// # エラー
    ///
    /// ヘッダの欠落、未知のキーワード、セクション外のルール行、
    /// 不正なルール行の場合に[`FlexionError`]を返します。
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let reader = BufReader::new(rdr);

        let mut code = None;
        let mut language_id = None;
        let mut flexible_symbols = String::new();
        let mut names: Option<Vec<RuleEntry>> = None;
        let mut surnames: Option<Vec<RuleEntry>> = None;
        let mut section = Section::None;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix("language ") {
                let mut spl = rest.split_whitespace();
                let c = spl.next();
                let id = spl.next();
                let extra = spl.next();
                let (Some(c), None) = (c, extra) else {
                    return Err(FlexionError::invalid_format(
                        "flex.def",
                        format!("invalid language header '{line}'"),
                    ));
                };
                code = Some(c.to_string());
                language_id = id.map(str::parse).transpose()?;
            } else if let Some(rest) = line.strip_prefix("flexible ") {
                flexible_symbols = rest.trim().to_string();
            } else if line == "[names]" {
                names.get_or_insert_with(Vec::new);
                section = Section::Names;
            } else if line == "[surnames]" {
                surnames.get_or_insert_with(Vec::new);
                section = Section::Surnames;
            } else {
                let entry = Self::parse_rule_row(line)?;
                match section {
                    Section::Names => names.as_mut().unwrap().push(entry),
                    Section::Surnames => surnames.as_mut().unwrap().push(entry),
                    Section::None => {
                        return Err(FlexionError::invalid_format(
                            "flex.def",
                            format!("rule row outside of a section: '{line}'"),
                        ));
                    }
                }
            }
        }

        let Some(code) = code else {
            return Err(FlexionError::invalid_format(
                "flex.def",
                "missing 'language' header",
            ));
        };

        Ok(Self {
            code,
            language_id,
            flexible_symbols,
            names,
            surnames,
        })
    }

    fn parse_rule_row(row: &str) -> Result<RuleEntry> {
        let fields = parse_csv_row(row);
        if fields.len() != 3 {
            return Err(FlexionError::invalid_format(
                "flex.def",
                format!("a rule row must have 3 fields, found {}: '{row}'", fields.len()),
            ));
        }

        let patterns: Vec<String> = fields[0].split('|').map(str::to_string).collect();
        if patterns.iter().any(String::is_empty) {
            return Err(FlexionError::invalid_format(
                "flex.def",
                format!("empty pattern in rule row '{row}'"),
            ));
        }

        Ok(RuleEntry {
            patterns,
            male: EndingsRule::parse(&fields[1])?,
            female: EndingsRule::parse(&fields[2])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RU: &str = "\
# surname rules
language ru 2
flexible авоя

[names]
*й,nom=й;gen=я,fixed

[surnames]
*ов|*ёв,nom=ов;gen=ова,fixed
*ова,fixed,nom=ова;gen=овой
";

    #[test]
    fn test_parse_config() {
        let config = LanguageConfig::from_reader(RU.as_bytes()).unwrap();
        assert_eq!(config.code, "ru");
        assert_eq!(config.language_id, Some(2));
        assert_eq!(config.flexible_symbols, "авоя");

        let names = config.names.unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].patterns, vec!["*й"]);

        let surnames = config.surnames.unwrap();
        assert_eq!(surnames.len(), 2);
        assert_eq!(surnames[0].patterns, vec!["*ов", "*ёв"]);
        assert_eq!(surnames[1].male, EndingsRule::Fixed);
    }

    #[test]
    fn test_auto_language_id() {
        let config = LanguageConfig::from_reader("language uk\n".as_bytes()).unwrap();
        assert_eq!(config.code, "uk");
        assert_eq!(config.language_id, None);
        assert!(config.names.is_none());
        assert!(config.surnames.is_none());
    }

    #[test]
    fn test_missing_language_header() {
        let result = LanguageConfig::from_reader("[names]\n".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_rule_outside_section() {
        let result = LanguageConfig::from_reader("language ru\n*ов,fixed,fixed\n".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_field_count() {
        let result =
            LanguageConfig::from_reader("language ru\n[names]\n*ов,fixed\n".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_section_is_present() {
        let config =
            LanguageConfig::from_reader("language ru\n[names]\n".as_bytes()).unwrap();
        assert_eq!(config.names.unwrap().len(), 0);
        assert!(config.surnames.is_none());
    }
}
