//! 格レジストリと語尾ルール
//!
//! 文法格の名前に連番IDを割り当てるレジストリと、1つのルールが持つ
//! 格ごとの語尾マッピングを提供します。格IDはコンパイル実行全体で
//! 安定しており、全言語にわたって初出順に採番されます。

use hashbrown::HashMap;

use crate::errors::{FlexionError, Result};

/// 1つのルールが持つ格ごとの語尾。
///
/// `Fixed`は「この語はどの格でも変化しない」ことを表し、
/// 語尾テーブルには一切出力されません。
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EndingsRule {
    /// 格に依存する語尾を一切持たない
    Fixed,
    /// `(格名, 語尾)`の組。ルールファイルでの記述順を保持する
    Cases(Vec<(String, String)>),
}

impl EndingsRule {
    /// ルールファイルのフィールドから語尾ルールを解析します。
    ///
    /// フィールドはリテラル`fixed`、または`;`区切りの`格名=語尾`の並びです。
    /// 語尾は空文字列でも構いません。
    ///
    /// # エラー
    ///
    /// `=`を含まない項、空の格名、同一ルール内での格名の重複は
    /// フォーマットエラーになります。
    pub fn parse(field: &str) -> Result<Self> {
        if field == "fixed" {
            return Ok(Self::Fixed);
        }
        if field.is_empty() {
            return Err(FlexionError::invalid_format(
                "endings",
                "an endings rule must be 'fixed' or a 'case=ending' list",
            ));
        }

        let mut pairs: Vec<(String, String)> = vec![];
        for item in field.split(';') {
            let Some((name, ending)) = item.split_once('=') else {
                return Err(FlexionError::invalid_format(
                    "endings",
                    format!("missing '=' in endings item '{item}'"),
                ));
            };
            if name.is_empty() {
                return Err(FlexionError::invalid_format(
                    "endings",
                    format!("empty case name in endings item '{item}'"),
                ));
            }
            if pairs.iter().any(|(n, _)| n == name) {
                return Err(FlexionError::invalid_format(
                    "endings",
                    format!("duplicate case name '{name}' in one rule"),
                ));
            }
            pairs.push((name.to_string(), ending.to_string()));
        }
        Ok(Self::Cases(pairs))
    }
}

/// 格名と連番IDの双方向テーブル。
///
/// IDは1回のコンパイル実行内で安定しており、再利用されません。
/// 同じ名前の再登録は何もしません。
#[derive(Default)]
pub(crate) struct CaseRegistry {
    ids: HashMap<String, u32>,
    names: Vec<String>,
}

impl CaseRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 語尾ルールに現れるすべての格名を登録します。
    ///
    /// `Fixed`ルールは何も登録しません。未知の格名には次の連番IDが
    /// 割り当てられます。
    pub(crate) fn register_rule(&mut self, rule: &EndingsRule) {
        let EndingsRule::Cases(pairs) = rule else {
            return;
        };
        for (name, _) in pairs {
            if !self.ids.contains_key(name) {
                let id = self.names.len() as u32;
                self.ids.insert(name.clone(), id);
                self.names.push(name.clone());
            }
        }
    }

    /// 格名に対応するIDを検索します。
    #[inline(always)]
    pub(crate) fn id_of(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    /// 登録済みの格数を返します。
    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    /// ID順の格名スライスを返します。
    #[inline(always)]
    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }
}
