//! 語形変化ルールのコンパイラ
//!
//! このモジュールは、言語ごとのルール設定をコンパイル済みテーブルへ
//! 変換するバッチコンパイラを提供します。処理は単一スレッドで、
//! すべての状態は[`RuleCompiler`]が排他的に所有します。
//!
//! 言語ごとに: トライを新規作成し、名前ルールと姓ルールをそれぞれの
//! 根の下へ挿入し、フラット化してテーブルを保存し、トライを破棄します。
//! 格名テーブルと言語テーブルだけが実行全体で共有されます。

mod cases;
mod pattern;
mod rules;
mod serializer;
mod trie;

use hashbrown::HashMap;

use crate::compiler::cases::CaseRegistry;
use crate::compiler::trie::{NAMES_ROOT, SURNAMES_ROOT, SuffixTrie};
use crate::errors::Result;
use crate::tables::FlexDataInner;
use crate::tables::language::LangData;
use crate::utils::FromU32;

pub use crate::compiler::cases::EndingsRule;
pub use crate::compiler::rules::{LanguageConfig, RuleEntry};
pub use crate::compiler::trie::DuplicateRule;

/// 実際の設定の有無にかかわらず言語テーブルに確保される予約言語ID。
///
/// 予約IDの枠は空のプレースホルダとして常に出力されます。
pub const EXTRA_LANGUAGE_IDS: [u32; 6] = [11, 19, 52, 777, 888, 999];

/// 言語コードと数値IDの対応を管理するレジストリ。
///
/// 同じコードの再登録は前の対応を上書きします(設定の上書き用)。
#[derive(Default)]
struct LanguageRegistry {
    by_code: HashMap<String, u32>,
    max_id: Option<u32>,
}

impl LanguageRegistry {
    /// 言語を登録し、数値IDを返します。
    ///
    /// 明示的なIDが無ければ、これまでの最大IDの次の値を割り当てます。
    fn register(&mut self, code: &str, explicit: Option<u32>) -> u32 {
        let id = explicit.unwrap_or_else(|| self.max_id.map_or(0, |m| m + 1));
        self.by_code.insert(code.to_string(), id);
        self.max_id = Some(self.max_id.map_or(id, |m| m.max(id)));
        id
    }
}

/// ルールコンパイラ。
///
/// 1回のコンパイル実行の全状態(格レジストリ、言語レジストリ、
/// コンパイル済みテーブル)を所有します。
#[derive(Default)]
pub struct RuleCompiler {
    cases: CaseRegistry,
    langs: LanguageRegistry,
    compiled: HashMap<u32, LangData>,
}

impl RuleCompiler {
    /// 新しいコンパイラを作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 1言語分のルール設定をコンパイルします。
    ///
    /// 同じ言語IDを再度コンパイルすると前の結果を上書きします
    /// (後勝ち)。戻り値は重複パターンの診断です。重複は致命的では
    /// なく、先に登録されたルールが保持されます。
    ///
    /// # エラー
    ///
    /// パターンの構文が無効な場合、またはシリアライズ時の内部整合性
    /// 違反の場合にエラーを返します。部分的な結果は保存されません。
    pub fn compile_language(&mut self, config: &LanguageConfig) -> Result<Vec<DuplicateRule>> {
        let language_id = self.langs.register(&config.code, config.language_id);

        // The trie lives only for this language; the registries persist.
        let mut trie = SuffixTrie::new();

        if let Some(entries) = &config.names {
            Self::insert_entries(&mut trie, NAMES_ROOT, entries, &mut self.cases)?;
        }
        if let Some(entries) = &config.surnames {
            Self::insert_entries(&mut trie, SURNAMES_ROOT, entries, &mut self.cases)?;
        }

        let lang = serializer::serialize_language(
            &trie,
            &self.cases,
            language_id,
            &config.flexible_symbols,
            config.names.is_some(),
            config.surnames.is_some(),
        )?;

        self.compiled.insert(language_id, lang);
        Ok(trie.take_duplicates())
    }

    fn insert_entries(
        trie: &mut SuffixTrie,
        root: u32,
        entries: &[RuleEntry],
        cases: &mut CaseRegistry,
    ) -> Result<()> {
        for entry in entries {
            for pattern in &entry.patterns {
                trie.insert(root, pattern, &entry.male, &entry.female, cases)?;
            }
        }
        Ok(())
    }

    /// すべての言語の処理を終え、最終的なテーブルデータを出力します。
    ///
    /// 予約言語IDの枠を確保した上で、`最大言語ID + 1`の長さの疎な
    /// 言語テーブルと、ID順の格名テーブルを組み立てます。
    pub fn finish(self) -> FlexDataInner {
        let max_id = self
            .compiled
            .keys()
            .copied()
            .chain(EXTRA_LANGUAGE_IDS)
            .fold(0, u32::max);

        let mut langs: Vec<Option<LangData>> = Vec::new();
        langs.resize_with(usize::from_u32(max_id) + 1, || None);
        for (id, lang) in self.compiled {
            langs[usize::from_u32(id)] = Some(lang);
        }

        FlexDataInner::new(self.cases.names().to_vec(), langs)
    }

    /// これまでに登録された格の数を返します。
    #[inline(always)]
    pub fn num_cases(&self) -> usize {
        self.cases.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_registry_auto_ids() {
        let mut reg = LanguageRegistry::default();
        assert_eq!(reg.register("ru", None), 0);
        assert_eq!(reg.register("uk", None), 1);
        assert_eq!(reg.register("kk", Some(52)), 52);
        assert_eq!(reg.register("be", None), 53);
    }

    #[test]
    fn test_language_registry_overwrite() {
        let mut reg = LanguageRegistry::default();
        assert_eq!(reg.register("ru", Some(2)), 2);
        // Re-registering re-points the code; last write wins.
        assert_eq!(reg.register("ru", Some(5)), 5);
        assert_eq!(reg.by_code["ru"], 5);
    }

    #[test]
    fn test_reserved_slots_always_present() {
        let compiler = RuleCompiler::new();
        let data = compiler.finish();
        assert_eq!(data.langs().len(), 1000);
        assert!(data.langs().iter().all(Option::is_none));
    }
}
