//! トライのフラット化
//!
//! 構築済みトライを1言語分のフラットなテーブル群へ変換します。
//! 件数のみの事前パスで遷移数の整合性を検証してから、本パスで
//! 3つの配列(遷移、語尾、ノード)を作成順に出力します。

use crate::compiler::cases::{CaseRegistry, EndingsRule};
use crate::compiler::trie::{NAMES_ROOT, SURNAMES_ROOT, SuffixTrie};
use crate::errors::{FlexionError, Result};
use crate::tables::language::{LangData, NO_ENDINGS, NO_HYPHEN, NOT_TERMINAL, NodeRecord, Transition};

/// 1言語分のトライをテーブルへフラット化します。
///
/// 根とハイフン分岐ノードを除くすべてのノードは、ちょうど1つの
/// バイト遷移の到達先です。したがって遷移ペアの総数は
/// `ノード数 - ハイフン分岐ノード数 - 2`に一致しなければなりません。
/// 一致しない場合はトライ構築のバグであり、致命的エラーを返します。
///
/// # エラー
///
/// 内部整合性違反の場合に`InvalidState`エラーを返します。
pub(crate) fn serialize_language(
    trie: &SuffixTrie,
    cases: &CaseRegistry,
    language_id: u32,
    flexible_symbols: &str,
    has_names: bool,
    has_surnames: bool,
) -> Result<LangData> {
    let nodes = trie.nodes();

    // Counting pre-pass: the table sizes are fixed before emission.
    let expected = nodes.len() - trie.hyphen_node_count() - 2;
    let total: usize = nodes.iter().map(|n| n.children.len()).sum();
    if total != expected {
        return Err(FlexionError::invalid_state(
            "transition count mismatch while serializing the trie",
            format!("expected {expected} pairs, found {total}"),
        ));
    }

    let case_count = cases.len();
    let mut children = Vec::with_capacity(total);
    let mut endings: Vec<Option<String>> = vec![];
    let mut records = Vec::with_capacity(nodes.len());

    for node in nodes {
        let children_start = children.len() as u32;
        for (&byte, &target) in &node.children {
            children.push(Transition { byte, target });
        }
        let children_end = children.len() as u32;

        let (tail_len, male_endings, female_endings) = match &node.terminal {
            Some(term) => (
                term.tail_len as i32,
                emit_endings(&term.male, cases, &mut endings)?,
                emit_endings(&term.female, cases, &mut endings)?,
            ),
            None => (NOT_TERMINAL, NO_ENDINGS, NO_ENDINGS),
        };

        records.push(NodeRecord {
            tail_len,
            hyphen: node.hyphen_child.map_or(NO_HYPHEN, |c| c as i32),
            male_endings,
            female_endings,
            children_start,
            children_end,
        });
    }

    Ok(LangData {
        language_id,
        flexible_symbols: flexible_symbols.to_string(),
        names_root: has_names.then_some(NAMES_ROOT),
        surnames_root: has_surnames.then_some(SURNAMES_ROOT),
        case_count: case_count as u32,
        children,
        endings,
        nodes: records,
    })
}

/// 語尾ルールを語尾配列へ展開し、ベースオフセットを返します。
///
/// 展開は常に`case_count`個のスロットを消費します。ルールが指定しない
/// 格のスロットは`None`です。`Fixed`ルールは何も出力せず、番兵値を
/// 返します。
fn emit_endings(
    rule: &EndingsRule,
    cases: &CaseRegistry,
    endings: &mut Vec<Option<String>>,
) -> Result<i32> {
    let EndingsRule::Cases(pairs) = rule else {
        return Ok(NO_ENDINGS);
    };

    let base = endings.len();
    endings.resize(base + cases.len(), None);
    for (name, ending) in pairs {
        let Some(case_id) = cases.id_of(name) else {
            // Every case name was registered at insertion time.
            return Err(FlexionError::invalid_state(
                "endings rule references an unregistered case",
                name.clone(),
            ));
        };
        endings[base + case_id as usize] = Some(ending.clone());
    }
    Ok(base as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::cases::CaseRegistry;
    use crate::compiler::trie::SuffixTrie;

    fn rule(s: &str) -> EndingsRule {
        EndingsRule::parse(s).unwrap()
    }

    #[test]
    fn test_empty_trie() {
        let trie = SuffixTrie::new();
        let cases = CaseRegistry::new();
        let lang = serialize_language(&trie, &cases, 7, "", false, false).unwrap();

        assert_eq!(lang.nodes.len(), 2);
        assert!(lang.children.is_empty());
        assert!(lang.endings.is_empty());
        assert_eq!(lang.names_root, None);
        assert_eq!(lang.surnames_root, None);
    }

    #[test]
    fn test_contiguous_ranges() {
        let mut trie = SuffixTrie::new();
        let mut cases = CaseRegistry::new();
        trie.insert(NAMES_ROOT, "ov", &rule("nom=;gen=a"), &EndingsRule::Fixed, &mut cases)
            .unwrap();
        trie.insert(NAMES_ROOT, "ev", &rule("nom=;gen=a"), &EndingsRule::Fixed, &mut cases)
            .unwrap();

        let lang = serialize_language(&trie, &cases, 0, "", true, false).unwrap();

        // Every non-root, non-hyphen node is the target of exactly one pair.
        assert_eq!(lang.children.len(), lang.nodes.len() - 2);

        // Ranges are contiguous and cover the whole array in node order.
        let mut expected_start = 0;
        for record in &lang.nodes {
            assert_eq!(record.children_start, expected_start);
            assert!(record.children_end >= record.children_start);
            expected_start = record.children_end;
        }
        assert_eq!(expected_start as usize, lang.children.len());
    }

    #[test]
    fn test_byte_order_within_node() {
        let mut trie = SuffixTrie::new();
        let mut cases = CaseRegistry::new();
        // Reversed walks all leave the root: z, a, m.
        for p in ["*z", "*a", "*m"] {
            trie.insert(NAMES_ROOT, p, &rule("nom="), &EndingsRule::Fixed, &mut cases)
                .unwrap();
        }

        let lang = serialize_language(&trie, &cases, 0, "", true, false).unwrap();
        let root = lang.nodes[NAMES_ROOT as usize];
        let bytes: Vec<u8> = (root.children_start..root.children_end)
            .map(|i| lang.children[i as usize].byte)
            .collect();
        assert_eq!(bytes, vec![b'a', b'm', b'z']);
    }

    #[test]
    fn test_endings_alignment() {
        let mut trie = SuffixTrie::new();
        let mut cases = CaseRegistry::new();
        trie.insert(
            NAMES_ROOT,
            "ov",
            &rule("nom=;gen=a;dat=u"),
            &rule("gen=oj"),
            &mut cases,
        )
        .unwrap();

        let lang = serialize_language(&trie, &cases, 0, "", true, false).unwrap();
        assert_eq!(lang.case_count, 3);

        let term = lang
            .nodes
            .iter()
            .find(|n| n.is_terminal())
            .expect("terminal node");

        // Male then female, each consuming exactly case_count slots.
        assert_eq!(term.male_endings, 0);
        assert_eq!(term.female_endings, 3);
        assert_eq!(lang.endings.len(), 6);

        assert_eq!(lang.endings[0].as_deref(), Some(""));
        assert_eq!(lang.endings[1].as_deref(), Some("a"));
        assert_eq!(lang.endings[2].as_deref(), Some("u"));
        // The female rule specifies only gen; other slots are absent.
        assert_eq!(lang.endings[3], None);
        assert_eq!(lang.endings[4].as_deref(), Some("oj"));
        assert_eq!(lang.endings[5], None);
    }

    #[test]
    fn test_fixed_rule_emits_nothing() {
        let mut trie = SuffixTrie::new();
        let mut cases = CaseRegistry::new();
        trie.insert(
            SURNAMES_ROOT,
            "o",
            &EndingsRule::Fixed,
            &EndingsRule::Fixed,
            &mut cases,
        )
        .unwrap();

        let lang = serialize_language(&trie, &cases, 0, "", false, true).unwrap();
        let term = lang.nodes.iter().find(|n| n.is_terminal()).unwrap();
        assert_eq!(term.male_endings, NO_ENDINGS);
        assert_eq!(term.female_endings, NO_ENDINGS);
        assert!(lang.endings.is_empty());
    }
}
