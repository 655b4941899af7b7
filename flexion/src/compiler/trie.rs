//! 逆順接尾辞トライの構築
//!
//! パターンを逆順のバイト列としてトライに挿入します。ノードはアリーナ
//! (`Vec`)に置かれ、IDは作成順の配列位置です。名前用と姓用の2つの
//! 根ノードが常に確保されます。
//!
//! ワイルドカードの無いパターンには予約バイト0の合成遷移を追加し、
//! 「この語尾そのもの」と「この語尾で終わるより長い語尾」を区別します。
//! 末尾ハイフン付きのパターンは、到達ノードのハイフン分岐へ付け替えて
//! から終端化します。

use std::collections::BTreeMap;

use crate::compiler::cases::{CaseRegistry, EndingsRule};
use crate::compiler::pattern;
use crate::errors::Result;
use crate::tables::language::SENTINEL_BYTE;
use crate::utils::FromU32;

/// 名前用トライの根ノードID。
pub(crate) const NAMES_ROOT: u32 = 0;

/// 姓用トライの根ノードID。
pub(crate) const SURNAMES_ROOT: u32 = 1;

/// 終端ノードに記録されるルールデータ。
#[derive(Debug)]
pub(crate) struct TerminalRule {
    /// 置換対象となる末尾のバイト数
    pub(crate) tail_len: u32,
    /// 男性形の語尾ルール
    pub(crate) male: EndingsRule,
    /// 女性形の語尾ルール
    pub(crate) female: EndingsRule,
    /// 重複診断用の元パターン
    pub(crate) source_pattern: String,
}

/// トライの1ノード。
///
/// 根以外のすべてのノードは、ちょうど1つの親からバイト遷移または
/// ハイフン分岐で到達されます。
#[derive(Default, Debug)]
pub(crate) struct TrieNode {
    /// バイト値で引く疎な子テーブル。昇順走査がシリアライズ順を決める
    pub(crate) children: BTreeMap<u8, u32>,
    /// ハイフン分岐先のノードID
    pub(crate) hyphen_child: Option<u32>,
    /// 終端ルール。`None`は非終端
    pub(crate) terminal: Option<TerminalRule>,
}

/// 同一終端への重複登録の診断。
///
/// 重複は致命的ではなく、先に登録されたルールが保持されます。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DuplicateRule {
    /// 後から登録され、無視されたパターン
    pub pattern: String,
    /// 先に同じ終端を作ったパターン
    pub first_pattern: String,
}

/// 逆順接尾辞トライ。
///
/// 1言語分のパターンを保持し、シリアライズ後に破棄されます。
pub(crate) struct SuffixTrie {
    nodes: Vec<TrieNode>,
    hyphen_node_count: usize,
    duplicates: Vec<DuplicateRule>,
}

impl SuffixTrie {
    /// 2つの根ノードだけを持つ空のトライを作成します。
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default(), TrieNode::default()],
            hyphen_node_count: 0,
            duplicates: Vec::new(),
        }
    }

    /// パターンを1つ挿入します。
    ///
    /// 格名の登録、パターン解析、トライ走行、終端化までを行います。
    /// 既に終端だった場合はルールを上書きせず、診断を記録します。
    ///
    /// # エラー
    ///
    /// パターンの構文が無効な場合にエラーを返します。
    pub(crate) fn insert(
        &mut self,
        root: u32,
        pat: &str,
        male: &EndingsRule,
        female: &EndingsRule,
        cases: &mut CaseRegistry,
    ) -> Result<()> {
        cases.register_rule(male);
        cases.register_rule(female);

        let parsed = pattern::parse(pat)?;

        let mut cursor = root;
        for &b in &parsed.walk {
            cursor = self.child_or_insert(cursor, b);
        }
        if !parsed.has_wildcard {
            cursor = self.child_or_insert(cursor, SENTINEL_BYTE);
        }
        if parsed.has_hyphen {
            cursor = self.hyphen_child_or_insert(cursor);
        }

        let node = &mut self.nodes[usize::from_u32(cursor)];
        if let Some(existing) = &node.terminal {
            log::warn!(
                "duplicate pattern '{}' ignored; keeping rule from '{}'",
                pat,
                existing.source_pattern
            );
            self.duplicates.push(DuplicateRule {
                pattern: pat.to_string(),
                first_pattern: existing.source_pattern.clone(),
            });
            return Ok(());
        }

        node.terminal = Some(TerminalRule {
            tail_len: parsed.tail_len(),
            male: male.clone(),
            female: female.clone(),
            source_pattern: pat.to_string(),
        });
        Ok(())
    }

    fn child_or_insert(&mut self, node_id: u32, byte: u8) -> u32 {
        if let Some(&child) = self.nodes[usize::from_u32(node_id)].children.get(&byte) {
            return child;
        }
        let child = self.nodes.len() as u32;
        self.nodes.push(TrieNode::default());
        self.nodes[usize::from_u32(node_id)]
            .children
            .insert(byte, child);
        child
    }

    fn hyphen_child_or_insert(&mut self, node_id: u32) -> u32 {
        if let Some(child) = self.nodes[usize::from_u32(node_id)].hyphen_child {
            return child;
        }
        let child = self.nodes.len() as u32;
        self.nodes.push(TrieNode::default());
        self.nodes[usize::from_u32(node_id)].hyphen_child = Some(child);
        self.hyphen_node_count += 1;
        child
    }

    /// ノード配列(作成順)を返します。
    #[inline(always)]
    pub(crate) fn nodes(&self) -> &[TrieNode] {
        &self.nodes
    }

    /// ハイフン分岐で作られたノードの数を返します。
    #[inline(always)]
    pub(crate) fn hyphen_node_count(&self) -> usize {
        self.hyphen_node_count
    }

    /// 記録された重複診断を取り出します。
    pub(crate) fn take_duplicates(&mut self) -> Vec<DuplicateRule> {
        std::mem::take(&mut self.duplicates)
    }
}
