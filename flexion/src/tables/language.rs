//! 言語別テーブルのデータモデル
//!
//! 1言語分のコンパイル結果は、相互にインデックスで参照し合う3つの
//! フラットな配列として表現されます:
//!
//! - 遷移配列: `(バイト値, 子ノードID)`のペアをノード作成順に並べたもの
//! - 語尾配列: 終端ノードごとに`case_count`個のスロットを占める語尾文字列
//! - ノード配列: ノード作成順のレコード(末尾長、ハイフン分岐、語尾ベース、
//!   遷移範囲)
//!
//! ノードIDは作成順の配列位置そのものです。

use rkyv::{Archive, Deserialize, Serialize};

use crate::tables::LangRef;
use crate::utils::FromU32;

/// 非終端ノードを表す`tail_len`の番兵値。
pub const NOT_TERMINAL: i32 = -1;

/// ハイフン分岐が無いことを表す番兵値。
pub const NO_HYPHEN: i32 = -1;

/// 語尾を持たない(fixed)ことを表す語尾ベースの番兵値。
pub const NO_ENDINGS: i32 = -1;

/// ワイルドカード無しパターンの終端を区別するための予約バイト値。
///
/// 素の語尾そのもの(より長い語尾の接頭辞ではない)にマッチしたことを
/// 表す合成遷移に使われます。
pub const SENTINEL_BYTE: u8 = 0;

/// 遷移配列の1エントリ。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Clone, Copy, Debug))]
pub struct Transition {
    /// 次に読むバイト値
    pub byte: u8,
    /// 遷移先ノードID
    pub target: u32,
}

/// ノード配列の1レコード。
///
/// `tail_len == -1`は非終端を表します。`hyphen`と語尾ベースの`-1`は
/// それぞれ分岐無し・語尾無し(fixed)を表します。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Clone, Copy, Debug))]
pub struct NodeRecord {
    /// 置換対象となる末尾のバイト数。非終端は-1
    pub tail_len: i32,
    /// ハイフン分岐先のノードID。分岐が無ければ-1
    pub hyphen: i32,
    /// 男性形語尾の語尾配列内ベースオフセット。fixedは-1
    pub male_endings: i32,
    /// 女性形語尾の語尾配列内ベースオフセット。fixedは-1
    pub female_endings: i32,
    /// このノードの遷移範囲の開始(遷移配列内)
    pub children_start: u32,
    /// このノードの遷移範囲の終了(排他的)
    pub children_end: u32,
}

impl NodeRecord {
    /// このノードが終端かどうかを返します。
    #[inline(always)]
    pub const fn is_terminal(&self) -> bool {
        self.tail_len >= 0
    }
}

impl ArchivedTransition {
    /// アーカイブされた遷移をネイティブ表現に変換します。
    #[inline(always)]
    pub fn to_native(&self) -> Transition {
        Transition {
            byte: self.byte,
            target: self.target.to_native(),
        }
    }
}

impl ArchivedNodeRecord {
    /// アーカイブされたノードレコードをネイティブ表現に変換します。
    #[inline(always)]
    pub fn to_native(&self) -> NodeRecord {
        NodeRecord {
            tail_len: self.tail_len.to_native(),
            hyphen: self.hyphen.to_native(),
            male_endings: self.male_endings.to_native(),
            female_endings: self.female_endings.to_native(),
            children_start: self.children_start.to_native(),
            children_end: self.children_end.to_native(),
        }
    }
}

/// 1言語分のコンパイル済みテーブル。
#[derive(Archive, Serialize, Deserialize)]
pub struct LangData {
    /// 言語ID
    pub(crate) language_id: u32,
    /// 語形変化の対象となる末尾文字の集合
    pub(crate) flexible_symbols: String,
    /// 名前用トライの根ノードID。名前ルールが無い言語では`None`
    pub(crate) names_root: Option<u32>,
    /// 姓用トライの根ノードID。姓ルールが無い言語では`None`
    pub(crate) surnames_root: Option<u32>,
    /// この言語のシリアライズ時点での格数(語尾配列のストライド)
    pub(crate) case_count: u32,
    /// 遷移配列
    pub(crate) children: Vec<Transition>,
    /// 語尾配列。未指定の格は`None`
    pub(crate) endings: Vec<Option<String>>,
    /// ノード配列
    pub(crate) nodes: Vec<NodeRecord>,
}

impl<'a> LangRef<'a> {
    /// 言語IDを取得します。
    #[inline(always)]
    pub fn language_id(self) -> u32 {
        match self {
            Self::Archived(data) => data.language_id.to_native(),
            Self::Owned(data) => data.language_id,
        }
    }

    /// 語形変化対象の末尾文字集合を取得します。
    #[inline(always)]
    pub fn flexible_symbols(self) -> &'a str {
        match self {
            Self::Archived(data) => data.flexible_symbols.as_str(),
            Self::Owned(data) => data.flexible_symbols.as_str(),
        }
    }

    /// 名前用トライの根ノードIDを取得します。
    #[inline(always)]
    pub fn names_root(self) -> Option<u32> {
        match self {
            Self::Archived(data) => data.names_root.as_ref().map(|r| r.to_native()),
            Self::Owned(data) => data.names_root,
        }
    }

    /// 姓用トライの根ノードIDを取得します。
    #[inline(always)]
    pub fn surnames_root(self) -> Option<u32> {
        match self {
            Self::Archived(data) => data.surnames_root.as_ref().map(|r| r.to_native()),
            Self::Owned(data) => data.surnames_root,
        }
    }

    /// この言語の格数(語尾配列のストライド)を取得します。
    #[inline(always)]
    pub fn case_count(self) -> u32 {
        match self {
            Self::Archived(data) => data.case_count.to_native(),
            Self::Owned(data) => data.case_count,
        }
    }

    /// ノード数を取得します。
    #[inline(always)]
    pub fn num_nodes(self) -> usize {
        match self {
            Self::Archived(data) => data.nodes.len(),
            Self::Owned(data) => data.nodes.len(),
        }
    }

    /// 遷移配列の長さを取得します。
    #[inline(always)]
    pub fn num_transitions(self) -> usize {
        match self {
            Self::Archived(data) => data.children.len(),
            Self::Owned(data) => data.children.len(),
        }
    }

    /// 語尾配列の長さを取得します。
    #[inline(always)]
    pub fn num_endings(self) -> usize {
        match self {
            Self::Archived(data) => data.endings.len(),
            Self::Owned(data) => data.endings.len(),
        }
    }

    /// 指定したノードのレコードを取得します。
    #[inline(always)]
    pub fn node(self, node_id: u32) -> NodeRecord {
        match self {
            Self::Archived(data) => data.nodes[usize::from_u32(node_id)].to_native(),
            Self::Owned(data) => data.nodes[usize::from_u32(node_id)],
        }
    }

    /// 遷移配列のエントリを取得します。
    #[inline(always)]
    pub fn transition(self, index: usize) -> Transition {
        match self {
            Self::Archived(data) => data.children[index].to_native(),
            Self::Owned(data) => data.children[index],
        }
    }

    /// 語尾配列のスロットを取得します。未指定の格は`None`を返します。
    #[inline(always)]
    pub fn ending(self, index: usize) -> Option<&'a str> {
        match self {
            Self::Archived(data) => data.endings[index].as_ref().map(|e| e.as_str()),
            Self::Owned(data) => data.endings[index].as_ref().map(|e| e.as_str()),
        }
    }

    /// ノードの遷移範囲を線形走査して、指定バイトの子ノードを検索します。
    ///
    /// 遷移範囲はノードごとに連続しているため、補助インデックスなしの
    /// 線形走査で完結します。
    pub fn find_child(self, node: &NodeRecord, byte: u8) -> Option<u32> {
        for i in node.children_start..node.children_end {
            let t = self.transition(usize::from_u32(i));
            if t.byte == byte {
                return Some(t.target);
            }
        }
        None
    }
}
