//! 最長一致による語形変化
//!
//! コンパイル済みテーブルを歩いて、名前・姓を指定された格へ変化させる
//! ランタイムです。アーカイブ版と所有版のどちらのテーブルに対しても
//! 同じコードで動作します。
//!
//! 照合は語の末尾からの逆順バイト走査です。リテラル遷移を辿れる限り
//! 辿り、途中のワイルドカード終端と、不一致または語の尽きた時点での
//! 番兵遷移(バイト0)を候補として記録します。最も深い候補が勝ちます。
//! 一致した語は、終端の`tail_len`バイトを格ごとの語尾で置き換えて
//! 変化します。

use crate::tables::language::{NodeRecord, SENTINEL_BYTE};
use crate::tables::{FlexData, LangRef};

/// 変化対象の語の種別。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WordKind {
    /// 名前
    Name,
    /// 姓
    Surname,
}

/// 文法上の性。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Gender {
    /// 男性形
    Male,
    /// 女性形
    Female,
}

/// コンパイル済みテーブルを用いた語形変化器。
pub struct Inflector {
    data: FlexData,
}

impl Inflector {
    /// テーブルから語形変化器を作成します。
    pub fn new(data: FlexData) -> Self {
        Self { data }
    }

    /// 内部テーブルへの参照を取得します。
    #[inline(always)]
    pub fn data(&self) -> &FlexData {
        &self.data
    }

    /// 語を指定された格へ変化させます。
    ///
    /// ルールが適用できない場合(未知の言語ID、対象外の語、`fixed`
    /// ルール、未指定の格)は語を変えずに返します。
    ///
    /// ハイフンで結合された複合語は区切りごとに変化します。最後の
    /// 区切り以外では、終端のハイフン分岐が優先的に参照されます。
    pub fn inflect(
        &self,
        language_id: u32,
        kind: WordKind,
        gender: Gender,
        case_id: u32,
        word: &str,
    ) -> String {
        let data = self.data.as_ref();
        let Some(lang) = data.lang(language_id) else {
            return word.to_string();
        };
        let root = match kind {
            WordKind::Name => lang.names_root(),
            WordKind::Surname => lang.surnames_root(),
        };
        let Some(root) = root else {
            return word.to_string();
        };

        let segments: Vec<&str> = word.split('-').collect();
        let last = segments.len() - 1;
        let mut out = String::with_capacity(word.len());
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                out.push('-');
            }
            match inflect_segment(lang, root, gender, case_id, segment, i < last) {
                Some(inflected) => out.push_str(&inflected),
                None => out.push_str(segment),
            }
        }
        out
    }
}

/// 1区切り分の語を変化させます。適用できなければ`None`を返します。
fn inflect_segment(
    lang: LangRef,
    root: u32,
    gender: Gender,
    case_id: u32,
    segment: &str,
    hyphen: bool,
) -> Option<String> {
    if segment.is_empty() || !is_flexible(lang, segment) {
        return None;
    }

    let bytes = segment.as_bytes();
    let rec = lookup(lang, root, bytes, hyphen)?;

    if case_id >= lang.case_count() {
        return None;
    }
    let base = match gender {
        Gender::Male => rec.male_endings,
        Gender::Female => rec.female_endings,
    };
    if base < 0 {
        // A fixed rule: the word never changes.
        return None;
    }
    let ending = lang.ending(base as usize + case_id as usize)?;

    let tail = rec.tail_len as usize;
    if tail > bytes.len() {
        return None;
    }
    let mut out = Vec::with_capacity(bytes.len() - tail + ending.len());
    out.extend_from_slice(&bytes[..bytes.len() - tail]);
    out.extend_from_slice(ending.as_bytes());
    String::from_utf8(out).ok()
}

/// 語の末尾文字が言語の対象文字集合に含まれるかを判定します。
///
/// 空の集合は制限なしとして扱われます。
fn is_flexible(lang: LangRef, segment: &str) -> bool {
    let flexible = lang.flexible_symbols();
    if flexible.is_empty() {
        return true;
    }
    segment
        .chars()
        .next_back()
        .is_some_and(|c| flexible.contains(c))
}

/// 逆順バイト走査で最も深い適用可能な終端を検索します。
///
/// 訪れた各ノードで、そのノード自身の終端(ワイルドカードルール)と
/// 番兵遷移の先(素の語尾ルール)を候補として記録します。より深くまで
/// 辿れた候補が先の候補を上書きするため、最長一致になります。途中で
/// 不一致になっても、それまでに記録した候補へフォールバックします。
fn lookup(lang: LangRef, root: u32, bytes: &[u8], hyphen: bool) -> Option<NodeRecord> {
    let mut best = None;
    let mut cursor = root;
    let mut node = lang.node(cursor);
    let mut exhausted = true;

    for &b in bytes.iter().rev() {
        if let Some(t) = applicable_terminal(lang, cursor, &node, hyphen) {
            best = Some(t);
        }
        note_sentinel(lang, &node, hyphen, &mut best);
        match lang.find_child(&node, b) {
            Some(next) => {
                cursor = next;
                node = lang.node(cursor);
            }
            None => {
                exhausted = false;
                break;
            }
        }
    }
    if exhausted {
        if let Some(t) = applicable_terminal(lang, cursor, &node, hyphen) {
            best = Some(t);
        }
        note_sentinel(lang, &node, hyphen, &mut best);
    }

    let rec = lang.node(best?);
    rec.is_terminal().then_some(rec)
}

/// ノードの番兵遷移の先を候補に加えます。
fn note_sentinel(lang: LangRef, node: &NodeRecord, hyphen: bool, best: &mut Option<u32>) {
    if let Some(s) = lang.find_child(node, SENTINEL_BYTE) {
        let s_node = lang.node(s);
        if let Some(t) = applicable_terminal(lang, s, &s_node, hyphen) {
            *best = Some(t);
        }
    }
}

/// このノードで適用できる終端を返します。
///
/// ハイフン区切りの照合ではハイフン分岐が優先され、分岐が無ければ
/// 主終端へフォールバックします。
fn applicable_terminal(lang: LangRef, node_id: u32, rec: &NodeRecord, hyphen: bool) -> Option<u32> {
    if hyphen && rec.hyphen >= 0 {
        let h = rec.hyphen as u32;
        if lang.node(h).is_terminal() {
            return Some(h);
        }
    }
    rec.is_terminal().then_some(node_id)
}
