//! 語尾パターンの解析
//!
//! 1つのパターン文字列を、トライ挿入に必要な情報へ分解します。
//! パターンは最後のバイトから先頭に向かって走査されます:
//!
//! - `*` はワイルドカードです。これより前(文字列の左側)のバイトは
//!   トライ遷移として消費されません。
//! - 末尾の `-` はハイフン分岐を指定します。それ以外の位置の `-` は
//!   通常のリテラルです。
//! - `(` と `)` で囲まれた領域は、置換対象となる末尾長を明示します。
//!   許される領域は1つだけです。
//! - その他のバイトはリテラル遷移として右から左の順に記録されます。

use crate::errors::PatternError;

/// 解析済みパターン。
///
/// `walk`は根から葉へ辿る順(元のパターンの右から左)の遷移バイト列です。
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct ParsedPattern {
    /// トライ遷移バイト列(逆順接尾辞)
    pub(crate) walk: Vec<u8>,
    /// ワイルドカードの有無
    pub(crate) has_wildcard: bool,
    /// 末尾ハイフンの有無
    pub(crate) has_hyphen: bool,
    /// 括弧領域から得た末尾長。括弧が無ければ`None`
    pub(crate) tail_override: Option<u32>,
}

impl ParsedPattern {
    /// このパターンの末尾長を返します。
    ///
    /// 括弧領域があればその長さ、無ければリテラル遷移の総数です。
    #[inline(always)]
    pub(crate) fn tail_len(&self) -> u32 {
        self.tail_override.unwrap_or(self.walk.len() as u32)
    }
}

/// パターン文字列を解析します。
///
/// # エラー
///
/// 括弧の対応が取れていない場合は[`PatternError::UnbalancedBracket`]を、
/// 括弧領域が複数ある場合は[`PatternError::MultipleBracketRegions`]を
/// 返します。
pub(crate) fn parse(pattern: &str) -> Result<ParsedPattern, PatternError> {
    let bytes = pattern.as_bytes();

    let mut walk = vec![];
    let mut has_wildcard = false;
    let mut has_hyphen = false;
    let mut in_bracket = false;
    let mut bracket_done = false;
    let mut bracket_len = 0u32;

    for (i, &b) in bytes.iter().enumerate().rev() {
        match b {
            b'*' => {
                has_wildcard = true;
            }
            b'-' if i + 1 == bytes.len() => {
                // A hyphen is special only as the final character.
                has_hyphen = true;
            }
            b')' => {
                if in_bracket {
                    return Err(PatternError::UnbalancedBracket {
                        pattern: pattern.to_string(),
                    });
                }
                if bracket_done {
                    return Err(PatternError::MultipleBracketRegions {
                        pattern: pattern.to_string(),
                    });
                }
                in_bracket = true;
            }
            b'(' => {
                if !in_bracket {
                    return Err(PatternError::UnbalancedBracket {
                        pattern: pattern.to_string(),
                    });
                }
                in_bracket = false;
                bracket_done = true;
            }
            _ => {
                if in_bracket {
                    bracket_len += 1;
                }
                if !has_wildcard {
                    walk.push(b);
                }
            }
        }
    }

    if in_bracket {
        return Err(PatternError::UnbalancedBracket {
            pattern: pattern.to_string(),
        });
    }

    Ok(ParsedPattern {
        walk,
        has_wildcard,
        has_hyphen,
        tail_override: bracket_done.then_some(bracket_len),
    })
}
