//! 内部ユーティリティ
//!
//! CSV行の解析と、u32のインデックス変換トレイトを提供します。

use csv_core::ReadFieldResult;

/// u32から他の型への変換を提供するトレイト
///
/// ノードIDや格IDなどのu32値を、配列インデックスとして使うための変換です。
pub trait FromU32 {
    /// u32値から実装型を生成する
    fn from_u32(src: u32) -> Self;
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl FromU32 for usize {
    #[inline(always)]
    fn from_u32(src: u32) -> Self {
        // Since the pointer width is guaranteed to be 32 or 64,
        // the following process always succeeds.
        unsafe { Self::try_from(src).unwrap_unchecked() }
    }
}

/// CSV形式の行を解析してフィールドのベクターに分割する
///
/// ダブルクォートで囲まれたフィールドや、フィールド内のカンマも正しく処理します。
///
/// # 例
///
/// ```
/// # use flexion::utils::parse_csv_row;
/// let fields = parse_csv_row("ов|*ёв,nom=ов;gen=ова,fixed");
/// assert_eq!(fields, vec!["ов|*ёв", "nom=ов;gen=ова", "fixed"]);
///
/// let quoted = parse_csv_row("а,\"nom=а;ins=ой,ою\",fixed");
/// assert_eq!(quoted, vec!["а", "nom=а;ins=ой,ою", "fixed"]);
/// ```
pub fn parse_csv_row(row: &str) -> Vec<String> {
    let mut fields = vec![];
    let mut rdr = csv_core::Reader::new();
    let mut bytes = row.as_bytes();
    let mut output = [0; 4096];
    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        let end = match result {
            ReadFieldResult::InputEmpty => true,
            ReadFieldResult::Field { .. } => false,
            ReadFieldResult::End => true,
            _ => unreachable!(),
        };
        fields.push(std::str::from_utf8(&output[..nout]).unwrap().to_string());
        if end {
            break;
        }
        bytes = &bytes[nin..];
    }
    fields
}
