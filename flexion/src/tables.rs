//! コンパイル済み語形変化テーブル
//!
//! このモジュールは、ルールコンパイラが出力する語形変化テーブルの
//! データモデルとファイルフォーマットを提供します。
//!
//! - 全言語で共有される格名テーブル
//! - 言語IDで引く疎な言語別テーブル(未使用IDは`None`)
//! - rkyvによるゼロコピーデシリアライゼーション
//!
//! # テーブルの読み込み方法
//!
//! - [`FlexData::from_path`]: 非圧縮ファイルをメモリマップで読み込む
//! - [`FlexData::read`]: リーダーから読み込む
//! - [`FlexData::from_zstd_reader`]: Zstandard圧縮ファイルを読み込む

pub mod language;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;
use rkyv::rancor::Error;
use rkyv::util::AlignedVec;
use rkyv::{
    Archive, Deserialize, Serialize, access, api::serialize_using, ser::Serializer,
    ser::allocator::Arena, ser::sharing::Share, ser::writer::IoWriter, util::with_arena,
};

use crate::errors::{FlexionError, Result};
use crate::tables::language::{ArchivedLangData, LangData};
use crate::utils::FromU32;

/// 語形変化テーブルファイルを識別するマジックバイト。
///
/// "0.1"はテーブルフォーマットのバージョンを示しており、
/// クレートのセマンティックバージョンからは切り離されています。
pub const MODEL_MAGIC: &[u8] = b"FlexionTables 0.1\n";

const MODEL_MAGIC_LEN: usize = MODEL_MAGIC.len();
const RKYV_ALIGNMENT: usize = 16;
const PADDING_LEN: usize = (RKYV_ALIGNMENT - (MODEL_MAGIC_LEN % RKYV_ALIGNMENT)) % RKYV_ALIGNMENT;
const DATA_START: usize = MODEL_MAGIC_LEN + PADDING_LEN;

/// [`FlexData`]の内部データ。
///
/// 全言語分のコンパイル結果を保持する構造体です。
#[derive(Archive, Serialize, Deserialize)]
pub struct FlexDataInner {
    /// 格IDで引く格名テーブル(全言語で共有)
    cases: Vec<String>,
    /// 言語IDで引く言語別テーブル。未使用のIDは`None`
    langs: Vec<Option<LangData>>,
}

impl FlexDataInner {
    pub(crate) fn new(cases: Vec<String>, langs: Vec<Option<LangData>>) -> Self {
        Self { cases, langs }
    }

    /// 格名テーブルへの参照を取得します。
    #[inline(always)]
    pub fn cases(&self) -> &[String] {
        &self.cases
    }

    /// 言語別テーブルへの参照を取得します。
    #[inline(always)]
    pub fn langs(&self) -> &[Option<LangData>] {
        &self.langs
    }

    /// テーブルデータを`rkyv`フォーマットを使用してライターにシリアライズします。
    ///
    /// この関数の出力バイナリは、[`FlexData::read`]などの読み込みメソッドが
    /// 期待する形式です。
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - 基礎となる`writer`への書き込みに失敗した場合。
    /// - `rkyv`シリアライゼーションプロセスでエラーが発生した場合。
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        wtr.write_all(MODEL_MAGIC)?;

        let padding_bytes = vec![0xFF; PADDING_LEN];
        wtr.write_all(&padding_bytes)?;

        with_arena(|arena: &mut Arena| {
            let writer = IoWriter::new(&mut wtr);
            let mut serializer = Serializer::new(writer, arena.acquire(), Share::new());
            serialize_using::<_, rkyv::rancor::Error>(self, &mut serializer)
        })
        .map_err(|e| {
            FlexionError::invalid_state("rkyv serialization failed".to_string(), e.to_string())
        })?;

        Ok(())
    }
}

/// メモリバッファ(mmapまたはヒープ)を所有するラッパー。
#[allow(dead_code)]
enum DataBuffer {
    Mmap(Mmap),
    Aligned(AlignedVec<16>),
}

/// 読み取り専用の語形変化テーブル。
///
/// 2つのバリアントがあります:
/// - `Archived`: メモリマップまたはアライメント済みバッファから
///   ゼロコピーでアクセスされるテーブル
/// - `Owned`: ヒープ上に所有されるテーブル(コンパイル直後などに使用)
pub enum FlexData {
    Archived(ArchivedFlexData),
    Owned(Arc<FlexDataInner>),
}

/// アーカイブ形式の語形変化テーブル。
///
/// メモリバッファとアーカイブされたテーブルデータへの参照を保持します。
pub struct ArchivedFlexData {
    _buffer: DataBuffer,
    data: &'static ArchivedFlexDataInner,
}

/// テーブル内部データへの参照(アーカイブ版または所有版)。
///
/// アーカイブ版と所有版の両方に対して統一的なインターフェースを提供します。
#[derive(Clone, Copy)]
pub enum FlexDataRef<'a> {
    Archived(&'a ArchivedFlexDataInner),
    Owned(&'a FlexDataInner),
}

impl FlexData {
    /// `FlexDataInner`からテーブルを作成します。
    pub fn from_inner(data: FlexDataInner) -> Self {
        Self::Owned(Arc::new(data))
    }

    /// テーブルデータを`rkyv`フォーマットを使用してライターにシリアライズします。
    ///
    /// # Panics
    ///
    /// `FlexData::Archived`バリアントでこのメソッドが呼び出された場合にパニックします。
    pub fn write<W>(&self, wtr: W) -> Result<()>
    where
        W: Write,
    {
        match self {
            FlexData::Owned(data) => data.write(wtr),
            FlexData::Archived(_) => unreachable!(),
        }
    }

    /// すべてのデータをヒープバッファに読み込むことで、リーダーからテーブルを作成します。
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - データを読み込めない場合。
    /// - マジックバイトが一致しない場合。
    /// - rkyvの検証に失敗した場合。
    pub fn read<R: Read>(mut rdr: R) -> Result<Self> {
        let mut magic = [0; MODEL_MAGIC_LEN];
        rdr.read_exact(&mut magic)?;

        if !magic.starts_with(MODEL_MAGIC) {
            return Err(FlexionError::invalid_argument(
                "rdr",
                "The magic number of the input model mismatches.",
            ));
        }

        let mut padding_buf = vec![0; PADDING_LEN];
        rdr.read_exact(&mut padding_buf)?;

        let mut buffer = Vec::new();
        rdr.read_to_end(&mut buffer)?;

        let mut aligned_bytes = AlignedVec::with_capacity(buffer.len());
        aligned_bytes.extend_from_slice(&buffer);

        Self::from_aligned(DataBuffer::Aligned(aligned_bytes))
    }

    /// Zstandard圧縮されたテーブルをリーダーから読み込みます。
    pub fn from_zstd_reader<R: Read>(rdr: R) -> Result<Self> {
        let decoder = zstd::Decoder::new(rdr)?;
        Self::read(decoder)
    }

    /// ファイルパスから非圧縮のテーブルをメモリマップで読み込みます。
    ///
    /// ファイル全体をヒープにコピーしないため、[`FlexData::read`]よりも
    /// メモリ効率に優れます。
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - ファイルを開けない、またはマップできない場合。
    /// - マジックバイトが一致しない場合。
    /// - rkyvの検証に失敗した場合。
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;

        // SAFETY: the file is treated as read-only for the lifetime of the map.
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < DATA_START || !mmap.starts_with(MODEL_MAGIC) {
            return Err(FlexionError::invalid_argument(
                "path",
                "The magic number of the input model mismatches.",
            ));
        }

        Self::from_aligned(DataBuffer::Mmap(mmap))
    }

    fn from_aligned(buffer: DataBuffer) -> Result<Self> {
        let bytes: &[u8] = match &buffer {
            DataBuffer::Mmap(mmap) => &mmap[DATA_START..],
            DataBuffer::Aligned(aligned) => aligned,
        };

        let archived = access::<ArchivedFlexDataInner, Error>(bytes).map_err(|e| {
            FlexionError::invalid_state(
                "rkyv validation failed. The table file may be corrupted or incompatible."
                    .to_string(),
                e.to_string(),
            )
        })?;

        // SAFETY: the buffer is owned by the returned value and outlives the
        // reference, which is never exposed with the 'static lifetime.
        let data: &'static ArchivedFlexDataInner =
            unsafe { &*(archived as *const ArchivedFlexDataInner) };

        Ok(Self::Archived(ArchivedFlexData {
            _buffer: buffer,
            data,
        }))
    }

    /// 内部データへの参照を取得します。
    #[inline(always)]
    pub fn as_ref(&self) -> FlexDataRef<'_> {
        match self {
            FlexData::Archived(archived) => FlexDataRef::Archived(archived.data),
            FlexData::Owned(data) => FlexDataRef::Owned(data),
        }
    }

    /// 格名に対応する格IDを検索します。
    #[inline(always)]
    pub fn case_id(&self, name: &str) -> Option<u32> {
        self.as_ref().case_id(name)
    }
}

impl<'a> FlexDataRef<'a> {
    /// 格名テーブルのエントリ数を取得します。
    pub fn num_cases(self) -> usize {
        match self {
            Self::Archived(data) => data.cases.len(),
            Self::Owned(data) => data.cases.len(),
        }
    }

    /// 格IDに対応する格名を取得します。
    pub fn case_name(self, case_id: u32) -> Option<&'a str> {
        match self {
            Self::Archived(data) => data.cases.get(usize::from_u32(case_id)).map(|s| s.as_str()),
            Self::Owned(data) => data.cases.get(usize::from_u32(case_id)).map(|s| s.as_str()),
        }
    }

    /// 格名に対応する格IDを検索します。
    ///
    /// 格名テーブルは小さいため線形探索で十分です。
    pub fn case_id(self, name: &str) -> Option<u32> {
        let found = match self {
            Self::Archived(data) => data.cases.iter().position(|c| c.as_str() == name),
            Self::Owned(data) => data.cases.iter().position(|c| c.as_str() == name),
        };
        found.map(|i| i as u32)
    }

    /// 言語テーブルの長さ(`最大言語ID + 1`)を取得します。
    pub fn num_langs(self) -> usize {
        match self {
            Self::Archived(data) => data.langs.len(),
            Self::Owned(data) => data.langs.len(),
        }
    }

    /// 言語IDに対応する言語テーブルを取得します。
    ///
    /// IDが範囲外の場合、またはそのIDが未使用の場合は`None`を返します。
    pub fn lang(self, language_id: u32) -> Option<LangRef<'a>> {
        match self {
            Self::Archived(data) => data
                .langs
                .get(usize::from_u32(language_id))
                .and_then(|l| l.as_ref())
                .map(LangRef::Archived),
            Self::Owned(data) => data
                .langs
                .get(usize::from_u32(language_id))
                .and_then(|l| l.as_ref())
                .map(LangRef::Owned),
        }
    }
}

/// 言語別テーブルへの参照(アーカイブ版または所有版)。
#[derive(Clone, Copy)]
pub enum LangRef<'a> {
    Archived(&'a ArchivedLangData),
    Owned(&'a LangData),
}
