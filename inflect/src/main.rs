//! 語形変化を実行するユーティリティ
//!
//! このバイナリは、標準入力から読み込んだ語(名前または姓)を
//! コンパイル済みテーブルで変化させ、指定された格の形を出力します。

use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use flexion::{FlexData, Gender, Inflector, WordKind};

use clap::Parser;

/// 語の種別の引数表現
#[derive(Clone, Debug)]
enum KindArg {
    Name,
    Surname,
}

impl FromStr for KindArg {
    type Err = &'static str;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "name" => Ok(Self::Name),
            "surname" => Ok(Self::Surname),
            _ => Err("Could not parse a kind"),
        }
    }
}

/// 性の引数表現
#[derive(Clone, Debug)]
enum GenderArg {
    Male,
    Female,
}

impl FromStr for GenderArg {
    type Err = &'static str;

    fn from_str(gender: &str) -> Result<Self, Self::Err> {
        match gender {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err("Could not parse a gender"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "inflect", about = "Inflects personal names")]
struct Args {
    /// Compiled flexion table (in zstd).
    #[clap(short = 'i', long)]
    table: PathBuf,

    /// Numeric language id.
    #[clap(short = 'l', long)]
    language: u32,

    /// Word kind. Choices are name and surname.
    #[clap(short = 'k', long, default_value = "surname")]
    kind: KindArg,

    /// Grammatical gender. Choices are male and female.
    #[clap(short = 'g', long, default_value = "male")]
    gender: GenderArg,

    /// Grammatical case name. Omit to print all cases.
    #[clap(short = 'c', long)]
    case: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    eprintln!("Loading the table...");
    let data = FlexData::from_zstd_reader(File::open(&args.table)?)?;
    let inflector = Inflector::new(data);

    let kind = match args.kind {
        KindArg::Name => WordKind::Name,
        KindArg::Surname => WordKind::Surname,
    };
    let gender = match args.gender {
        GenderArg::Male => Gender::Male,
        GenderArg::Female => Gender::Female,
    };

    let case_ids: Vec<u32> = match &args.case {
        Some(name) => {
            let Some(case_id) = inflector.data().case_id(name) else {
                return Err(format!("unknown case name: {name}").into());
            };
            vec![case_id]
        }
        None => (0..inflector.data().as_ref().num_cases() as u32).collect(),
    };

    eprintln!("Ready to inflect");

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let lines = std::io::stdin().lock().lines();
    for line in lines {
        let word = line?;
        let word = word.trim();
        if word.is_empty() {
            continue;
        }
        for &case_id in &case_ids {
            let data = inflector.data().as_ref();
            let case_name = data.case_name(case_id).unwrap_or("?");
            let inflected = inflector.inflect(args.language, kind, gender, case_id, word);
            writeln!(&mut out, "{word}\t{case_name}\t{inflected}")?;
        }
    }

    Ok(())
}
