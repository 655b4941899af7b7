//! マッチャーの統合テスト

use crate::compiler::{LanguageConfig, RuleCompiler};
use crate::matcher::{Gender, Inflector, WordKind};
use crate::tables::FlexData;

fn build_inflector(rules: &[&str]) -> Inflector {
    let mut compiler = RuleCompiler::new();
    for r in rules {
        let config = LanguageConfig::from_reader(r.as_bytes()).unwrap();
        compiler.compile_language(&config).unwrap();
    }
    Inflector::new(FlexData::from_inner(compiler.finish()))
}

const RU: &str = "\
language ru 0
[surnames]
*ov,nom=ov;gen=ova;dat=ovu,fixed
*ova,fixed,nom=ova;gen=ovoj
*skij,nom=skij;gen=skogo,fixed
";

#[test]
fn test_longest_suffix_wins() {
    let inflector = build_inflector(&[RU]);
    let gen_id = inflector.data().case_id("gen").unwrap();

    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Petrov"),
        "Petrova"
    );
    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Polanskij"),
        "Polanskogo"
    );
    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Female, gen_id, "Petrova"),
        "Petrovoj"
    );
}

#[test]
fn test_exact_suffix_round_trip() {
    // A non-wildcard pattern matches through its sentinel step: any word
    // ending in the literal suffix reaches the same terminal.
    let inflector = build_inflector(&[
        "language xx 0\n[surnames]\nko,nom=ko;dat=kovi,fixed\n",
    ]);
    let dat = inflector.data().case_id("dat").unwrap();

    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, dat, "Shevchenko"),
        "Shevchenkovi"
    );
    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, dat, "ko"),
        "kovi"
    );
}

#[test]
fn test_exact_beats_wildcard_at_same_depth() {
    let inflector = build_inflector(&[
        "language xx 0\n[surnames]\n*ov,gen=wild,fixed\nov,gen=exact,fixed\n",
    ]);
    let gen_id = inflector.data().case_id("gen").unwrap();

    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Petrov"),
        "Petrexact"
    );
}

#[test]
fn test_wildcard_applies_mid_walk() {
    // With "*ov" and "rov" registered, a word ending in "sov" only reaches
    // the wildcard terminal.
    let inflector = build_inflector(&[
        "language xx 0\n[surnames]\n*ov,gen=A,fixed\nrov,gen=B,fixed\n",
    ]);
    let gen_id = inflector.data().case_id("gen").unwrap();

    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Krasnov"),
        "KrasnA"
    );
    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Petrov"),
        "PetB"
    );
}

#[test]
fn test_falls_back_past_longer_pattern() {
    // "Parov" walks toward "trov" through the "ov" node and mismatches
    // deeper; the shorter exact-suffix rule still applies.
    let inflector = build_inflector(&[
        "language xx 0\n[surnames]\nov,gen=SHORT,fixed\ntrov,gen=LONG,fixed\n",
    ]);
    let gen_id = inflector.data().case_id("gen").unwrap();

    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Parov"),
        "ParSHORT"
    );
    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Petrov"),
        "PeLONG"
    );
}

#[test]
fn test_names_and_surnames_are_separate() {
    let inflector = build_inflector(&[
        "language xx 0\n[names]\n*a,gen=NAME,fixed\n[surnames]\n*a,gen=SURNAME,fixed\n",
    ]);
    let gen_id = inflector.data().case_id("gen").unwrap();

    assert_eq!(
        inflector.inflect(0, WordKind::Name, Gender::Male, gen_id, "Nikita"),
        "NikitNAME"
    );
    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Nikita"),
        "NikitSURNAME"
    );
}

#[test]
fn test_missing_ruleset_leaves_word_unchanged() {
    let inflector = build_inflector(&["language xx 0\n[surnames]\n*a,gen=X,fixed\n"]);
    let gen_id = inflector.data().case_id("gen").unwrap();

    // No [names] section: names_root is absent.
    assert_eq!(
        inflector.inflect(0, WordKind::Name, Gender::Male, gen_id, "Nikita"),
        "Nikita"
    );
}

#[test]
fn test_fixed_and_absent_cases_leave_word_unchanged() {
    let inflector = build_inflector(&[
        "language xx 0\n[surnames]\n*ov,gen=ova,fixed\n*in,nom=in,fixed\n",
    ]);
    let gen_id = inflector.data().case_id("gen").unwrap();
    let nom = inflector.data().case_id("nom").unwrap();

    // The female rule for *ov is fixed.
    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Female, gen_id, "Petrov"),
        "Petrov"
    );
    // The *in rule does not specify gen: the slot is absent.
    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Pushkin"),
        "Pushkin"
    );
    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, nom, "Pushkin"),
        "Pushkin"
    );
}

#[test]
fn test_unknown_language_leaves_word_unchanged() {
    let inflector = build_inflector(&[RU]);
    let gen_id = inflector.data().case_id("gen").unwrap();
    assert_eq!(
        inflector.inflect(42, WordKind::Surname, Gender::Male, gen_id, "Petrov"),
        "Petrov"
    );
}

#[test]
fn test_hyphen_branch_isolation() {
    // A trailing-hyphen pattern and its plain counterpart resolve to
    // different rules depending on the segment position.
    let inflector = build_inflector(&[
        "language xx 0\n[surnames]\n*ova,gen=ovoj,fixed\n*ova-,gen=ova,fixed\n",
    ]);
    let gen_id = inflector.data().case_id("gen").unwrap();

    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Petrova"),
        "Petrovoj"
    );
    // The first segment uses the hyphen branch, the second the main rule.
    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Petrova-Sidorova"),
        "Petrova-Sidorovoj"
    );
}

#[test]
fn test_hyphen_segment_falls_back_to_main_rule() {
    let inflector = build_inflector(&[
        "language xx 0\n[surnames]\n*ov,gen=ova,fixed\n",
    ]);
    let gen_id = inflector.data().case_id("gen").unwrap();

    // No hyphen branch exists: both segments use the main rule.
    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Petrov-Sidorov"),
        "Petrova-Sidorova"
    );
}

#[test]
fn test_flexible_symbols_filter() {
    let inflector = build_inflector(&[
        "language xx 0\nflexible v\n[surnames]\n*ov,gen=ova,fixed\n*in,gen=ina,fixed\n",
    ]);
    let gen_id = inflector.data().case_id("gen").unwrap();

    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Petrov"),
        "Petrova"
    );
    // "n" is not in the flexible set: the word is not eligible.
    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Pushkin"),
        "Pushkin"
    );
}

#[test]
fn test_cyrillic_round_trip() {
    let inflector = build_inflector(&[
        "\
language ru 0
flexible авоя
[surnames]
*ов,nom=ов;gen=ова,fixed
*ова,fixed,nom=ова;gen=овой
",
    ]);
    let gen_id = inflector.data().case_id("gen").unwrap();

    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Иванов"),
        "Иванова"
    );
    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Female, gen_id, "Иванова"),
        "Ивановой"
    );
}

#[test]
fn test_archived_matches_owned() {
    let mut compiler = RuleCompiler::new();
    let config = LanguageConfig::from_reader(RU.as_bytes()).unwrap();
    compiler.compile_language(&config).unwrap();
    let inner = compiler.finish();

    let mut buf = vec![];
    inner.write(&mut buf).unwrap();

    let owned = Inflector::new(FlexData::from_inner(inner));
    let archived = Inflector::new(FlexData::read(buf.as_slice()).unwrap());

    let gen_id = owned.data().case_id("gen").unwrap();
    for word in ["Petrov", "Polanskij", "Smith", "Petrova-Sidorova"] {
        assert_eq!(
            owned.inflect(0, WordKind::Surname, Gender::Male, gen_id, word),
            archived.inflect(0, WordKind::Surname, Gender::Male, gen_id, word),
        );
    }
}

#[test]
fn test_zstd_round_trip() {
    let mut compiler = RuleCompiler::new();
    let config = LanguageConfig::from_reader(RU.as_bytes()).unwrap();
    compiler.compile_language(&config).unwrap();
    let inner = compiler.finish();

    let mut raw = vec![];
    inner.write(&mut raw).unwrap();
    let compressed = zstd::encode_all(raw.as_slice(), 3).unwrap();

    let loaded = FlexData::from_zstd_reader(compressed.as_slice()).unwrap();
    let inflector = Inflector::new(loaded);
    let gen_id = inflector.data().case_id("gen").unwrap();
    assert_eq!(
        inflector.inflect(0, WordKind::Surname, Gender::Male, gen_id, "Petrov"),
        "Petrova"
    );
}
