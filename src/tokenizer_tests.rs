use super::*;

#[test]
fn empty_string_is_zero_for_every_variant() {
    assert_eq!(Tokenizer::Cl100k.count(""), 0);
    assert_eq!(Tokenizer::O200k.count(""), 0);
    assert_eq!(Tokenizer::Bytes.count(""), 0);
}

#[test]
fn bytes_estimator_floors() {
    assert_eq!(Tokenizer::Bytes.count("abcd"), 1);
    assert_eq!(Tokenizer::Bytes.count("abcdefg"), 1);
    assert_eq!(Tokenizer::Bytes.count("abcdefgh"), 2);
    assert_eq!(Tokenizer::Bytes.count("abc"), 0);
}

#[test]
fn cl100k_counts_exactly() {
    assert_eq!(Tokenizer::Cl100k.count("hello world"), 2);
}

#[test]
fn o200k_counts_nonzero_text() {
    assert!(Tokenizer::O200k.count("fn main() {}") > 0);
}

#[test]
fn names_are_stable() {
    assert_eq!(Tokenizer::Cl100k.name(), "cl100k");
    assert_eq!(Tokenizer::O200k.name(), "o200k");
    assert_eq!(Tokenizer::Bytes.name(), "none");
}

#[test]
fn parses_from_str() {
    assert_eq!("cl100k".parse::<Tokenizer>().unwrap(), Tokenizer::Cl100k);
    assert_eq!("o200k".parse::<Tokenizer>().unwrap(), Tokenizer::O200k);
    assert_eq!("none".parse::<Tokenizer>().unwrap(), Tokenizer::Bytes);
    assert_eq!("NONE".parse::<Tokenizer>().unwrap(), Tokenizer::Bytes);
    assert!("gpt2".parse::<Tokenizer>().is_err());
}

#[test]
fn counts_are_repeatable() {
    let text = "let answer = 42;\n";
    assert_eq!(Tokenizer::Cl100k.count(text), Tokenizer::Cl100k.count(text));
}

#[test]
fn ensure_ready_succeeds() {
    assert!(Tokenizer::Bytes.ensure_ready().is_ok());
    assert!(Tokenizer::Cl100k.ensure_ready().is_ok());
}
