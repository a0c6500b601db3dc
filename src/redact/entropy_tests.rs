use super::*;

#[test]
fn repeated_byte_has_zero_entropy() {
    assert_eq!(shannon_entropy("aaaaaaaa"), 0.0);
}

#[test]
fn uniform_hex_alphabet_is_four_bits() {
    let entropy = shannon_entropy("0123456789abcdef");
    assert!((entropy - 4.0).abs() < 1e-9);
}

#[test]
fn empty_string_is_zero() {
    assert_eq!(shannon_entropy(""), 0.0);
}

#[test]
fn short_candidates_never_trip_the_signal() {
    // High variety, but below the 16-byte floor.
    assert!(!is_high_entropy("a1b2c3d4e5f"));
}

#[test]
fn repeated_content_is_low_entropy() {
    assert!(!is_high_entropy("aaaaaaaaaaaaaaaaaaaaaaaa"));
    assert!(!is_high_entropy("abababababababababababab"));
}

#[test]
fn hex_threshold_applies_to_hex_candidates() {
    // 16 distinct hex digits: entropy 4.0 against the 3.0 hex threshold.
    assert!(is_high_entropy("0123456789abcdef"));
}

#[test]
fn alnum_candidates_use_the_four_bit_threshold() {
    assert!(is_high_entropy(
        "abcdefghijklmnopqrstuvwxyz0123456789"
    ));
}

#[test]
fn base64_candidates_need_more_variety() {
    // The `+` forces base64 classification; 34 distinct chars clear 4.5 bits.
    assert!(is_high_entropy(
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdef+/"
    ));
    // Narrow-alphabet base64-looking text stays below the bar.
    assert!(!is_high_entropy("abcabcabcabcabcabc+/"));
}

#[test]
fn english_prose_is_not_flagged() {
    assert!(!is_high_entropy("the cat sat on the mat"));
    // Identifier-like text: limited variety for its charset.
    assert!(!is_high_entropy("my_database_connection"));
}
