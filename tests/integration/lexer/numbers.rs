use super::*;

#[test]
fn single_digit() {
    assert_tokens("7", &[Token::IntLit(7)]);
}

#[test]
fn leading_zeros() {
    assert_tokens("007", &[Token::IntLit(7)]);
}

#[test]
fn negative_is_minus_then_literal() {
    assert_tokens("-5", &[Token::Minus, Token::IntLit(5)]);
}

#[test]
fn int_max_and_min_magnitude_lex() {
    assert_tokens("2147483647", &[Token::IntLit(2147483647)]);
    // only valid after unary minus; the parser checks that
    assert_tokens("2147483648", &[Token::IntLit(2147483648)]);
}

#[test]
fn beyond_int_range_fails() {
    let msg = lex_fails("2147483649");
    assert!(msg.contains("integer literal 2147483649 is out of range"), "{msg}");
}

#[test]
fn leading_zero_means_octal() {
    assert_tokens("010", &[Token::IntLit(8)]);
    assert_tokens("0777", &[Token::IntLit(511)]);
    let msg = lex_fails("09");
    assert!(msg.contains("malformed integer literal 09"), "{msg}");
}

#[test]
fn too_large_for_i64() {
    let msg = lex_fails("123456789012345678901234567890");
    assert!(msg.contains("out of range"), "{msg}");
}

#[test]
fn number_then_identifier() {
    assert_tokens("3x", &[Token::IntLit(3), Token::Ident]);
}

#[test]
fn decimal_point_splits() {
    assert_tokens("1.5", &[Token::IntLit(1), Token::Dot, Token::IntLit(5)]);
}
