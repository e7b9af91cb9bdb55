use super::*;
use j2lua::span::LineIndex;

#[test]
fn span_single_character_token() {
    assert_span("+", 0, 0, 1);
}

#[test]
fn span_two_character_token() {
    assert_span("==", 0, 0, 2);
}

#[test]
fn span_keyword_after_whitespace() {
    assert_span("   class", 0, 3, 8);
}

#[test]
fn span_string_includes_quotes() {
    assert_span("s = \"hi\";", 2, 4, 8);
}

#[test]
fn eof_span_is_empty_at_end() {
    assert_span("ab ", 1, 3, 3);
}

#[test]
fn multibyte_offsets_are_bytes() {
    // "é" is two bytes
    assert_span("\"é\" x", 1, 5, 6);
}

#[test]
fn line_and_column() {
    let src = "class A {\n    int x;\n}\n";
    let index = LineIndex::new(src);
    let tokens = lex_ok(src);
    let x = tokens.iter().find(|(t, s)| *t == Token::Ident && &src[s.start..s.end] == "x").unwrap();
    let pos = index.position(x.1.start);
    assert_eq!((pos.line, pos.col), (2, 9));
    assert_eq!(index.position(0).to_string(), "1:1");
}
