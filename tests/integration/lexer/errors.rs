use super::*;
use j2lua::diagnostics::CompileError;

fn error_span(source: &str) -> Span {
    match lex(source) {
        Err(CompileError::Lex { span, .. }) => span,
        other => panic!("expected a lex error, got {other:?}"),
    }
}

#[test]
fn unexpected_character_position() {
    assert_eq!(error_span("int x = 1 @ 2;"), Span::new(10, 11));
}

#[test]
fn first_error_wins() {
    assert_eq!(error_span("a # b $ c").start, 2);
}

#[test]
fn unterminated_string_points_at_quote() {
    assert_eq!(error_span("x = \"abc").start, 4);
}

#[test]
fn invalid_escape() {
    let msg = lex_fails(r#""bad \x escape""#);
    assert!(msg.contains("invalid escape sequence '\\x'"), "{msg}");
}

#[test]
fn empty_char_literal() {
    let msg = lex_fails("''");
    assert!(msg.contains("unterminated char literal"), "{msg}");
}

#[test]
fn backtick_and_hash() {
    for c in ["`", "#", "$", "?", "~", "^", "|"] {
        let msg = lex_fails(c);
        assert!(msg.contains("unexpected character"), "{c}: {msg}");
    }
}
