use super::*;

#[test]
fn line_comment_to_end_of_line() {
    assert_tokens("x // y z\nw", &[Token::Ident, Token::Ident]);
}

#[test]
fn line_comment_at_eof() {
    assert_tokens("x // trailing", &[Token::Ident]);
}

#[test]
fn block_comment_spanning_lines() {
    assert_tokens("a /* one\ntwo\nthree */ b", &[Token::Ident, Token::Ident]);
}

#[test]
fn block_comments_do_not_nest() {
    // the first */ closes the comment
    assert_tokens("/* a /* b */ c", &[Token::Ident]);
}

#[test]
fn javadoc_comment() {
    assert_tokens("/** Docs. */ class", &[Token::Class]);
}

#[test]
fn division_is_not_a_comment() {
    assert_tokens("a / b", &[Token::Ident, Token::Slash, Token::Ident]);
}

#[test]
fn unterminated_block_comment() {
    let msg = lex_fails("a /* open");
    assert!(msg.contains("unterminated block comment"), "{msg}");
}
