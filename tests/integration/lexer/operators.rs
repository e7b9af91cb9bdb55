use super::*;

#[test]
fn comparison_operators() {
    assert_tokens(
        "< > <= >= == !=",
        &[Token::Lt, Token::Gt, Token::LtEq, Token::GtEq, Token::EqEq, Token::BangEq],
    );
}

#[test]
fn compound_assignment() {
    assert_tokens(
        "+= -= *= /= %=",
        &[Token::PlusEq, Token::MinusEq, Token::StarEq, Token::SlashEq, Token::PercentEq],
    );
}

#[test]
fn maximal_munch() {
    assert_tokens("a+++b", &[Token::Ident, Token::PlusPlus, Token::Plus, Token::Ident]);
    assert_tokens("a===b", &[Token::Ident, Token::EqEq, Token::Eq, Token::Ident]);
}

#[test]
fn logical_operators() {
    assert_tokens("!a && b || c", &[
        Token::Bang, Token::Ident, Token::AmpAmp, Token::Ident, Token::PipePipe, Token::Ident,
    ]);
}

#[test]
fn single_ampersand_is_rejected() {
    let msg = lex_fails("a & b");
    assert!(msg.contains("unexpected character '&'"), "{msg}");
}

#[test]
fn punctuation() {
    assert_tokens(
        "{ } ( ) [ ] ; , . :",
        &[
            Token::LBrace, Token::RBrace, Token::LParen, Token::RParen, Token::LBracket,
            Token::RBracket, Token::Semi, Token::Comma, Token::Dot, Token::Colon,
        ],
    );
}
