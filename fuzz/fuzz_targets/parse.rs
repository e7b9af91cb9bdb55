#![no_main]
use arbitrary::Arbitrary;
use j2lua::lexer::Token;
use j2lua::span::{Span, Spanned};
use libfuzzer_sys::fuzz_target;

/// Token shapes the parser branches on
#[derive(Arbitrary, Debug)]
enum FuzzToken {
    Ident,
    IntLit,
    StringLit,
    Class,
    Public,
    Static,
    Void,
    Int,
    For,
    While,
    If,
    Else,
    Try,
    Catch,
    Throw,
    New,
    Return,
    Break,
    Plus,
    Minus,
    Star,
    Eq,
    EqEq,
    Lt,
    AmpAmp,
    Bang,
    PlusPlus,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Colon,
}

impl FuzzToken {
    fn to_token(&self, offset: usize) -> Spanned<Token> {
        let token = match self {
            FuzzToken::Ident => Token::Ident,
            FuzzToken::IntLit => Token::IntLit(42),
            FuzzToken::StringLit => Token::StringLit("str".to_string()),
            FuzzToken::Class => Token::Class,
            FuzzToken::Public => Token::Public,
            FuzzToken::Static => Token::Static,
            FuzzToken::Void => Token::Void,
            FuzzToken::Int => Token::Int,
            FuzzToken::For => Token::For,
            FuzzToken::While => Token::While,
            FuzzToken::If => Token::If,
            FuzzToken::Else => Token::Else,
            FuzzToken::Try => Token::Try,
            FuzzToken::Catch => Token::Catch,
            FuzzToken::Throw => Token::Throw,
            FuzzToken::New => Token::New,
            FuzzToken::Return => Token::Return,
            FuzzToken::Break => Token::Break,
            FuzzToken::Plus => Token::Plus,
            FuzzToken::Minus => Token::Minus,
            FuzzToken::Star => Token::Star,
            FuzzToken::Eq => Token::Eq,
            FuzzToken::EqEq => Token::EqEq,
            FuzzToken::Lt => Token::Lt,
            FuzzToken::AmpAmp => Token::AmpAmp,
            FuzzToken::Bang => Token::Bang,
            FuzzToken::PlusPlus => Token::PlusPlus,
            FuzzToken::LParen => Token::LParen,
            FuzzToken::RParen => Token::RParen,
            FuzzToken::LBrace => Token::LBrace,
            FuzzToken::RBrace => Token::RBrace,
            FuzzToken::LBracket => Token::LBracket,
            FuzzToken::RBracket => Token::RBracket,
            FuzzToken::Semi => Token::Semi,
            FuzzToken::Comma => Token::Comma,
            FuzzToken::Dot => Token::Dot,
            FuzzToken::Colon => Token::Colon,
        };
        Spanned::new(token, Span::new(2 * offset, 2 * offset + 1))
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzTokens {
    tokens: Vec<FuzzToken>,
}

fuzz_target!(|input: FuzzTokens| {
    let mut tokens: Vec<Spanned<Token>> =
        input.tokens.iter().enumerate().map(|(i, t)| t.to_token(i)).collect();
    let end = 2 * tokens.len();
    tokens.push(Spanned::new(Token::Eof, Span::new(end, end)));

    // every token's text is "x"
    let source = "x ".repeat(tokens.len());
    let _ = j2lua::parser::Parser::new(&tokens, &source).parse_unit();
});
