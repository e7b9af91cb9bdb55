use logos::Logos;
use serde::Serialize;

/// Failure reasons reported by token callbacks. `Default` covers input that
/// matches no token at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexErrorKind {
    #[default]
    UnexpectedCharacter,
    InvalidEscape(char),
    IntegerOutOfRange,
    MalformedNumber,
    UnterminatedComment,
}

#[derive(Logos, Debug, Clone, PartialEq, Serialize)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(error = LexErrorKind)]
pub enum Token {
    // Keywords
    #[token("class")]
    Class,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("static")]
    Static,
    #[token("final")]
    Final,
    #[token("void")]
    Void,
    #[token("int")]
    Int,
    #[token("boolean")]
    Boolean,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("break")]
    Break,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("throw")]
    Throw,
    #[token("new")]
    New,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Literals
    #[regex(r"[0-9]+", |lex| int_literal(lex.slice()))]
    IntLit(i64),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| {
        let s = lex.slice();
        unescape(&s[1..s.len() - 1])
    })]
    StringLit(String),

    #[regex(r"'([^'\\\n]|\\[0-7]{1,3}|\\.)'", |lex| {
        let s = lex.slice();
        let text = unescape(&s[1..s.len() - 1])?;
        text.chars().next().ok_or(LexErrorKind::UnexpectedCharacter)
    })]
    CharLit(char),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // Operators
    #[token("++")]
    PlusPlus,
    #[token("+")]
    Plus,
    #[token("--")]
    MinusMinus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,

    // Comments (skipped by the lexer)
    #[regex(r"//[^\n]*")]
    #[token("/*", block_comment)]
    Comment,

    /// End of input. Never produced by logos; appended by `Lexer`.
    Eof,
}

fn block_comment(lex: &mut logos::Lexer<Token>) -> Result<(), LexErrorKind> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

/// Largest magnitude an `int` literal can have. `2147483648` is only valid
/// as the operand of unary minus, which the parser enforces.
pub const INT_LITERAL_MAX: i64 = 1 << 31;

/// Decimal literal, or octal when it has a leading zero (`010` is 8).
fn int_literal(text: &str) -> Result<i64, LexErrorKind> {
    let (digits, radix, max) = match text.strip_prefix('0') {
        Some(rest) if !rest.is_empty() => (rest, 8, i32::MAX as i64),
        _ => (text, 10, INT_LITERAL_MAX),
    };
    if digits.chars().any(|c| c.to_digit(radix).is_none()) {
        return Err(LexErrorKind::MalformedNumber);
    }
    match i64::from_str_radix(digits, radix) {
        Ok(n) if n <= max => Ok(n),
        _ => Err(LexErrorKind::IntegerOutOfRange),
    }
}

fn unescape(raw: &str) -> Result<String, LexErrorKind> {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{c}'),
            Some('s') => result.push(' '),
            Some('"') => result.push('"'),
            Some('\'') => result.push('\''),
            Some('\\') => result.push('\\'),
            // octal escape: up to three digits, at most \377
            Some(first @ '0'..='7') => {
                let mut code = first.to_digit(8).unwrap_or(0);
                let max_digits = if first <= '3' { 3 } else { 2 };
                for _ in 1..max_digits {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                result.push(char::from_u32(code).ok_or(LexErrorKind::InvalidEscape(first))?);
            }
            Some(other) => return Err(LexErrorKind::InvalidEscape(other)),
            None => return Err(LexErrorKind::InvalidEscape('\\')),
        }
    }
    Ok(result)
}

/// Returns true if the given string is a reserved word of the source language subset.
pub fn is_keyword(s: &str) -> bool {
    matches!(s, "class" | "public" | "private" | "static" | "final" | "void" | "int"
        | "boolean" | "for" | "while" | "break" | "if" | "else" | "try" | "catch"
        | "throw" | "new" | "return" | "true" | "false")
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Class => write!(f, "'class'"),
            Token::Public => write!(f, "'public'"),
            Token::Private => write!(f, "'private'"),
            Token::Static => write!(f, "'static'"),
            Token::Final => write!(f, "'final'"),
            Token::Void => write!(f, "'void'"),
            Token::Int => write!(f, "'int'"),
            Token::Boolean => write!(f, "'boolean'"),
            Token::For => write!(f, "'for'"),
            Token::While => write!(f, "'while'"),
            Token::Break => write!(f, "'break'"),
            Token::If => write!(f, "'if'"),
            Token::Else => write!(f, "'else'"),
            Token::Try => write!(f, "'try'"),
            Token::Catch => write!(f, "'catch'"),
            Token::Throw => write!(f, "'throw'"),
            Token::New => write!(f, "'new'"),
            Token::Return => write!(f, "'return'"),
            Token::True => write!(f, "'true'"),
            Token::False => write!(f, "'false'"),
            Token::IntLit(n) => write!(f, "integer {n}"),
            Token::StringLit(s) => write!(f, "string {s:?}"),
            Token::CharLit(c) => write!(f, "char {c:?}"),
            Token::Ident => write!(f, "identifier"),
            Token::PlusPlus => write!(f, "'++'"),
            Token::Plus => write!(f, "'+'"),
            Token::MinusMinus => write!(f, "'--'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::Percent => write!(f, "'%'"),
            Token::PlusEq => write!(f, "'+='"),
            Token::MinusEq => write!(f, "'-='"),
            Token::StarEq => write!(f, "'*='"),
            Token::SlashEq => write!(f, "'/='"),
            Token::PercentEq => write!(f, "'%='"),
            Token::Eq => write!(f, "'='"),
            Token::EqEq => write!(f, "'=='"),
            Token::BangEq => write!(f, "'!='"),
            Token::Lt => write!(f, "'<'"),
            Token::Gt => write!(f, "'>'"),
            Token::LtEq => write!(f, "'<='"),
            Token::GtEq => write!(f, "'>='"),
            Token::AmpAmp => write!(f, "'&&'"),
            Token::PipePipe => write!(f, "'||'"),
            Token::Bang => write!(f, "'!'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Semi => write!(f, "';'"),
            Token::Comma => write!(f, "','"),
            Token::Dot => write!(f, "'.'"),
            Token::Colon => write!(f, "':'"),
            Token::Comment => write!(f, "comment"),
            Token::Eof => write!(f, "end of file"),
        }
    }
}

/// Coarse token category, as reported by `j2lua tokens`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Identifier,
    Keyword,
    IntLiteral,
    StringLiteral,
    CharLiteral,
    Operator,
    Punctuation,
    Eof,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Ident => TokenKind::Identifier,
            Token::IntLit(_) => TokenKind::IntLiteral,
            Token::StringLit(_) => TokenKind::StringLiteral,
            Token::CharLit(_) => TokenKind::CharLiteral,
            Token::Eof => TokenKind::Eof,
            Token::LParen | Token::RParen | Token::LBrace | Token::RBrace | Token::LBracket
            | Token::RBracket | Token::Semi | Token::Comma | Token::Dot | Token::Colon
            | Token::Comment => TokenKind::Punctuation,
            Token::Class | Token::Public | Token::Private | Token::Static | Token::Final
            | Token::Void | Token::Int | Token::Boolean | Token::For | Token::While
            | Token::Break | Token::If | Token::Else | Token::Try | Token::Catch | Token::Throw
            | Token::New | Token::Return | Token::True | Token::False => TokenKind::Keyword,
            _ => TokenKind::Operator,
        }
    }
}
