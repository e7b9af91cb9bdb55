pub mod token;
pub use token::{LexErrorKind, Token, TokenKind, is_keyword};

use logos::Logos;
use crate::diagnostics::CompileError;
use crate::span::{Span, Spanned};

/// Lazy token stream over one compilation unit.
///
/// Yields tokens on demand, skipping whitespace and comments, and ends with a
/// single `Token::Eof`. After the first error, or after `Eof`, the stream is
/// exhausted until `restart()` rewinds it to the beginning of the source.
#[derive(Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    inner: logos::Lexer<'src, Token>,
    done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, inner: Token::lexer(source), done: false }
    }

    pub fn restart(&mut self) {
        self.inner = Token::lexer(self.source);
        self.done = false;
    }

    fn error(&self, kind: LexErrorKind, span: Span) -> CompileError {
        let text = &self.source[span.start..span.end];
        let msg = match kind {
            LexErrorKind::InvalidEscape(c) => format!("invalid escape sequence '\\{c}'"),
            LexErrorKind::IntegerOutOfRange => format!("integer literal {text} is out of range"),
            LexErrorKind::MalformedNumber => format!("malformed integer literal {text}"),
            LexErrorKind::UnterminatedComment => "unterminated block comment".to_string(),
            LexErrorKind::UnexpectedCharacter => {
                if text.starts_with('"') {
                    "unterminated string literal".to_string()
                } else if text.starts_with('\'') {
                    "unterminated char literal".to_string()
                } else {
                    let c = text.chars().next().unwrap_or(' ');
                    format!("unexpected character '{c}'")
                }
            }
        };
        CompileError::lex(msg, span)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Spanned<Token>, CompileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let Some(result) = self.inner.next() else {
                self.done = true;
                let end = self.source.len();
                return Some(Ok(Spanned::new(Token::Eof, Span::new(end, end))));
            };
            let range = self.inner.span();
            let span = Span::new(range.start, range.end);
            match result {
                Ok(Token::Comment) => continue,
                Ok(tok) => return Some(Ok(Spanned::new(tok, span))),
                Err(kind) => {
                    self.done = true;
                    return Some(Err(self.error(kind, span)));
                }
            }
        }
    }
}

/// Lex a whole unit eagerly. The returned vector always ends with `Token::Eof`.
pub fn lex(source: &str) -> Result<Vec<Spanned<Token>>, CompileError> {
    let tokens = Lexer::new(source).collect::<Result<Vec<_>, _>>()?;
    tracing::trace!(count = tokens.len(), "lexed tokens");
    Ok(tokens)
}
