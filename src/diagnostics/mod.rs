use crate::span::{LineIndex, Span};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("lex error: {msg}")]
    Lex { msg: String, span: Span },

    #[error("parse error: expected {expected}, found {found}")]
    Parse { expected: String, found: String, span: Span },

    #[error("unresolved name: cannot find symbol '{name}'")]
    UnresolvedName { name: String, span: Span },

    #[error("unsupported construct: {construct} cannot be translated")]
    UnsupportedConstruct { construct: String, span: Span },

    #[error("config error: {msg}")]
    Config { msg: String, path: PathBuf },

    #[error("io error: {msg}")]
    Io { msg: String, path: PathBuf },
}

impl CompileError {
    pub fn lex(msg: impl Into<String>, span: Span) -> Self {
        Self::Lex { msg: msg.into(), span }
    }

    pub fn parse(expected: impl Into<String>, found: impl Into<String>, span: Span) -> Self {
        Self::Parse { expected: expected.into(), found: found.into(), span }
    }

    pub fn unresolved(name: impl Into<String>, span: Span) -> Self {
        Self::UnresolvedName { name: name.into(), span }
    }

    pub fn unsupported(construct: impl Into<String>, span: Span) -> Self {
        Self::UnsupportedConstruct { construct: construct.into(), span }
    }

    pub fn config(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Config { msg: msg.into(), path }
    }

    pub fn io(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Io { msg: msg.into(), path }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Lex { span, .. }
            | CompileError::Parse { span, .. }
            | CompileError::UnresolvedName { span, .. }
            | CompileError::UnsupportedConstruct { span, .. } => Some(*span),
            CompileError::Config { .. } | CompileError::Io { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CompileError::Lex { .. } => "lex error",
            CompileError::Parse { .. } => "parse error",
            CompileError::UnresolvedName { .. } => "unresolved name",
            CompileError::UnsupportedConstruct { .. } => "unsupported construct",
            CompileError::Config { .. } => "config error",
            CompileError::Io { .. } => "io error",
        }
    }
}

/// Format an error as a single `<path>:<line>:<col>: <kind>: <message>` line.
pub fn format_diagnostic(path: &str, source: &str, err: &CompileError) -> String {
    match err.span() {
        Some(span) => {
            let pos = LineIndex::new(source).position(span.start);
            format!("{path}:{}:{}: {err}", pos.line, pos.col)
        }
        None => match err {
            CompileError::Config { path: cfg, .. } | CompileError::Io { path: cfg, .. } => {
                format!("{}: {err}", cfg.display())
            }
            _ => format!("{path}: {err}"),
        },
    }
}

/// Render a CompileError with ariadne for nice terminal output.
pub fn render_error(source: &str, filename: &str, err: &CompileError) {
    use ariadne::{Label, Report, ReportKind, Source};

    match err.span() {
        Some(span) => {
            let message = err.to_string();
            let label = message
                .split_once(": ")
                .map(|(_, rest)| rest.to_string())
                .unwrap_or_else(|| message.clone());
            let printed = Report::build(ReportKind::Error, (), span.start)
                .with_message(format!("{} in {filename}", err.kind()))
                .with_label(Label::new(span.start..span.end.max(span.start + 1)).with_message(label))
                .finish()
                .eprint(Source::from(source));
            if printed.is_err() {
                eprintln!("{}", format_diagnostic(filename, source, err));
            }
        }
        None => eprintln!("{}", format_diagnostic(filename, source, err)),
    }
}
