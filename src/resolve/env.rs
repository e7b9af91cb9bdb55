use std::collections::HashMap;

use serde::Serialize;

use super::builtins::Builtin;
use super::types::StaticType;
use crate::parser::ast::Expr;
use crate::span::{Span, Spanned};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SymbolKind {
    Local,
    Param,
    LoopVar,
    CatchVar,
    StaticField,
    InstanceField,
}

/// A declared name, as seen from a use site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: StaticType,
    pub decl: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSig {
    pub params: Vec<StaticType>,
    pub return_type: StaticType,
    pub is_static: bool,
    /// Class names from the `throws` clause.
    pub throws: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CallTarget {
    Builtin(Builtin),
    /// A method of the unit's own class.
    Static(String),
    Unknown,
}

/// How a for-each statement's iterated expression produces its array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IterSource {
    ArrayLiteral,
    ArrayVariable,
    /// A call result or a `new` expression.
    ArrayValue,
    NotArray,
}

/// Side tables produced by the resolver, keyed by node span.
#[derive(Debug, Default)]
pub struct Resolution {
    pub symbols: HashMap<Span, Symbol>,
    pub types: HashMap<Span, StaticType>,
    pub calls: HashMap<Span, CallTarget>,
    pub iter_sources: HashMap<Span, IterSource>,
    pub methods: HashMap<String, Vec<MethodSig>>,
    /// Uses of `Integer.MAX_VALUE` and friends.
    pub constants: HashMap<Span, i64>,
    pub main_args_used: bool,
}

impl Resolution {
    pub fn type_of(&self, expr: &Spanned<Expr>) -> StaticType {
        self.types.get(&expr.span).cloned().unwrap_or(StaticType::Unknown)
    }

    pub fn symbol(&self, span: Span) -> Option<&Symbol> {
        self.symbols.get(&span)
    }

    pub fn call(&self, span: Span) -> &CallTarget {
        self.calls.get(&span).unwrap_or(&CallTarget::Unknown)
    }

    pub fn iter_source(&self, span: Span) -> IterSource {
        self.iter_sources.get(&span).copied().unwrap_or(IterSource::NotArray)
    }

    pub fn constant(&self, span: Span) -> Option<i64> {
        self.constants.get(&span).copied()
    }

    pub fn method(&self, name: &str) -> Option<&[MethodSig]> {
        self.methods.get(name).map(|v| v.as_slice())
    }

    pub fn is_caught_exception(&self, expr: &Spanned<Expr>) -> bool {
        matches!(&expr.node, Expr::Ident(_))
            && self.symbol(expr.span).is_some_and(|s| s.kind == SymbolKind::CatchVar)
    }
}
