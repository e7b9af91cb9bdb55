use serde::Serialize;

use crate::parser::ast::TypeExpr;

/// Light static type, enough to pick codegen templates. Not a type checker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum StaticType {
    Int,
    Boolean,
    Char,
    String,
    Void,
    Array(Box<StaticType>),
    Object(std::string::String),
    Unknown,
}

impl StaticType {
    pub fn from_type_expr(te: &TypeExpr) -> StaticType {
        match te {
            TypeExpr::Void => StaticType::Void,
            TypeExpr::Int => StaticType::Int,
            TypeExpr::Boolean => StaticType::Boolean,
            TypeExpr::Named(name) => match name.as_str() {
                "String" => StaticType::String,
                "char" => StaticType::Char,
                "Integer" => StaticType::Int,
                _ => StaticType::Object(name.clone()),
            },
            TypeExpr::Array(inner) => StaticType::Array(Box::new(StaticType::from_type_expr(&inner.node))),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, StaticType::Array(_))
    }

    pub fn elem(&self) -> Option<&StaticType> {
        match self {
            StaticType::Array(inner) => Some(inner),
            _ => None,
        }
    }

    /// Types whose values Lua prints the same way Java does without help.
    pub fn prints_natively(&self) -> bool {
        matches!(self, StaticType::Int | StaticType::String)
    }

    /// Element types Java zero-initialises with a non-null default.
    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            StaticType::Int => Some("0"),
            StaticType::Boolean => Some("false"),
            _ => None,
        }
    }
}

impl std::fmt::Display for StaticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaticType::Int => write!(f, "int"),
            StaticType::Boolean => write!(f, "boolean"),
            StaticType::Char => write!(f, "char"),
            StaticType::String => write!(f, "String"),
            StaticType::Void => write!(f, "void"),
            StaticType::Array(inner) => write!(f, "{inner}[]"),
            StaticType::Object(name) => write!(f, "{name}"),
            StaticType::Unknown => write!(f, "<unknown>"),
        }
    }
}
