//! Fixed library call patterns the translator maps onto Lua primitives.

use serde::Serialize;

use super::types::StaticType;

/// Qualifiers usable without a declaration, besides the unit's own class.
pub const NAMESPACES: &[&str] = &["System", "Math", "Integer", "String"];

/// Standard unchecked exception classes a program may throw.
const UNCHECKED_EXCEPTIONS: &[&str] = &[
    "RuntimeException",
    "ArithmeticException",
    "IllegalArgumentException",
    "IllegalStateException",
    "NumberFormatException",
    "NullPointerException",
    "UnsupportedOperationException",
    "IndexOutOfBoundsException",
    "ArrayIndexOutOfBoundsException",
    "NegativeArraySizeException",
    "ClassCastException",
];

/// Where a thrown class sits in the throwable hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrowableKind {
    /// `RuntimeException` and its subclasses.
    Unchecked,
    /// Any other `Exception`. Unknown class names land here.
    Checked,
    /// `Throwable` itself, `Error` and its subclasses.
    NotAnException,
}

pub fn classify_throwable(class: &str) -> ThrowableKind {
    if UNCHECKED_EXCEPTIONS.contains(&class) {
        ThrowableKind::Unchecked
    } else if class == "Throwable" || class.ends_with("Error") {
        ThrowableKind::NotAnException
    } else {
        ThrowableKind::Checked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Builtin {
    /// `System.out.println(x?)`
    Println,
    /// `System.out.print(x)`
    Print,
    /// `System.err.println(x?)`
    ErrPrintln,
    /// `e.getMessage()` on a caught exception
    GetMessage,
    MathMax,
    MathMin,
    MathAbs,
    /// `String.valueOf(x)` / `Integer.toString(x)`
    ToString,
    /// `Integer.parseInt(s)`
    ParseInt,
    /// `s.length()`
    StringLength,
    /// `s.equals(t)`
    StringEquals,
}

impl Builtin {
    pub fn return_type(self) -> StaticType {
        match self {
            Builtin::Println | Builtin::Print | Builtin::ErrPrintln => StaticType::Void,
            Builtin::GetMessage | Builtin::ToString => StaticType::String,
            Builtin::MathMax | Builtin::MathMin | Builtin::MathAbs | Builtin::ParseInt | Builtin::StringLength => {
                StaticType::Int
            }
            Builtin::StringEquals => StaticType::Boolean,
        }
    }

    /// Whether the call has an observable side effect or can raise.
    pub fn is_effectful(self) -> bool {
        matches!(self, Builtin::Println | Builtin::Print | Builtin::ErrPrintln | Builtin::ParseInt)
    }
}

/// `<namespace>.<method>(args)` with a static namespace qualifier.
pub fn classify_static(namespace: &str, method: &str, arity: usize) -> Option<Builtin> {
    match (namespace, method, arity) {
        ("System.out", "println", 0 | 1) => Some(Builtin::Println),
        ("System.out", "print", 1) => Some(Builtin::Print),
        ("System.err", "println", 0 | 1) => Some(Builtin::ErrPrintln),
        ("Math", "max", 2) => Some(Builtin::MathMax),
        ("Math", "min", 2) => Some(Builtin::MathMin),
        ("Math", "abs", 1) => Some(Builtin::MathAbs),
        ("String", "valueOf", 1) | ("Integer", "toString", 1) => Some(Builtin::ToString),
        ("Integer", "parseInt", 1) => Some(Builtin::ParseInt),
        _ => None,
    }
}

/// `<receiver>.<method>(args)` where the receiver is a value.
pub fn classify_instance(receiver: &StaticType, is_caught: bool, method: &str, arity: usize) -> Option<Builtin> {
    match (receiver, method, arity) {
        (StaticType::Object(_), "getMessage", 0) if is_caught => Some(Builtin::GetMessage),
        (StaticType::String, "length", 0) => Some(Builtin::StringLength),
        (StaticType::String, "equals", 1) => Some(Builtin::StringEquals),
        _ => None,
    }
}

/// Value of a static constant such as `Integer.MAX_VALUE`.
pub fn constant(namespace: &str, name: &str) -> Option<i64> {
    match (namespace, name) {
        ("Integer", "MAX_VALUE") => Some(i32::MAX as i64),
        ("Integer", "MIN_VALUE") => Some(i32::MIN as i64),
        _ => None,
    }
}
