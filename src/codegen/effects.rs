//! Evaluation-order analysis for expression lowering.
//!
//! Lua leaves the evaluation order of operands and arguments unspecified, so
//! an expression is emitted as a single Lua expression only when no node has
//! an effectful operand preceded by an order-sensitive one. Otherwise the
//! statement is lowered in ordered mode and operands are bound to temps.

use crate::parser::ast::{BinOp, Expr};
use crate::resolve::{CallTarget, Resolution, SymbolKind};
use crate::span::Spanned;
use crate::visit::composers::contains_expr;

/// Operands of `expr` in Java evaluation order.
pub fn operands(expr: &Spanned<Expr>) -> Vec<&Spanned<Expr>> {
    match &expr.node {
        Expr::Binary { lhs, rhs, .. } => vec![&**lhs, &**rhs],
        Expr::Unary { operand, .. } => vec![&**operand],
        Expr::Assign { op, target, value } => {
            if op.bin_op().is_some() {
                vec![&**target, &**value]
            } else {
                vec![&**value]
            }
        }
        Expr::IncDec { target, .. } => vec![&**target],
        Expr::FieldAccess { object, .. } => vec![&**object],
        Expr::MethodCall { target, args, .. } => target.iter().map(|t| &**t).chain(args.iter()).collect(),
        Expr::ArrayLit { elements, .. } => elements.iter().collect(),
        Expr::NewArray { size, .. } => vec![&**size],
        Expr::NewObject { args, .. } => args.iter().collect(),
        Expr::Index { array, index } => vec![&**array, &**index],
        Expr::IntLit(_) | Expr::StringLit(_) | Expr::CharLit(_) | Expr::BoolLit(_) | Expr::Ident(_) => Vec::new(),
    }
}

/// The node itself can print, call user code, or raise.
fn node_is_effectful(expr: &Spanned<Expr>, res: &Resolution) -> bool {
    match &expr.node {
        Expr::MethodCall { .. } => match res.call(expr.span) {
            CallTarget::Builtin(b) => b.is_effectful(),
            CallTarget::Static(_) | CallTarget::Unknown => true,
        },
        Expr::Binary { op: BinOp::Div | BinOp::Mod, rhs, .. } => !matches!(rhs.node, Expr::IntLit(n) if n != 0),
        Expr::NewArray { size, .. } => !matches!(size.node, Expr::IntLit(n) if n >= 0),
        Expr::Assign { .. } | Expr::IncDec { .. } | Expr::NewObject { .. } => true,
        _ => false,
    }
}

pub fn is_effectful(expr: &Spanned<Expr>, res: &Resolution) -> bool {
    node_is_effectful(expr, res) || operands(expr).into_iter().any(|o| is_effectful(o, res))
}

/// Reads a static field, whose value a call evaluated later could change.
fn reads_mutable(expr: &Spanned<Expr>, res: &Resolution) -> bool {
    contains_expr(expr, |e| {
        matches!(&e.node, Expr::Ident(_) | Expr::FieldAccess { .. })
            && res.symbol(e.span).is_some_and(|s| s.kind == SymbolKind::StaticField)
    })
}

/// Must be evaluated before any later effectful sibling.
pub fn is_order_sensitive(expr: &Spanned<Expr>, res: &Resolution) -> bool {
    is_effectful(expr, res) || reads_mutable(expr, res)
}

/// Whether lowering `expr` as one Lua expression could reorder effects.
pub fn needs_ordering(expr: &Spanned<Expr>, res: &Resolution) -> bool {
    let ops = operands(expr);
    let mut sensitive_before = false;
    for op in &ops {
        if sensitive_before && is_effectful(op, res) {
            return true;
        }
        sensitive_before |= is_order_sensitive(op, res);
    }
    ops.into_iter().any(|o| needs_ordering(o, res))
}

/// For each operand, whether a later operand is effectful.
pub fn followed_by_effect(ops: &[&Spanned<Expr>], res: &Resolution) -> Vec<bool> {
    let mut out = vec![false; ops.len()];
    let mut later = false;
    for (i, op) in ops.iter().enumerate().rev() {
        out[i] = later;
        later |= is_effectful(op, res);
    }
    out
}
