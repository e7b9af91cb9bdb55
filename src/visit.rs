//! Read-only AST traversal.
//!
//! Implement `Visitor` for a pass, overriding only the methods you need, and
//! call the matching `walk_*` function inside an override to keep recursing.
//! Omitting the walk call prunes traversal at that node.
//!
//! ```rust
//! use j2lua::visit::{Visitor, walk_expr};
//! use j2lua::parser::ast::Expr;
//! use j2lua::span::Spanned;
//!
//! struct IdentCounter(usize);
//!
//! impl Visitor for IdentCounter {
//!     fn visit_expr(&mut self, expr: &Spanned<Expr>) {
//!         if let Expr::Ident(_) = &expr.node {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//! ```
//!
//! Passes where most arms carry custom logic (the resolver, codegen) match on
//! the AST directly instead.

pub mod composers;
pub mod scope_tracker;

use crate::parser::ast::*;
use crate::span::Spanned;

pub trait Visitor: Sized {
    fn visit_class(&mut self, class: &Spanned<ClassDecl>) {
        walk_class(self, class);
    }

    fn visit_field(&mut self, field: &Spanned<FieldDecl>) {
        walk_field(self, field);
    }

    fn visit_method(&mut self, method: &Spanned<MethodDecl>) {
        walk_method(self, method);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        walk_stmt(self, stmt);
    }

    fn visit_catch(&mut self, catch: &Spanned<CatchClause>) {
        walk_catch(self, catch);
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        walk_expr(self, expr);
    }

    fn visit_type_expr(&mut self, te: &Spanned<TypeExpr>) {
        walk_type_expr(self, te);
    }
}

pub fn walk_class<V: Visitor>(v: &mut V, class: &Spanned<ClassDecl>) {
    for field in &class.node.fields {
        v.visit_field(field);
    }
    for method in &class.node.methods {
        v.visit_method(method);
    }
}

pub fn walk_field<V: Visitor>(v: &mut V, field: &Spanned<FieldDecl>) {
    v.visit_type_expr(&field.node.ty);
    if let Some(value) = &field.node.value {
        v.visit_expr(value);
    }
}

pub fn walk_method<V: Visitor>(v: &mut V, method: &Spanned<MethodDecl>) {
    v.visit_type_expr(&method.node.return_type);
    for p in &method.node.params {
        v.visit_type_expr(&p.ty);
    }
    v.visit_block(&method.node.body.node);
}

pub fn walk_block<V: Visitor>(v: &mut V, block: &Block) {
    for stmt in &block.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visitor>(v: &mut V, stmt: &Spanned<Stmt>) {
    match &stmt.node {
        Stmt::VarDecl { ty, value, .. } => {
            v.visit_type_expr(ty);
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        Stmt::ForEach { elem_ty, iterable, body, .. } => {
            v.visit_type_expr(elem_ty);
            v.visit_expr(iterable);
            v.visit_block(&body.node);
        }
        Stmt::While { condition, body } => {
            v.visit_expr(condition);
            v.visit_stmt(body);
        }
        Stmt::If { condition, then_branch, else_branch } => {
            v.visit_expr(condition);
            v.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                v.visit_stmt(else_branch);
            }
        }
        Stmt::Try { body, catches, finally } => {
            v.visit_block(&body.node);
            for catch in catches {
                v.visit_catch(catch);
            }
            if let Some(finally) = finally {
                v.visit_block(&finally.node);
            }
        }
        Stmt::Throw { message, .. } => {
            if let Some(message) = message {
                v.visit_expr(message);
            }
        }
        Stmt::Rethrow { value } => v.visit_expr(value),
        Stmt::Return(Some(expr)) | Stmt::Expr(expr) => v.visit_expr(expr),
        Stmt::Return(None) | Stmt::Break | Stmt::Unsupported { .. } => {}
        Stmt::Block(block) => v.visit_block(block),
    }
}

pub fn walk_catch<V: Visitor>(v: &mut V, catch: &Spanned<CatchClause>) {
    v.visit_type_expr(&catch.node.exception_ty);
    v.visit_block(&catch.node.body.node);
}

pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Spanned<Expr>) {
    match &expr.node {
        Expr::IntLit(_) | Expr::StringLit(_) | Expr::CharLit(_) | Expr::BoolLit(_) | Expr::Ident(_) => {}
        Expr::Binary { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        Expr::Unary { operand, .. } => v.visit_expr(operand),
        Expr::Assign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        Expr::IncDec { target, .. } => v.visit_expr(target),
        Expr::FieldAccess { object, .. } => v.visit_expr(object),
        Expr::MethodCall { target, args, .. } => {
            if let Some(target) = target {
                v.visit_expr(target);
            }
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::ArrayLit { elem_ty, elements } => {
            if let Some(elem_ty) = elem_ty {
                v.visit_type_expr(elem_ty);
            }
            for e in elements {
                v.visit_expr(e);
            }
        }
        Expr::NewArray { elem_ty, size } => {
            v.visit_type_expr(elem_ty);
            v.visit_expr(size);
        }
        Expr::NewObject { args, .. } => {
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::Index { array, index } => {
            v.visit_expr(array);
            v.visit_expr(index);
        }
    }
}

pub fn walk_type_expr<V: Visitor>(v: &mut V, te: &Spanned<TypeExpr>) {
    if let TypeExpr::Array(inner) = &te.node {
        v.visit_type_expr(inner);
    }
}
