//! Small visitor-backed queries shared by the resolver, codegen and tests.

use crate::parser::ast::*;
use crate::span::Spanned;
use crate::visit::{Visitor, walk_block, walk_class, walk_expr, walk_stmt};

/// True if any expression in the tree matches `predicate`. Short-circuits.
pub fn contains_expr<F>(expr: &Spanned<Expr>, predicate: F) -> bool
where
    F: Fn(&Spanned<Expr>) -> bool,
{
    struct Detector<F> {
        predicate: F,
        found: bool,
    }

    impl<F> Visitor for Detector<F>
    where
        F: Fn(&Spanned<Expr>) -> bool,
    {
        fn visit_expr(&mut self, expr: &Spanned<Expr>) {
            if self.found {
                return;
            }
            if (self.predicate)(expr) {
                self.found = true;
                return;
            }
            walk_expr(self, expr);
        }
    }

    let mut detector = Detector { predicate, found: false };
    detector.visit_expr(expr);
    detector.found
}

/// True if any expression anywhere in `block` matches `predicate`.
pub fn contains_expr_in_block<F>(block: &Block, predicate: F) -> bool
where
    F: Fn(&Spanned<Expr>) -> bool,
{
    struct Detector<F> {
        predicate: F,
        found: bool,
    }

    impl<F> Visitor for Detector<F>
    where
        F: Fn(&Spanned<Expr>) -> bool,
    {
        fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
            if !self.found {
                walk_stmt(self, stmt);
            }
        }

        fn visit_expr(&mut self, expr: &Spanned<Expr>) {
            if self.found {
                return;
            }
            if (self.predicate)(expr) {
                self.found = true;
                return;
            }
            walk_expr(self, expr);
        }
    }

    let mut detector = Detector { predicate, found: false };
    walk_block(&mut detector, block);
    detector.found
}

/// True if any statement nested in `block` matches `predicate`.
///
/// `descend` decides whether to look inside a matching-candidate statement's
/// children; returning false for e.g. `Try` keeps the search lexically local.
pub fn contains_stmt_in_block<F, D>(block: &Block, predicate: F, descend: D) -> bool
where
    F: Fn(&Stmt) -> bool,
    D: Fn(&Stmt) -> bool,
{
    struct Detector<F, D> {
        predicate: F,
        descend: D,
        found: bool,
    }

    impl<F, D> Visitor for Detector<F, D>
    where
        F: Fn(&Stmt) -> bool,
        D: Fn(&Stmt) -> bool,
    {
        fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
            if self.found {
                return;
            }
            if (self.predicate)(&stmt.node) {
                self.found = true;
                return;
            }
            if (self.descend)(&stmt.node) {
                walk_stmt(self, stmt);
            }
        }

        // statements only
        fn visit_expr(&mut self, _expr: &Spanned<Expr>) {}
    }

    let mut detector = Detector { predicate, descend, found: false };
    walk_block(&mut detector, block);
    detector.found
}

/// Pre-order sequence of statement and expression kind names.
pub fn node_kinds(class: &Spanned<ClassDecl>) -> Vec<&'static str> {
    struct Kinds(Vec<&'static str>);

    impl Visitor for Kinds {
        fn visit_method(&mut self, method: &Spanned<MethodDecl>) {
            self.0.push("MethodDecl");
            crate::visit::walk_method(self, method);
        }

        fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
            self.0.push(stmt.node.kind_name());
            walk_stmt(self, stmt);
        }

        fn visit_catch(&mut self, catch: &Spanned<CatchClause>) {
            self.0.push("CatchClause");
            crate::visit::walk_catch(self, catch);
        }

        fn visit_expr(&mut self, expr: &Spanned<Expr>) {
            self.0.push(expr.node.kind_name());
            walk_expr(self, expr);
        }
    }

    let mut kinds = Kinds(vec!["ClassDecl"]);
    walk_class(&mut kinds, class);
    kinds.0
}
