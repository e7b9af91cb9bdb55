//! Semantic resolver: one scoped walk binding every name to its declaration.
//!
//! Produces a `Resolution` of span-keyed side tables (symbols, light static
//! types, call targets, for-each iteration sources). The AST itself is left
//! untouched.

pub mod builtins;
pub mod env;
pub mod types;

pub use env::{CallTarget, IterSource, MethodSig, Resolution, Symbol, SymbolKind};
pub use types::StaticType;

use crate::diagnostics::CompileError;
use crate::parser::ast::*;
use crate::span::{Span, Spanned};
use crate::visit::scope_tracker::ScopeTracker;
use builtins::{Builtin, NAMESPACES};

pub fn resolve(class: &Spanned<ClassDecl>) -> Result<Resolution, CompileError> {
    let mut resolver = Resolver {
        class_name: class.node.name.node.clone(),
        scopes: ScopeTracker::new(),
        out: Resolution::default(),
        return_type: StaticType::Void,
        main_args: None,
    };
    resolver.resolve_class(&class.node)?;
    tracing::debug!(
        symbols = resolver.out.symbols.len(),
        calls = resolver.out.calls.len(),
        "resolved names"
    );
    Ok(resolver.out)
}

struct Resolver {
    class_name: String,
    scopes: ScopeTracker<Symbol>,
    out: Resolution,
    return_type: StaticType,
    /// Declaration span of `main`'s `args` while resolving `main`.
    main_args: Option<Span>,
}

impl Resolver {
    fn resolve_class(&mut self, class: &ClassDecl) -> Result<(), CompileError> {
        // Class scope: every field and method is visible everywhere.
        for field in &class.fields {
            let f = &field.node;
            let kind = if f.is_static() { SymbolKind::StaticField } else { SymbolKind::InstanceField };
            self.declare(&f.name, kind, StaticType::from_type_expr(&f.ty.node));
        }
        for method in &class.methods {
            let m = &method.node;
            let sig = MethodSig {
                params: m.params.iter().map(|p| StaticType::from_type_expr(&p.ty.node)).collect(),
                return_type: StaticType::from_type_expr(&m.return_type.node),
                is_static: m.is_static(),
                throws: m.throws.iter().map(|t| t.node.clone()).collect(),
                span: m.name.span,
            };
            self.out.methods.entry(m.name.node.clone()).or_default().push(sig);
        }

        for field in &class.fields {
            if let Some(value) = &field.node.value {
                let expected = StaticType::from_type_expr(&field.node.ty.node);
                self.resolve_expr(value, Some(&expected))?;
            }
        }
        for method in &class.methods {
            self.resolve_method(&method.node)?;
        }
        Ok(())
    }

    fn resolve_method(&mut self, method: &MethodDecl) -> Result<(), CompileError> {
        self.scopes.push_scope();
        self.return_type = StaticType::from_type_expr(&method.return_type.node);
        self.main_args = None;
        if method.is_main() {
            self.main_args = method.params.first().map(|p| p.name.span);
        }
        for p in &method.params {
            self.declare(&p.name, SymbolKind::Param, StaticType::from_type_expr(&p.ty.node));
        }
        let result = self.resolve_block_stmts(&method.body.node);
        self.scopes.pop_scope();
        self.main_args = None;
        result
    }

    fn declare(&mut self, name: &Spanned<String>, kind: SymbolKind, ty: StaticType) {
        let symbol = Symbol { name: name.node.clone(), kind, ty, decl: name.span };
        self.scopes.insert(name.node.clone(), symbol);
    }

    fn in_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, CompileError>,
    ) -> Result<T, CompileError> {
        self.scopes.push_scope();
        let result = f(self);
        self.scopes.pop_scope();
        result
    }

    fn resolve_block(&mut self, block: &Block) -> Result<(), CompileError> {
        self.in_scope(|r| r.resolve_block_stmts(block))
    }

    fn resolve_block_stmts(&mut self, block: &Block) -> Result<(), CompileError> {
        for stmt in &block.stmts {
            self.resolve_stmt(stmt)?;
        }
        Ok(())
    }

    fn resolve_stmt(&mut self, stmt: &Spanned<Stmt>) -> Result<(), CompileError> {
        match &stmt.node {
            Stmt::VarDecl { ty, name, value } => {
                let declared = StaticType::from_type_expr(&ty.node);
                if let Some(value) = value {
                    self.resolve_expr(value, Some(&declared))?;
                }
                self.declare(name, SymbolKind::Local, declared);
            }
            Stmt::ForEach { elem_ty, var, iterable, body } => {
                let iter_ty = self.resolve_expr(iterable, None)?;
                let source = match &iterable.node {
                    Expr::ArrayLit { .. } => IterSource::ArrayLiteral,
                    Expr::Ident(_) if iter_ty.is_array() => IterSource::ArrayVariable,
                    _ if iter_ty.is_array() => IterSource::ArrayValue,
                    _ => IterSource::NotArray,
                };
                self.out.iter_sources.insert(stmt.span, source);
                let elem = StaticType::from_type_expr(&elem_ty.node);
                self.in_scope(|r| {
                    r.declare(var, SymbolKind::LoopVar, elem);
                    r.resolve_block_stmts(&body.node)
                })?;
            }
            Stmt::While { condition, body } => {
                self.resolve_expr(condition, Some(&StaticType::Boolean))?;
                self.in_scope(|r| r.resolve_stmt(body))?;
            }
            Stmt::If { condition, then_branch, else_branch } => {
                self.resolve_expr(condition, Some(&StaticType::Boolean))?;
                self.in_scope(|r| r.resolve_stmt(then_branch))?;
                if let Some(else_branch) = else_branch {
                    self.in_scope(|r| r.resolve_stmt(else_branch))?;
                }
            }
            Stmt::Try { body, catches, finally } => {
                self.resolve_block(&body.node)?;
                for catch in catches {
                    let c = &catch.node;
                    let ty = StaticType::from_type_expr(&c.exception_ty.node);
                    self.in_scope(|r| {
                        r.declare(&c.var, SymbolKind::CatchVar, ty);
                        r.resolve_block_stmts(&c.body.node)
                    })?;
                }
                if let Some(finally) = finally {
                    self.resolve_block(&finally.node)?;
                }
            }
            Stmt::Throw { message, .. } => {
                if let Some(message) = message {
                    self.resolve_expr(message, None)?;
                }
            }
            Stmt::Rethrow { value } => {
                self.resolve_expr(value, None)?;
            }
            Stmt::Return(value) => {
                if let Some(value) = value {
                    let expected = self.return_type.clone();
                    self.resolve_expr(value, Some(&expected))?;
                }
            }
            Stmt::Expr(expr) => {
                self.resolve_expr(expr, None)?;
            }
            Stmt::Block(block) => self.resolve_block(block)?,
            Stmt::Break | Stmt::Unsupported { .. } => {}
        }
        Ok(())
    }

    fn lookup(&mut self, name: &str, span: Span) -> Option<StaticType> {
        let symbol = self.scopes.lookup(name)?.clone();
        if Some(symbol.decl) == self.main_args {
            self.out.main_args_used = true;
        }
        let ty = symbol.ty.clone();
        self.out.symbols.insert(span, symbol);
        Some(ty)
    }

    /// True for a bare name that is a static qualifier rather than a value.
    fn is_namespace(&self, expr: &Expr) -> Option<String> {
        match expr {
            Expr::Ident(name)
                if !self.scopes.contains(name)
                    && (NAMESPACES.contains(&name.as_str()) || *name == self.class_name) =>
            {
                Some(name.clone())
            }
            Expr::FieldAccess { object, field }
                if matches!(&object.node, Expr::Ident(n) if n == "System" && !self.scopes.contains(n))
                    && matches!(field.node.as_str(), "out" | "err") =>
            {
                Some(format!("System.{}", field.node))
            }
            _ => None,
        }
    }

    fn resolve_expr(&mut self, expr: &Spanned<Expr>, expected: Option<&StaticType>) -> Result<StaticType, CompileError> {
        let ty = match &expr.node {
            Expr::IntLit(_) => StaticType::Int,
            Expr::StringLit(_) => StaticType::String,
            Expr::CharLit(_) => StaticType::Char,
            Expr::BoolLit(_) => StaticType::Boolean,
            Expr::Ident(name) => match self.lookup(name, expr.span) {
                Some(ty) => ty,
                None => return Err(CompileError::unresolved(name.clone(), expr.span)),
            },
            Expr::Binary { op, lhs, rhs } => {
                let l = self.resolve_expr(lhs, None)?;
                let r = self.resolve_expr(rhs, None)?;
                match op {
                    BinOp::Add if l == StaticType::String || r == StaticType::String => StaticType::String,
                    BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => StaticType::Int,
                    _ => StaticType::Boolean,
                }
            }
            Expr::Unary { op, operand } => {
                self.resolve_expr(operand, None)?;
                match op {
                    UnaryOp::Neg => StaticType::Int,
                    UnaryOp::Not => StaticType::Boolean,
                }
            }
            Expr::Assign { target, value, .. } => {
                let target_ty = self.resolve_expr(target, None)?;
                self.resolve_expr(value, Some(&target_ty))?;
                target_ty
            }
            Expr::IncDec { target, .. } => {
                self.resolve_expr(target, None)?;
                StaticType::Int
            }
            Expr::FieldAccess { object, field } => self.resolve_field_access(expr, object, field)?,
            Expr::MethodCall { target, method, args } => self.resolve_call(expr, target.as_deref(), method, args)?,
            Expr::ArrayLit { elem_ty, elements } => {
                let declared = match (elem_ty, expected) {
                    (Some(te), _) => Some(StaticType::from_type_expr(&te.node)),
                    (None, Some(StaticType::Array(inner))) => Some((**inner).clone()),
                    (None, _) => None,
                };
                let mut first = None;
                for e in elements {
                    let t = self.resolve_expr(e, declared.as_ref())?;
                    first.get_or_insert(t);
                }
                let elem = declared.or(first).unwrap_or(StaticType::Unknown);
                StaticType::Array(Box::new(elem))
            }
            Expr::NewArray { elem_ty, size } => {
                self.resolve_expr(size, Some(&StaticType::Int))?;
                StaticType::Array(Box::new(StaticType::from_type_expr(&elem_ty.node)))
            }
            Expr::NewObject { class, args } => {
                for arg in args {
                    self.resolve_expr(arg, None)?;
                }
                StaticType::Object(class.node.clone())
            }
            Expr::Index { array, index } => {
                let array_ty = self.resolve_expr(array, None)?;
                self.resolve_expr(index, Some(&StaticType::Int))?;
                array_ty.elem().cloned().unwrap_or(StaticType::Unknown)
            }
        };
        self.out.types.insert(expr.span, ty.clone());
        Ok(ty)
    }

    fn resolve_field_access(
        &mut self,
        expr: &Spanned<Expr>,
        object: &Spanned<Expr>,
        field: &Spanned<String>,
    ) -> Result<StaticType, CompileError> {
        if let Some(ns) = self.is_namespace(&object.node) {
            if ns == self.class_name {
                // `Main.count` names a field of the unit's class
                return match self.scopes.visible().find(|(n, s)| *n == field.node && is_field(s)) {
                    Some((_, symbol)) => {
                        let symbol = symbol.clone();
                        let ty = symbol.ty.clone();
                        self.out.symbols.insert(expr.span, symbol);
                        Ok(ty)
                    }
                    None => Err(CompileError::unresolved(format!("{ns}.{}", field.node), field.span)),
                };
            }
            if let Some(value) = builtins::constant(&ns, &field.node) {
                self.out.constants.insert(expr.span, value);
                return Ok(StaticType::Int);
            }
            if ns == "System" && matches!(field.node.as_str(), "out" | "err") {
                return Ok(StaticType::Object("PrintStream".into()));
            }
            return Err(CompileError::unresolved(format!("{ns}.{}", field.node), field.span));
        }

        let object_ty = self.resolve_expr(object, None)?;
        Ok(match (&object_ty, field.node.as_str()) {
            (StaticType::Array(_), "length") => StaticType::Int,
            _ => StaticType::Unknown,
        })
    }

    fn resolve_call(
        &mut self,
        expr: &Spanned<Expr>,
        target: Option<&Spanned<Expr>>,
        method: &Spanned<String>,
        args: &[Spanned<Expr>],
    ) -> Result<StaticType, CompileError> {
        let mut arg_types = Vec::with_capacity(args.len());
        let call = match target {
            None => self.own_method(method)?,
            Some(t) => match self.is_namespace(&t.node) {
                Some(ns) if ns == self.class_name => self.own_method(method)?,
                Some(ns) => match builtins::classify_static(&ns, &method.node, args.len()) {
                    Some(b) => CallTarget::Builtin(b),
                    None => CallTarget::Unknown,
                },
                None => {
                    let receiver = self.resolve_expr(t, None)?;
                    let caught = self.out.is_caught_exception(t);
                    match builtins::classify_instance(&receiver, caught, &method.node, args.len()) {
                        Some(b) => CallTarget::Builtin(b),
                        None => CallTarget::Unknown,
                    }
                }
            },
        };

        let params = match &call {
            CallTarget::Static(name) => self
                .out
                .method(name)
                .and_then(|sigs| sigs.iter().find(|s| s.params.len() == args.len()))
                .map(|sig| sig.params.clone()),
            _ => None,
        };
        for (i, arg) in args.iter().enumerate() {
            let expected = params.as_ref().and_then(|p| p.get(i));
            arg_types.push(self.resolve_expr(arg, expected)?);
        }

        let ty = match &call {
            CallTarget::Builtin(Builtin::MathAbs) | CallTarget::Builtin(Builtin::MathMax)
            | CallTarget::Builtin(Builtin::MathMin) => arg_types.first().cloned().unwrap_or(StaticType::Int),
            CallTarget::Builtin(b) => b.return_type(),
            CallTarget::Static(name) => self
                .out
                .method(name)
                .and_then(|sigs| sigs.iter().find(|s| s.params.len() == args.len()).or(sigs.first()))
                .map(|sig| sig.return_type.clone())
                .unwrap_or(StaticType::Unknown),
            CallTarget::Unknown => StaticType::Unknown,
        };
        self.out.calls.insert(expr.span, call);
        Ok(ty)
    }

    fn own_method(&self, method: &Spanned<String>) -> Result<CallTarget, CompileError> {
        if self.out.methods.contains_key(&method.node) {
            Ok(CallTarget::Static(method.node.clone()))
        } else {
            Err(CompileError::unresolved(method.node.clone(), method.span))
        }
    }
}

fn is_field(symbol: &Symbol) -> bool {
    matches!(symbol.kind, SymbolKind::StaticField | SymbolKind::InstanceField)
}
