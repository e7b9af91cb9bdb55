use std::collections::{HashMap, HashSet};

use crate::diagnostics::CompileError;
use crate::parser::ast::*;
use crate::resolve::builtins::{Builtin, ThrowableKind, classify_throwable};
use crate::resolve::{CallTarget, IterSource, Resolution, StaticType, SymbolKind};
use crate::span::Spanned;
use crate::visit::composers::{contains_expr_in_block, contains_stmt_in_block};
use crate::visit::scope_tracker::ScopeTracker;

use super::effects;
use super::emit::EmissionBuffer;
use super::runtime::{Helper, RuntimeRegistry};

const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in", "local", "nil",
    "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// Globals the generated code calls; user names must not shadow them.
const LUA_GLOBALS: &[&str] = &[
    "print", "io", "math", "string", "table", "tostring", "tonumber", "error", "pcall", "ipairs", "select", "type",
    "arg", "_G", "_ENV",
];

// Lua operator precedence, lowest first.
const PREC_OR: u8 = 1;
const PREC_AND: u8 = 2;
const PREC_CMP: u8 = 3;
const PREC_CONCAT: u8 = 8;
const PREC_ADD: u8 = 9;
const PREC_MUL: u8 = 10;
const PREC_UNARY: u8 = 11;
const PREC_ATOM: u8 = 13;

/// Name a source identifier gets in Lua.
pub fn lua_name(name: &str) -> String {
    if LUA_KEYWORDS.contains(&name) || LUA_GLOBALS.contains(&name) || name.starts_with("__") {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// `base` if it is free, else `base_N` for the smallest free N.
fn fresh_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut n = 1;
    loop {
        let candidate = format!("{base}_{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Lua names of the class's static fields and methods. No two members share
/// a Lua name, even when keyword renaming would make them meet (`end`, `end_`).
#[derive(Debug, Default)]
pub struct MemberNames {
    names: HashMap<String, String>,
    taken: HashSet<String>,
}

impl MemberNames {
    pub fn new<'n>(members: impl IntoIterator<Item = &'n str>) -> Self {
        let mut out = MemberNames::default();
        for name in members {
            let lua = fresh_name(&lua_name(name), |c| out.taken.contains(c));
            out.taken.insert(lua.clone());
            out.names.insert(name.to_string(), lua);
        }
        out
    }

    pub fn get(&self, name: &str) -> String {
        self.names.get(name).cloned().unwrap_or_else(|| lua_name(name))
    }

    pub fn is_taken(&self, lua: &str) -> bool {
        self.taken.contains(lua)
    }
}

/// Double-quoted Lua string literal for `s`.
pub fn lua_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            // three digits so a following digit is not absorbed
            c if (c as u32) < 0x20 || c == '\x7f' => out.push_str(&format!("\\{:03}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A lowered expression and the precedence of its outermost operator.
#[derive(Debug, Clone)]
pub(super) struct Lua {
    pub code: String,
    prec: u8,
    /// A function call, usable as a statement on its own.
    is_call: bool,
}

impl Lua {
    fn atom(code: impl Into<String>) -> Self {
        Lua { code: code.into(), prec: PREC_ATOM, is_call: false }
    }

    fn call(code: impl Into<String>) -> Self {
        Lua { code: code.into(), prec: PREC_ATOM, is_call: true }
    }

    fn op(code: String, prec: u8) -> Self {
        Lua { code, prec, is_call: false }
    }

    /// Code usable as an operand of an operator binding at `min`.
    fn at(&self, min: u8) -> String {
        if self.prec < min { format!("({})", self.code) } else { self.code.clone() }
    }
}

fn infix(l: &Lua, op: &str, r: &Lua, prec: u8) -> Lua {
    Lua::op(format!("{} {op} {}", l.at(prec), r.at(prec + 1)), prec)
}

fn unsupported<T>(construct: impl Into<String>, span: crate::span::Span) -> Result<T, CompileError> {
    Err(CompileError::unsupported(construct, span))
}

/// Per-unit lowering state. Lines go to `buf`; helper usage to `runtime`.
pub struct LowerContext<'a> {
    res: &'a Resolution,
    pub buf: EmissionBuffer,
    pub runtime: RuntimeRegistry,
    /// Source local name -> Lua local name.
    locals: ScopeTracker<String>,
    /// Lua names of fields and methods, which locals must not shadow.
    pub members: MemberNames,
    next_temp: u32,
    next_try: u32,
    /// The current statement is lowered in evaluation-order-preserving mode.
    ordered: bool,
    returns_value: bool,
    /// Guarded bodies entered since the start of the current function.
    guard_depth: usize,
    /// `guard_depth` at the innermost enclosing loop.
    loop_guard: Option<usize>,
}

impl<'a> LowerContext<'a> {
    pub fn new(res: &'a Resolution, indent_width: usize, members: MemberNames) -> Self {
        LowerContext {
            res,
            buf: EmissionBuffer::new(indent_width),
            runtime: RuntimeRegistry::new(),
            locals: ScopeTracker::new(),
            members,
            next_temp: 0,
            next_try: 0,
            ordered: false,
            returns_value: false,
            guard_depth: 0,
            loop_guard: None,
        }
    }

    fn in_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, CompileError>) -> Result<T, CompileError> {
        self.locals.push_scope();
        let result = f(self);
        self.locals.pop_scope();
        result
    }

    fn indented<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, CompileError>) -> Result<T, CompileError> {
        self.buf.indent();
        let result = f(self);
        self.buf.dedent();
        result
    }

    fn enter_function(&mut self, returns_value: bool) {
        self.returns_value = returns_value;
        self.guard_depth = 0;
        self.loop_guard = None;
    }

    /// Bind a source local to a Lua name no member or visible local uses.
    fn declare_local(&mut self, name: &str) -> String {
        let lua = fresh_name(&lua_name(name), |c| {
            self.members.is_taken(c) || self.locals.visible().any(|(_, bound)| bound == c)
        });
        self.locals.insert(name.to_string(), lua.clone());
        lua
    }

    fn local_name(&self, name: &str) -> String {
        self.locals.lookup(name).cloned().unwrap_or_else(|| lua_name(name))
    }

    fn bind_temp(&mut self, value: Lua) -> Lua {
        self.next_temp += 1;
        let name = format!("__t{}", self.next_temp);
        self.buf.line(format!("local {name} = {}", value.code));
        Lua::atom(name)
    }

    fn order_for(&mut self, expr: &Spanned<Expr>) {
        self.ordered = effects::needs_ordering(expr, self.res);
    }

    // ---- Units ----

    pub fn lower_method(&mut self, method: &MethodDecl) -> Result<(), CompileError> {
        self.enter_function(method.return_type.node != TypeExpr::Void);
        self.in_scope(|cx| {
            let params: Vec<String> = method.params.iter().map(|p| cx.declare_local(&p.name.node)).collect();
            let name = cx.members.get(&method.name.node);
            cx.buf.line(format!("function {name}({})", params.join(", ")));
            cx.indented(|cx| cx.lower_stmts(&method.body.node.stmts))?;
            cx.buf.line("end");
            Ok(())
        })
    }

    /// `main`'s body, emitted as top-level chunk statements.
    pub fn lower_main(&mut self, method: &MethodDecl) -> Result<(), CompileError> {
        self.enter_function(false);
        self.in_scope(|cx| {
            match method.params.first() {
                Some(args) if cx.res.main_args_used => {
                    let name = cx.declare_local(&args.name.node);
                    cx.buf.line(format!("local {name} = {{...}}"));
                }
                _ => {}
            }
            cx.lower_stmts(&method.body.node.stmts)
        })
    }

    pub fn lower_field_init(&mut self, field: &FieldDecl) -> Result<(), CompileError> {
        self.enter_function(false);
        let name = self.members.get(&field.name.node);
        let declared = StaticType::from_type_expr(&field.ty.node);
        match &field.value {
            Some(value) => {
                self.check_array_init(&declared, value)?;
                self.order_for(value);
                let value = self.lower_expr(value)?;
                self.buf.line(format!("{name} = {}", value.code));
            }
            None => {
                if let Some(default) = declared.default_value() {
                    self.buf.line(format!("{name} = {default}"));
                }
            }
        }
        Ok(())
    }

    fn check_array_init(&self, declared: &StaticType, value: &Spanned<Expr>) -> Result<(), CompileError> {
        let actual = self.res.type_of(value);
        if declared.is_array() && !actual.is_array() && actual != StaticType::Unknown {
            return unsupported("array variable initialised from a non-array value", value.span);
        }
        Ok(())
    }

    // ---- Statements ----

    fn lower_stmts(&mut self, stmts: &[Spanned<Stmt>]) -> Result<(), CompileError> {
        for (i, stmt) in stmts.iter().enumerate() {
            self.lower_stmt(stmt, i + 1 == stmts.len())?;
        }
        Ok(())
    }

    /// Body of a loop or branch, in its own scope, one level deeper.
    fn lower_body(&mut self, body: &Spanned<Stmt>) -> Result<(), CompileError> {
        self.indented(|cx| {
            cx.in_scope(|cx| match &body.node {
                Stmt::Block(block) => cx.lower_stmts(&block.stmts),
                _ => cx.lower_stmt(body, true),
            })
        })
    }

    fn lower_loop_body(&mut self, f: impl FnOnce(&mut Self) -> Result<(), CompileError>) -> Result<(), CompileError> {
        let saved = self.loop_guard.replace(self.guard_depth);
        let result = f(self);
        self.loop_guard = saved;
        result
    }

    fn lower_stmt(&mut self, stmt: &Spanned<Stmt>, is_last: bool) -> Result<(), CompileError> {
        match &stmt.node {
            Stmt::VarDecl { ty, name, value } => {
                let value = match value {
                    Some(value) => {
                        self.check_array_init(&StaticType::from_type_expr(&ty.node), value)?;
                        self.order_for(value);
                        Some(self.lower_expr(value)?)
                    }
                    None => None,
                };
                let local = self.declare_local(&name.node);
                match value {
                    Some(value) => self.buf.line(format!("local {local} = {}", value.code)),
                    None => self.buf.line(format!("local {local}")),
                }
            }
            Stmt::ForEach { var, iterable, body, .. } => {
                if self.res.iter_source(stmt.span) == IterSource::NotArray {
                    return unsupported("for-each over a non-array value", iterable.span);
                }
                self.order_for(iterable);
                let iterable = self.lower_expr(iterable)?;
                self.in_scope(|cx| {
                    let var = cx.declare_local(&var.node);
                    cx.buf.line(format!("for _, {var} in ipairs({}) do", iterable.code));
                    cx.lower_loop_body(|cx| cx.indented(|cx| cx.lower_stmts(&body.node.stmts)))?;
                    cx.buf.line("end");
                    Ok(())
                })?;
            }
            Stmt::While { condition, body } => {
                self.order_for(condition);
                if self.ordered {
                    self.buf.line("while true do");
                    self.lower_loop_body(|cx| {
                        cx.indented(|cx| {
                            cx.ordered = true;
                            let cond = cx.lower_expr(condition)?;
                            cx.buf.line(format!("if not {} then break end", cond.at(PREC_UNARY)));
                            Ok(())
                        })?;
                        cx.lower_body(body)
                    })?;
                } else {
                    let cond = self.lower_expr(condition)?;
                    self.buf.line(format!("while {} do", cond.code));
                    self.lower_loop_body(|cx| cx.lower_body(body))?;
                }
                self.buf.line("end");
            }
            Stmt::If { condition, then_branch, else_branch } => {
                self.order_for(condition);
                let cond = self.lower_expr(condition)?;
                self.buf.line(format!("if {} then", cond.code));
                self.lower_body(then_branch)?;
                let mut next = else_branch.as_deref();
                while let Some(branch) = next {
                    match &branch.node {
                        Stmt::If { condition, then_branch, else_branch }
                            if !effects::needs_ordering(condition, self.res) =>
                        {
                            self.ordered = false;
                            let cond = self.lower_expr(condition)?;
                            self.buf.line(format!("elseif {} then", cond.code));
                            self.lower_body(then_branch)?;
                            next = else_branch.as_deref();
                        }
                        _ => {
                            self.buf.line("else");
                            self.lower_body(branch)?;
                            next = None;
                        }
                    }
                }
                self.buf.line("end");
            }
            Stmt::Try { body, catches, finally } => self.lower_try(body, catches, finally.as_ref())?,
            Stmt::Throw { exception, .. } if classify_throwable(&exception.node) == ThrowableKind::NotAnException => {
                return unsupported(format!("throw of '{}', which is not an Exception", exception.node), exception.span);
            }
            Stmt::Throw { message, .. } => match message {
                Some(message) => {
                    self.order_for(message);
                    let message = self.lower_expr(message)?;
                    self.buf.line(format!("error({}, 0)", message.code));
                }
                None => self.buf.line("error(\"null\", 0)"),
            },
            Stmt::Rethrow { value } => {
                if !self.res.is_caught_exception(value) {
                    return unsupported("throw of an exception object", value.span);
                }
                let Expr::Ident(name) = &value.node else {
                    return unsupported("throw of an exception object", value.span);
                };
                let name = self.local_name(name);
                self.buf.line(format!("error({name}, 0)"));
            }
            Stmt::Return(value) => {
                let value = match value {
                    Some(value) => {
                        self.order_for(value);
                        Some(self.lower_expr(value)?.code)
                    }
                    None => None,
                };
                self.emit_return(value, is_last);
            }
            Stmt::Break => match self.loop_guard {
                Some(depth) if depth == self.guard_depth => self.buf.line("break"),
                Some(_) => return unsupported("break out of a try block", stmt.span),
                None => return unsupported("break outside a loop", stmt.span),
            },
            Stmt::Expr(expr) => self.lower_expr_stmt(expr)?,
            Stmt::Block(block) => {
                self.buf.line("do");
                self.indented(|cx| cx.in_scope(|cx| cx.lower_stmts(&block.stmts)))?;
                self.buf.line("end");
            }
            Stmt::Unsupported { construct, .. } => return unsupported(construct.clone(), stmt.span),
        }
        Ok(())
    }

    fn emit_return(&mut self, value: Option<String>, is_last: bool) {
        let mut parts = Vec::new();
        if self.guard_depth > 0 {
            // inside a pcall closure: flag the return for the caller
            parts.push("true".to_string());
        }
        parts.extend(value);
        let stmt = if parts.is_empty() { "return".to_string() } else { format!("return {}", parts.join(", ")) };
        if is_last {
            self.buf.line(stmt);
        } else {
            self.buf.line(format!("do {stmt} end"));
        }
    }

    fn lower_try(
        &mut self,
        body: &Spanned<Block>,
        catches: &[Spanned<CatchClause>],
        finally: Option<&Spanned<Block>>,
    ) -> Result<(), CompileError> {
        if let Some(finally) = finally {
            return unsupported("finally block", finally.span);
        }
        if let Some(extra) = catches.get(1) {
            return unsupported("multiple catch clauses", extra.span);
        }
        if let Some(catch) = catches.first() {
            self.check_catch_type(&body.node, catch)?;
        }

        self.next_try += 1;
        let n = self.next_try;
        let (ok, err) = (format!("__ok{n}"), format!("__res{n}"));
        let has_return = contains_stmt_in_block(&body.node, |s| matches!(s, Stmt::Return(_)), |_| true);
        let ret = (has_return && self.returns_value).then(|| format!("__ret{n}"));

        match &ret {
            Some(ret) => self.buf.line(format!("local {ok}, {err}, {ret} = pcall(function()")),
            None => self.buf.line(format!("local {ok}, {err} = pcall(function()")),
        }
        self.guard_depth += 1;
        let lowered = self.indented(|cx| cx.in_scope(|cx| cx.lower_stmts(&body.node.stmts)));
        self.guard_depth -= 1;
        lowered?;
        self.buf.line("end)");

        self.buf.line(format!("if not {ok} then"));
        match catches.first() {
            Some(catch) => self.indented(|cx| {
                cx.in_scope(|cx| {
                    let var = cx.declare_local(&catch.node.var.node);
                    cx.buf.line(format!("local {var} = {err}"));
                    cx.lower_stmts(&catch.node.body.node.stmts)
                })
            })?,
            None => self.buf.with_indent(|b| b.line(format!("error({err}, 0)"))),
        }
        if has_return {
            self.buf.line(format!("elseif {err} then"));
            self.buf.indent();
            self.emit_return(ret, true);
            self.buf.dedent();
        }
        self.buf.line("end");
        Ok(())
    }

    /// `pcall` traps every raised value, so the clause must be one that
    /// catches everything the guarded body can raise.
    fn check_catch_type(&self, body: &Block, catch: &Spanned<CatchClause>) -> Result<(), CompileError> {
        let ty = &catch.node.exception_ty;
        let catches_all = match &ty.node {
            TypeExpr::Named(name) => match name.as_str() {
                "Exception" | "Throwable" => true,
                "RuntimeException" => !self.may_raise_checked(body),
                _ => false,
            },
            _ => false,
        };
        if catches_all {
            Ok(())
        } else {
            unsupported(format!("catch of specific exception type '{}'", ty.node), ty.span)
        }
    }

    /// A checked `throw`, a rethrow not typed `RuntimeException`, or a call
    /// to a method whose `throws` clause names a checked class.
    fn may_raise_checked(&self, body: &Block) -> bool {
        let res = self.res;
        let checked = |class: &str| classify_throwable(class) != ThrowableKind::Unchecked;
        let raises = contains_stmt_in_block(
            body,
            |s| match s {
                Stmt::Throw { exception, .. } => checked(exception.node.as_str()),
                Stmt::Rethrow { value } => res.type_of(value) != StaticType::Object("RuntimeException".into()),
                _ => false,
            },
            |_| true,
        );
        raises
            || contains_expr_in_block(body, |e| match res.call(e.span) {
                CallTarget::Static(name) if matches!(e.node, Expr::MethodCall { .. }) => res
                    .method(name)
                    .is_some_and(|sigs| sigs.iter().any(|sig| sig.throws.iter().any(|t| checked(t.as_str())))),
                _ => false,
            })
    }

    fn lower_expr_stmt(&mut self, expr: &Spanned<Expr>) -> Result<(), CompileError> {
        self.order_for(expr);
        match &expr.node {
            Expr::Assign { op, target, value } => {
                let name = self.assign_target(target)?;
                let value = match op.bin_op() {
                    Some(bin) => self.lower_binary(bin, target, value)?,
                    None => self.lower_expr(value)?,
                };
                self.buf.line(format!("{name} = {}", value.code));
            }
            Expr::IncDec { target, increment, .. } => {
                let name = self.assign_target(target)?;
                let op = if *increment { "+" } else { "-" };
                self.buf.line(format!("{name} = {name} {op} 1"));
            }
            _ => {
                let value = self.lower_expr(expr)?;
                if value.is_call {
                    self.buf.line(value.code);
                } else {
                    self.buf.line(format!("local _ = {}", value.code));
                }
            }
        }
        Ok(())
    }

    fn assign_target(&mut self, target: &Spanned<Expr>) -> Result<String, CompileError> {
        match &target.node {
            Expr::Ident(_) | Expr::FieldAccess { .. } => {}
            Expr::Index { .. } => return unsupported("array indexing", target.span),
            _ => return unsupported("assignment target", target.span),
        }
        match self.res.symbol(target.span).map(|s| (s.kind, s.name.as_str())) {
            Some((SymbolKind::Local | SymbolKind::Param | SymbolKind::LoopVar, name)) => Ok(self.local_name(name)),
            Some((SymbolKind::StaticField, name)) => Ok(self.members.get(name)),
            Some((SymbolKind::CatchVar, _)) => unsupported("use of a caught exception object", target.span),
            Some((SymbolKind::InstanceField, _)) => unsupported("instance field", target.span),
            None => unsupported("assignment target", target.span),
        }
    }

    // ---- Expressions ----

    /// Lowers operands left to right. In ordered mode an order-sensitive
    /// operand followed by an effectful one is bound to a temp first.
    fn lower_operands(&mut self, ops: &[&Spanned<Expr>]) -> Result<Vec<Lua>, CompileError> {
        let bind = if self.ordered { effects::followed_by_effect(ops, self.res) } else { vec![false; ops.len()] };
        let mut out = Vec::with_capacity(ops.len());
        for (op, later_effect) in ops.iter().zip(bind) {
            let lowered = self.lower_expr(op)?;
            if later_effect && effects::is_order_sensitive(op, self.res) {
                out.push(self.bind_temp(lowered));
            } else {
                out.push(lowered);
            }
        }
        Ok(out)
    }

    fn lower_pair(&mut self, lhs: &Spanned<Expr>, rhs: &Spanned<Expr>) -> Result<(Lua, Lua), CompileError> {
        let mut ops = self.lower_operands(&[lhs, rhs])?.into_iter();
        match (ops.next(), ops.next()) {
            (Some(l), Some(r)) => Ok((l, r)),
            _ => unsupported("expression", lhs.span.to(rhs.span)),
        }
    }

    pub(super) fn lower_expr(&mut self, expr: &Spanned<Expr>) -> Result<Lua, CompileError> {
        match &expr.node {
            Expr::IntLit(n) => Ok(Lua::atom(n.to_string())),
            Expr::StringLit(s) => Ok(Lua::atom(lua_string(s))),
            Expr::CharLit(_) => unsupported("char literal", expr.span),
            Expr::BoolLit(b) => Ok(Lua::atom(b.to_string())),
            Expr::Ident(name) => self.lower_ident(expr, name),
            Expr::Binary { op, lhs, rhs } => self.lower_binary(*op, lhs, rhs),
            Expr::Unary { op, operand } => {
                let operand = self.lower_expr(operand)?;
                Ok(match op {
                    UnaryOp::Neg if operand.code.starts_with('-') => {
                        Lua::op(format!("-({})", operand.code), PREC_UNARY)
                    }
                    UnaryOp::Neg => Lua::op(format!("-{}", operand.at(PREC_UNARY)), PREC_UNARY),
                    UnaryOp::Not => Lua::op(format!("not {}", operand.at(PREC_UNARY)), PREC_UNARY),
                })
            }
            Expr::Assign { .. } | Expr::IncDec { .. } => unsupported("assignment used as a value", expr.span),
            Expr::FieldAccess { object, field } => self.lower_field_access(expr, object, field),
            Expr::MethodCall { target, method, args } => self.lower_call(expr, target.as_deref(), method, args),
            Expr::ArrayLit { elements, .. } => {
                let refs: Vec<&Spanned<Expr>> = elements.iter().collect();
                let parts = self.lower_operands(&refs)?;
                let codes: Vec<String> = parts.into_iter().map(|p| p.code).collect();
                Ok(Lua::atom(format!("{{{}}}", codes.join(", "))))
            }
            Expr::NewArray { elem_ty, size } => {
                let elem = StaticType::from_type_expr(&elem_ty.node);
                let Some(init) = elem.default_value() else {
                    return unsupported(format!("array of {elem} without initializer"), expr.span);
                };
                let size = self.lower_expr(size)?;
                let helper = self.runtime.require(Helper::NewArray);
                Ok(Lua::call(format!("{helper}({}, {init})", size.code)))
            }
            Expr::NewObject { class, .. } => unsupported(format!("creation of {} object", class.node), expr.span),
            Expr::Index { .. } => unsupported("array indexing", expr.span),
        }
    }

    fn lower_ident(&mut self, expr: &Spanned<Expr>, name: &str) -> Result<Lua, CompileError> {
        let Some(symbol) = self.res.symbol(expr.span) else {
            return Err(CompileError::unresolved(name, expr.span));
        };
        match symbol.kind {
            SymbolKind::Local | SymbolKind::Param | SymbolKind::LoopVar => Ok(Lua::atom(self.local_name(name))),
            SymbolKind::StaticField => Ok(Lua::atom(self.members.get(name))),
            SymbolKind::CatchVar => unsupported("use of a caught exception object", expr.span),
            SymbolKind::InstanceField => unsupported("instance field", expr.span),
        }
    }

    fn lower_binary(&mut self, op: BinOp, lhs: &Spanned<Expr>, rhs: &Spanned<Expr>) -> Result<Lua, CompileError> {
        let res = self.res;
        if matches!(op, BinOp::And | BinOp::Or) && self.ordered && effects::is_effectful(rhs, res) {
            // short-circuit with statements on the right: spell it out
            let lhs = self.lower_expr(lhs)?;
            let result = self.bind_temp(lhs);
            let guard = if op == BinOp::And { result.code.clone() } else { format!("not {}", result.code) };
            self.buf.line(format!("if {guard} then"));
            self.indented(|cx| {
                let rhs = cx.lower_expr(rhs)?;
                cx.buf.line(format!("{} = {}", result.code, rhs.code));
                Ok(())
            })?;
            self.buf.line("end");
            return Ok(result);
        }

        let concat = op == BinOp::Add && (res.type_of(lhs) == StaticType::String || res.type_of(rhs) == StaticType::String);
        let (l, r) = self.lower_pair(lhs, rhs)?;
        if concat {
            let l = stringify(l, &res.type_of(lhs));
            let r = stringify(r, &res.type_of(rhs));
            // concatenation is associative, so neither side needs grouping
            return Ok(Lua::op(format!("{} .. {}", l.at(PREC_CONCAT), r.at(PREC_CONCAT)), PREC_CONCAT));
        }
        Ok(match op {
            BinOp::Add => infix(&l, "+", &r, PREC_ADD),
            BinOp::Sub => infix(&l, "-", &r, PREC_ADD),
            BinOp::Mul => infix(&l, "*", &r, PREC_MUL),
            BinOp::Div => Lua::call(format!("{}({}, {})", self.runtime.require(Helper::IntDiv), l.code, r.code)),
            BinOp::Mod => Lua::call(format!("{}({}, {})", self.runtime.require(Helper::IntRem), l.code, r.code)),
            BinOp::Eq => infix(&l, "==", &r, PREC_CMP),
            BinOp::Neq => infix(&l, "~=", &r, PREC_CMP),
            BinOp::Lt => infix(&l, "<", &r, PREC_CMP),
            BinOp::Gt => infix(&l, ">", &r, PREC_CMP),
            BinOp::LtEq => infix(&l, "<=", &r, PREC_CMP),
            BinOp::GtEq => infix(&l, ">=", &r, PREC_CMP),
            BinOp::And => infix(&l, "and", &r, PREC_AND),
            BinOp::Or => infix(&l, "or", &r, PREC_OR),
        })
    }

    fn lower_field_access(
        &mut self,
        expr: &Spanned<Expr>,
        object: &Spanned<Expr>,
        field: &Spanned<String>,
    ) -> Result<Lua, CompileError> {
        if let Some(value) = self.res.constant(expr.span) {
            return Ok(if value < 0 { Lua::op(value.to_string(), PREC_UNARY) } else { Lua::atom(value.to_string()) });
        }
        if let Some(symbol) = self.res.symbol(expr.span) {
            return match symbol.kind {
                SymbolKind::StaticField => Ok(Lua::atom(self.members.get(&symbol.name))),
                _ => unsupported("instance field", expr.span),
            };
        }
        if field.node == "length" && self.res.type_of(object).is_array() {
            let array = self.lower_expr(object)?;
            return Ok(Lua::op(format!("#{}", array.at(PREC_UNARY)), PREC_UNARY));
        }
        let path = expr.node.as_path().unwrap_or_else(|| format!(".{}", field.node));
        unsupported(format!("field access '{path}'"), expr.span)
    }

    fn lower_call(
        &mut self,
        expr: &Spanned<Expr>,
        target: Option<&Spanned<Expr>>,
        method: &Spanned<String>,
        args: &[Spanned<Expr>],
    ) -> Result<Lua, CompileError> {
        let res = self.res;
        match res.call(expr.span) {
            CallTarget::Static(name) if name == "main" => unsupported("call to main", expr.span),
            CallTarget::Static(name) => {
                let refs: Vec<&Spanned<Expr>> = args.iter().collect();
                let args = self.lower_operands(&refs)?;
                Ok(Lua::call(format!("{}({})", self.members.get(name), join(&args))))
            }
            CallTarget::Builtin(builtin) => self.lower_builtin(expr, *builtin, target, args),
            CallTarget::Unknown => unsupported(format!("call to unknown method '{}'", method.node), expr.span),
        }
    }

    fn lower_builtin(
        &mut self,
        expr: &Spanned<Expr>,
        builtin: Builtin,
        target: Option<&Spanned<Expr>>,
        args: &[Spanned<Expr>],
    ) -> Result<Lua, CompileError> {
        let res = self.res;
        if builtin == Builtin::GetMessage {
            return match target.map(|t| &t.node) {
                Some(Expr::Ident(name)) => Ok(Lua::atom(self.local_name(name))),
                _ => unsupported("getMessage on a non-exception value", expr.span),
            };
        }

        // receiver-style builtins evaluate the receiver first
        let mut refs: Vec<&Spanned<Expr>> = Vec::with_capacity(args.len() + 1);
        if matches!(builtin, Builtin::StringLength | Builtin::StringEquals) {
            match target {
                Some(t) => refs.push(t),
                None => return unsupported("string method without receiver", expr.span),
            }
        }
        refs.extend(args.iter());
        let types: Vec<StaticType> = refs.iter().map(|e| res.type_of(e)).collect();
        let ops = self.lower_operands(&refs)?;

        Ok(match (builtin, ops.as_slice()) {
            (Builtin::Println, []) => Lua::call("print()"),
            (Builtin::Println, [x]) => Lua::call(format!("print({})", x.code)),
            (Builtin::Print, [x]) => Lua::call(format!("io.write({})", stringify(x.clone(), &types[0]).code)),
            (Builtin::ErrPrintln, []) => Lua::call("io.stderr:write(\"\\n\")"),
            (Builtin::ErrPrintln, [x]) => {
                Lua::call(format!("io.stderr:write({}, \"\\n\")", stringify(x.clone(), &types[0]).code))
            }
            (Builtin::MathMax, [a, b]) => Lua::call(format!("math.max({}, {})", a.code, b.code)),
            (Builtin::MathMin, [a, b]) => Lua::call(format!("math.min({}, {})", a.code, b.code)),
            (Builtin::MathAbs, [a]) => Lua::call(format!("math.abs({})", a.code)),
            (Builtin::ToString, [x]) => Lua::call(format!("tostring({})", x.code)),
            (Builtin::ParseInt, [s]) => Lua::call(format!("{}({})", self.runtime.require(Helper::ParseInt), s.code)),
            (Builtin::StringLength, [s]) => Lua::op(format!("#{}", s.at(PREC_UNARY)), PREC_UNARY),
            (Builtin::StringEquals, [s, t]) => infix(s, "==", t, PREC_CMP),
            _ => return unsupported(format!("call of {builtin:?} with {} arguments", args.len()), expr.span),
        })
    }
}

/// Value as a Lua string operand: ints and strings concatenate natively.
fn stringify(value: Lua, ty: &StaticType) -> Lua {
    if ty.prints_natively() { value } else { Lua::call(format!("tostring({})", value.code)) }
}

fn join(values: &[Lua]) -> String {
    values.iter().map(|v| v.code.as_str()).collect::<Vec<_>>().join(", ")
}
