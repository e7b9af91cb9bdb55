use crate::parser::ast::*;
use crate::span::Spanned;

/// Pretty-print a parsed class back into Java source text.
pub fn pretty_print(class: &Spanned<ClassDecl>) -> String {
    let mut pp = PrettyPrinter::new();
    pp.emit_class(&class.node);
    pp.buf
}

const PREC_ASSIGN: u8 = 1;
const PREC_PREFIX: u8 = 15;
const PREC_POSTFIX: u8 = 17;

struct PrettyPrinter {
    buf: String,
    indent: usize,
}

impl PrettyPrinter {
    fn new() -> Self {
        Self { buf: String::new(), indent: 0 }
    }

    fn write(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    fn newline(&mut self) {
        self.buf.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.buf.push_str("    ");
        }
    }

    fn indent(&mut self) {
        self.indent += 1;
    }

    fn dedent(&mut self) {
        self.indent -= 1;
    }

    // ── Class ────────────────────────────────────────────────────────

    fn emit_class(&mut self, class: &ClassDecl) {
        if class.is_pub {
            self.write("public ");
        }
        self.write("class ");
        self.write(&class.name.node);
        self.write(" {");
        self.newline();
        self.indent();

        for field in &class.fields {
            let f = &field.node;
            self.write_indent();
            self.emit_modifiers(&f.modifiers);
            self.write(&f.ty.node.to_string());
            self.write(" ");
            self.write(&f.name.node);
            if let Some(value) = &f.value {
                self.write(" = ");
                self.emit_expr(&value.node, 0);
            }
            self.write(";");
            self.newline();
        }

        for (i, method) in class.methods.iter().enumerate() {
            if i > 0 || !class.fields.is_empty() {
                self.newline();
            }
            self.emit_method(&method.node);
        }

        self.dedent();
        self.write("}");
        self.newline();
    }

    fn emit_modifiers(&mut self, modifiers: &[Modifier]) {
        for m in modifiers {
            self.write(m.as_str());
            self.write(" ");
        }
    }

    fn emit_method(&mut self, method: &MethodDecl) {
        self.write_indent();
        self.emit_modifiers(&method.modifiers);
        self.write(&method.return_type.node.to_string());
        self.write(" ");
        self.write(&method.name.node);
        self.write("(");
        for (i, p) in method.params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&p.ty.node.to_string());
            self.write(" ");
            self.write(&p.name.node);
        }
        self.write(")");
        if !method.throws.is_empty() {
            let names: Vec<&str> = method.throws.iter().map(|t| t.node.as_str()).collect();
            self.write(" throws ");
            self.write(&names.join(", "));
        }
        self.write(" ");
        self.emit_block(&method.body.node);
        self.newline();
    }

    // ── Statements ───────────────────────────────────────────────────

    /// `{`, the statements one level deeper, then `}` at the current indent.
    fn emit_block(&mut self, block: &Block) {
        self.write("{");
        self.newline();
        self.indent();
        for stmt in &block.stmts {
            self.write_indent();
            self.emit_stmt(&stmt.node);
            self.newline();
        }
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    /// Body of `if`/`while`: a block on the same line, anything else on the
    /// next line one level deeper.
    fn emit_body(&mut self, body: &Stmt) {
        match body {
            Stmt::Block(block) => {
                self.write(" ");
                self.emit_block(block);
            }
            other => {
                self.newline();
                self.indent();
                self.write_indent();
                self.emit_stmt(other);
                self.dedent();
            }
        }
    }

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl { ty, name, value } => {
                self.write(&ty.node.to_string());
                self.write(" ");
                self.write(&name.node);
                if let Some(value) = value {
                    self.write(" = ");
                    self.emit_expr(&value.node, 0);
                }
                self.write(";");
            }
            Stmt::ForEach { elem_ty, var, iterable, body } => {
                self.write("for (");
                self.write(&elem_ty.node.to_string());
                self.write(" ");
                self.write(&var.node);
                self.write(" : ");
                self.emit_expr(&iterable.node, 0);
                self.write(") ");
                self.emit_block(&body.node);
            }
            Stmt::While { condition, body } => {
                self.write("while (");
                self.emit_expr(&condition.node, 0);
                self.write(")");
                self.emit_body(&body.node);
            }
            Stmt::If { condition, then_branch, else_branch } => {
                self.write("if (");
                self.emit_expr(&condition.node, 0);
                self.write(")");
                self.emit_body(&then_branch.node);
                if let Some(else_branch) = else_branch {
                    if matches!(then_branch.node, Stmt::Block(_)) {
                        self.write(" ");
                    } else {
                        self.newline();
                        self.write_indent();
                    }
                    self.write("else");
                    match &else_branch.node {
                        Stmt::If { .. } => {
                            self.write(" ");
                            self.emit_stmt(&else_branch.node);
                        }
                        other => self.emit_body(other),
                    }
                }
            }
            Stmt::Try { body, catches, finally } => {
                self.write("try ");
                self.emit_block(&body.node);
                for catch in catches {
                    let c = &catch.node;
                    self.write(" catch (");
                    self.write(&c.exception_ty.node.to_string());
                    self.write(" ");
                    self.write(&c.var.node);
                    self.write(") ");
                    self.emit_block(&c.body.node);
                }
                if let Some(finally) = finally {
                    self.write(" finally ");
                    self.emit_block(&finally.node);
                }
            }
            Stmt::Throw { exception, message } => {
                self.write("throw new ");
                self.write(&exception.node);
                self.write("(");
                if let Some(message) = message {
                    self.emit_expr(&message.node, 0);
                }
                self.write(");");
            }
            Stmt::Rethrow { value } => {
                self.write("throw ");
                self.emit_expr(&value.node, 0);
                self.write(";");
            }
            Stmt::Return(value) => {
                self.write("return");
                if let Some(value) = value {
                    self.write(" ");
                    self.emit_expr(&value.node, 0);
                }
                self.write(";");
            }
            Stmt::Break => self.write("break;"),
            Stmt::Expr(expr) => {
                self.emit_expr(&expr.node, 0);
                self.write(";");
            }
            Stmt::Block(block) => self.emit_block(block),
            Stmt::Unsupported { text, .. } => self.write(text),
        }
    }

    // ── Expressions ──────────────────────────────────────────────────

    fn emit_expr(&mut self, expr: &Expr, parent_prec: u8) {
        match expr {
            Expr::IntLit(n) => self.write(&n.to_string()),
            Expr::StringLit(s) => {
                self.write("\"");
                self.write(&escape(s, '"'));
                self.write("\"");
            }
            Expr::CharLit(c) => {
                self.write("'");
                self.write(&escape(&c.to_string(), '\''));
                self.write("'");
            }
            Expr::BoolLit(b) => self.write(if *b { "true" } else { "false" }),
            Expr::Ident(name) => self.write(name),
            Expr::Binary { op, lhs, rhs } => {
                let prec = binop_prec(*op);
                let need_parens = prec < parent_prec;
                if need_parens {
                    self.write("(");
                }
                // left-associative: a same-precedence right child needs parens
                self.emit_expr(&lhs.node, prec);
                self.write(" ");
                self.write(op.as_str());
                self.write(" ");
                self.emit_expr(&rhs.node, prec + 1);
                if need_parens {
                    self.write(")");
                }
            }
            Expr::Unary { op, operand } => {
                let need_parens = PREC_PREFIX < parent_prec;
                if need_parens {
                    self.write("(");
                }
                self.write(match op {
                    UnaryOp::Neg => "-",
                    UnaryOp::Not => "!",
                });
                // `- -x` must not print as `--x`
                let starts_with_minus = matches!(
                    &operand.node,
                    Expr::Unary { op: UnaryOp::Neg, .. } | Expr::IncDec { prefix: true, increment: false, .. }
                );
                if *op == UnaryOp::Neg && starts_with_minus {
                    self.write("(");
                    self.emit_expr(&operand.node, 0);
                    self.write(")");
                } else {
                    self.emit_expr(&operand.node, PREC_PREFIX);
                }
                if need_parens {
                    self.write(")");
                }
            }
            Expr::Assign { op, target, value } => {
                let need_parens = parent_prec > PREC_ASSIGN;
                if need_parens {
                    self.write("(");
                }
                self.emit_expr(&target.node, PREC_ASSIGN + 1);
                self.write(" ");
                self.write(op.as_str());
                self.write(" ");
                self.emit_expr(&value.node, PREC_ASSIGN);
                if need_parens {
                    self.write(")");
                }
            }
            Expr::IncDec { target, increment, prefix } => {
                let op = if *increment { "++" } else { "--" };
                if *prefix {
                    self.write(op);
                    self.emit_expr(&target.node, PREC_PREFIX);
                } else {
                    self.emit_expr(&target.node, PREC_POSTFIX);
                    self.write(op);
                }
            }
            Expr::FieldAccess { object, field } => {
                self.emit_expr(&object.node, PREC_POSTFIX);
                self.write(".");
                self.write(&field.node);
            }
            Expr::MethodCall { target, method, args } => {
                if let Some(target) = target {
                    self.emit_expr(&target.node, PREC_POSTFIX);
                    self.write(".");
                }
                self.write(&method.node);
                self.emit_args(args);
            }
            Expr::ArrayLit { elem_ty, elements } => {
                if let Some(elem_ty) = elem_ty {
                    self.write("new ");
                    self.write(&elem_ty.node.to_string());
                    self.write("[]");
                }
                self.write("{");
                for (i, e) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expr(&e.node, 0);
                }
                self.write("}");
            }
            Expr::NewArray { elem_ty, size } => {
                // `new int[n][]`: the size goes on the outermost dimension
                let mut base = &elem_ty.node;
                let mut dims = 0;
                while let TypeExpr::Array(inner) = base {
                    base = &inner.node;
                    dims += 1;
                }
                self.write("new ");
                self.write(&base.to_string());
                self.write("[");
                self.emit_expr(&size.node, 0);
                self.write("]");
                for _ in 0..dims {
                    self.write("[]");
                }
            }
            Expr::NewObject { class, args } => {
                self.write("new ");
                self.write(&class.node);
                self.emit_args(args);
            }
            Expr::Index { array, index } => {
                self.emit_expr(&array.node, PREC_POSTFIX);
                self.write("[");
                self.emit_expr(&index.node, 0);
                self.write("]");
            }
        }
    }

    fn emit_args(&mut self, args: &[Spanned<Expr>]) {
        self.write("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expr(&arg.node, 0);
        }
        self.write(")");
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Left binding power of each operator in the parser.
fn binop_prec(op: BinOp) -> u8 {
    match op {
        BinOp::Or => 3,
        BinOp::And => 5,
        BinOp::Eq | BinOp::Neq => 7,
        BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => 9,
        BinOp::Add | BinOp::Sub => 11,
        BinOp::Mul | BinOp::Div | BinOp::Mod => 13,
    }
}

fn escape(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            other => out.push(other),
        }
    }
    out
}
