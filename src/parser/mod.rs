pub mod ast;

use crate::diagnostics::CompileError;
use crate::lexer::token::{INT_LITERAL_MAX, Token};
use crate::span::{Span, Spanned};
use ast::*;

/// Binding power of prefix `-`, `!` and prefix `++`/`--`.
const PREFIX_BP: u8 = 15;

pub struct Parser<'a> {
    tokens: &'a [Spanned<Token>],
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// `tokens` must end with `Token::Eof`, as produced by `lexer::lex`.
    pub fn new(tokens: &'a [Spanned<Token>], source: &'a str) -> Self {
        Self { tokens, source, pos: 0 }
    }

    fn peek(&self) -> Option<&'a Spanned<Token>> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&'a Spanned<Token>> {
        self.tokens.get(self.pos + n)
    }

    fn peek_is(&self, expected: &Token) -> bool {
        self.peek().is_some_and(|t| std::mem::discriminant(&t.node) == std::mem::discriminant(expected))
    }

    fn peek_word(&self, word: &str) -> bool {
        self.peek().is_some_and(|t| matches!(t.node, Token::Ident) && self.text(t) == word)
    }

    fn advance(&mut self) -> Option<&'a Spanned<Token>> {
        let tok = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(tok)
    }

    fn text(&self, tok: &Spanned<Token>) -> &'a str {
        &self.source[tok.span.start..tok.span.end]
    }

    fn describe(&self, tok: &Spanned<Token>) -> String {
        match tok.node {
            Token::Ident => format!("identifier '{}'", self.text(tok)),
            _ => tok.node.to_string(),
        }
    }

    fn error_here(&self, expected: impl Into<String>) -> CompileError {
        match self.peek() {
            Some(tok) => CompileError::parse(expected, self.describe(tok), tok.span),
            None => CompileError::parse(expected, "end of file", self.eof_span()),
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<&'a Spanned<Token>, CompileError> {
        if self.peek_is(expected) {
            let tokens = self.tokens;
            self.pos += 1;
            return Ok(&tokens[self.pos - 1]);
        }
        Err(self.error_here(expected.to_string()))
    }

    fn expect_ident(&mut self) -> Result<Spanned<String>, CompileError> {
        match self.peek() {
            Some(tok) if matches!(tok.node, Token::Ident) => {
                self.pos += 1;
                Ok(Spanned::new(self.text(tok).to_string(), tok.span))
            }
            _ => Err(self.error_here("identifier")),
        }
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek_is(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eof_span(&self) -> Span {
        match self.tokens.last() {
            Some(last) => Span::new(last.span.end, last.span.end),
            None => Span::dummy(),
        }
    }

    fn current_span(&self) -> Span {
        self.peek().map(|t| t.span).unwrap_or_else(|| self.eof_span())
    }

    fn prev_end(&self) -> usize {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(tok) => tok.span.end,
            None => 0,
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    /// Parse one compilation unit into its single class.
    pub fn parse_unit(&mut self) -> Result<Spanned<ClassDecl>, CompileError> {
        while self.peek_word("package") || self.peek_word("import") {
            while !self.peek_is(&Token::Semi) && !self.peek_is(&Token::Eof) {
                self.advance();
            }
            self.expect(&Token::Semi)?;
        }

        let start = self.current_span().start;
        let mut is_pub = false;
        loop {
            if self.eat(&Token::Public) {
                is_pub = true;
            } else if !self.eat(&Token::Final) && !self.eat_word("abstract") {
                break;
            }
        }
        self.reject_type_declaration()?;
        self.expect(&Token::Class)?;
        let name = self.expect_ident()?;
        if self.peek_word("extends") || self.peek_word("implements") {
            return Err(CompileError::unsupported("class inheritance", self.current_span()));
        }
        if self.peek_is(&Token::Lt) {
            return Err(CompileError::unsupported("generic class", self.current_span()));
        }
        self.expect(&Token::LBrace)?;

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        while !self.peek_is(&Token::RBrace) {
            if self.peek_is(&Token::Eof) {
                return Err(self.error_here(Token::RBrace.to_string()));
            }
            match self.parse_member(&name.node)? {
                Member::Field(field) => fields.push(field),
                Member::Method(method) => methods.push(method),
            }
        }
        self.expect(&Token::RBrace)?;

        if !self.peek_is(&Token::Eof) {
            return Err(self.error_here("end of file"));
        }
        let span = self.span_from(start);
        Ok(Spanned::new(ClassDecl { name, is_pub, fields, methods }, span))
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if self.peek_word(word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn reject_type_declaration(&self) -> Result<(), CompileError> {
        for (word, construct) in [("interface", "interface declaration"), ("enum", "enum declaration")] {
            if self.peek_word(word) {
                return Err(CompileError::unsupported(construct, self.current_span()));
            }
        }
        Ok(())
    }

    fn parse_modifiers(&mut self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        loop {
            let modifier = match self.peek().map(|t| &t.node) {
                Some(Token::Public) => Modifier::Public,
                Some(Token::Private) => Modifier::Private,
                Some(Token::Static) => Modifier::Static,
                Some(Token::Final) => Modifier::Final,
                _ => break,
            };
            self.pos += 1;
            modifiers.push(modifier);
        }
        modifiers
    }

    fn parse_member(&mut self, class_name: &str) -> Result<Member, CompileError> {
        let start = self.current_span().start;
        let modifiers = self.parse_modifiers();
        if self.peek_is(&Token::Class) {
            return Err(CompileError::unsupported("nested class", self.current_span()));
        }
        self.reject_type_declaration()?;
        if self.peek_word(class_name) && self.peek_nth(1).is_some_and(|t| matches!(t.node, Token::LParen)) {
            return Err(CompileError::unsupported("constructor", self.current_span()));
        }
        if self.peek_is(&Token::LBrace) {
            return Err(CompileError::unsupported("initializer block", self.current_span()));
        }

        let ty = self.parse_type()?;
        let name = self.expect_ident()?;

        if self.peek_is(&Token::LParen) {
            let params = self.parse_params()?;
            let mut throws = Vec::new();
            if self.eat_word("throws") {
                throws.push(self.expect_ident()?);
                while self.eat(&Token::Comma) {
                    throws.push(self.expect_ident()?);
                }
            }
            let body = self.parse_block()?;
            let span = self.span_from(start);
            return Ok(Member::Method(Spanned::new(
                MethodDecl { modifiers, return_type: ty, name, params, throws, body },
                span,
            )));
        }

        let value = if self.eat(&Token::Eq) { Some(self.parse_initializer()?) } else { None };
        self.expect(&Token::Semi)?;
        let span = self.span_from(start);
        Ok(Member::Field(Spanned::new(FieldDecl { modifiers, ty, name, value }, span)))
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, CompileError> {
        self.expect(&Token::LParen)?;
        let mut params = Vec::new();
        while !self.peek_is(&Token::RParen) {
            if !params.is_empty() {
                self.expect(&Token::Comma)?;
            }
            self.eat(&Token::Final);
            let ty = self.parse_type()?;
            let name = self.expect_ident()?;
            params.push(Param { ty, name });
        }
        self.expect(&Token::RParen)?;
        Ok(params)
    }

    fn parse_type(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        let tok = self.peek().ok_or_else(|| self.error_here("type"))?;
        let base = match tok.node {
            Token::Void => TypeExpr::Void,
            Token::Int => TypeExpr::Int,
            Token::Boolean => TypeExpr::Boolean,
            Token::Ident => TypeExpr::Named(self.text(tok).to_string()),
            _ => return Err(self.error_here("type")),
        };
        self.pos += 1;
        if matches!(base, TypeExpr::Named(_)) && self.peek_is(&Token::Lt) {
            return Err(CompileError::unsupported("generic type", self.current_span()));
        }
        let mut ty = Spanned::new(base, tok.span);
        while self.peek_is(&Token::LBracket) && self.peek_nth(1).is_some_and(|t| matches!(t.node, Token::RBracket)) {
            self.pos += 2;
            let span = self.span_from(ty.span.start);
            ty = Spanned::new(TypeExpr::Array(Box::new(ty)), span);
        }
        Ok(ty)
    }

    fn parse_block(&mut self) -> Result<Spanned<Block>, CompileError> {
        let open = self.expect(&Token::LBrace)?;
        let mut stmts = Vec::new();
        while !self.peek_is(&Token::RBrace) {
            if self.peek_is(&Token::Eof) {
                return Err(self.error_here(Token::RBrace.to_string()));
            }
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&Token::RBrace)?;
        Ok(Spanned::new(Block { stmts }, self.span_from(open.span.start)))
    }

    fn parse_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.current_span().start;
        let tok = self.peek().ok_or_else(|| self.error_here("statement"))?;
        let stmt = match tok.node {
            Token::LBrace => Stmt::Block(self.parse_block()?.node),
            Token::For => self.parse_for(start)?,
            Token::While => {
                self.pos += 1;
                let condition = self.parse_paren_expr()?;
                let body = self.parse_stmt()?;
                Stmt::While { condition, body: Box::new(body) }
            }
            Token::If => {
                self.pos += 1;
                let condition = self.parse_paren_expr()?;
                let then_branch = Box::new(self.parse_stmt()?);
                let else_branch = if self.eat(&Token::Else) { Some(Box::new(self.parse_stmt()?)) } else { None };
                Stmt::If { condition, then_branch, else_branch }
            }
            Token::Try => self.parse_try(start)?,
            Token::Throw => {
                self.pos += 1;
                let value = self.parse_expr(0)?;
                self.expect(&Token::Semi)?;
                match value.node {
                    Expr::NewObject { class, mut args } if args.len() <= 1 => {
                        Stmt::Throw { exception: class, message: args.pop() }
                    }
                    node => Stmt::Rethrow { value: Spanned::new(node, value.span) },
                }
            }
            Token::Return => {
                self.pos += 1;
                let value = if self.peek_is(&Token::Semi) { None } else { Some(self.parse_expr(0)?) };
                self.expect(&Token::Semi)?;
                Stmt::Return(value)
            }
            Token::Break => {
                self.pos += 1;
                self.expect(&Token::Semi)?;
                Stmt::Break
            }
            Token::Final => {
                self.pos += 1;
                self.parse_var_decl()?
            }
            Token::Ident if self.is_unsupported_keyword() => self.parse_unsupported(start)?,
            Token::Int | Token::Boolean => self.parse_var_decl()?,
            Token::Ident if self.is_var_decl_ahead() => self.parse_var_decl()?,
            _ => {
                let expr = self.parse_expr(0)?;
                self.expect(&Token::Semi)?;
                Stmt::Expr(expr)
            }
        };
        Ok(Spanned::new(stmt, self.span_from(start)))
    }

    fn parse_paren_expr(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.expect(&Token::LParen)?;
        let expr = self.parse_expr(0)?;
        self.expect(&Token::RParen)?;
        Ok(expr)
    }

    /// `Type IDENT` (or `Name<`) at the current position.
    fn is_var_decl_ahead(&self) -> bool {
        let mut i = 1;
        if self.peek_nth(1).is_some_and(|t| matches!(t.node, Token::Lt)) {
            return true;
        }
        loop {
            match (self.peek_nth(i).map(|t| &t.node), self.peek_nth(i + 1).map(|t| &t.node)) {
                (Some(Token::LBracket), Some(Token::RBracket)) => i += 2,
                (Some(Token::Ident), _) => return true,
                _ => return false,
            }
        }
    }

    fn parse_var_decl(&mut self) -> Result<Stmt, CompileError> {
        if self.peek_nth(1).is_some_and(|t| matches!(t.node, Token::Lt)) {
            let start = self.current_span().start;
            self.skip_to_semi()?;
            return Ok(self.unsupported_stmt("generic declaration", start));
        }
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        let value = if self.eat(&Token::Eq) { Some(self.parse_initializer()?) } else { None };
        self.expect(&Token::Semi)?;
        Ok(Stmt::VarDecl { ty, name, value })
    }

    fn parse_initializer(&mut self) -> Result<Spanned<Expr>, CompileError> {
        if self.peek_is(&Token::LBrace) {
            self.parse_array_literal(None)
        } else {
            self.parse_expr(0)
        }
    }

    fn parse_array_literal(&mut self, elem_ty: Option<Spanned<TypeExpr>>) -> Result<Spanned<Expr>, CompileError> {
        let start = elem_ty.as_ref().map(|t| t.span.start).unwrap_or_else(|| self.current_span().start);
        self.expect(&Token::LBrace)?;
        let mut elements = Vec::new();
        while !self.peek_is(&Token::RBrace) {
            if !elements.is_empty() {
                self.expect(&Token::Comma)?;
                // trailing comma
                if self.peek_is(&Token::RBrace) {
                    break;
                }
            }
            elements.push(self.parse_initializer()?);
        }
        self.expect(&Token::RBrace)?;
        Ok(Spanned::new(Expr::ArrayLit { elem_ty, elements }, self.span_from(start)))
    }

    fn parse_for(&mut self, start: usize) -> Result<Stmt, CompileError> {
        self.expect(&Token::For)?;
        self.expect(&Token::LParen)?;
        let header = self.pos;
        self.eat(&Token::Final);
        let is_foreach = self.parse_type().is_ok()
            && self.expect_ident().is_ok()
            && self.peek_is(&Token::Colon);
        self.pos = header;
        if !is_foreach {
            self.pos -= 1;
            self.skip_balanced(&Token::LParen, &Token::RParen)?;
            self.parse_stmt()?;
            return Ok(self.unsupported_stmt("classic for loop", start));
        }

        self.eat(&Token::Final);
        let elem_ty = self.parse_type()?;
        let var = self.expect_ident()?;
        self.expect(&Token::Colon)?;
        let iterable = self.parse_expr(0)?;
        self.expect(&Token::RParen)?;
        let body = if self.peek_is(&Token::LBrace) {
            self.parse_block()?
        } else {
            let stmt = self.parse_stmt()?;
            let span = stmt.span;
            Spanned::new(Block { stmts: vec![stmt] }, span)
        };
        Ok(Stmt::ForEach { elem_ty, var, iterable, body })
    }

    fn parse_try(&mut self, start: usize) -> Result<Stmt, CompileError> {
        self.expect(&Token::Try)?;
        let with_resources = self.peek_is(&Token::LParen);
        if with_resources {
            self.skip_balanced(&Token::LParen, &Token::RParen)?;
        }
        let body = self.parse_block()?;
        let mut catches = Vec::new();
        while self.peek_is(&Token::Catch) {
            let catch_start = self.current_span().start;
            self.pos += 1;
            self.expect(&Token::LParen)?;
            self.eat(&Token::Final);
            let exception_ty = self.parse_type()?;
            let var = self.expect_ident()?;
            self.expect(&Token::RParen)?;
            let catch_body = self.parse_block()?;
            let span = self.span_from(catch_start);
            catches.push(Spanned::new(CatchClause { exception_ty, var, body: catch_body }, span));
        }
        let finally = if self.eat_word("finally") { Some(self.parse_block()?) } else { None };
        if catches.is_empty() && finally.is_none() && !with_resources {
            return Err(self.error_here("'catch' or 'finally'"));
        }
        if with_resources {
            return Ok(self.unsupported_stmt("try-with-resources", start));
        }
        Ok(Stmt::Try { body, catches, finally })
    }

    fn is_unsupported_keyword(&self) -> bool {
        ["switch", "do", "continue", "synchronized", "assert"].iter().any(|w| self.peek_word(w))
    }

    fn parse_unsupported(&mut self, start: usize) -> Result<Stmt, CompileError> {
        let word = self.expect_ident()?;
        let construct = match word.node.as_str() {
            "switch" => {
                self.skip_balanced(&Token::LParen, &Token::RParen)?;
                self.skip_balanced(&Token::LBrace, &Token::RBrace)?;
                "switch statement"
            }
            "do" => {
                self.parse_stmt()?;
                if !self.eat(&Token::While) {
                    return Err(self.error_here(Token::While.to_string()));
                }
                self.skip_balanced(&Token::LParen, &Token::RParen)?;
                self.expect(&Token::Semi)?;
                "do-while loop"
            }
            "synchronized" => {
                self.skip_balanced(&Token::LParen, &Token::RParen)?;
                self.parse_block()?;
                "synchronized block"
            }
            "continue" => {
                self.skip_to_semi()?;
                "continue statement"
            }
            _ => {
                self.skip_to_semi()?;
                "assert statement"
            }
        };
        Ok(self.unsupported_stmt(construct, start))
    }

    fn unsupported_stmt(&self, construct: &str, start: usize) -> Stmt {
        let span = self.span_from(start);
        Stmt::Unsupported {
            construct: construct.to_string(),
            text: self.source[span.start..span.end].to_string(),
        }
    }

    /// Skip a balanced `open ... close` group starting at the current token.
    fn skip_balanced(&mut self, open: &Token, close: &Token) -> Result<(), CompileError> {
        self.expect(open)?;
        let mut depth = 1usize;
        while depth > 0 {
            let tok = self.advance().ok_or_else(|| self.error_here(close.to_string()))?;
            if matches!(tok.node, Token::Eof) {
                self.pos -= 1;
                return Err(self.error_here(close.to_string()));
            }
            if std::mem::discriminant(&tok.node) == std::mem::discriminant(open) {
                depth += 1;
            } else if std::mem::discriminant(&tok.node) == std::mem::discriminant(close) {
                depth -= 1;
            }
        }
        Ok(())
    }

    /// Skip through the next `;` outside any braces.
    fn skip_to_semi(&mut self) -> Result<(), CompileError> {
        let mut depth = 0usize;
        loop {
            let tok = self.peek().ok_or_else(|| self.error_here(Token::Semi.to_string()))?;
            match tok.node {
                Token::Eof => return Err(self.error_here(Token::Semi.to_string())),
                Token::LBrace | Token::LParen => depth += 1,
                Token::RBrace | Token::RParen => depth = depth.saturating_sub(1),
                Token::Semi if depth == 0 => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    // ===== Expressions =====

    pub fn parse_expr(&mut self, min_bp: u8) -> Result<Spanned<Expr>, CompileError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let Some(tok) = self.peek() else { break };

            if let Some(op) = assign_op(&tok.node) {
                let (l_bp, r_bp) = (2, 1);
                if l_bp < min_bp {
                    break;
                }
                if !is_assignable(&lhs.node) {
                    return Err(CompileError::parse("variable", "expression", lhs.span));
                }
                self.pos += 1;
                let value = self.parse_expr(r_bp)?;
                let span = lhs.span.to(value.span);
                lhs = Spanned::new(Expr::Assign { op, target: Box::new(lhs), value: Box::new(value) }, span);
                continue;
            }

            let Some(op) = bin_op(&tok.node) else { break };
            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }
            self.pos += 1;
            let rhs = self.parse_expr(r_bp)?;
            let span = lhs.span.to(rhs.span);
            lhs = Spanned::new(Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, span);
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let tok = self.peek().ok_or_else(|| self.error_here("expression"))?;
        let start = tok.span.start;

        let unary = match tok.node {
            Token::Minus => Some(UnaryOp::Neg),
            Token::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = unary {
            self.pos += 1;
            let min_int = match self.peek() {
                Some(lit) if op == UnaryOp::Neg && lit.node == Token::IntLit(INT_LITERAL_MAX) => Some(lit.span),
                _ => None,
            };
            if let Some(lit_span) = min_int {
                // -2147483648 is the one place this magnitude is allowed
                self.pos += 1;
                let operand = Spanned::new(Expr::IntLit(INT_LITERAL_MAX), lit_span);
                let span = self.span_from(start);
                return Ok(Spanned::new(Expr::Unary { op, operand: Box::new(operand) }, span));
            }
            let operand = self.parse_expr(PREFIX_BP)?;
            let span = self.span_from(start);
            return Ok(Spanned::new(Expr::Unary { op, operand: Box::new(operand) }, span));
        }
        if matches!(tok.node, Token::PlusPlus | Token::MinusMinus) {
            self.pos += 1;
            let target = self.parse_expr(PREFIX_BP)?;
            let span = self.span_from(start);
            let increment = matches!(tok.node, Token::PlusPlus);
            return Ok(Spanned::new(Expr::IncDec { target: Box::new(target), increment, prefix: true }, span));
        }

        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    fn parse_primary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let tok = self.peek().ok_or_else(|| self.error_here("expression"))?;
        let expr = match &tok.node {
            Token::IntLit(n) if *n > i32::MAX as i64 => {
                return Err(CompileError::lex(format!("integer literal {n} is out of range"), tok.span));
            }
            Token::IntLit(n) => Expr::IntLit(*n),
            Token::StringLit(s) => Expr::StringLit(s.clone()),
            Token::CharLit(c) => Expr::CharLit(*c),
            Token::True => Expr::BoolLit(true),
            Token::False => Expr::BoolLit(false),
            Token::Ident => {
                let name = self.expect_ident()?;
                if self.peek_is(&Token::LParen) {
                    let args = self.parse_args()?;
                    let span = self.span_from(name.span.start);
                    return Ok(Spanned::new(Expr::MethodCall { target: None, method: name, args }, span));
                }
                return Ok(Spanned::new(Expr::Ident(name.node), name.span));
            }
            Token::LParen => {
                self.pos += 1;
                let inner = self.parse_expr(0)?;
                self.expect(&Token::RParen)?;
                return Ok(inner);
            }
            Token::LBrace => return self.parse_array_literal(None),
            Token::New => return self.parse_new(),
            _ => return Err(self.error_here("expression")),
        };
        self.pos += 1;
        Ok(Spanned::new(expr, tok.span))
    }

    fn parse_new(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.expect(&Token::New)?.span.start;
        let tok = self.peek().ok_or_else(|| self.error_here("type"))?;
        let base = match tok.node {
            Token::Int => TypeExpr::Int,
            Token::Boolean => TypeExpr::Boolean,
            Token::Ident => TypeExpr::Named(self.text(tok).to_string()),
            _ => return Err(self.error_here("type")),
        };
        self.pos += 1;
        let base = Spanned::new(base, tok.span);

        if self.peek_is(&Token::LParen) {
            let TypeExpr::Named(class) = base.node else {
                return Err(self.error_here(Token::LBracket.to_string()));
            };
            let args = self.parse_args()?;
            let span = self.span_from(start);
            return Ok(Spanned::new(Expr::NewObject { class: Spanned::new(class, base.span), args }, span));
        }
        if self.peek_is(&Token::Lt) {
            return Err(CompileError::unsupported("generic type", self.current_span()));
        }

        self.expect(&Token::LBracket)?;
        if self.eat(&Token::RBracket) {
            // new T[]...[]{...}
            let mut elem_ty = base;
            while self.peek_is(&Token::LBracket) {
                self.pos += 1;
                self.expect(&Token::RBracket)?;
                let span = self.span_from(elem_ty.span.start);
                elem_ty = Spanned::new(TypeExpr::Array(Box::new(elem_ty)), span);
            }
            let mut lit = self.parse_array_literal(Some(elem_ty))?;
            lit.span = self.span_from(start);
            return Ok(lit);
        }

        let size = self.parse_expr(0)?;
        self.expect(&Token::RBracket)?;
        let mut elem_ty = base;
        while self.peek_is(&Token::LBracket) && self.peek_nth(1).is_some_and(|t| matches!(t.node, Token::RBracket)) {
            self.pos += 2;
            let span = self.span_from(elem_ty.span.start);
            elem_ty = Spanned::new(TypeExpr::Array(Box::new(elem_ty)), span);
        }
        let span = self.span_from(start);
        Ok(Spanned::new(Expr::NewArray { elem_ty, size: Box::new(size) }, span))
    }

    fn parse_args(&mut self) -> Result<Vec<Spanned<Expr>>, CompileError> {
        self.expect(&Token::LParen)?;
        let mut args = Vec::new();
        while !self.peek_is(&Token::RParen) {
            if !args.is_empty() {
                self.expect(&Token::Comma)?;
            }
            args.push(self.parse_expr(0)?);
        }
        self.expect(&Token::RParen)?;
        Ok(args)
    }

    fn parse_postfix(&mut self, mut lhs: Spanned<Expr>) -> Result<Spanned<Expr>, CompileError> {
        loop {
            let Some(tok) = self.peek() else { break };
            match tok.node {
                Token::Dot => {
                    self.pos += 1;
                    let name = self.expect_ident()?;
                    if self.peek_is(&Token::LParen) {
                        let args = self.parse_args()?;
                        let span = self.span_from(lhs.span.start);
                        lhs = Spanned::new(
                            Expr::MethodCall { target: Some(Box::new(lhs)), method: name, args },
                            span,
                        );
                    } else {
                        let span = lhs.span.to(name.span);
                        lhs = Spanned::new(Expr::FieldAccess { object: Box::new(lhs), field: name }, span);
                    }
                }
                Token::LBracket => {
                    self.pos += 1;
                    let index = self.parse_expr(0)?;
                    self.expect(&Token::RBracket)?;
                    let span = self.span_from(lhs.span.start);
                    lhs = Spanned::new(Expr::Index { array: Box::new(lhs), index: Box::new(index) }, span);
                }
                Token::PlusPlus | Token::MinusMinus => {
                    self.pos += 1;
                    let increment = matches!(tok.node, Token::PlusPlus);
                    let span = lhs.span.to(tok.span);
                    lhs = Spanned::new(Expr::IncDec { target: Box::new(lhs), increment, prefix: false }, span);
                }
                _ => break,
            }
        }
        Ok(lhs)
    }
}

enum Member {
    Field(Spanned<FieldDecl>),
    Method(Spanned<MethodDecl>),
}

fn is_assignable(expr: &Expr) -> bool {
    matches!(expr, Expr::Ident(_) | Expr::Index { .. } | Expr::FieldAccess { .. })
}

fn assign_op(tok: &Token) -> Option<AssignOp> {
    match tok {
        Token::Eq => Some(AssignOp::Assign),
        Token::PlusEq => Some(AssignOp::Add),
        Token::MinusEq => Some(AssignOp::Sub),
        Token::StarEq => Some(AssignOp::Mul),
        Token::SlashEq => Some(AssignOp::Div),
        Token::PercentEq => Some(AssignOp::Mod),
        _ => None,
    }
}

fn bin_op(tok: &Token) -> Option<BinOp> {
    match tok {
        Token::Plus => Some(BinOp::Add),
        Token::Minus => Some(BinOp::Sub),
        Token::Star => Some(BinOp::Mul),
        Token::Slash => Some(BinOp::Div),
        Token::Percent => Some(BinOp::Mod),
        Token::EqEq => Some(BinOp::Eq),
        Token::BangEq => Some(BinOp::Neq),
        Token::Lt => Some(BinOp::Lt),
        Token::Gt => Some(BinOp::Gt),
        Token::LtEq => Some(BinOp::LtEq),
        Token::GtEq => Some(BinOp::GtEq),
        Token::AmpAmp => Some(BinOp::And),
        Token::PipePipe => Some(BinOp::Or),
        _ => None,
    }
}

pub fn infix_binding_power(op: BinOp) -> (u8, u8) {
    match op {
        BinOp::Or => (3, 4),
        BinOp::And => (5, 6),
        BinOp::Eq | BinOp::Neq => (7, 8),
        BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => (9, 10),
        BinOp::Add | BinOp::Sub => (11, 12),
        BinOp::Mul | BinOp::Div | BinOp::Mod => (13, 14),
    }
}
