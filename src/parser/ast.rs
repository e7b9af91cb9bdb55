use serde::Serialize;

use crate::span::Spanned;

/// Root of one compilation unit: a single top-level class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDecl {
    pub name: Spanned<String>,
    pub is_pub: bool,
    pub fields: Vec<Spanned<FieldDecl>>,
    pub methods: Vec<Spanned<MethodDecl>>,
}

impl ClassDecl {
    pub fn main_method(&self) -> Option<&Spanned<MethodDecl>> {
        self.methods.iter().find(|m| m.node.is_main())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Modifier {
    Public,
    Private,
    Static,
    Final,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDecl {
    pub modifiers: Vec<Modifier>,
    pub ty: Spanned<TypeExpr>,
    pub name: Spanned<String>,
    pub value: Option<Spanned<Expr>>,
}

impl FieldDecl {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDecl {
    pub modifiers: Vec<Modifier>,
    pub return_type: Spanned<TypeExpr>,
    pub name: Spanned<String>,
    pub params: Vec<Param>,
    pub throws: Vec<Spanned<String>>,
    pub body: Spanned<Block>,
}

impl MethodDecl {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    pub fn is_pub(&self) -> bool {
        self.modifiers.contains(&Modifier::Public)
    }

    /// `static void main(String[] args)` (or with no parameters).
    pub fn is_main(&self) -> bool {
        self.name.node == "main"
            && self.is_static()
            && self.return_type.node == TypeExpr::Void
            && match self.params.as_slice() {
                [] => true,
                [p] => matches!(&p.ty.node, TypeExpr::Array(inner) if inner.node == TypeExpr::Named("String".into())),
                _ => false,
            }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub ty: Spanned<TypeExpr>,
    pub name: Spanned<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeExpr {
    Void,
    Int,
    Boolean,
    Named(String),
    Array(Box<Spanned<TypeExpr>>),
}

impl std::fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeExpr::Void => write!(f, "void"),
            TypeExpr::Int => write!(f, "int"),
            TypeExpr::Boolean => write!(f, "boolean"),
            TypeExpr::Named(name) => write!(f, "{name}"),
            TypeExpr::Array(inner) => write!(f, "{}[]", inner.node),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    VarDecl {
        ty: Spanned<TypeExpr>,
        name: Spanned<String>,
        value: Option<Spanned<Expr>>,
    },
    ForEach {
        elem_ty: Spanned<TypeExpr>,
        var: Spanned<String>,
        iterable: Spanned<Expr>,
        body: Spanned<Block>,
    },
    While {
        condition: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    If {
        condition: Spanned<Expr>,
        then_branch: Box<Spanned<Stmt>>,
        else_branch: Option<Box<Spanned<Stmt>>>,
    },
    Try {
        body: Spanned<Block>,
        catches: Vec<Spanned<CatchClause>>,
        finally: Option<Spanned<Block>>,
    },
    /// `throw new X(msg?)`
    Throw {
        exception: Spanned<String>,
        message: Option<Spanned<Expr>>,
    },
    /// `throw e` for any value that is not an inline object creation.
    Rethrow {
        value: Spanned<Expr>,
    },
    Return(Option<Spanned<Expr>>),
    Break,
    Expr(Spanned<Expr>),
    Block(Block),
    /// Recognised syntax with no translation; `text` is the skipped source.
    Unsupported {
        construct: String,
        text: String,
    },
}

impl Stmt {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::VarDecl { .. } => "VarDecl",
            Stmt::ForEach { .. } => "ForEachStmt",
            Stmt::While { .. } => "WhileStmt",
            Stmt::If { .. } => "IfStmt",
            Stmt::Try { .. } => "TryStmt",
            Stmt::Throw { .. } => "ThrowStmt",
            Stmt::Rethrow { .. } => "RethrowStmt",
            Stmt::Return(_) => "ReturnStmt",
            Stmt::Break => "BreakStmt",
            Stmt::Expr(_) => "ExprStmt",
            Stmt::Block(_) => "Block",
            Stmt::Unsupported { .. } => "UnsupportedStmt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchClause {
    pub exception_ty: Spanned<TypeExpr>,
    pub var: Spanned<String>,
    pub body: Spanned<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    IntLit(i64),
    StringLit(String),
    CharLit(char),
    BoolLit(bool),
    Ident(String),
    Binary {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    Assign {
        op: AssignOp,
        target: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    IncDec {
        target: Box<Spanned<Expr>>,
        increment: bool,
        prefix: bool,
    },
    FieldAccess {
        object: Box<Spanned<Expr>>,
        field: Spanned<String>,
    },
    /// `target.method(args)`, or `method(args)` when `target` is `None`.
    MethodCall {
        target: Option<Box<Spanned<Expr>>>,
        method: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },
    /// `{a, b}` or `new T[]{a, b}` (with `elem_ty` set).
    ArrayLit {
        elem_ty: Option<Spanned<TypeExpr>>,
        elements: Vec<Spanned<Expr>>,
    },
    NewArray {
        elem_ty: Spanned<TypeExpr>,
        size: Box<Spanned<Expr>>,
    },
    NewObject {
        class: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },
    Index {
        array: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
}

impl Expr {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::IntLit(_) | Expr::StringLit(_) | Expr::CharLit(_) | Expr::BoolLit(_) => "Literal",
            Expr::Ident(_) => "Identifier",
            Expr::Binary { .. } => "BinaryExpr",
            Expr::Unary { .. } => "UnaryExpr",
            Expr::Assign { .. } => "AssignExpr",
            Expr::IncDec { .. } => "IncDecExpr",
            Expr::FieldAccess { .. } => "FieldAccessExpr",
            Expr::MethodCall { .. } => "MethodCallExpr",
            Expr::ArrayLit { .. } => "ArrayLiteral",
            Expr::NewArray { .. } => "NewArrayExpr",
            Expr::NewObject { .. } => "NewObjectExpr",
            Expr::Index { .. } => "IndexExpr",
        }
    }

    /// Dotted path of a pure name chain such as `System.out`.
    pub fn as_path(&self) -> Option<String> {
        match self {
            Expr::Ident(name) => Some(name.clone()),
            Expr::FieldAccess { object, field } => {
                object.node.as_path().map(|p| format!("{p}.{}", field.node))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
        }
    }

    /// The arithmetic operator a compound assignment applies.
    pub fn bin_op(self) -> Option<BinOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinOp::Add),
            AssignOp::Sub => Some(BinOp::Sub),
            AssignOp::Mul => Some(BinOp::Mul),
            AssignOp::Div => Some(BinOp::Div),
            AssignOp::Mod => Some(BinOp::Mod),
        }
    }
}
