//! Typed AST definitions handed over by the TypeSlang front end.
//!
//! The front end parses the surface language and runs type inference; the backend only walks these nodes
//! and asks the [`FrontEnd`](crate::FrontEnd) for inferred types by [`NodeId`].
//!
//! Node kinds are closed enums per category. Some variants (classes, enums, `throw`, `new`, arrow functions,
//! ...) exist only so the backend can reject them with a precise diagnostic.

use serde::{Deserialize, Serialize};
use std::fmt;
use typeslang_core::lang::operators::{BinaryOpId, PostfixOpId, PrefixOpId};

/// Source location span (byte offsets into the unit's source text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// 1-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Identity of a node, used to query inferred types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Identity of a source unit inside one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl UnitId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

pub type Ident = String;

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Path as written by the front end (used for diagnostics and module tags).
    pub path: String,
    /// Original source text; spans index into it.
    #[serde(default)]
    pub source: String,
    pub statements: Vec<Stmt>,
}

impl SourceUnit {
    /// Convert a byte offset into a 1-based line/column position.
    ///
    /// Offsets past the end clamp to the end of the text; offsets inside a multi-byte character count that
    /// character's column.
    pub fn position(&self, offset: usize) -> Position {
        let mut line = 1;
        let mut column = 1;
        for (idx, ch) in self.source.char_indices() {
            if idx >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position { line, column }
    }
}

/// Explicit type annotation as written in the source (`x: u8[]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAnnotation {
    pub text: String,
    #[serde(default)]
    pub span: Span,
}

impl TypeAnnotation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            span: Span::default(),
        }
    }

    /// `as const` assertions carry the annotation `const`.
    pub fn is_const(&self) -> bool {
        self.text.trim() == "const"
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    Function(FunctionDecl),
    Import(ImportDecl),
    Interface(InterfaceDecl),
    TypeAlias(TypeAliasDecl),
    Variable(VariableStmt),
    Block(Vec<Stmt>),
    If(IfStmt),
    While(WhileStmt),
    DoWhile(WhileStmt),
    For(ForStmt),
    Return(Option<Expr>),
    Expr(Expr),
    Break,
    Continue,
    Empty,
    // Kinds the backend has no lowering for.
    Class(NamedDecl),
    Enum(NamedDecl),
    Throw(Expr),
}

impl StmtKind {
    /// Name of the node kind, as reported in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StmtKind::Function(_) => "FunctionDeclaration",
            StmtKind::Import(_) => "ImportDeclaration",
            StmtKind::Interface(_) => "InterfaceDeclaration",
            StmtKind::TypeAlias(_) => "TypeAliasDeclaration",
            StmtKind::Variable(_) => "VariableStatement",
            StmtKind::Block(_) => "Block",
            StmtKind::If(_) => "IfStatement",
            StmtKind::While(_) => "WhileStatement",
            StmtKind::DoWhile(_) => "DoStatement",
            StmtKind::For(_) => "ForStatement",
            StmtKind::Return(_) => "ReturnStatement",
            StmtKind::Expr(_) => "ExpressionStatement",
            StmtKind::Break => "BreakStatement",
            StmtKind::Continue => "ContinueStatement",
            StmtKind::Empty => "EmptyStatement",
            StmtKind::Class(_) => "ClassDeclaration",
            StmtKind::Enum(_) => "EnumDeclaration",
            StmtKind::Throw(_) => "ThrowStatement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Param>,
    #[serde(default)]
    pub return_type: Option<TypeAnnotation>,
    /// `None` for overload signatures and ambient declarations.
    #[serde(default)]
    pub body: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub id: NodeId,
    pub name: Ident,
    #[serde(default)]
    pub span: Span,
    #[serde(default)]
    pub ty: Option<TypeAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub specifier: String,
    pub clause: ImportClause,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImportClause {
    /// `import { a, b as c } from "m"`
    Named(Vec<ImportSpecifier>),
    /// `import m from "m"`
    Default(Ident),
    /// `import * as m from "m"`
    Namespace(Ident),
    /// `import "m"`
    SideEffect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpecifier {
    /// Queried for the binding's type when importing from the runtime.
    pub id: NodeId,
    pub name: Ident,
    #[serde(default)]
    pub alias: Option<Ident>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    pub name: Ident,
    pub members: Vec<InterfaceMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceMember {
    pub name: Ident,
    pub ty: TypeAnnotation,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
    /// Method signatures (`greet(): void`) have no struct layout.
    #[serde(default)]
    pub method: bool,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAliasDecl {
    pub name: Ident,
    pub ty: TypeAnnotation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedDecl {
    pub name: Ident,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    Let,
    Const,
    Var,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableStmt {
    pub kind: VarKind,
    pub declarations: Vec<VarDeclarator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDeclarator {
    pub id: NodeId,
    pub name: Ident,
    #[serde(default)]
    pub span: Span,
    #[serde(default)]
    pub ty: Option<TypeAnnotation>,
    #[serde(default)]
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    #[serde(default)]
    pub else_branch: Option<Box<Stmt>>,
}

/// Shared by `while` and `do ... while`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStmt {
    #[serde(default)]
    pub init: Option<ForInit>,
    #[serde(default)]
    pub condition: Option<Expr>,
    #[serde(default)]
    pub update: Option<Expr>,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForInit {
    Variable(VariableStmt),
    Expr(Expr),
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    pub kind: ExprKind,
}

impl Expr {
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Strip redundant parentheses.
    pub fn unparenthesized(&self) -> &Expr {
        match &self.kind {
            ExprKind::Paren(inner) => inner.unparenthesized(),
            _ => self,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Ident(Ident),
    /// Numeric literal, as written (`12`, `12.5`, `0xff`).
    Number(String),
    Bool(bool),
    /// String literal with escapes already decoded.
    String(String),
    /// Template literal: `quasis.len() == exprs.len() + 1`.
    Template {
        quasis: Vec<String>,
        exprs: Vec<Expr>,
    },
    Array(Vec<Expr>),
    Object(Vec<ObjectMember>),
    Paren(Box<Expr>),
    Member {
        object: Box<Expr>,
        property: Ident,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        #[serde(default)]
        type_args: Vec<TypeAnnotation>,
        args: Vec<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    /// `expr as T`; `as const` has the annotation `const`.
    As {
        expr: Box<Expr>,
        ty: TypeAnnotation,
    },
    Prefix {
        op: PrefixOpId,
        operand: Box<Expr>,
    },
    Postfix {
        op: PostfixOpId,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOpId,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    // Kinds the backend has no lowering for.
    Null,
    This,
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Arrow {
        params: Vec<Param>,
        body: Vec<Stmt>,
    },
}

impl ExprKind {
    /// Name of the node kind, as reported in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ExprKind::Ident(_) => "Identifier",
            ExprKind::Number(_) => "NumericLiteral",
            ExprKind::Bool(_) => "BooleanLiteral",
            ExprKind::String(_) => "StringLiteral",
            ExprKind::Template { .. } => "TemplateExpression",
            ExprKind::Array(_) => "ArrayLiteralExpression",
            ExprKind::Object(_) => "ObjectLiteralExpression",
            ExprKind::Paren(_) => "ParenthesizedExpression",
            ExprKind::Member { .. } => "PropertyAccessExpression",
            ExprKind::Index { .. } => "ElementAccessExpression",
            ExprKind::Call { .. } => "CallExpression",
            ExprKind::Conditional { .. } => "ConditionalExpression",
            ExprKind::As { .. } => "AsExpression",
            ExprKind::Prefix { .. } => "PrefixUnaryExpression",
            ExprKind::Postfix { .. } => "PostfixUnaryExpression",
            ExprKind::Binary { .. } => "BinaryExpression",
            ExprKind::Null => "NullKeyword",
            ExprKind::This => "ThisKeyword",
            ExprKind::New { .. } => "NewExpression",
            ExprKind::Arrow { .. } => "ArrowFunction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectMember {
    /// `name: value`
    Property { name: Ident, value: Expr },
    /// `{ name }`
    Shorthand { name: Ident },
    /// `...expr`
    Spread(Expr),
    /// `name() { ... }`
    Method { name: Ident },
}
