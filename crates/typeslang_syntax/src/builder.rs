//! Construct typed programs in code.
//!
//! [`ProgramBuilder`] hands out fresh [`NodeId`]s and records inferred types as nodes are created, standing
//! in for a real front end in tests and tooling. Node constructors take `&self`, so calls nest naturally:
//!
//! ```rust
//! use typeslang_syntax::builder::ProgramBuilder;
//!
//! let mut b = ProgramBuilder::new();
//! let stmt = b.let_("data", "number[]", b.array(vec![b.num("1"), b.num("2")]));
//! let main = b.function("main", vec![], Some("i32"), vec![stmt, b.ret(Some(b.num("0")))]);
//! let unit = b.add_unit("main.ts", vec![main]);
//! let program = b.finish(unit);
//! assert_eq!(program.units.len(), 1);
//! ```
//!
//! ## Notes
//! - Literals record their literal type the way an inferring front end would (`1` has type `1`, `"hi"` has
//!   type `"hi"`). Other expressions have no type unless given one with [`ProgramBuilder::typed`].

use crate::ast::*;
use crate::frontend::{ModuleLink, ModuleTarget, TypedProgram};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use typeslang_core::lang::operators::{BinaryOpId, PostfixOpId, PrefixOpId};

#[derive(Debug, Default)]
pub struct ProgramBuilder {
    next_id: Cell<u32>,
    types: RefCell<BTreeMap<NodeId, String>>,
    units: Vec<SourceUnit>,
    modules: Vec<ModuleLink>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId(id)
    }

    fn record(&self, id: NodeId, ty: &str) {
        self.types.borrow_mut().insert(id, ty.to_string());
    }

    // ---- units -------------------------------------------------------------------------------------------

    pub fn add_unit(&mut self, path: &str, statements: Vec<Stmt>) -> UnitId {
        self.add_unit_with_source(path, "", statements)
    }

    /// Add a unit whose spans index into `source` (for position-carrying diagnostics).
    pub fn add_unit_with_source(&mut self, path: &str, source: &str, statements: Vec<Stmt>) -> UnitId {
        let id = UnitId(self.units.len() as u32);
        self.units.push(SourceUnit {
            path: path.to_string(),
            source: source.to_string(),
            statements,
        });
        id
    }

    /// Record that `specifier`, imported from `from`, resolves to `target`.
    pub fn link(&mut self, from: UnitId, specifier: &str, target: ModuleTarget) {
        self.modules.push(ModuleLink {
            from,
            specifier: specifier.to_string(),
            target,
        });
    }

    pub fn finish(self, entry: UnitId) -> TypedProgram {
        TypedProgram {
            units: self.units,
            entry: Some(entry),
            types: self.types.into_inner(),
            modules: self.modules,
        }
    }

    // ---- expressions -------------------------------------------------------------------------------------

    pub fn expr(&self, kind: ExprKind) -> Expr {
        Expr {
            id: self.fresh(),
            span: Span::default(),
            kind,
        }
    }

    /// Attach an inferred type to an already built expression.
    pub fn typed(&self, expr: Expr, ty: &str) -> Expr {
        self.record(expr.id, ty);
        expr
    }

    pub fn num(&self, text: &str) -> Expr {
        let expr = self.expr(ExprKind::Number(text.to_string()));
        self.record(expr.id, text);
        expr
    }

    pub fn str(&self, value: &str) -> Expr {
        let expr = self.expr(ExprKind::String(value.to_string()));
        self.record(expr.id, &format!("\"{value}\""));
        expr
    }

    pub fn bool(&self, value: bool) -> Expr {
        let expr = self.expr(ExprKind::Bool(value));
        self.record(expr.id, if value { "true" } else { "false" });
        expr
    }

    pub fn ident(&self, name: &str) -> Expr {
        self.expr(ExprKind::Ident(name.to_string()))
    }

    pub fn template(&self, quasis: &[&str], exprs: Vec<Expr>) -> Expr {
        let expr = self.expr(ExprKind::Template {
            quasis: quasis.iter().map(|q| q.to_string()).collect(),
            exprs,
        });
        self.record(expr.id, "string");
        expr
    }

    pub fn array(&self, elements: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Array(elements))
    }

    pub fn object(&self, members: Vec<ObjectMember>) -> Expr {
        self.expr(ExprKind::Object(members))
    }

    pub fn paren(&self, inner: Expr) -> Expr {
        self.expr(ExprKind::Paren(Box::new(inner)))
    }

    pub fn member(&self, object: Expr, property: &str) -> Expr {
        self.expr(ExprKind::Member {
            object: Box::new(object),
            property: property.to_string(),
        })
    }

    pub fn index(&self, object: Expr, index: Expr) -> Expr {
        self.expr(ExprKind::Index {
            object: Box::new(object),
            index: Box::new(index),
        })
    }

    pub fn call(&self, callee: Expr, args: Vec<Expr>) -> Expr {
        self.call_generic(callee, &[], args)
    }

    pub fn call_generic(&self, callee: Expr, type_args: &[&str], args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Call {
            callee: Box::new(callee),
            type_args: type_args.iter().map(|t| TypeAnnotation::new(*t)).collect(),
            args,
        })
    }

    /// `receiver.method(args)`
    pub fn method_call(&self, receiver: Expr, method: &str, args: Vec<Expr>) -> Expr {
        let callee = self.member(receiver, method);
        self.call(callee, args)
    }

    pub fn conditional(&self, condition: Expr, then_expr: Expr, else_expr: Expr) -> Expr {
        self.expr(ExprKind::Conditional {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        })
    }

    pub fn as_(&self, expr: Expr, ty: &str) -> Expr {
        self.expr(ExprKind::As {
            expr: Box::new(expr),
            ty: TypeAnnotation::new(ty),
        })
    }

    pub fn prefix(&self, op: PrefixOpId, operand: Expr) -> Expr {
        self.expr(ExprKind::Prefix {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn postfix(&self, op: PostfixOpId, operand: Expr) -> Expr {
        self.expr(ExprKind::Postfix {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn binary(&self, op: BinaryOpId, left: Expr, right: Expr) -> Expr {
        self.expr(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn assign(&self, target: Expr, value: Expr) -> Expr {
        self.binary(BinaryOpId::Assign, target, value)
    }

    // ---- statements --------------------------------------------------------------------------------------

    pub fn stmt(&self, kind: StmtKind) -> Stmt {
        Stmt {
            id: self.fresh(),
            span: Span::default(),
            kind,
        }
    }

    pub fn expr_stmt(&self, expr: Expr) -> Stmt {
        self.stmt(StmtKind::Expr(expr))
    }

    pub fn ret(&self, value: Option<Expr>) -> Stmt {
        self.stmt(StmtKind::Return(value))
    }

    pub fn block(&self, statements: Vec<Stmt>) -> Stmt {
        self.stmt(StmtKind::Block(statements))
    }

    pub fn if_(&self, condition: Expr, then_branch: Stmt, else_branch: Option<Stmt>) -> Stmt {
        self.stmt(StmtKind::If(IfStmt {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        }))
    }

    pub fn while_(&self, condition: Expr, body: Stmt) -> Stmt {
        self.stmt(StmtKind::While(WhileStmt {
            condition,
            body: Box::new(body),
        }))
    }

    pub fn do_while(&self, body: Stmt, condition: Expr) -> Stmt {
        self.stmt(StmtKind::DoWhile(WhileStmt {
            condition,
            body: Box::new(body),
        }))
    }

    pub fn for_(&self, init: Option<ForInit>, condition: Option<Expr>, update: Option<Expr>, body: Stmt) -> Stmt {
        self.stmt(StmtKind::For(ForStmt {
            init,
            condition,
            update,
            body: Box::new(body),
        }))
    }

    /// A declarator with an optional annotation, an optional inferred type and an optional initializer.
    pub fn declarator(&self, name: &str, annotation: Option<&str>, inferred: Option<&str>, init: Option<Expr>) -> VarDeclarator {
        let id = self.fresh();
        if let Some(ty) = inferred {
            self.record(id, ty);
        }
        VarDeclarator {
            id,
            name: name.to_string(),
            span: Span::default(),
            ty: annotation.map(TypeAnnotation::new),
            init,
        }
    }

    pub fn variable(&self, kind: VarKind, declarations: Vec<VarDeclarator>) -> Stmt {
        self.stmt(StmtKind::Variable(VariableStmt { kind, declarations }))
    }

    /// `let name = init;` where the front end inferred `inferred` for `name`.
    pub fn let_(&self, name: &str, inferred: &str, init: Expr) -> Stmt {
        let decl = self.declarator(name, None, Some(inferred), Some(init));
        self.variable(VarKind::Let, vec![decl])
    }

    /// `const name = init;` where the front end inferred `inferred` for `name`.
    pub fn const_(&self, name: &str, inferred: &str, init: Expr) -> Stmt {
        let decl = self.declarator(name, None, Some(inferred), Some(init));
        self.variable(VarKind::Const, vec![decl])
    }

    /// `let name: annotation = init;`
    pub fn let_annotated(&self, name: &str, annotation: &str, init: Option<Expr>) -> Stmt {
        let decl = self.declarator(name, Some(annotation), None, init);
        self.variable(VarKind::Let, vec![decl])
    }

    pub fn param(&self, name: &str, annotation: &str) -> Param {
        Param {
            id: self.fresh(),
            name: name.to_string(),
            span: Span::default(),
            ty: Some(TypeAnnotation::new(annotation)),
        }
    }

    pub fn function(&self, name: &str, params: Vec<Param>, return_type: Option<&str>, body: Vec<Stmt>) -> Stmt {
        self.stmt(StmtKind::Function(FunctionDecl {
            name: name.to_string(),
            params,
            return_type: return_type.map(TypeAnnotation::new),
            body: Some(body),
        }))
    }

    /// A function signature without a body.
    pub fn declare_function(&self, name: &str, params: Vec<Param>, return_type: Option<&str>) -> Stmt {
        self.stmt(StmtKind::Function(FunctionDecl {
            name: name.to_string(),
            params,
            return_type: return_type.map(TypeAnnotation::new),
            body: None,
        }))
    }

    /// `import { names... } from "specifier";`
    pub fn import(&self, specifier: &str, names: &[&str]) -> Stmt {
        let specifiers = names.iter().map(|name| self.import_specifier(name, None)).collect();
        self.stmt(StmtKind::Import(ImportDecl {
            specifier: specifier.to_string(),
            clause: ImportClause::Named(specifiers),
        }))
    }

    /// Named import whose bindings have inferred types (e.g. names taken from the runtime).
    pub fn import_typed(&self, specifier: &str, names: &[(&str, &str)]) -> Stmt {
        let specifiers = names
            .iter()
            .map(|(name, ty)| self.import_specifier(name, Some(ty)))
            .collect();
        self.stmt(StmtKind::Import(ImportDecl {
            specifier: specifier.to_string(),
            clause: ImportClause::Named(specifiers),
        }))
    }

    fn import_specifier(&self, name: &str, inferred: Option<&str>) -> ImportSpecifier {
        let id = self.fresh();
        if let Some(ty) = inferred {
            self.record(id, ty);
        }
        ImportSpecifier {
            id,
            name: name.to_string(),
            alias: None,
            span: Span::default(),
        }
    }

    /// `interface name { field: type; ... }`
    pub fn interface(&self, name: &str, fields: &[(&str, &str)]) -> Stmt {
        let members = fields
            .iter()
            .map(|(field, ty)| InterfaceMember {
                name: field.to_string(),
                ty: TypeAnnotation::new(*ty),
                optional: false,
                readonly: false,
                method: false,
                span: Span::default(),
            })
            .collect();
        self.stmt(StmtKind::Interface(InterfaceDecl {
            name: name.to_string(),
            members,
        }))
    }

    pub fn type_alias(&self, name: &str, ty: &str) -> Stmt {
        self.stmt(StmtKind::TypeAlias(TypeAliasDecl {
            name: name.to_string(),
            ty: TypeAnnotation::new(ty),
        }))
    }
}
