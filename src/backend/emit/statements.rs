//! Emit function-level statements.
//!
//! Every statement leaves the output at the start of a fresh line. Braced constructs are written through
//! [`Emitter::emit_braced`], which leaves the closing `}` on an open line so callers can append
//! ` else ...` or ` while (...);`.

use super::{EmitError, Emitter, ExprCtx};
use typeslang_syntax::ast::{ForInit, ForStmt, IfStmt, Stmt, StmtKind, VariableStmt, WhileStmt};

impl<'a> Emitter<'a> {
    pub(super) fn emit_statement(&mut self, stmt: &'a Stmt) -> Result<(), EmitError> {
        match &stmt.kind {
            StmtKind::Variable(var) => self.emit_variable_statement(var),
            StmtKind::Block(statements) => {
                self.in_scope(|this| this.emit_braced(statements))?;
                self.ctx.out.end_line();
                Ok(())
            }
            StmtKind::If(if_stmt) => {
                self.emit_if(if_stmt)?;
                self.ctx.out.end_line();
                Ok(())
            }
            StmtKind::While(while_stmt) => self.emit_while(while_stmt),
            StmtKind::DoWhile(while_stmt) => self.emit_do_while(while_stmt),
            StmtKind::For(for_stmt) => self.in_scope(|this| this.emit_for(for_stmt)),
            StmtKind::Return(value) => {
                self.ctx.out.write("return");
                if let Some(value) = value {
                    self.ctx.out.write(" ");
                    let expected = self.return_type.clone();
                    let cx = match &expected {
                        Some(ty) => ExprCtx::expecting(ty),
                        None => ExprCtx::value(),
                    };
                    self.emit_expr(value, cx)?;
                }
                self.ctx.out.write_line(";");
                Ok(())
            }
            StmtKind::Expr(expr) => {
                self.emit_expr(expr, ExprCtx::value())?;
                self.ctx.out.write_line(";");
                Ok(())
            }
            StmtKind::Break => {
                self.ctx.out.write_line("break;");
                Ok(())
            }
            StmtKind::Continue => {
                self.ctx.out.write_line("continue;");
                Ok(())
            }
            StmtKind::Empty => Ok(()),
            StmtKind::Function(_)
            | StmtKind::Import(_)
            | StmtKind::Interface(_)
            | StmtKind::TypeAlias(_)
            | StmtKind::Class(_)
            | StmtKind::Enum(_)
            | StmtKind::Throw(_) => Err(self.unsupported(
                format_args!("`{}` inside a function", stmt.kind.kind_name()),
                stmt.span,
            )),
        }
    }

    /// `{`, the statements one level deeper, then `}` left on an open line. Opens no scope of its own.
    pub(super) fn emit_braced(&mut self, statements: &'a [Stmt]) -> Result<(), EmitError> {
        self.ctx.out.write_line("{");
        self.ctx.out.indent();
        let result = statements.iter().try_for_each(|stmt| self.emit_statement(stmt));
        self.ctx.out.dedent();
        result?;
        self.ctx.out.write("}");
        Ok(())
    }

    /// Body of a control-flow statement, always braced and always in its own scope.
    fn emit_body(&mut self, body: &'a Stmt) -> Result<(), EmitError> {
        match &body.kind {
            StmtKind::Block(statements) => self.in_scope(|this| this.emit_braced(statements)),
            _ => self.in_scope(|this| this.emit_braced(std::slice::from_ref(body))),
        }
    }

    fn emit_if(&mut self, if_stmt: &'a IfStmt) -> Result<(), EmitError> {
        self.ctx.out.write("if (");
        self.emit_expr(&if_stmt.condition, ExprCtx::value())?;
        self.ctx.out.write(") ");
        self.emit_body(&if_stmt.then_branch)?;

        let Some(else_branch) = &if_stmt.else_branch else {
            return Ok(());
        };
        self.ctx.out.write(" else ");
        match &else_branch.kind {
            StmtKind::If(nested) => self.emit_if(nested),
            _ => self.emit_body(else_branch),
        }
    }

    fn emit_while(&mut self, while_stmt: &'a WhileStmt) -> Result<(), EmitError> {
        self.ctx.out.write("while (");
        self.emit_expr(&while_stmt.condition, ExprCtx::value())?;
        self.ctx.out.write(") ");
        self.emit_body(&while_stmt.body)?;
        self.ctx.out.end_line();
        Ok(())
    }

    fn emit_do_while(&mut self, while_stmt: &'a WhileStmt) -> Result<(), EmitError> {
        self.ctx.out.write("do ");
        self.emit_body(&while_stmt.body)?;
        self.ctx.out.write(" while (");
        self.emit_expr(&while_stmt.condition, ExprCtx::value())?;
        self.ctx.out.write_line(");");
        Ok(())
    }

    /// `for (init; condition; update) body`; runs inside the scope opened for the header.
    fn emit_for(&mut self, for_stmt: &'a ForStmt) -> Result<(), EmitError> {
        self.ctx.out.write("for (");
        match &for_stmt.init {
            Some(ForInit::Variable(var)) => self.emit_for_declarations(var)?,
            Some(ForInit::Expr(expr)) => self.emit_expr(expr, ExprCtx::value())?,
            None => {}
        }
        self.ctx.out.write(";");
        if let Some(condition) = &for_stmt.condition {
            self.ctx.out.write(" ");
            self.emit_expr(condition, ExprCtx::value())?;
        }
        self.ctx.out.write(";");
        if let Some(update) = &for_stmt.update {
            self.ctx.out.write(" ");
            self.emit_expr(update, ExprCtx::value())?;
        }
        self.ctx.out.write(") ");
        self.emit_body(&for_stmt.body)?;
        self.ctx.out.end_line();
        Ok(())
    }

    /// A C++ `for` header holds one declaration, so every declarator must share the first one's type.
    fn emit_for_declarations(&mut self, var: &'a VariableStmt) -> Result<(), EmitError> {
        let mut first = None;
        for decl in &var.declarations {
            let ty = self.bind_declarator(decl)?;
            match &first {
                None => {
                    self.ctx.out.write(&ty.render());
                    self.ctx.out.write(" ");
                }
                Some(first_ty) if *first_ty == ty => self.ctx.out.write(", "),
                Some(first_ty) => {
                    return Err(self.unsupported(
                        format_args!("mixing `{first_ty}` and `{ty}` declarations in a `for` header"),
                        decl.span,
                    ));
                }
            }
            self.emit_declarator(decl, &ty)?;
            if first.is_none() {
                first = Some(ty);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::emit::{EmitError, EmitErrorKind, Emitter};
    use crate::config::EmitConfig;
    use typeslang_core::lang::operators::{BinaryOpId, PostfixOpId};
    use typeslang_syntax::TypedProgram;
    use typeslang_syntax::ast::{ForInit, Stmt, StmtKind, VarKind};
    use typeslang_syntax::builder::ProgramBuilder;

    fn compile_main(mut b: ProgramBuilder, body: Vec<Stmt>) -> Result<String, EmitError> {
        let main = b.function("main", vec![], Some("void"), body);
        let unit = b.add_unit("main.ts", vec![main]);
        let program: TypedProgram = b.finish(unit);
        let config = EmitConfig::default();
        Emitter::new(&program, &config).emit_program(unit)
    }

    #[test]
    fn if_else_chain() {
        let b = ProgramBuilder::new();
        let x = || b.ident("x");
        let body = vec![
            b.let_("x", "number", b.num("1")),
            b.if_(
                b.binary(BinaryOpId::Lt, x(), b.num("0")),
                b.block(vec![b.ret(None)]),
                Some(b.if_(
                    b.binary(BinaryOpId::StrictEq, x(), b.num("0")),
                    b.expr_stmt(b.postfix(PostfixOpId::Increment, x())),
                    Some(b.block(vec![])),
                )),
            ),
        ];
        let out = compile_main(b, body).expect("emit");
        let expected = "    if (x < 0) {\n        return;\n    } else if (x == 0) {\n        x++;\n    } else {\n    }\n";
        assert!(out.contains(expected), "{out}");
    }

    #[test]
    fn while_and_do_while() {
        let b = ProgramBuilder::new();
        let body = vec![
            b.let_("n", "number", b.num("3")),
            b.while_(
                b.binary(BinaryOpId::Gt, b.ident("n"), b.num("0")),
                b.expr_stmt(b.assign(b.ident("n"), b.binary(BinaryOpId::Minus, b.ident("n"), b.num("1")))),
            ),
            b.do_while(b.block(vec![b.stmt(StmtKind::Break)]), b.bool(true)),
        ];
        let out = compile_main(b, body).expect("emit");
        assert!(out.contains("    while (n > 0) {\n        n = n - 1;\n    }\n"), "{out}");
        assert!(out.contains("    do {\n        break;\n    } while (true);\n"), "{out}");
    }

    #[test]
    fn for_header_has_its_own_scope() {
        let b = ProgramBuilder::new();
        let init = b.declarator("i", None, Some("number"), Some(b.num("0")));
        let loop_stmt = b.for_(
            Some(ForInit::Variable(typeslang_syntax::ast::VariableStmt {
                kind: VarKind::Let,
                declarations: vec![init],
            })),
            Some(b.binary(BinaryOpId::Lt, b.ident("i"), b.num("10"))),
            Some(b.postfix(PostfixOpId::Increment, b.ident("i"))),
            b.stmt(StmtKind::Continue),
        );
        // `i` is visible again after the loop's scope ends.
        let after = b.let_("i", "number", b.num("5"));
        let out = compile_main(b, vec![loop_stmt, after]).expect("emit");
        assert!(out.contains("    for (i32 i = 0; i < 10; i++) {\n        continue;\n    }\n"), "{out}");
        assert!(out.contains("    i32 i = 5;\n"));
    }

    #[test]
    fn nested_blocks_allow_shadowing() {
        let b = ProgramBuilder::new();
        let body = vec![
            b.let_("v", "number", b.num("1")),
            b.block(vec![b.let_("v", "boolean", b.bool(false))]),
        ];
        let out = compile_main(b, body).expect("emit");
        assert!(out.contains("    i32 v = 1;\n    {\n        bool v = false;\n    }\n"), "{out}");
    }

    #[test]
    fn redeclaration_in_one_block_fails() {
        let b = ProgramBuilder::new();
        let body = vec![
            b.let_("v", "number", b.num("1")),
            b.let_("v", "number", b.num("2")),
        ];
        let err = compile_main(b, body).expect_err("double declaration");
        assert_eq!(err.kind, EmitErrorKind::DoubleDeclaration);
    }

    #[test]
    fn nested_function_is_unsupported() {
        let b = ProgramBuilder::new();
        let inner = b.function("inner", vec![], Some("void"), vec![]);
        let err = compile_main(b, vec![inner]).expect_err("unsupported");
        assert_eq!(err.kind, EmitErrorKind::UnsupportedConstruct);
        assert_eq!(err.message, "`FunctionDeclaration` inside a function is not supported");
    }

    #[test]
    fn empty_statements_emit_nothing() {
        let b = ProgramBuilder::new();
        let body = vec![b.stmt(StmtKind::Empty)];
        let out = compile_main(b, body).expect("emit");
        assert!(out.contains("void main() {\n}\n"), "{out}");
    }
}
