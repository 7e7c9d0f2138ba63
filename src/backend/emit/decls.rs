//! Emit top-level declarations.
//!
//! The top-level category admits functions, imports, interfaces, type aliases and variable statements.
//! Interfaces and type aliases are registered while the unit is pre-scanned and emit nothing in place.
//!
//! ## Notes
//! - Imports inline the imported unit at the import site, at most once per compilation. The unit's
//!   bindings carry the import specifier as their module tag, so its functions and globals are emitted
//!   with a mangled prefix.
//! - A specifier resolving to the runtime inlines nothing; its names are bound unqualified.

use super::{EmitError, EmitErrorKind, Emitter, ExprCtx, FunctionRecord};
use crate::backend::types::{TypeName, TypeSubject};
use typeslang_syntax::ModuleTarget;
use typeslang_syntax::ast::{
    FunctionDecl, ImportClause, ImportDecl, Param, Stmt, StmtKind, VarDeclarator, VariableStmt,
};

impl<'a> Emitter<'a> {
    pub(super) fn emit_top_level(&mut self, stmt: &'a Stmt) -> Result<(), EmitError> {
        match &stmt.kind {
            StmtKind::Function(decl) => self.emit_function(stmt, decl),
            StmtKind::Import(decl) => self.emit_import(stmt, decl),
            // Registered by the pre-scan.
            StmtKind::Interface(_) | StmtKind::TypeAlias(_) => Ok(()),
            StmtKind::Variable(var) => self.emit_variable_statement(var),
            StmtKind::Block(_)
            | StmtKind::If(_)
            | StmtKind::While(_)
            | StmtKind::DoWhile(_)
            | StmtKind::For(_)
            | StmtKind::Return(_)
            | StmtKind::Expr(_)
            | StmtKind::Break
            | StmtKind::Continue
            | StmtKind::Empty
            | StmtKind::Class(_)
            | StmtKind::Enum(_)
            | StmtKind::Throw(_) => Err(self.unsupported(
                format_args!("`{}` at top level", stmt.kind.kind_name()),
                stmt.span,
            )),
        }
    }

    // ---- functions ---------------------------------------------------------------------------------------

    fn emit_function(&mut self, stmt: &'a Stmt, decl: &'a FunctionDecl) -> Result<(), EmitError> {
        let name = self.qualified(&decl.name, stmt.span)?;
        let return_type = self.function_return_type(stmt, decl)?;
        self.ctx.types.mark_used(&return_type);

        self.in_scope(|this| {
            let params = decl
                .params
                .iter()
                .map(|param| this.bind_param(param))
                .collect::<Result<Vec<_>, _>>()?;
            let record = FunctionRecord {
                name,
                params,
                return_type: return_type.clone(),
                body_emitted: false,
            };
            let signature = record.signature();
            let index = this.ctx.functions.len();
            this.ctx.functions.push(record);

            let Some(body) = &decl.body else {
                return Ok(());
            };
            let previous = this.return_type.replace(return_type);
            this.ctx.out.write(&signature);
            this.ctx.out.write(" ");
            let result = this.emit_braced(body);
            this.return_type = previous;
            result?;
            this.ctx.out.end_line();
            this.ctx.out.end_line();
            this.ctx.functions[index].body_emitted = true;
            Ok(())
        })
    }

    /// Annotated return type, else the front end's inferred one, else `void`.
    fn function_return_type(&mut self, stmt: &'a Stmt, decl: &'a FunctionDecl) -> Result<TypeName, EmitError> {
        if let Some(annotation) = &decl.return_type {
            return self.resolve(TypeSubject::Annotation(&annotation.text), stmt.span);
        }
        match self.front.type_of(stmt.id) {
            Some(text) => self.resolve(TypeSubject::Annotation(text), stmt.span),
            None => Ok(TypeName::void()),
        }
    }

    fn bind_param(&mut self, param: &'a Param) -> Result<(String, TypeName), EmitError> {
        let ty = self.resolve(
            TypeSubject::Declaration {
                node: param.id,
                annotation: param.ty.as_ref(),
            },
            param.span,
        )?;
        self.declare(&param.name, ty.clone(), None, param.span)?;
        self.mark_initialized(&param.name, param.span)?;
        Ok((param.name.clone(), ty))
    }

    // ---- imports -----------------------------------------------------------------------------------------

    fn emit_import(&mut self, stmt: &'a Stmt, decl: &'a ImportDecl) -> Result<(), EmitError> {
        let specifiers = match &decl.clause {
            ImportClause::Named(specifiers) => specifiers,
            ImportClause::Default(_) => return Err(self.unsupported("default import", stmt.span)),
            ImportClause::Namespace(_) => return Err(self.unsupported("namespace import", stmt.span)),
            ImportClause::SideEffect => return Err(self.unsupported("side-effect import", stmt.span)),
        };
        if let Some(aliased) = specifiers.iter().find(|spec| spec.alias.is_some()) {
            return Err(self.unsupported(format_args!("aliased import of `{}`", aliased.name), aliased.span));
        }

        let front = self.front;
        let target = self
            .current_unit_id()
            .and_then(|from| front.resolve_module(&decl.specifier, from))
            .ok_or_else(|| {
                self.error(
                    EmitErrorKind::UnresolvedModule,
                    format!("cannot resolve module `{}`", decl.specifier),
                    stmt.span,
                )
            })?;

        match target {
            ModuleTarget::Runtime => {
                for spec in specifiers {
                    if self.ctx.scopes.lookup_root(&spec.name).is_some() {
                        continue;
                    }
                    let ty = self.resolve(
                        TypeSubject::Declaration {
                            node: spec.id,
                            annotation: None,
                        },
                        spec.span,
                    )?;
                    self.declare(&spec.name, ty, None, spec.span)?;
                    self.mark_initialized(&spec.name, spec.span)?;
                }
            }
            ModuleTarget::Unit(id) => {
                if !self.included.contains_key(&id) {
                    let unit = front.unit(id).ok_or_else(|| {
                        self.error(
                            EmitErrorKind::UnresolvedModule,
                            format!("module `{}` resolved to a missing unit", decl.specifier),
                            stmt.span,
                        )
                    })?;
                    tracing::debug!(specifier = %decl.specifier, unit = %unit.path, "inlining imported unit");
                    self.emit_unit(id, unit, Some(decl.specifier.clone()))?;
                }
                for spec in specifiers {
                    let known = self.ctx.scopes.lookup_root(&spec.name).is_some()
                        || self.ctx.types.is_type_name(&spec.name);
                    if !known {
                        return Err(self.error(
                            EmitErrorKind::UnknownIdentifier,
                            format!("`{}` is not declared by `{}`", spec.name, decl.specifier),
                            spec.span,
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    // ---- variables ---------------------------------------------------------------------------------------

    /// One C++ declaration per declarator: `T name = init;`.
    pub(super) fn emit_variable_statement(&mut self, var: &'a VariableStmt) -> Result<(), EmitError> {
        for decl in &var.declarations {
            let ty = self.bind_declarator(decl)?;
            self.ctx.out.write(&ty.render());
            self.ctx.out.write(" ");
            self.emit_declarator(decl, &ty)?;
            self.ctx.out.write(";");
            self.ctx.out.end_line();
        }
        Ok(())
    }

    /// Resolve and declare a declarator's binding. Root-scope bindings carry the unit's module tag.
    pub(super) fn bind_declarator(&mut self, decl: &'a VarDeclarator) -> Result<TypeName, EmitError> {
        let ty = self.resolve(
            TypeSubject::Declaration {
                node: decl.id,
                annotation: decl.ty.as_ref(),
            },
            decl.span,
        )?;
        let origin = if self.ctx.scopes.is_root() {
            self.current_module()
        } else {
            None
        };
        self.declare(&decl.name, ty.clone(), origin.as_deref(), decl.span)?;
        Ok(ty)
    }

    /// `name` or `name = init`, for a binding already declared with type `ty`.
    pub(super) fn emit_declarator(&mut self, decl: &'a VarDeclarator, ty: &TypeName) -> Result<(), EmitError> {
        let name = self.qualified(&decl.name, decl.span)?;
        self.ctx.out.write(&name);
        if let Some(init) = &decl.init {
            self.ctx.out.write(" = ");
            self.emit_expr(init, ExprCtx::expecting(ty))?;
            self.mark_initialized(&decl.name, decl.span)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::emit::{EmitError, EmitErrorKind, Emitter};
    use crate::config::EmitConfig;
    use typeslang_syntax::builder::ProgramBuilder;
    use typeslang_syntax::{FrontEnd, ModuleTarget, TypedProgram};

    fn compile(program: &TypedProgram) -> Result<String, EmitError> {
        let config = EmitConfig::default();
        let entry = program.entry_unit().expect("entry");
        Emitter::new(program, &config).emit_program(entry)
    }

    #[test]
    fn function_with_params() {
        let mut b = ProgramBuilder::new();
        let sum = b.binary(
            typeslang_core::lang::operators::BinaryOpId::Plus,
            b.ident("a"),
            b.ident("b"),
        );
        let add = b.function(
            "add",
            vec![b.param("a", "number"), b.param("b", "u8")],
            Some("number"),
            vec![b.ret(Some(sum))],
        );
        let unit = b.add_unit("main.ts", vec![add]);
        let out = compile(&b.finish(unit)).expect("emit");
        assert!(out.contains("i32 add(i32 a, u8 b);\n"));
        assert!(out.contains("i32 add(i32 a, u8 b) {\n    return a + b;\n}\n"));
    }

    #[test]
    fn body_less_declaration_is_only_prototyped() {
        let mut b = ProgramBuilder::new();
        let decl = b.declare_function("tick", vec![], Some("void"));
        let unit = b.add_unit("main.ts", vec![decl]);
        let out = compile(&b.finish(unit)).expect("emit");
        assert!(out.contains("void tick();\n"));
        assert!(!out.contains("void tick() {"));
    }

    #[test]
    fn records_track_emitted_bodies() {
        let mut b = ProgramBuilder::new();
        let decl = b.declare_function("tick", vec![], Some("void"));
        let main = b.function("main", vec![], Some("void"), vec![]);
        let unit = b.add_unit("main.ts", vec![decl, main]);
        let program = b.finish(unit);
        let config = EmitConfig::default();
        let source = program.unit(unit).expect("unit");

        let mut emitter = Emitter::new(&program, &config);
        emitter.emit_unit(unit, source, None).expect("emit");
        let records: Vec<_> = emitter
            .ctx
            .functions
            .iter()
            .map(|f| (f.name.as_str(), f.body_emitted))
            .collect();
        assert_eq!(records, vec![("tick", false), ("main", true)]);
    }

    #[test]
    fn missing_return_annotation_defaults_to_void() {
        let mut b = ProgramBuilder::new();
        let main = b.function("main", vec![], None, vec![]);
        let unit = b.add_unit("main.ts", vec![main]);
        let out = compile(&b.finish(unit)).expect("emit");
        assert!(out.contains("void main();\n"));
    }

    #[test]
    fn top_level_variables_are_globals() {
        let mut b = ProgramBuilder::new();
        let limit = b.const_("limit", "number", b.num("10"));
        let unit = b.add_unit("main.ts", vec![limit]);
        let out = compile(&b.finish(unit)).expect("emit");
        assert!(out.contains("\ni32 limit = 10;\n"));
    }

    #[test]
    fn expression_at_top_level_is_unsupported() {
        let mut b = ProgramBuilder::new();
        let stray = b.expr_stmt(b.num("1"));
        let unit = b.add_unit("main.ts", vec![stray]);
        let err = compile(&b.finish(unit)).expect_err("unsupported");
        assert_eq!(err.kind, EmitErrorKind::UnsupportedConstruct);
        assert!(err.message.contains("ExpressionStatement"), "{}", err.message);
    }

    #[test]
    fn imported_unit_is_inlined_with_qualified_names() {
        let mut b = ProgramBuilder::new();
        let greet = b.function("greet", vec![], Some("void"), vec![]);
        let lib = b.add_unit("lib/greet.ts", vec![greet]);
        let import = b.import("./lib/greet.ts", &["greet"]);
        let call = b.expr_stmt(b.call(b.ident("greet"), vec![]));
        let main = b.function("main", vec![], Some("void"), vec![call]);
        let entry = b.add_unit("main.ts", vec![import, main]);
        b.link(entry, "./lib/greet.ts", ModuleTarget::Unit(lib));
        let out = compile(&b.finish(entry)).expect("emit");

        assert!(out.contains("void _cd_lib_greet_greet();\nvoid main();\n"));
        assert!(out.contains("void _cd_lib_greet_greet() {\n}\n"));
        assert!(out.contains("    _cd_lib_greet_greet();\n"));
    }

    #[test]
    fn unit_is_inlined_once() {
        let mut b = ProgramBuilder::new();
        let helper = b.function("helper", vec![], Some("void"), vec![]);
        let lib = b.add_unit("util.ts", vec![helper]);
        let first = b.import("./util.ts", &["helper"]);
        let second = b.import("./util.ts", &["helper"]);
        let entry = b.add_unit("main.ts", vec![first, second]);
        b.link(entry, "./util.ts", ModuleTarget::Unit(lib));
        let out = compile(&b.finish(entry)).expect("emit");
        assert_eq!(out.matches("void _cd_util_helper() {").count(), 1);
    }

    #[test]
    fn unresolved_import_fails() {
        let mut b = ProgramBuilder::new();
        let import = b.import("./nowhere.ts", &["x"]);
        let entry = b.add_unit("main.ts", vec![import]);
        let err = compile(&b.finish(entry)).expect_err("unresolved");
        assert_eq!(err.kind, EmitErrorKind::UnresolvedModule);
        assert!(err.message.contains("./nowhere.ts"));
    }

    #[test]
    fn importing_an_undeclared_name_fails() {
        let mut b = ProgramBuilder::new();
        let lib = b.add_unit("util.ts", vec![]);
        let import = b.import("./util.ts", &["missing"]);
        let entry = b.add_unit("main.ts", vec![import]);
        b.link(entry, "./util.ts", ModuleTarget::Unit(lib));
        let err = compile(&b.finish(entry)).expect_err("unknown");
        assert_eq!(err.kind, EmitErrorKind::UnknownIdentifier);
    }

    #[test]
    fn runtime_imports_bind_unqualified_names() {
        let mut b = ProgramBuilder::new();
        let import = b.import_typed("TypeSlang", &[("stdout", "Console")]);
        let call = b.expr_stmt(b.method_call(b.ident("stdout"), "info", vec![b.num("1")]));
        let main = b.function("main", vec![], Some("void"), vec![call]);
        let entry = b.add_unit("main.ts", vec![import, main]);
        b.link(entry, "TypeSlang", ModuleTarget::Runtime);
        let out = compile(&b.finish(entry)).expect("emit");
        assert!(out.contains("    stdout.info(1);\n"));
    }

    #[test]
    fn default_import_is_unsupported() {
        let mut b = ProgramBuilder::new();
        let import = b.stmt(typeslang_syntax::ast::StmtKind::Import(typeslang_syntax::ast::ImportDecl {
            specifier: "./m.ts".to_string(),
            clause: typeslang_syntax::ast::ImportClause::Default("m".to_string()),
        }));
        let entry = b.add_unit("main.ts", vec![import]);
        let err = compile(&b.finish(entry)).expect_err("unsupported");
        assert_eq!(err.kind, EmitErrorKind::UnsupportedConstruct);
        assert_eq!(err.message, "default import is not supported");
    }
}
