//! Emit a whole program to one C++ translation unit.
//!
//! The protocol:
//!
//! 1. preamble (runtime include, `using namespace`, runtime globals bound in the root scope),
//! 2. two placeholders reserved right after the preamble: struct definitions, then function prototypes,
//! 3. the entry unit, walked top to bottom (imports inline their unit at the import site),
//! 4. the placeholders filled from what the walk registered.
//!
//! ## Notes
//! - A section with nothing to show loses its label, so the output never carries an empty `// Structs`.
//! - Only structs reachable from emitted declarations are defined; interning alone never emits a struct.
//! - Structs are defined after the structs their fields reference. A pointer cycle leaves one reference
//!   pointing forward; its target gets a `struct Name;` declaration at the top of the section.

use std::collections::HashSet;

use super::{EmitError, EmitErrorKind, Emitter, UnitFrame};
use crate::backend::output::BufferId;
use crate::backend::types::{TypeName, TypeSubject};
use typeslang_core::lang::{runtime, types as vocab};
use typeslang_syntax::ast::{SourceUnit, Span, StmtKind, UnitId};

const STRUCTS_LABEL: &str = "// Structs";
const FUNCTIONS_LABEL: &str = "// Functions";

impl<'a> Emitter<'a> {
    /// Compile the program rooted at `entry` into C++ source text.
    #[tracing::instrument(skip_all, fields(entry = entry.0))]
    pub fn emit_program(mut self, entry: UnitId) -> Result<String, EmitError> {
        let front = self.front;
        let unit = front.unit(entry).ok_or_else(|| {
            self.error(
                EmitErrorKind::UnresolvedModule,
                format!("entry unit #{} does not exist", entry.0),
                Span::default(),
            )
        })?;

        self.emit_preamble()?;
        let structs = self.ctx.out.insert_placeholder();
        let prototypes = self.ctx.out.insert_placeholder();

        self.emit_unit(entry, unit, None)?;

        self.emit_struct_section(structs);
        self.emit_prototype_section(prototypes);
        tracing::debug!(
            structs = self.ctx.types.structs().len(),
            functions = self.ctx.functions.len(),
            bodies = self.ctx.functions.iter().filter(|f| f.body_emitted).count(),
            "program emitted"
        );
        Ok(self.ctx.out.finish())
    }

    fn emit_preamble(&mut self) -> Result<(), EmitError> {
        let include = format!("#include <{}>", self.config.runtime_include);
        let using = format!("using namespace {};", self.config.runtime_namespace);
        self.ctx.out.write_line(&include);
        self.ctx.out.write_line(&using);
        self.ctx.out.end_line();

        for &(name, ty) in runtime::GLOBALS {
            let ty = self.resolve(TypeSubject::Annotation(ty), Span::default())?;
            self.declare(name, ty, None, Span::default())?;
            self.mark_initialized(name, Span::default())?;
        }
        Ok(())
    }

    /// Walk one unit: register its hoisted declarations, then emit its top-level statements in order.
    #[tracing::instrument(skip_all, fields(unit = %source.path, module = module.as_deref().unwrap_or("")))]
    pub(super) fn emit_unit(
        &mut self,
        id: UnitId,
        source: &'a SourceUnit,
        module: Option<String>,
    ) -> Result<(), EmitError> {
        self.included.insert(id, module.clone());
        let frame = UnitFrame { id, source, module };
        self.with_unit(frame, |this| {
            this.preregister(source)?;
            for stmt in &source.statements {
                this.emit_top_level(stmt)?;
            }
            Ok(())
        })
    }

    /// Bind the unit's functions in the root scope and register its interfaces and type aliases, so uses
    /// may precede declarations.
    fn preregister(&mut self, source: &'a SourceUnit) -> Result<(), EmitError> {
        let module = self.current_module();
        let mut functions = 0usize;
        // Overload signatures of one unit share a binding; a name bound by another unit is a redeclaration.
        let mut bound_here: HashSet<&str> = HashSet::new();
        for stmt in &source.statements {
            match &stmt.kind {
                StmtKind::Function(decl) => {
                    if !bound_here.insert(decl.name.as_str()) {
                        continue;
                    }
                    let ty = TypeName::new(vocab::FUNCTION_BINDING);
                    self.declare(&decl.name, ty, module.as_deref(), stmt.span)?;
                    self.mark_initialized(&decl.name, stmt.span)?;
                    functions += 1;
                }
                StmtKind::Interface(decl) => {
                    self.ctx
                        .types
                        .declare_interface(decl)
                        .map_err(|err| self.fail(stmt.span, err))?;
                }
                StmtKind::TypeAlias(decl) => {
                    self.ctx
                        .types
                        .declare_alias(decl)
                        .map_err(|err| self.fail(stmt.span, err))?;
                }
                _ => {}
            }
        }
        tracing::debug!(functions, "pre-registered unit declarations");
        Ok(())
    }

    fn emit_struct_section(&mut self, target: BufferId) {
        let labelled = self.config.section_comments;
        self.redirect(target, |this| {
            if labelled {
                this.ctx.out.write_line(STRUCTS_LABEL);
            }
            let registry = this.ctx.types.structs();
            let order = registry.emission_order();
            let forward: Vec<String> = registry
                .forward_declarations(&order)
                .into_iter()
                .map(|name| format!("struct {name};"))
                .collect();
            let definitions: Vec<(String, Vec<String>)> = order
                .into_iter()
                .map(|def| {
                    let fields = def
                        .fields
                        .iter()
                        .map(|(name, ty)| format!("{} {name};", ty.render()))
                        .collect();
                    (def.name.clone(), fields)
                })
                .collect();

            if definitions.is_empty() {
                if labelled {
                    this.ctx.out.remove_line();
                }
                return;
            }
            if !forward.is_empty() {
                for declaration in &forward {
                    this.ctx.out.write_line(declaration);
                }
                this.ctx.out.end_line();
            }
            for (name, fields) in definitions {
                this.ctx.out.write_line(&format!("struct {name} {{"));
                this.ctx.out.indent();
                for field in fields {
                    this.ctx.out.write_line(&field);
                }
                this.ctx.out.dedent();
                this.ctx.out.write_line("};");
                this.ctx.out.end_line();
            }
        });
    }

    fn emit_prototype_section(&mut self, target: BufferId) {
        let labelled = self.config.section_comments;
        self.redirect(target, |this| {
            if labelled {
                this.ctx.out.write_line(FUNCTIONS_LABEL);
            }
            let signatures: Vec<String> = this
                .ctx
                .functions
                .iter()
                .map(|function| format!("{};", function.signature()))
                .collect();

            if signatures.is_empty() {
                if labelled {
                    this.ctx.out.remove_line();
                }
                return;
            }
            for signature in signatures {
                this.ctx.out.write_line(&signature);
            }
            this.ctx.out.end_line();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmitConfig;
    use typeslang_syntax::TypedProgram;
    use typeslang_syntax::builder::ProgramBuilder;

    fn compile(program: &TypedProgram, config: &EmitConfig) -> Result<String, EmitError> {
        let entry = program.entry_unit().unwrap_or(UnitId(0));
        Emitter::new(program, config).emit_program(entry)
    }

    #[test]
    fn empty_unit_is_just_the_preamble() {
        let mut b = ProgramBuilder::new();
        let unit = b.add_unit("main.ts", vec![]);
        let program = b.finish(unit);
        let out = compile(&program, &EmitConfig::default()).expect("emit");
        assert_eq!(out, "#include <TypeSlang/runtime.cpp>\nusing namespace JS;\n");
    }

    #[test]
    fn preamble_follows_config() {
        let mut b = ProgramBuilder::new();
        let unit = b.add_unit("main.ts", vec![]);
        let program = b.finish(unit);
        let config = EmitConfig::new()
            .with_runtime_include("rt/all.hpp")
            .with_runtime_namespace("rt");
        let out = compile(&program, &config).expect("emit");
        assert!(out.starts_with("#include <rt/all.hpp>\nusing namespace rt;\n"));
    }

    #[test]
    fn missing_entry_unit_fails() {
        let program = TypedProgram::default();
        let err = Emitter::new(&program, &EmitConfig::default())
            .emit_program(UnitId(3))
            .expect_err("no unit 3");
        assert_eq!(err.kind, EmitErrorKind::UnresolvedModule);
    }

    #[test]
    fn prototypes_precede_bodies() {
        let mut b = ProgramBuilder::new();
        let helper = b.function("helper", vec![], Some("void"), vec![]);
        let main = b.function("main", vec![], Some("i32"), vec![b.ret(Some(b.num("0")))]);
        let unit = b.add_unit("main.ts", vec![helper, main]);
        let program = b.finish(unit);
        let out = compile(&program, &EmitConfig::default()).expect("emit");

        let prototypes = out.find("// Functions").expect("label");
        let first_body = out.find("void helper() {").expect("helper body");
        assert!(prototypes < first_body);
        assert!(out.contains("void helper();\ni32 main();\n"));
        assert!(!out.contains("// Structs"));
    }

    #[test]
    fn section_labels_can_be_disabled() {
        let mut b = ProgramBuilder::new();
        let main = b.function("main", vec![], Some("void"), vec![]);
        let unit = b.add_unit("main.ts", vec![main]);
        let program = b.finish(unit);
        let out = compile(&program, &EmitConfig::new().with_section_comments(false)).expect("emit");
        assert!(!out.contains("// Functions"));
        assert!(out.contains("void main();\n"));
    }

    #[test]
    fn interfaces_are_hoisted() {
        let mut b = ProgramBuilder::new();
        let main = b.function(
            "main",
            vec![],
            Some("void"),
            vec![b.let_annotated("p", "Point", None)],
        );
        let point = b.interface("Point", &[("x", "number"), ("y", "number")]);
        let unit = b.add_unit("main.ts", vec![main, point]);
        let program = b.finish(unit);
        let out = compile(&program, &EmitConfig::default()).expect("emit");
        assert!(out.contains("// Structs\nstruct Point {\n    i32 x;\n    i32 y;\n};\n"));
        assert!(out.contains("    Point p;\n"));
    }
}
