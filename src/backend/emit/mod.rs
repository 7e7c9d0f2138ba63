//! Emit C++ source text from the typed AST.
//!
//! This module defines [`Emitter`] and wires together the focused submodules that implement typed AST → C++
//! emission. The heavy lifting lives in those submodules; `mod.rs` holds the shared state and the small
//! helpers every submodule relies on (scoping, output redirection, error positioning).
//!
//! ## Notes
//! - Emission is a single synchronous depth-first walk. Any error aborts it; there is no partial output.
//! - Scopes and output redirections are entered through [`Emitter::in_scope`] and [`Emitter::redirect`], which
//!   restore the previous state on every exit path, including errors.
//! - Dispatch is an exhaustive `match` per node category. Kinds with no rule in their category fail with
//!   [`EmitErrorKind::UnsupportedConstruct`].
//!
//! ## See also
//! - [`program`]: program-level protocol (preamble, sections, unit walk)
//! - [`decls`]: top-level declarations (functions, imports, interfaces, aliases, variables)
//! - [`statements`]: function-level statements
//! - [`expressions`]: expressions and literals

mod decls;
mod errors;
mod expressions;
mod program;
mod statements;

pub use errors::{EmitError, EmitErrorKind, ErrorKindOf};
pub use expressions::string_literal;

use std::collections::HashMap;
use std::fmt;

use crate::backend::output::{BufferId, OutputAssembler};
use crate::backend::scope::ScopeChain;
use crate::backend::types::{TypeName, TypeResolver, TypeSubject};
use crate::config::EmitConfig;
use typeslang_syntax::FrontEnd;
use typeslang_syntax::ast::{Position, SourceUnit, Span, UnitId};

/// A function seen during emission, prototyped in the `// Functions` section.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionRecord {
    /// Emission name (module-qualified for functions of imported units).
    pub name: String,
    pub params: Vec<(String, TypeName)>,
    pub return_type: TypeName,
    /// Set once the body has been written; declarations without a body keep `false`.
    pub body_emitted: bool,
}

impl FunctionRecord {
    /// C++ signature without a trailing `;` or body: `i32 add(i32 a, i32 b)`.
    pub fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|(name, ty)| format!("{} {name}", ty.render()))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} {}({params})", self.return_type.render(), self.name)
    }
}

/// Mutable state of one compilation.
#[derive(Debug)]
pub(crate) struct EmitContext {
    pub(crate) out: OutputAssembler,
    pub(crate) scopes: ScopeChain,
    pub(crate) types: TypeResolver,
    /// Functions in first-encountered order.
    pub(crate) functions: Vec<FunctionRecord>,
}

impl EmitContext {
    fn new(config: &EmitConfig) -> Self {
        Self {
            out: OutputAssembler::new(config.indent_width),
            scopes: ScopeChain::new(),
            types: TypeResolver::new(),
            functions: Vec::new(),
        }
    }
}

/// The unit currently being walked.
#[derive(Debug, Clone)]
struct UnitFrame<'a> {
    id: UnitId,
    source: &'a SourceUnit,
    /// Module tag (`None` for the entry unit).
    module: Option<String>,
}

/// Per-expression emission context, passed down the expression walk by value.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ExprCtx<'t> {
    /// The expression is the callee of the enclosing call (`a.f` in `a.f()`).
    callee: bool,
    /// Type the value flows into, when known (declaration initializers, returns, assignments).
    expected: Option<&'t TypeName>,
}

impl<'t> ExprCtx<'t> {
    fn value() -> Self {
        Self::default()
    }

    fn callee() -> Self {
        Self {
            callee: true,
            expected: None,
        }
    }

    fn expecting(ty: &'t TypeName) -> Self {
        Self {
            callee: false,
            expected: Some(ty),
        }
    }
}

/// Emit C++ source text from a typed program.
///
/// One emitter compiles one entry unit; it is consumed by [`Emitter::emit_program`]. Nothing is shared between
/// compilations, so anonymous struct numbering restarts with every emitter.
pub struct Emitter<'a> {
    front: &'a dyn FrontEnd,
    config: &'a EmitConfig,
    ctx: EmitContext,
    units: Vec<UnitFrame<'a>>,
    /// Units inlined so far, with the module tag of their first inclusion.
    included: HashMap<UnitId, Option<String>>,
    /// Return type of the function whose body is being emitted.
    return_type: Option<TypeName>,
}

impl<'a> Emitter<'a> {
    pub fn new(front: &'a dyn FrontEnd, config: &'a EmitConfig) -> Self {
        Self {
            front,
            config,
            ctx: EmitContext::new(config),
            units: Vec::new(),
            included: HashMap::new(),
            return_type: None,
        }
    }

    /// Run `f` inside a fresh scope frame; the frame is popped on every path.
    fn in_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, EmitError>) -> Result<T, EmitError> {
        self.ctx.scopes.push();
        let result = f(self);
        self.ctx.scopes.pop();
        result
    }

    /// Run `f` with output redirected into `target`.
    fn redirect<T>(&mut self, target: BufferId, f: impl FnOnce(&mut Self) -> T) -> T {
        self.ctx.out.push_target(target);
        let result = f(self);
        self.ctx.out.pop_target();
        result
    }

    /// Run `f` while walking `frame`'s unit.
    fn with_unit<T>(&mut self, frame: UnitFrame<'a>, f: impl FnOnce(&mut Self) -> Result<T, EmitError>) -> Result<T, EmitError> {
        self.units.push(frame);
        let result = f(self);
        self.units.pop();
        result
    }

    fn current_unit_id(&self) -> Option<UnitId> {
        self.units.last().map(|frame| frame.id)
    }

    /// Module tag of the unit being walked.
    fn current_module(&self) -> Option<String> {
        self.units.last().and_then(|frame| frame.module.clone())
    }

    /// Build an error positioned at `span` in the unit being walked.
    fn error(&self, kind: EmitErrorKind, message: impl Into<String>, span: Span) -> EmitError {
        let (unit, position) = match self.units.last() {
            Some(frame) => (frame.source.path.clone(), frame.source.position(span.start)),
            None => (String::new(), Position { line: 1, column: 1 }),
        };
        EmitError {
            kind,
            message: message.into(),
            unit,
            position,
            span,
        }
    }

    /// Position a component error at `span`.
    fn fail<E: ErrorKindOf + fmt::Display>(&self, span: Span, err: E) -> EmitError {
        self.error(err.emit_kind(), err.to_string(), span)
    }

    fn unsupported(&self, what: impl fmt::Display, span: Span) -> EmitError {
        self.error(EmitErrorKind::UnsupportedConstruct, format!("{what} is not supported"), span)
    }

    fn resolve(&mut self, subject: TypeSubject<'_>, span: Span) -> Result<TypeName, EmitError> {
        self.ctx
            .types
            .resolve(subject, &self.ctx.scopes, self.front)
            .map_err(|err| self.fail(span, err))
    }

    /// Declare `name` in the current frame.
    fn declare(&mut self, name: &str, ty: TypeName, origin: Option<&str>, span: Span) -> Result<(), EmitError> {
        self.ctx
            .scopes
            .declare(name, ty, origin, &mut self.ctx.types)
            .map_err(|err| self.fail(span, err))
    }

    fn mark_initialized(&mut self, name: &str, span: Span) -> Result<(), EmitError> {
        self.ctx
            .scopes
            .mark_initialized(name)
            .map_err(|err| self.fail(span, err))
    }

    /// Emission name of a visible binding.
    fn qualified(&self, name: &str, span: Span) -> Result<String, EmitError> {
        self.ctx.scopes.qualified_name(name).ok_or_else(|| {
            self.error(
                EmitErrorKind::UnknownIdentifier,
                format!("unknown identifier `{name}`"),
                span,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeslang_core::lang::types::numerics::NumericKindId;

    #[test]
    fn signature_renders_types() {
        let record = FunctionRecord {
            name: "greet".to_string(),
            params: vec![
                ("name".to_string(), TypeName::string()),
                ("times".to_string(), TypeName::numeric(NumericKindId::U8)),
            ],
            return_type: TypeName::void(),
            body_emitted: true,
        };
        assert_eq!(record.signature(), "void greet(String name, u8 times)");
    }

    #[test]
    fn signature_without_params() {
        let record = FunctionRecord {
            name: "main".to_string(),
            params: vec![],
            return_type: TypeName::numeric(NumericKindId::I32),
            body_emitted: true,
        };
        assert_eq!(record.signature(), "i32 main()");
    }
}
