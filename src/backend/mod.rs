//! TypeSlang compiler backend
//!
//! This module lowers the typed AST produced by the TypeSlang front end into one C++ translation unit that
//! builds against the TypeSlang native runtime.
//!
//! The pipeline is:
//! 1. The front end hands over source units, inferred types and module links through [`FrontEnd`].
//! 2. [`emit::Emitter`] walks the entry unit depth-first, resolving types and scopes as it goes.
//! 3. Struct definitions and prototypes are filled into placeholders reserved after the preamble.
//!
//! ## Module Organization
//!
//! - `emit/` - Typed AST → C++ emission
//!   - `mod.rs` - `Emitter` state and shared helpers
//!   - `program.rs` - Program protocol (preamble, sections, unit walk)
//!   - `decls.rs` - Functions, imports, interfaces, aliases, variables
//!   - `statements.rs` - Statement emission
//!   - `expressions.rs` - Expression emission
//!   - `errors.rs` - Positioned emission errors
//! - `types/` - Type canonicalization, struct registry and type resolution
//! - `scope.rs` - Lexical scope chain and module-qualified names
//! - `intrinsics.rs` - Built-in call shapes (`Pointer(v)`, numeric `toString`)
//! - `output.rs` - Line buffer with retroactive insertion points

#![deny(clippy::unwrap_used)]

pub mod emit;
pub mod intrinsics;
pub mod output;
pub mod scope;
pub mod types;

pub use emit::{EmitError, EmitErrorKind, Emitter};

use crate::config::EmitConfig;
use typeslang_syntax::ast::{Position, Span, UnitId};
use typeslang_syntax::{FrontEnd, TypedProgram};

/// Compile the program rooted at `entry` into C++ source text.
pub fn compile(front: &dyn FrontEnd, entry: UnitId, config: &EmitConfig) -> Result<String, EmitError> {
    Emitter::new(front, config).emit_program(entry)
}

/// Compile a deserialized program from its entry unit.
pub fn compile_program(program: &TypedProgram, config: &EmitConfig) -> Result<String, EmitError> {
    let Some(entry) = program.entry_unit() else {
        return Err(EmitError {
            kind: EmitErrorKind::UnresolvedModule,
            message: "program has no source units".to_string(),
            unit: String::new(),
            position: Position { line: 1, column: 1 },
            span: Span::default(),
        });
    };
    compile(program, entry, config)
}
