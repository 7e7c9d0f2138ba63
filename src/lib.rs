#![forbid(unsafe_code)]
//! TypeSlang compiler backend
//!
//! TypeSlang compiles a statically typed subset of TypeScript to native code by way of C++. This crate is the
//! backend: it takes the typed AST the front end produced (see [`typeslang_syntax`]) and lowers it to one C++
//! translation unit built against the TypeSlang runtime.
//!
//! ```rust
//! use typeslang::{EmitConfig, compile_program};
//! use typeslang_syntax::builder::ProgramBuilder;
//!
//! let mut b = ProgramBuilder::new();
//! let main = b.function("main", vec![], Some("i32"), vec![b.ret(Some(b.num("0")))]);
//! let unit = b.add_unit("main.ts", vec![main]);
//! let cpp = compile_program(&b.finish(unit), &EmitConfig::default()).expect("compiles");
//! assert!(cpp.contains("i32 main() {"));
//! ```
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a compiler bug (e.g. a registry entry missing for an enum variant),
//!   use `.expect("... missing")` with a clear explanation.

pub mod backend;
pub mod cli;
pub mod config;
pub mod diagnostics;

pub use backend::{EmitError, EmitErrorKind, Emitter, compile, compile_program};
pub use config::EmitConfig;
