//! Provide the canonical language vocabulary shared by the TypeSlang front-end interface and backend.
//!
//! This crate is intentionally small and dependency-light. It holds the spellings that both sides of the
//! compiler must agree on:
//! - builtin type names (fixed-width numerics, `bool`, `string`, `Array<T>`, `Pointer<T>`),
//! - the names exposed by the native runtime (`Number::toString`, `String::format`, `console`, ...),
//! - the operator set of the surface language and how each operator is spelled in the target.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, and no AST types.
//! - Semantics (type canonicalization, scoping, emission) live in the `typeslang` backend.

pub mod lang;
