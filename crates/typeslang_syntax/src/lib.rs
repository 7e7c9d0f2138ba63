//! Typed syntax tree and front-end interface for the TypeSlang compiler.
//!
//! The front end (parser plus type checker) is an external collaborator. This crate defines what it hands
//! to the backend: source units of typed AST nodes, and the [`FrontEnd`] trait the backend queries for
//! inferred types and module resolution.
//!
//! ## Notes
//! - This crate is intentionally "syntax-only": no name resolution, no type canonicalization, no emission.
//! - Operator identity comes from `typeslang_core::lang::operators`.
//!
//! ## See also
//! - [`builder::ProgramBuilder`] for constructing programs in code.
//! - [`TypedProgram`] for the serializable, precomputed front end.

pub mod ast;
pub mod builder;
pub mod frontend;

pub use frontend::{FrontEnd, ModuleLink, ModuleTarget, TypedProgram};
