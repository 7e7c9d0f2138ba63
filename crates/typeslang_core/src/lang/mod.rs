//! TypeSlang language vocabulary registries.
//!
//! The design goal is to avoid stringly-typed checks scattered across the backend. Callers work with stable
//! IDs (e.g. `NumericKindId`, `BinaryOpId`) and look up spellings via registry tables.
//!
//! ## Examples
//! ```rust
//! use typeslang_core::lang::types::numerics::{self, NumericKindId};
//!
//! assert_eq!(numerics::from_str("u8"), Some(NumericKindId::U8));
//! assert_eq!(numerics::as_str(NumericKindId::F32), "f32");
//! ```

pub mod operators;
pub mod runtime;
pub mod types;
