//! Canonical native types and the type resolver
//!
//! The front end speaks in host-language type spellings (`number`, `boolean`, `u8[]`, `{ x: number; }`).
//! The backend needs exactly one spelling per native type, so every type is funneled through the
//! [`TypeResolver`] and comes out as a [`TypeName`] in canonical form:
//!
//! - fixed-width numerics: `i8` ... `u64`, `f32`, `f64`
//! - `bool`, `string`, `void`
//! - `Array<T>`, `Pointer<T>`
//! - struct references (declared interfaces or interned `anon_struct_<n>` shapes)
//!
//! ## Module Organization
//!
//! - `canonical.rs` - text-level helpers over type spellings (splitting, generic parsing, word rewriting)
//! - `registry.rs` - struct registry: declared and synthesized structs, interning, usage marking
//! - `resolver.rs` - the resolver proper: canonicalization and subject resolution

pub mod canonical;
pub mod registry;
pub mod resolver;

pub use registry::{StructDefinition, StructOrigin, StructRegistry};
pub use resolver::{TypeResolver, TypeSubject};

use std::fmt;
use thiserror::Error;
use typeslang_core::lang::types::{self as vocab, numerics};

/// Failure to produce a canonical type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("type `{0}` is dynamic and cannot be lowered to a native type")]
    Disallowed(String),

    #[error("cannot decide a native type for `{0}`")]
    Undecidable(String),

    #[error("nested array type `{0}` is not supported")]
    NestedArray(String),

    #[error("malformed object type `{shape}`: {reason}")]
    MalformedShape { shape: String, reason: String },

    #[error("no type information available for `{0}`")]
    Missing(String),

    #[error("type `{0}` is already declared")]
    Redeclared(String),
}

/// A type in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(String);

impl TypeName {
    /// Wrap an already canonical spelling.
    pub(crate) fn new(canonical: impl Into<String>) -> Self {
        Self(canonical.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bool() -> Self {
        Self::new(vocab::BOOL)
    }

    pub fn string() -> Self {
        Self::new(vocab::STRING)
    }

    pub fn void() -> Self {
        Self::new(vocab::VOID)
    }

    pub fn numeric(kind: numerics::NumericKindId) -> Self {
        Self::new(numerics::as_str(kind))
    }

    pub fn array_of(element: &TypeName) -> Self {
        Self(format!("{}<{}>", vocab::ARRAY, element.0))
    }

    /// `Pointer<T>`, with arrays decaying to a pointer to their element type.
    pub fn pointer_to(target: &TypeName) -> Self {
        let target = target.array_element().unwrap_or_else(|| target.clone());
        Self(format!("{}<{}>", vocab::POINTER, target.0))
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer_target().is_some()
    }

    pub fn is_array(&self) -> bool {
        self.array_element().is_some()
    }

    pub fn is_numeric(&self) -> bool {
        numerics::is_numeric(&self.0)
    }

    pub fn is_float(&self) -> bool {
        numerics::is_float(&self.0)
    }

    pub fn is_string(&self) -> bool {
        self.0 == vocab::STRING
    }

    /// `T` for `Array<T>`.
    pub fn array_element(&self) -> Option<TypeName> {
        self.generic_arg(vocab::ARRAY)
    }

    /// `T` for `Pointer<T>`.
    pub fn pointer_target(&self) -> Option<TypeName> {
        self.generic_arg(vocab::POINTER)
    }

    fn generic_arg(&self, head: &str) -> Option<TypeName> {
        let (found, args) = canonical::parse_generic(&self.0)?;
        match args.as_slice() {
            [arg] if found == head => Some(TypeName::new(*arg)),
            _ => None,
        }
    }

    /// Every identifier mentioned by the type (`Array<Pointer<Point>>` yields `Array`, `Pointer`, `Point`).
    pub fn referenced_names(&self) -> impl Iterator<Item = &str> {
        self.0
            .split(|c: char| !canonical::is_word_char(c))
            .filter(|word| !word.is_empty())
    }

    /// Spelling in emitted C++ (`string` becomes the runtime `String` class, also inside generics).
    pub fn render(&self) -> String {
        canonical::map_words(&self.0, vocab::target_spelling)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
