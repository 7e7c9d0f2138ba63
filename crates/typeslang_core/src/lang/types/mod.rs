//! Builtin type vocabulary.
//!
//! Canonical type spellings the backend produces and recognizes, plus the host-language spellings that
//! canonicalization rewrites away.

pub mod numerics;

/// Canonical boolean type.
pub const BOOL: &str = "bool";

/// Canonical string type (length-carrying runtime string).
pub const STRING: &str = "string";

/// Canonical return type of functions that return nothing.
pub const VOID: &str = "void";

/// Generic head of the runtime array type (`Array<T>`).
pub const ARRAY: &str = "Array";

/// Generic head of the pointer type (`Pointer<T>`).
pub const POINTER: &str = "Pointer";

/// Short alias accepted for [`POINTER`] (`ptr<T>`).
pub const POINTER_ALIAS: &str = "ptr";

/// Host numeric type that canonicalizes to [`numerics::DEFAULT_INTEGER`].
pub const HOST_NUMBER: &str = "number";

/// Host wide-integer type that canonicalizes to `i64`.
pub const HOST_BIGINT: &str = "bigint";

/// Host spellings that canonicalize to [`BOOL`] (the type itself and its literal types).
pub const BOOLEAN_SPELLINGS: &[&str] = &["boolean", "true", "false"];

/// Dynamic spellings that can never be lowered to a static native type.
pub const DISALLOWED_SPELLINGS: &[&str] = &["any", "const"];

/// Host-only types with no native counterpart.
pub const HOST_ONLY_SPELLINGS: &[&str] = &["unknown", "undefined", "null", "never", "object", "symbol"];

/// Binding type recorded for function names in the scope chain.
pub const FUNCTION_BINDING: &str = "function";

/// Target-language spelling of a canonical builtin type, when it differs from the canonical one.
pub fn target_spelling(canonical: &str) -> Option<&'static str> {
    match canonical {
        STRING => Some("String"),
        _ => None,
    }
}
