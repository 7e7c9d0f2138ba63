//! Fixed-width numeric type vocabulary.
//!
//! The surface language exposes explicit-width numerics (`i8` ... `u64`, `f32`, `f64`) as aliases of the
//! host language's `number`/`bigint`. Each entry records the width and signedness the runtime typedefs use.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**: type spellings are identifiers in the target language.
//!
//! ## Examples
//! ```rust
//! use typeslang_core::lang::types::numerics::{self, NumericKindId};
//!
//! assert_eq!(numerics::from_str("i64"), Some(NumericKindId::I64));
//! assert!(numerics::info_for(NumericKindId::F64).is_float);
//! assert_eq!(numerics::from_str("number"), None);
//! ```

/// Stable identifier for fixed-width numeric kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKindId {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

/// Metadata for a numeric kind.
#[derive(Debug, Clone, Copy)]
pub struct NumericKindInfo {
    pub id: NumericKindId,
    pub canonical: &'static str,
    pub bits: u8,
    pub is_float: bool,
    pub is_signed: bool,
}

/// Registry of numeric kinds.
pub const NUMERIC_KINDS: &[NumericKindInfo] = &[
    info(NumericKindId::I8, "i8", 8, false, true),
    info(NumericKindId::I16, "i16", 16, false, true),
    info(NumericKindId::I32, "i32", 32, false, true),
    info(NumericKindId::I64, "i64", 64, false, true),
    info(NumericKindId::U8, "u8", 8, false, false),
    info(NumericKindId::U16, "u16", 16, false, false),
    info(NumericKindId::U32, "u32", 32, false, false),
    info(NumericKindId::U64, "u64", 64, false, false),
    info(NumericKindId::F32, "f32", 32, true, true),
    info(NumericKindId::F64, "f64", 64, true, true),
];

/// Integer kind a bare integer literal (or the host `number` type) canonicalizes to.
pub const DEFAULT_INTEGER: NumericKindId = NumericKindId::I32;

/// Float kind a bare decimal literal canonicalizes to.
pub const DEFAULT_FLOAT: NumericKindId = NumericKindId::F64;

/// Resolve a spelling to a [`NumericKindId`].
pub fn from_str(name: &str) -> Option<NumericKindId> {
    NUMERIC_KINDS.iter().find(|k| k.canonical == name).map(|k| k.id)
}

/// Return the canonical spelling for a numeric kind.
pub fn as_str(id: NumericKindId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a numeric kind.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: NumericKindId) -> &'static NumericKindInfo {
    NUMERIC_KINDS
        .iter()
        .find(|k| k.id == id)
        .expect("numeric kind info missing")
}

/// Check whether `name` spells one of the fixed-width numeric kinds.
pub fn is_numeric(name: &str) -> bool {
    from_str(name).is_some()
}

/// Check whether `name` spells a floating-point kind.
pub fn is_float(name: &str) -> bool {
    from_str(name).is_some_and(|id| info_for(id).is_float)
}

const fn info(id: NumericKindId, canonical: &'static str, bits: u8, is_float: bool, is_signed: bool) -> NumericKindInfo {
    NumericKindInfo {
        id,
        canonical,
        bits,
        is_float,
        is_signed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_round_trips_through_its_spelling() {
        for kind in NUMERIC_KINDS {
            assert_eq!(from_str(kind.canonical), Some(kind.id));
            assert_eq!(as_str(kind.id), kind.canonical);
        }
    }

    #[test]
    fn float_kinds_are_flagged() {
        assert!(is_float("f32"));
        assert!(is_float("f64"));
        assert!(!is_float("i32"));
        assert!(!is_float("string"));
    }

    #[test]
    fn host_spellings_are_not_numeric_kinds() {
        assert!(!is_numeric("number"));
        assert!(!is_numeric("bigint"));
        assert!(!is_numeric("I32"));
    }
}
