//! Native runtime vocabulary.
//!
//! Names the emitted C++ relies on from the TypeSlang runtime headers (`TypeSlang/runtime.cpp`). The
//! runtime lives in namespace `JS` and provides `Array<T>`, `String`, `Number`, `Console` and `Pointer<T>`.

/// Default include path of the runtime entry header.
pub const DEFAULT_INCLUDE: &str = "TypeSlang/runtime.cpp";

/// Default namespace the runtime types live in.
pub const DEFAULT_NAMESPACE: &str = "JS";

/// Numeric formatting function (`Number::toString(value, radix)`).
pub const NUMBER_TO_STRING: &str = "Number::toString";

/// Positional formatting function used for template literals.
pub const STRING_FORMAT: &str = "String::format";

/// Length-carrying string constructor (`String(data, length)`).
pub const STRING_CONSTRUCTOR: &str = "String";

/// Positional placeholder understood by [`STRING_FORMAT`].
pub const FORMAT_PLACEHOLDER: &str = "{}";

/// Radixes accepted by [`NUMBER_TO_STRING`] when given as a literal.
pub const SUPPORTED_RADIXES: &[u32] = &[2, 8, 10, 16];

/// Radix used when `toString()` is called without arguments.
pub const DEFAULT_RADIX: u32 = 10;

/// Surface identifier of the pointer-construction pseudo call (`Pointer(value)`).
pub const POINTER_CONSTRUCTOR: &str = "Pointer";

/// Surface method recognized as numeric-to-string conversion.
pub const TO_STRING_METHOD: &str = "toString";

/// Pointer pseudo-property yielding the raw address.
pub const ADDRESS_OF: &str = "addressOf";

/// Pointer pseudo-property yielding the pointee.
pub const DEREFERENCE: &str = "dereference";

/// Globals the runtime defines, as (name, type) pairs.
pub const GLOBALS: &[(&str, &str)] = &[("console", "Console")];

/// Check whether a radix literal is supported by the runtime formatter.
pub fn is_supported_radix(radix: u32) -> bool {
    SUPPORTED_RADIXES.contains(&radix)
}

/// Check whether properties of a canonical receiver type are accessor methods in the runtime.
///
/// The runtime classes expose properties such as `length` as zero-argument methods, so a property read must
/// be followed by `()`. User and synthesized structs have plain fields.
pub fn has_accessor_properties(canonical: &str) -> bool {
    canonical == super::types::STRING || canonical.starts_with("Array<")
}
