//! Define error types for typed AST → C++ emission.
//!
//! Every failure aborts the compilation: a half-emitted translation unit (a struct used before its layout,
//! a body referring to an unresolved type) cannot be made valid. Errors therefore carry everything needed for
//! one precise diagnostic: kind, message, unit path, span and 1-based position.
//!
//! ## Notes
//! - Component errors ([`TypeError`], [`ScopeError`], [`IntrinsicError`]) carry no position. The emitter
//!   attaches the span of the node being emitted and maps them through [`ErrorKindOf`].

use crate::backend::intrinsics::IntrinsicError;
use crate::backend::scope::ScopeError;
use crate::backend::types::TypeError;
use miette::{Diagnostic, LabeledSpan};
use std::fmt;
use thiserror::Error;
use typeslang_syntax::ast::{Position, Span};

/// Error taxonomy of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmitErrorKind {
    /// A node kind has no emission rule in its category.
    UnsupportedConstruct,
    /// A type is undecidable, malformed, or dynamic.
    TypeResolutionFailure,
    /// A name is used without a visible declaration.
    UnknownIdentifier,
    /// A name is declared twice in one scope frame.
    DoubleDeclaration,
    /// A literal radix outside {2, 8, 10, 16}.
    UnsupportedRadix,
    /// An import specifier the front end cannot resolve.
    UnresolvedModule,
}

impl EmitErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EmitErrorKind::UnsupportedConstruct => "unsupported_construct",
            EmitErrorKind::TypeResolutionFailure => "type_resolution_failure",
            EmitErrorKind::UnknownIdentifier => "unknown_identifier",
            EmitErrorKind::DoubleDeclaration => "double_declaration",
            EmitErrorKind::UnsupportedRadix => "unsupported_radix",
            EmitErrorKind::UnresolvedModule => "unresolved_module",
        }
    }

    /// Diagnostic code, e.g. `typeslang::unsupported_radix`.
    pub fn code(self) -> String {
        format!("typeslang::{}", self.as_str())
    }
}

impl fmt::Display for EmitErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EmitErrorKind::UnsupportedConstruct => "unsupported construct",
            EmitErrorKind::TypeResolutionFailure => "type resolution failure",
            EmitErrorKind::UnknownIdentifier => "unknown identifier",
            EmitErrorKind::DoubleDeclaration => "double declaration",
            EmitErrorKind::UnsupportedRadix => "unsupported radix",
            EmitErrorKind::UnresolvedModule => "unresolved module",
        };
        f.write_str(text)
    }
}

/// Error during emission, positioned in a source unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("({}, {}): {}", .position.line, .position.column, .message)]
pub struct EmitError {
    pub kind: EmitErrorKind,
    pub message: String,
    /// Path of the unit the offending node belongs to.
    pub unit: String,
    pub position: Position,
    pub span: Span,
}

impl Diagnostic for EmitError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let len = self.span.end.saturating_sub(self.span.start);
        let label = LabeledSpan::new_with_span(Some(self.kind.to_string()), (self.span.start, len));
        Some(Box::new(std::iter::once(label)))
    }
}

/// Classify a component error.
pub trait ErrorKindOf {
    fn emit_kind(&self) -> EmitErrorKind;
}

impl ErrorKindOf for TypeError {
    fn emit_kind(&self) -> EmitErrorKind {
        match self {
            TypeError::Redeclared(_) => EmitErrorKind::DoubleDeclaration,
            _ => EmitErrorKind::TypeResolutionFailure,
        }
    }
}

impl ErrorKindOf for ScopeError {
    fn emit_kind(&self) -> EmitErrorKind {
        match self {
            ScopeError::DoubleDeclaration(_) => EmitErrorKind::DoubleDeclaration,
            ScopeError::UnknownIdentifier(_) => EmitErrorKind::UnknownIdentifier,
        }
    }
}

impl ErrorKindOf for IntrinsicError {
    fn emit_kind(&self) -> EmitErrorKind {
        match self {
            IntrinsicError::PointerArity { .. } => EmitErrorKind::UnsupportedConstruct,
            IntrinsicError::UnsupportedRadix(_) => EmitErrorKind::UnsupportedRadix,
            IntrinsicError::Type(err) => err.emit_kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EmitError {
        EmitError {
            kind: EmitErrorKind::UnsupportedRadix,
            message: "radix `7` is not supported".to_string(),
            unit: "main.ts".to_string(),
            position: Position { line: 3, column: 14 },
            span: Span::new(40, 41),
        }
    }

    #[test]
    fn display_leads_with_position() {
        assert_eq!(sample().to_string(), "(3, 14): radix `7` is not supported");
    }

    #[test]
    fn diagnostic_code_and_label() {
        let err = sample();
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("typeslang::unsupported_radix"));
        let labels: Vec<_> = err.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 40);
        assert_eq!(labels[0].len(), 1);
    }

    #[test]
    fn component_errors_map_to_kinds() {
        assert_eq!(
            TypeError::Disallowed("any".into()).emit_kind(),
            EmitErrorKind::TypeResolutionFailure
        );
        assert_eq!(
            ScopeError::DoubleDeclaration("x".into()).emit_kind(),
            EmitErrorKind::DoubleDeclaration
        );
        assert_eq!(
            IntrinsicError::Type(TypeError::Redeclared("T".into())).emit_kind(),
            EmitErrorKind::DoubleDeclaration
        );
        assert_eq!(
            IntrinsicError::PointerArity { found: 0 }.emit_kind(),
            EmitErrorKind::UnsupportedConstruct
        );
    }
}
