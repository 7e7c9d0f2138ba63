//! Operator vocabulary.
//!
//! Every operator the surface language can express gets a stable ID, its surface spelling, and (when the
//! backend has a lowering rule) its target spelling. Operators without a target spelling are rejected by
//! the emitter as unsupported constructs.
//!
//! ## Examples
//! ```rust
//! use typeslang_core::lang::operators::{self, BinaryOpId};
//!
//! assert_eq!(operators::binary_from_str("==="), Some(BinaryOpId::StrictEq));
//! assert_eq!(BinaryOpId::StrictEq.target(), Some("=="));
//! assert_eq!(BinaryOpId::StarStar.target(), None);
//! ```

use serde::{Deserialize, Serialize};

/// Binary (infix) operators, including assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOpId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,

    // Comparison
    EqEq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    AndAnd,
    OrOr,
    QuestionQuestion,

    // Bitwise
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,

    // Assignment
    Assign,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,

    // Relational keywords
    In,
    InstanceOf,
}

/// Metadata for a binary operator.
#[derive(Debug, Clone, Copy)]
pub struct BinaryOpInfo {
    pub id: BinaryOpId,
    pub spelling: &'static str,
    pub target: Option<&'static str>,
    pub is_assignment: bool,
}

/// Registry of binary operators.
pub const BINARY_OPS: &[BinaryOpInfo] = &[
    binary(BinaryOpId::Plus, "+", Some("+")),
    binary(BinaryOpId::Minus, "-", Some("-")),
    binary(BinaryOpId::Star, "*", Some("*")),
    binary(BinaryOpId::Slash, "/", Some("/")),
    binary(BinaryOpId::Percent, "%", Some("%")),
    binary(BinaryOpId::StarStar, "**", None),
    binary(BinaryOpId::EqEq, "==", Some("==")),
    binary(BinaryOpId::NotEq, "!=", Some("!=")),
    binary(BinaryOpId::StrictEq, "===", Some("==")),
    binary(BinaryOpId::StrictNotEq, "!==", Some("!=")),
    binary(BinaryOpId::Lt, "<", Some("<")),
    binary(BinaryOpId::LtEq, "<=", Some("<=")),
    binary(BinaryOpId::Gt, ">", Some(">")),
    binary(BinaryOpId::GtEq, ">=", Some(">=")),
    binary(BinaryOpId::AndAnd, "&&", Some("&&")),
    binary(BinaryOpId::OrOr, "||", Some("||")),
    binary(BinaryOpId::QuestionQuestion, "??", None),
    binary(BinaryOpId::Amp, "&", Some("&")),
    binary(BinaryOpId::Pipe, "|", Some("|")),
    binary(BinaryOpId::Caret, "^", Some("^")),
    binary(BinaryOpId::Shl, "<<", Some("<<")),
    binary(BinaryOpId::Shr, ">>", Some(">>")),
    assignment(BinaryOpId::Assign, "=", Some("=")),
    assignment(BinaryOpId::PlusEq, "+=", Some("+=")),
    assignment(BinaryOpId::MinusEq, "-=", Some("-=")),
    assignment(BinaryOpId::StarEq, "*=", Some("*=")),
    assignment(BinaryOpId::SlashEq, "/=", Some("/=")),
    assignment(BinaryOpId::PercentEq, "%=", Some("%=")),
    binary(BinaryOpId::In, "in", None),
    binary(BinaryOpId::InstanceOf, "instanceof", None),
];

impl BinaryOpId {
    /// Surface spelling of the operator.
    pub fn as_str(self) -> &'static str {
        binary_info(self).spelling
    }

    /// Target spelling, or `None` when the backend has no lowering rule.
    pub fn target(self) -> Option<&'static str> {
        binary_info(self).target
    }

    /// Whether the operator writes to its left operand.
    pub fn is_assignment(self) -> bool {
        binary_info(self).is_assignment
    }
}

/// Resolve a surface spelling to a [`BinaryOpId`].
pub fn binary_from_str(spelling: &str) -> Option<BinaryOpId> {
    BINARY_OPS.iter().find(|op| op.spelling == spelling).map(|op| op.id)
}

/// Return the metadata entry for a binary operator.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn binary_info(id: BinaryOpId) -> &'static BinaryOpInfo {
    BINARY_OPS
        .iter()
        .find(|op| op.id == id)
        .expect("binary operator info missing")
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrefixOpId {
    Not,
    Minus,
    Plus,
    Tilde,
    Increment,
    Decrement,
    TypeOf,
    Void,
    Delete,
}

impl PrefixOpId {
    /// Surface spelling of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOpId::Not => "!",
            PrefixOpId::Minus => "-",
            PrefixOpId::Plus => "+",
            PrefixOpId::Tilde => "~",
            PrefixOpId::Increment => "++",
            PrefixOpId::Decrement => "--",
            PrefixOpId::TypeOf => "typeof",
            PrefixOpId::Void => "void",
            PrefixOpId::Delete => "delete",
        }
    }

    /// Target spelling, or `None` when the backend has no lowering rule.
    pub fn target(self) -> Option<&'static str> {
        match self {
            PrefixOpId::TypeOf | PrefixOpId::Void | PrefixOpId::Delete => None,
            other => Some(other.as_str()),
        }
    }
}

/// Postfix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostfixOpId {
    Increment,
    Decrement,
}

impl PostfixOpId {
    /// Surface spelling of the operator (identical in the target).
    pub fn as_str(self) -> &'static str {
        match self {
            PostfixOpId::Increment => "++",
            PostfixOpId::Decrement => "--",
        }
    }
}

const fn binary(id: BinaryOpId, spelling: &'static str, target: Option<&'static str>) -> BinaryOpInfo {
    BinaryOpInfo {
        id,
        spelling,
        target,
        is_assignment: false,
    }
}

const fn assignment(id: BinaryOpId, spelling: &'static str, target: Option<&'static str>) -> BinaryOpInfo {
    BinaryOpInfo {
        id,
        spelling,
        target,
        is_assignment: true,
    }
}
