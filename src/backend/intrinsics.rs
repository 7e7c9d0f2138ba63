//! Intrinsic call recognition
//!
//! Two call shapes are built-in primitives of the target rather than ordinary calls:
//!
//! - `Pointer(value)` (optionally `Pointer<T>(value)`): take the address of `value` as a `Pointer<T>`.
//! - `n.toString()` / `n.toString(radix)` on a numeric receiver: format through `Number::toString`.
//!
//! The emitter asks [`recognize`] before emitting any call; a `None` means "emit as an ordinary call".

use crate::backend::scope::ScopeChain;
use crate::backend::types::{TypeError, TypeResolver, TypeSubject};
use thiserror::Error;
use typeslang_core::lang::runtime;
use typeslang_syntax::FrontEnd;
use typeslang_syntax::ast::{Expr, ExprKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Radix<'a> {
    /// `toString()` without arguments.
    Default,
    /// A literal radix, already validated.
    Literal(u32),
    /// A radix computed at runtime; passed through unchecked.
    Dynamic(&'a Expr),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intrinsic<'a> {
    PointerConstruction { operand: &'a Expr },
    NumberToString { receiver: &'a Expr, radix: Radix<'a> },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntrinsicError {
    #[error("`Pointer` takes exactly one argument, found {found}")]
    PointerArity { found: usize },

    #[error("radix `{0}` is not supported (expected one of 2, 8, 10, 16)")]
    UnsupportedRadix(String),

    #[error(transparent)]
    Type(#[from] TypeError),
}

/// The operand of a well-formed pointer construction call.
pub fn pointer_operand(expr: &Expr) -> Option<&Expr> {
    match &expr.kind {
        ExprKind::Call { callee, args, .. } if is_pointer_callee(callee) && args.len() == 1 => Some(&args[0]),
        _ => None,
    }
}

fn is_pointer_callee(callee: &Expr) -> bool {
    matches!(&callee.kind, ExprKind::Ident(name) if name == runtime::POINTER_CONSTRUCTOR)
}

/// Match `call` against the intrinsic call shapes.
pub fn recognize<'a>(
    call: &'a Expr,
    types: &mut TypeResolver,
    scopes: &ScopeChain,
    front: &dyn FrontEnd,
) -> Result<Option<Intrinsic<'a>>, IntrinsicError> {
    let ExprKind::Call { callee, args, .. } = &call.kind else {
        return Ok(None);
    };

    if is_pointer_callee(callee) {
        return match args.as_slice() {
            [operand] => Ok(Some(Intrinsic::PointerConstruction { operand })),
            _ => Err(IntrinsicError::PointerArity { found: args.len() }),
        };
    }

    let ExprKind::Member { object, property } = &callee.kind else {
        return Ok(None);
    };
    if property != runtime::TO_STRING_METHOD || args.len() > 1 {
        return Ok(None);
    }
    let receiver_ty = types.resolve(TypeSubject::Expr(object), scopes, front)?;
    if !receiver_ty.is_numeric() {
        return Ok(None);
    }

    let radix = match args.first() {
        None => Radix::Default,
        Some(arg) => match &arg.unparenthesized().kind {
            ExprKind::Number(text) => match literal_value(text) {
                Some(radix) if runtime::is_supported_radix(radix) => Radix::Literal(radix),
                _ => return Err(IntrinsicError::UnsupportedRadix(text.clone())),
            },
            _ => Radix::Dynamic(arg),
        },
    };
    Ok(Some(Intrinsic::NumberToString {
        receiver: object.as_ref(),
        radix,
    }))
}

/// Value of an integer literal in any of its spellings: `16`, `1_6`, `0x10`, `0o20`, `0b10000`.
fn literal_value(text: &str) -> Option<u32> {
    let digits = text.replace('_', "");
    let lower = digits.to_ascii_lowercase();
    let (radix, body) = match lower.get(..2) {
        Some("0x") => (16, &lower[2..]),
        Some("0o") => (8, &lower[2..]),
        Some("0b") => (2, &lower[2..]),
        _ => (10, lower.as_str()),
    };
    u32::from_str_radix(body, radix).ok()
}
