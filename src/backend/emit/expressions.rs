//! Emit expressions.
//!
//! Expressions are written inline into the open line. The walk carries an [`ExprCtx`] by value: whether the
//! expression is the callee of the enclosing call, and which type its value flows into.
//!
//! ## Notes
//! - Properties of runtime classes (`Array<T>`, `string`) are accessor methods in C++, so a property read
//!   gains `()` unless it is itself being called. Struct fields never do.
//! - Intrinsic calls (`Pointer(v)`, numeric `toString`) are recognized before ordinary call emission.
//! - String literals carry their UTF-8 byte length, since the runtime `String` does not scan for `NUL`.

use super::{EmitError, EmitErrorKind, Emitter, ExprCtx};
use crate::backend::intrinsics::{self, Intrinsic, Radix};
use crate::backend::types::{TypeName, TypeSubject};
use typeslang_core::lang::operators::BinaryOpId;
use typeslang_core::lang::runtime;
use typeslang_core::lang::types::numerics::{self, NumericKindId};
use typeslang_syntax::ast::{Expr, ExprKind, ObjectMember, Span, TypeAnnotation};

impl<'a> Emitter<'a> {
    pub(super) fn emit_expr(&mut self, expr: &'a Expr, cx: ExprCtx<'_>) -> Result<(), EmitError> {
        match &expr.kind {
            ExprKind::Ident(name) => {
                let name = self.qualified(name, expr.span)?;
                self.ctx.out.write(&name);
                Ok(())
            }
            ExprKind::Number(text) => {
                self.ctx.out.write(&numeric_literal(text));
                Ok(())
            }
            ExprKind::Bool(value) => {
                self.ctx.out.write(if *value { "true" } else { "false" });
                Ok(())
            }
            ExprKind::String(value) => {
                self.ctx.out.write(&string_literal(value));
                Ok(())
            }
            ExprKind::Template { quasis, exprs } => self.emit_template(quasis, exprs),
            ExprKind::Array(elements) => self.emit_array(expr, elements, cx),
            ExprKind::Object(members) => self.emit_object(members),
            ExprKind::Paren(inner) => {
                self.ctx.out.write("(");
                self.emit_expr(
                    inner,
                    ExprCtx {
                        callee: false,
                        expected: cx.expected,
                    },
                )?;
                self.ctx.out.write(")");
                Ok(())
            }
            ExprKind::Index { object, index } => {
                self.emit_expr(object, ExprCtx::value())?;
                self.ctx.out.write("[");
                self.emit_expr(index, ExprCtx::value())?;
                self.ctx.out.write("]");
                Ok(())
            }
            ExprKind::Member { object, property } => self.emit_member(object, property, cx),
            ExprKind::Call {
                callee,
                type_args,
                args,
            } => self.emit_call(expr, callee, type_args, args),
            ExprKind::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                let branch = ExprCtx {
                    callee: false,
                    expected: cx.expected,
                };
                self.emit_expr(condition, ExprCtx::value())?;
                self.ctx.out.write(" ? ");
                self.emit_expr(then_expr, branch)?;
                self.ctx.out.write(" : ");
                self.emit_expr(else_expr, branch)
            }
            ExprKind::As { expr: inner, ty } => self.emit_as(expr, inner, ty, cx),
            ExprKind::Prefix { op, operand } => {
                let Some(target) = op.target() else {
                    return Err(self.unsupported(format_args!("operator `{}`", op.as_str()), expr.span));
                };
                self.ctx.out.write(target);
                // `- -x` must not collapse into `--x`.
                let wrap = matches!(operand.kind, ExprKind::Prefix { .. });
                self.emit_wrapped(operand, wrap)
            }
            ExprKind::Postfix { op, operand } => {
                self.emit_expr(operand, ExprCtx::value())?;
                self.ctx.out.write(op.as_str());
                Ok(())
            }
            ExprKind::Binary { op, left, right } => self.emit_binary(expr, *op, left, right),
            ExprKind::Null | ExprKind::This | ExprKind::New { .. } | ExprKind::Arrow { .. } => {
                Err(self.unsupported(format_args!("`{}`", expr.kind.kind_name()), expr.span))
            }
        }
    }

    fn emit_wrapped(&mut self, expr: &'a Expr, wrap: bool) -> Result<(), EmitError> {
        if wrap {
            self.ctx.out.write("(");
        }
        self.emit_expr(expr, ExprCtx::value())?;
        if wrap {
            self.ctx.out.write(")");
        }
        Ok(())
    }

    fn emit_list(&mut self, exprs: &'a [Expr], expected: Option<&TypeName>) -> Result<(), EmitError> {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.ctx.out.write(", ");
            }
            let cx = ExprCtx {
                callee: false,
                expected,
            };
            self.emit_expr(expr, cx)?;
        }
        Ok(())
    }

    // ---- literals ----------------------------------------------------------------------------------------

    /// `String::format("lit{}lit", e1, ...)`
    fn emit_template(&mut self, quasis: &'a [String], exprs: &'a [Expr]) -> Result<(), EmitError> {
        let mut format = String::new();
        for (i, quasi) in quasis.iter().enumerate() {
            if i > 0 {
                format.push_str(runtime::FORMAT_PLACEHOLDER);
            }
            format.push_str(&escape(quasi, true));
        }
        // Interpolations without a trailing literal still need their placeholder.
        for _ in quasis.len().max(1)..=exprs.len() {
            format.push_str(runtime::FORMAT_PLACEHOLDER);
        }
        self.ctx.out.write(&format!("{}(\"{format}\"", runtime::STRING_FORMAT));
        for expr in exprs {
            self.ctx.out.write(", ");
            self.emit_expr(expr, ExprCtx::value())?;
        }
        self.ctx.out.write(")");
        Ok(())
    }

    /// `Array<T>({ e1, e2 }, n)`
    fn emit_array(&mut self, expr: &'a Expr, elements: &'a [Expr], cx: ExprCtx<'_>) -> Result<(), EmitError> {
        let ty = match cx.expected {
            Some(expected) if expected.is_array() => expected.clone(),
            _ => self.resolve(TypeSubject::Expr(expr), expr.span)?,
        };
        let Some(element) = ty.array_element() else {
            return Err(self.error(
                EmitErrorKind::TypeResolutionFailure,
                format!("array literal resolved to non-array type `{ty}`"),
                expr.span,
            ));
        };
        self.ctx.types.mark_used(&ty);

        self.ctx.out.write(&ty.render());
        if elements.is_empty() {
            self.ctx.out.write("({}, 0)");
            return Ok(());
        }
        self.ctx.out.write("({ ");
        self.emit_list(elements, Some(&element))?;
        self.ctx.out.write(&format!(" }}, {})", elements.len()));
        Ok(())
    }

    /// Designated initializer: `{ .a = x, .b = y }`.
    fn emit_object(&mut self, members: &'a [ObjectMember]) -> Result<(), EmitError> {
        if members.is_empty() {
            self.ctx.out.write("{}");
            return Ok(());
        }
        self.ctx.out.write("{ ");
        for (i, member) in members.iter().enumerate() {
            if i > 0 {
                self.ctx.out.write(", ");
            }
            match member {
                ObjectMember::Property { name, value } => {
                    self.ctx.out.write(&format!(".{name} = "));
                    self.emit_expr(value, ExprCtx::value())?;
                }
                ObjectMember::Shorthand { name } => {
                    let value = self.qualified(name, value_span(member))?;
                    self.ctx.out.write(&format!(".{name} = {value}"));
                }
                ObjectMember::Spread(spread) => {
                    return Err(self.unsupported("object spread", spread.span));
                }
                ObjectMember::Method { name } => {
                    return Err(self.unsupported(
                        format_args!("method `{name}` in an object literal"),
                        value_span(member),
                    ));
                }
            }
        }
        self.ctx.out.write(" }");
        Ok(())
    }

    // ---- access and calls --------------------------------------------------------------------------------

    fn emit_member(&mut self, object: &'a Expr, property: &str, cx: ExprCtx<'_>) -> Result<(), EmitError> {
        let receiver = self.resolve(TypeSubject::Expr(object), object.span)?;

        if receiver.is_pointer() {
            match property {
                runtime::ADDRESS_OF => {
                    self.ctx.out.write("(void*)");
                    self.emit_expr(object, ExprCtx::value())?;
                }
                runtime::DEREFERENCE => {
                    self.ctx.out.write("(*");
                    self.emit_expr(object, ExprCtx::value())?;
                    self.ctx.out.write(")");
                }
                _ => {
                    self.emit_expr(object, ExprCtx::value())?;
                    self.ctx.out.write("->");
                    self.ctx.out.write(property);
                }
            }
            return Ok(());
        }

        self.emit_expr(object, ExprCtx::value())?;
        self.ctx.out.write(".");
        self.ctx.out.write(property);
        if !cx.callee && runtime::has_accessor_properties(receiver.as_str()) {
            self.ctx.out.write("()");
        }
        Ok(())
    }

    fn emit_call(
        &mut self,
        call: &'a Expr,
        callee: &'a Expr,
        type_args: &'a [TypeAnnotation],
        args: &'a [Expr],
    ) -> Result<(), EmitError> {
        let front = self.front;
        let intrinsic = intrinsics::recognize(call, &mut self.ctx.types, &self.ctx.scopes, front)
            .map_err(|err| self.fail(call.span, err))?;

        match intrinsic {
            Some(Intrinsic::PointerConstruction { operand }) => {
                let ty = self.resolve(TypeSubject::Expr(call), call.span)?;
                self.ctx.types.mark_used(&ty);
                self.ctx.out.write(&format!("({})&", ty.render()));
                self.emit_expr(operand, ExprCtx::value())
            }
            Some(Intrinsic::NumberToString { receiver, radix }) => {
                self.ctx.out.write(runtime::NUMBER_TO_STRING);
                self.ctx.out.write("(");
                self.emit_expr(receiver, ExprCtx::value())?;
                match radix {
                    Radix::Default => {}
                    Radix::Literal(radix) => self.ctx.out.write(&format!(", {radix}")),
                    Radix::Dynamic(radix) => {
                        self.ctx.out.write(", ");
                        self.emit_expr(radix, ExprCtx::value())?;
                    }
                }
                self.ctx.out.write(")");
                Ok(())
            }
            None => {
                self.emit_expr(callee, ExprCtx::callee())?;
                if !type_args.is_empty() {
                    let rendered = type_args
                        .iter()
                        .map(|arg| {
                            let ty = self.resolve(TypeSubject::Annotation(&arg.text), call.span)?;
                            self.ctx.types.mark_used(&ty);
                            Ok(ty.render())
                        })
                        .collect::<Result<Vec<_>, EmitError>>()?;
                    self.ctx.out.write(&format!("<{}>", rendered.join(", ")));
                }
                self.ctx.out.write("(");
                self.emit_list(args, None)?;
                self.ctx.out.write(")");
                Ok(())
            }
        }
    }

    // ---- operators ---------------------------------------------------------------------------------------

    fn emit_as(&mut self, expr: &'a Expr, inner: &'a Expr, ty: &TypeAnnotation, cx: ExprCtx<'_>) -> Result<(), EmitError> {
        if ty.is_const() {
            return self.emit_expr(inner, cx);
        }
        let target = self.resolve(TypeSubject::Annotation(&ty.text), expr.span)?;
        self.ctx.types.mark_used(&target);

        if let ExprKind::Number(text) = &inner.unparenthesized().kind {
            let single = target.as_str() == numerics::as_str(NumericKindId::F32);
            if target.is_float() {
                if let Some(literal) = float_literal(text, single) {
                    self.ctx.out.write(&literal);
                    return Ok(());
                }
            }
        }

        self.ctx.out.write(&format!("({})", target.render()));
        let wrap = matches!(
            inner.kind,
            ExprKind::Binary { .. } | ExprKind::Conditional { .. } | ExprKind::As { .. }
        );
        self.emit_wrapped(inner, wrap)
    }

    fn emit_binary(&mut self, expr: &'a Expr, op: BinaryOpId, left: &'a Expr, right: &'a Expr) -> Result<(), EmitError> {
        let Some(target) = op.target() else {
            return Err(self.error(
                EmitErrorKind::UnsupportedConstruct,
                format!("operator `{}` has no lowering", op.as_str()),
                expr.span,
            ));
        };

        self.emit_expr(left, ExprCtx::value())?;
        self.ctx.out.write(&format!(" {target} "));

        let assigned = match (&left.kind, op) {
            (ExprKind::Ident(name), BinaryOpId::Assign) => Some(name),
            _ => None,
        };
        let expected = assigned.and_then(|name| self.ctx.scopes.lookup_type(name).cloned());
        let cx = match &expected {
            Some(ty) => ExprCtx::expecting(ty),
            None => ExprCtx::value(),
        };
        self.emit_expr(right, cx)?;

        if let Some(name) = assigned {
            self.mark_initialized(name, left.span)?;
        }
        Ok(())
    }
}

fn value_span(member: &ObjectMember) -> Span {
    match member {
        ObjectMember::Property { value, .. } => value.span,
        ObjectMember::Spread(expr) => expr.span,
        ObjectMember::Shorthand { .. } | ObjectMember::Method { .. } => Span::default(),
    }
}

/// Numeric literal in C++ spelling (`1_000` becomes `1'000`).
fn numeric_literal(text: &str) -> String {
    text.replace('_', "'")
}

/// A decimal literal written as a float (`12` becomes `12.0`, or `12.0f` for single precision).
///
/// Returns `None` for literals with a radix prefix, which keep an explicit cast.
fn float_literal(text: &str, single: bool) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    if lower.starts_with("0x") || lower.starts_with("0o") || lower.starts_with("0b") {
        return None;
    }
    let mut literal = numeric_literal(text);
    if !literal.contains('.') && !lower.contains('e') {
        literal.push_str(".0");
    }
    if single {
        literal.push('f');
    }
    Some(literal)
}

/// `String("text", byte_length)` with C escapes.
pub fn string_literal(value: &str) -> String {
    format!("{}(\"{}\", {})", runtime::STRING_CONSTRUCTOR, escape(value, false), value.len())
}

/// Escape text for a C string literal; with `braces`, also double `{`/`}` for `String::format`.
fn escape(text: &str, braces: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '{' if braces => out.push_str("{{"),
            '}' if braces => out.push_str("}}"),
            // Octal escapes are fixed-width, so a following digit is never absorbed.
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03o}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
