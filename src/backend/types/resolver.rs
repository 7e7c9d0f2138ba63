//! Type resolution: subjects to canonical [`TypeName`]s.
//!
//! Resolution picks a source for the type in priority order:
//!
//! 1. `expr as const` resolves its inner expression (the assertion is erased).
//! 2. An identifier bound in the scope chain resolves to its bound type.
//! 3. An explicit annotation (`as T`, `x: T`) is canonicalized.
//! 4. A pointer construction `Pointer(v)` resolves `v` and wraps it, decaying arrays to their element type.
//! 5. Anything else asks the front end for the inferred type and canonicalizes it.
//!
//! Results of steps 2 and 4 are already canonical; only raw text from 3 and 5 is canonicalized.
//!
//! ## Notes
//! - Canonicalization interns anonymous shapes into the [`StructRegistry`] as a side effect. Interning
//!   alone never marks a struct used.
//! - Nested arrays (`u8[][]`, `Array<u8[]>`) fail with [`TypeError::NestedArray`].

use super::canonical::{self, contains_top_level, is_identifier, parse_generic};
use super::{StructRegistry, TypeError, TypeName};
use crate::backend::intrinsics;
use crate::backend::scope::ScopeChain;
use std::collections::HashMap;
use typeslang_core::lang::types::{self as vocab, numerics};
use typeslang_syntax::FrontEnd;
use typeslang_syntax::ast::{Expr, ExprKind, InterfaceDecl, NodeId, TypeAliasDecl, TypeAnnotation};

/// What a type is being resolved for.
#[derive(Debug, Clone, Copy)]
pub enum TypeSubject<'a> {
    /// A name bound in the scope chain.
    Name(&'a str),
    /// An expression node.
    Expr(&'a Expr),
    /// A parameter or variable declaration, with its annotation if written.
    Declaration {
        node: NodeId,
        annotation: Option<&'a TypeAnnotation>,
    },
    /// Raw annotation text.
    Annotation(&'a str),
}

#[derive(Debug, Default)]
pub struct TypeResolver {
    structs: StructRegistry,
    aliases: HashMap<String, TypeName>,
}

impl TypeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn structs(&self) -> &StructRegistry {
        &self.structs
    }

    /// Mark the structs `ty` references (transitively) as used.
    pub fn mark_used(&mut self, ty: &TypeName) {
        self.structs.mark_used(ty);
    }

    /// Whether `name` is a declared struct or type alias.
    pub fn is_type_name(&self, name: &str) -> bool {
        self.structs.contains(name) || self.aliases.contains_key(name)
    }

    pub fn resolve(
        &mut self,
        subject: TypeSubject<'_>,
        scopes: &ScopeChain,
        front: &dyn FrontEnd,
    ) -> Result<TypeName, TypeError> {
        match subject {
            TypeSubject::Name(name) => scopes
                .lookup_type(name)
                .cloned()
                .ok_or_else(|| TypeError::Missing(name.to_string())),
            TypeSubject::Expr(expr) => self.resolve_expr(expr, scopes, front),
            TypeSubject::Declaration {
                annotation: Some(annotation),
                ..
            } => self.canonicalize(&annotation.text),
            TypeSubject::Declaration { node, annotation: None } => self.inferred(node, "declaration", front),
            TypeSubject::Annotation(text) => self.canonicalize(text),
        }
    }

    fn resolve_expr(&mut self, expr: &Expr, scopes: &ScopeChain, front: &dyn FrontEnd) -> Result<TypeName, TypeError> {
        match &expr.kind {
            ExprKind::As { expr: inner, ty } if ty.is_const() => self.resolve_expr(inner, scopes, front),
            ExprKind::Paren(inner) => self.resolve_expr(inner, scopes, front),
            ExprKind::Ident(name) => match scopes.lookup_type(name) {
                Some(ty) => Ok(ty.clone()),
                None => self.inferred(expr.id, name, front),
            },
            ExprKind::As { ty, .. } => self.canonicalize(&ty.text),
            _ => match intrinsics::pointer_operand(expr) {
                Some(operand) => {
                    let operand_ty = self.resolve_expr(operand, scopes, front)?;
                    Ok(TypeName::pointer_to(&operand_ty))
                }
                None => self.inferred(expr.id, expr.kind.kind_name(), front),
            },
        }
    }

    fn inferred(&mut self, node: NodeId, what: &str, front: &dyn FrontEnd) -> Result<TypeName, TypeError> {
        let text = front.type_of(node).ok_or_else(|| TypeError::Missing(what.to_string()))?;
        self.canonicalize(text)
    }

    /// Canonicalize raw type text.
    pub fn canonicalize(&mut self, raw: &str) -> Result<TypeName, TypeError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(TypeError::Undecidable(raw.to_string()));
        }
        if canonical::is_quoted(text) {
            return Ok(TypeName::string());
        }
        if text.starts_with('{') && text.ends_with('}') {
            return self.intern_shape(text);
        }
        if canonical::is_numeric_literal(text) {
            let kind = if text.contains('.') {
                numerics::DEFAULT_FLOAT
            } else {
                numerics::DEFAULT_INTEGER
            };
            return Ok(TypeName::numeric(kind));
        }

        let rewritten = canonical::map_words(text, host_word);
        let text = rewritten.as_str();

        if vocab::BOOLEAN_SPELLINGS.contains(&text) {
            return Ok(TypeName::bool());
        }
        if vocab::DISALLOWED_SPELLINGS.contains(&text) {
            return Err(TypeError::Disallowed(text.to_string()));
        }
        if vocab::HOST_ONLY_SPELLINGS.contains(&text)
            || contains_top_level(text, '|')
            || contains_top_level(text, '&')
            || text.contains("=>")
            || text.starts_with('(')
        {
            return Err(TypeError::Undecidable(raw.to_string()));
        }

        if let Some(inner) = text.strip_suffix("[]") {
            let element = self.canonicalize(inner)?;
            if element.is_array() {
                return Err(TypeError::NestedArray(raw.to_string()));
            }
            return Ok(TypeName::array_of(&element));
        }

        if let Some((head, args)) = parse_generic(text) {
            return self.canonicalize_generic(raw, head, &args);
        }

        if let Some(target) = self.aliases.get(text) {
            return Ok(target.clone());
        }
        if is_identifier(text) {
            return Ok(TypeName::new(text));
        }
        Err(TypeError::Undecidable(raw.to_string()))
    }

    fn canonicalize_generic(&mut self, raw: &str, head: &str, args: &[&str]) -> Result<TypeName, TypeError> {
        match (head, args) {
            (vocab::ARRAY, [arg]) => {
                let element = self.canonicalize(arg)?;
                if element.is_array() {
                    return Err(TypeError::NestedArray(raw.to_string()));
                }
                Ok(TypeName::array_of(&element))
            }
            (vocab::POINTER, [arg]) => {
                let target = self.canonicalize(arg)?;
                Ok(TypeName::pointer_to(&target))
            }
            (vocab::ARRAY | vocab::POINTER, _) => Err(TypeError::Undecidable(raw.to_string())),
            _ => {
                let args = args
                    .iter()
                    .map(|arg| self.canonicalize(arg).map(|ty| ty.to_string()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TypeName::new(format!("{head}<{}>", args.join(", "))))
            }
        }
    }

    fn intern_shape(&mut self, text: &str) -> Result<TypeName, TypeError> {
        let fields = self.canonical_fields(canonical::parse_shape(text)?)?;
        Ok(self.structs.intern(fields))
    }

    fn canonical_fields(&mut self, fields: Vec<(String, String)>) -> Result<Vec<(String, TypeName)>, TypeError> {
        fields
            .into_iter()
            .map(|(name, ty)| self.canonicalize(&ty).map(|ty| (name, ty)))
            .collect()
    }

    /// Register `interface Name { ... }` as a declared struct.
    pub fn declare_interface(&mut self, decl: &InterfaceDecl) -> Result<TypeName, TypeError> {
        if self.aliases.contains_key(&decl.name) {
            return Err(TypeError::Redeclared(decl.name.clone()));
        }
        let mut fields = Vec::with_capacity(decl.members.len());
        for member in &decl.members {
            let reason = if member.optional {
                Some("optional member")
            } else if member.method {
                Some("method member")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(TypeError::MalformedShape {
                    shape: decl.name.clone(),
                    reason: format!("{reason} `{}`", member.name),
                });
            }
            fields.push((member.name.clone(), self.canonicalize(&member.ty.text)?));
        }
        if fields.is_empty() {
            return Err(TypeError::MalformedShape {
                shape: decl.name.clone(),
                reason: "empty interface".to_string(),
            });
        }
        self.structs.declare(&decl.name, fields)
    }

    /// Register `type Name = ...`: a declared struct for object types, an alias otherwise.
    pub fn declare_alias(&mut self, decl: &TypeAliasDecl) -> Result<TypeName, TypeError> {
        if self.is_type_name(&decl.name) {
            return Err(TypeError::Redeclared(decl.name.clone()));
        }
        let text = decl.ty.text.trim();
        if text.starts_with('{') && text.ends_with('}') {
            let fields = self.canonical_fields(canonical::parse_shape(text)?)?;
            return self.structs.declare(&decl.name, fields);
        }
        let target = self.canonicalize(text)?;
        self.aliases.insert(decl.name.clone(), target.clone());
        Ok(target)
    }
}

/// Host-language words with a fixed native spelling.
fn host_word(word: &str) -> Option<&'static str> {
    match word {
        vocab::HOST_NUMBER => Some(numerics::as_str(numerics::DEFAULT_INTEGER)),
        vocab::HOST_BIGINT => Some(numerics::as_str(numerics::NumericKindId::I64)),
        vocab::POINTER_ALIAS => Some(vocab::POINTER),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeslang_syntax::TypedProgram;
    use typeslang_syntax::builder::ProgramBuilder;

    fn canon(text: &str) -> Result<String, TypeError> {
        TypeResolver::new().canonicalize(text).map(|t| t.to_string())
    }

    #[test]
    fn canonicalizes_host_spellings() {
        let cases = [
            ("\"foo\"", "string"),
            ("12", "i32"),
            ("12.34", "f64"),
            ("-3", "i32"),
            ("Array<u8>", "Array<u8>"),
            ("u8[]", "Array<u8>"),
            ("number[]", "Array<i32>"),
            ("number", "i32"),
            ("bigint", "i64"),
            ("ptr<u32>", "Pointer<u32>"),
            ("ptr<ptr<u8>>", "Pointer<Pointer<u8>>"),
            ("Pointer<u32>", "Pointer<u32>"),
            ("Pointer<u32[]>", "Pointer<u32>"),
            ("boolean", "bool"),
            ("true", "bool"),
            ("false", "bool"),
            ("string", "string"),
            ("void", "void"),
            ("Console", "Console"),
        ];
        for (input, expected) in cases {
            assert_eq!(canon(input).as_deref(), Ok(expected), "canonicalizing {input}");
        }
    }

    #[test]
    fn dynamic_spellings_are_rejected() {
        assert_eq!(canon("any"), Err(TypeError::Disallowed("any".to_string())));
        assert_eq!(canon("const"), Err(TypeError::Disallowed("const".to_string())));
    }

    #[test]
    fn undecidable_spellings_are_rejected() {
        for input in ["u8 | string", "(a: u8) => void", "unknown", "", "A & B"] {
            assert!(matches!(canon(input), Err(TypeError::Undecidable(_))), "input {input:?}");
        }
    }

    #[test]
    fn nested_arrays_fail_predictably() {
        assert_eq!(canon("u8[][]"), Err(TypeError::NestedArray("u8[][]".to_string())));
        assert_eq!(canon("Array<u8[]>"), Err(TypeError::NestedArray("Array<u8[]>".to_string())));
    }

    #[test]
    fn identical_shapes_intern_to_one_struct() {
        let mut types = TypeResolver::new();
        let a = types.canonicalize("{ x: number; y: number; }").expect("shape");
        let b = types.canonicalize("{ x: number, y: number }").expect("shape");
        let c = types.canonicalize("{ readonly x: i32; y: i32 }").expect("shape");
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(types.structs().len(), 1);
        assert!(types.structs().iter().all(|s| !s.used));
    }

    #[test]
    fn nested_shapes_intern_inner_first() {
        let mut types = TypeResolver::new();
        let outer = types.canonicalize("{ inner: { v: u8; }; }").expect("shape");
        assert_eq!(outer.as_str(), "anon_struct_1");
        let inner = types.structs().get("anon_struct_0").expect("inner struct");
        assert_eq!(inner.fields, vec![("v".to_string(), TypeName::new("u8"))]);
    }

    #[test]
    fn array_of_shapes() {
        let mut types = TypeResolver::new();
        let ty = types.canonicalize("{ v: u8; }[]").expect("array of shape");
        assert_eq!(ty.as_str(), "Array<anon_struct_0>");
    }

    #[test]
    fn aliases_resolve_to_their_target() {
        let b = ProgramBuilder::new();
        let stmt = b.type_alias("Id", "u32");
        let typeslang_syntax::ast::StmtKind::TypeAlias(decl) = &stmt.kind else {
            panic!("expected alias");
        };
        let mut types = TypeResolver::new();
        types.declare_alias(decl).expect("alias");
        assert_eq!(types.canonicalize("Id[]").map(|t| t.to_string()).as_deref(), Ok("Array<u32>"));
        assert_eq!(types.declare_alias(decl), Err(TypeError::Redeclared("Id".to_string())));
    }

    #[test]
    fn resolution_prefers_scope_bindings() {
        let b = ProgramBuilder::new();
        let x = b.typed(b.ident("x"), "number");
        let program = TypedProgram::default();
        let mut types = TypeResolver::new();
        let mut scopes = ScopeChain::new();
        scopes
            .declare("x", TypeName::new("u8"), None, &mut types)
            .expect("declare x");
        let ty = types.resolve(TypeSubject::Expr(&x), &scopes, &program).expect("bound type");
        assert_eq!(ty.as_str(), "u8");
    }

    #[test]
    fn pointer_construction_decays_arrays() {
        let mut b = ProgramBuilder::new();
        let call = b.call(b.ident("Pointer"), vec![b.ident("data")]);
        let stmt = b.expr_stmt(call.clone());
        let unit = b.add_unit("main.ts", vec![stmt]);
        let program = b.finish(unit);

        let mut types = TypeResolver::new();
        let mut scopes = ScopeChain::new();
        scopes
            .declare("data", TypeName::new("Array<u8>"), None, &mut types)
            .expect("declare data");
        let ty = types.resolve(TypeSubject::Expr(&call), &scopes, &program).expect("pointer type");
        assert_eq!(ty.as_str(), "Pointer<u8>");
    }

    #[test]
    fn const_assertion_resolves_inner_expression() {
        let mut b = ProgramBuilder::new();
        let expr = b.as_(b.num("1.5"), "const");
        let stmt = b.expr_stmt(expr.clone());
        let unit = b.add_unit("main.ts", vec![stmt]);
        let program = b.finish(unit);
        let mut types = TypeResolver::new();
        let ty = types
            .resolve(TypeSubject::Expr(&expr), &ScopeChain::new(), &program)
            .expect("literal type");
        assert_eq!(ty.as_str(), "f64");
    }

    #[test]
    fn missing_front_end_type_is_an_error() {
        let b = ProgramBuilder::new();
        let expr = b.call(b.ident("f"), vec![]);
        let mut types = TypeResolver::new();
        let result = types.resolve(TypeSubject::Expr(&expr), &ScopeChain::new(), &TypedProgram::default());
        assert_eq!(result, Err(TypeError::Missing("CallExpression".to_string())));
    }
}
