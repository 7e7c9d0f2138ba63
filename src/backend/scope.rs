//! Scope chain: lexical bindings during emission
//!
//! Frames live in an arena and point at their parent by index. Frames are pushed and popped in strict stack
//! order, so popping truncates the arena and the chain never holds more frames than the current nesting
//! depth. The root frame lives for the whole compilation and holds top-level functions, globals and
//! imported names.
//!
//! ## Notes
//! - Shadowing across frames is allowed; redeclaring a name in the same frame is not.
//! - Bindings imported from another unit carry that unit's module tag and are emitted with a mangled
//!   prefix (see [`mangle_module_name`]).

use crate::backend::types::{TypeName, TypeResolver};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("`{0}` is already declared in this scope")]
    DoubleDeclaration(String),

    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub ty: TypeName,
    pub initialized: bool,
    /// Module tag of the unit that declared the binding (`None` for locals and the entry unit).
    pub origin: Option<String>,
}

#[derive(Debug, Default)]
struct Frame {
    parent: Option<usize>,
    bindings: HashMap<String, Binding>,
}

#[derive(Debug)]
pub struct ScopeChain {
    frames: Vec<Frame>,
    current: usize,
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeChain {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
            current: 0,
        }
    }

    /// Number of live frames, root included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_root(&self) -> bool {
        self.current == 0
    }

    /// Enter a nested frame.
    pub fn push(&mut self) {
        self.frames.push(Frame {
            parent: Some(self.current),
            bindings: HashMap::new(),
        });
        self.current = self.frames.len() - 1;
        tracing::trace!(depth = self.frames.len(), "scope pushed");
    }

    /// Leave the current frame. The root frame is never popped.
    pub fn pop(&mut self) {
        let Some(parent) = self.frames[self.current].parent else {
            return;
        };
        self.frames.truncate(self.current);
        self.current = parent;
        tracing::trace!(depth = self.frames.len(), "scope popped");
    }

    /// Declare `name` in the current frame, marking any struct its type references as used.
    pub fn declare(
        &mut self,
        name: &str,
        ty: TypeName,
        origin: Option<&str>,
        types: &mut TypeResolver,
    ) -> Result<(), ScopeError> {
        let frame = &mut self.frames[self.current];
        if frame.bindings.contains_key(name) {
            return Err(ScopeError::DoubleDeclaration(name.to_string()));
        }
        types.mark_used(&ty);
        frame.bindings.insert(
            name.to_string(),
            Binding {
                ty,
                initialized: false,
                origin: origin.map(str::to_string),
            },
        );
        Ok(())
    }

    /// Flag the nearest binding of `name` as initialized.
    pub fn mark_initialized(&mut self, name: &str) -> Result<(), ScopeError> {
        let idx = self
            .frame_of(name)
            .ok_or_else(|| ScopeError::UnknownIdentifier(name.to_string()))?;
        if let Some(binding) = self.frames[idx].bindings.get_mut(name) {
            binding.initialized = true;
        }
        Ok(())
    }

    /// Nearest binding of `name`, searching the current frame, then its ancestors.
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.frame_of(name).and_then(|idx| self.frames[idx].bindings.get(name))
    }

    pub fn lookup_type(&self, name: &str) -> Option<&TypeName> {
        self.lookup(name).map(|binding| &binding.ty)
    }

    /// Binding of `name` in the root frame only.
    pub fn lookup_root(&self, name: &str) -> Option<&Binding> {
        self.frames[0].bindings.get(name)
    }

    /// Emission name of the nearest binding: module-qualified when it was declared by another unit.
    pub fn qualified_name(&self, name: &str) -> Option<String> {
        let binding = self.lookup(name)?;
        Some(match &binding.origin {
            Some(module) => format!("{}{name}", mangle_module_name(module)),
            None => name.to_string(),
        })
    }

    fn frame_of(&self, name: &str) -> Option<usize> {
        let mut idx = Some(self.current);
        while let Some(frame_idx) = idx {
            let frame = &self.frames[frame_idx];
            if frame.bindings.contains_key(name) {
                return Some(frame_idx);
            }
            idx = frame.parent;
        }
        None
    }
}

const SOURCE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".mts", ".cts", ".js"];

/// Turn a module specifier into a collision-safe identifier prefix.
///
/// `./greet.ts` becomes `_cd_greet_` and `../greet.ts` becomes `_pd_greet_`; the empty module stays empty.
pub fn mangle_module_name(module: &str) -> String {
    if module.is_empty() {
        return String::new();
    }
    let stem = SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| module.strip_suffix(ext))
        .unwrap_or(module);
    let relative = stem.replace("../", "pd_").replace("./", "cd_");
    let body: String = relative
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("_{body}_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(name: &str) -> TypeName {
        TypeName::new(name)
    }

    #[test]
    fn double_declaration_in_same_frame_fails() {
        let mut types = TypeResolver::new();
        let mut scopes = ScopeChain::new();
        scopes.declare("x", ty("i32"), None, &mut types).expect("first declaration");
        assert_eq!(
            scopes.declare("x", ty("u8"), None, &mut types),
            Err(ScopeError::DoubleDeclaration("x".to_string()))
        );
    }

    #[test]
    fn shadowing_lasts_for_the_inner_frame() {
        let mut types = TypeResolver::new();
        let mut scopes = ScopeChain::new();
        scopes.declare("x", ty("i32"), None, &mut types).expect("outer");
        scopes.push();
        scopes.declare("x", ty("u8"), None, &mut types).expect("inner shadows outer");
        assert_eq!(scopes.lookup_type("x"), Some(&ty("u8")));
        scopes.pop();
        assert_eq!(scopes.lookup_type("x"), Some(&ty("i32")));
    }

    #[test]
    fn pop_truncates_frames_and_keeps_root() {
        let mut scopes = ScopeChain::new();
        scopes.push();
        scopes.push();
        assert_eq!(scopes.depth(), 3);
        scopes.pop();
        scopes.pop();
        scopes.pop();
        assert_eq!(scopes.depth(), 1);
        assert!(scopes.is_root());
    }

    #[test]
    fn mark_initialized_finds_outer_binding() {
        let mut types = TypeResolver::new();
        let mut scopes = ScopeChain::new();
        scopes.declare("x", ty("i32"), None, &mut types).expect("declare");
        scopes.push();
        scopes.mark_initialized("x").expect("visible binding");
        scopes.pop();
        assert!(scopes.lookup("x").is_some_and(|b| b.initialized));
        assert_eq!(
            scopes.mark_initialized("y"),
            Err(ScopeError::UnknownIdentifier("y".to_string()))
        );
    }

    #[test]
    fn declaring_marks_struct_used() {
        let mut types = TypeResolver::new();
        let shape = types.canonicalize("{ a: u8 }").expect("shape");
        let mut scopes = ScopeChain::new();
        scopes
            .declare("p", TypeName::pointer_to(&shape), None, &mut types)
            .expect("declare");
        assert!(types.structs().get(shape.as_str()).is_some_and(|s| s.used));
    }

    #[test]
    fn qualified_names_carry_module_prefix() {
        let mut types = TypeResolver::new();
        let mut scopes = ScopeChain::new();
        scopes
            .declare("sayHello", ty("function"), Some("./greet.ts"), &mut types)
            .expect("declare");
        scopes.declare("local", ty("i32"), None, &mut types).expect("declare");
        assert_eq!(scopes.qualified_name("sayHello").as_deref(), Some("_cd_greet_sayHello"));
        assert_eq!(scopes.qualified_name("local").as_deref(), Some("local"));
        assert_eq!(scopes.qualified_name("missing"), None);
    }

    #[test]
    fn module_names_are_mangled() {
        let cases = [
            ("", ""),
            ("greet", "_greet_"),
            ("./greet.ts", "_cd_greet_"),
            ("../greet.ts", "_pd_greet_"),
            ("../../greet.ts", "_pd_pd_greet_"),
            ("./lib/math-utils.ts", "_cd_lib_math_utils_"),
        ];
        for (input, expected) in cases {
            assert_eq!(mangle_module_name(input), expected, "mangling {input:?}");
        }
    }
}
