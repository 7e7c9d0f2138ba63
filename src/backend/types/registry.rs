//! Struct registry: declared and synthesized struct types.
//!
//! Structs enter the registry two ways: user declarations (interfaces, object type aliases) under their own
//! name, and anonymous object shapes interned under a fresh `anon_struct_<n>` name. Both are indexed by a
//! normalized shape key, so every structurally identical shape resolves to one struct.
//!
//! A struct is only emitted once something binds to it; see [`StructRegistry::mark_used`].

use super::{TypeError, TypeName};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Prefix of synthesized struct names.
pub const ANON_STRUCT_PREFIX: &str = "anon_struct_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructOrigin {
    /// `interface X { ... }` or `type X = { ... }`
    Declared,
    /// Interned from an anonymous object shape.
    Synthesized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDefinition {
    pub name: String,
    pub fields: Vec<(String, TypeName)>,
    pub origin: StructOrigin,
    pub used: bool,
}

#[derive(Debug, Default)]
pub struct StructRegistry {
    structs: Vec<StructDefinition>,
    by_name: HashMap<String, usize>,
    by_shape: HashMap<String, usize>,
    /// Monotonic counter for synthesized names; owned per registry.
    next_anon: usize,
}

/// Normalized interning key of a canonical field list.
pub fn shape_key(fields: &[(String, TypeName)]) -> String {
    fields
        .iter()
        .map(|(name, ty)| format!("{name}:{ty}"))
        .collect::<Vec<_>>()
        .join(";")
}

impl StructRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&StructDefinition> {
        self.by_name.get(name).map(|&idx| &self.structs[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }

    /// All structs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &StructDefinition> {
        self.structs.iter()
    }

    /// Register a user-declared struct under its own name.
    ///
    /// The shape index keeps the first registration, so a later identical declaration still gets its own
    /// name while anonymous shapes keep resolving to the earlier one.
    pub fn declare(&mut self, name: &str, fields: Vec<(String, TypeName)>) -> Result<TypeName, TypeError> {
        if self.by_name.contains_key(name) {
            return Err(TypeError::Redeclared(name.to_string()));
        }
        let key = shape_key(&fields);
        let idx = self.push(name.to_string(), fields, StructOrigin::Declared);
        self.by_shape.entry(key).or_insert(idx);
        Ok(TypeName::new(name))
    }

    /// Resolve an anonymous shape to a struct name, synthesizing one on first sight.
    pub fn intern(&mut self, fields: Vec<(String, TypeName)>) -> TypeName {
        let key = shape_key(&fields);
        if let Some(&idx) = self.by_shape.get(&key) {
            return TypeName::new(self.structs[idx].name.clone());
        }
        let name = format!("{ANON_STRUCT_PREFIX}{}", self.next_anon);
        self.next_anon += 1;
        tracing::debug!(struct_name = %name, shape = %key, "interned anonymous shape");
        let idx = self.push(name.clone(), fields, StructOrigin::Synthesized);
        self.by_shape.insert(key, idx);
        TypeName::new(name)
    }

    fn push(&mut self, name: String, fields: Vec<(String, TypeName)>, origin: StructOrigin) -> usize {
        let idx = self.structs.len();
        self.by_name.insert(name.clone(), idx);
        self.structs.push(StructDefinition {
            name,
            fields,
            origin,
            used: false,
        });
        idx
    }

    /// Mark every struct referenced by `ty` as used, and transitively the structs their fields reference.
    pub fn mark_used(&mut self, ty: &TypeName) {
        let mut pending: Vec<TypeName> = vec![ty.clone()];
        while let Some(ty) = pending.pop() {
            for name in ty.referenced_names() {
                let Some(&idx) = self.by_name.get(name) else {
                    continue;
                };
                let def = &mut self.structs[idx];
                if def.used {
                    continue;
                }
                def.used = true;
                pending.extend(def.fields.iter().map(|(_, field_ty)| field_ty.clone()));
            }
        }
    }

    /// Used structs in emission order: registration order, with every struct placed after the structs its
    /// fields reference. Pointer fields count too, unless they close a cycle.
    pub fn emission_order(&self) -> Vec<&StructDefinition> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        for idx in 0..self.structs.len() {
            self.visit(idx, &mut visited, &mut order);
        }
        order.into_iter().map(|idx| &self.structs[idx]).collect()
    }

    /// Structs that a pointer field in `order` references before their definition.
    ///
    /// Only pointer cycles leave such references behind; a struct pointing to itself needs none.
    pub fn forward_declarations<'r>(&self, order: &[&'r StructDefinition]) -> Vec<&'r str> {
        let position: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(pos, def)| (def.name.as_str(), pos))
            .collect();
        let mut forward = BTreeSet::new();
        for (pos, def) in order.iter().enumerate() {
            for (_, field_ty) in def.fields.iter().filter(|(_, ty)| ty.is_pointer()) {
                for name in field_ty.referenced_names() {
                    if let Some(&target) = position.get(name).filter(|&&target| target > pos) {
                        forward.insert(target);
                    }
                }
            }
        }
        forward
            .into_iter()
            .map(|pos| {
                let def: &'r StructDefinition = order[pos];
                def.name.as_str()
            })
            .collect()
    }

    fn visit(&self, idx: usize, visited: &mut HashSet<usize>, order: &mut Vec<usize>) {
        if !self.structs[idx].used || !visited.insert(idx) {
            return;
        }
        for (_, field_ty) in &self.structs[idx].fields {
            for name in field_ty.referenced_names() {
                if let Some(&dep) = self.by_name.get(name) {
                    self.visit(dep, visited, order);
                }
            }
        }
        order.push(idx);
    }
}
