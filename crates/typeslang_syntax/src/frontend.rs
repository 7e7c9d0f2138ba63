//! The front-end collaborator interface and an in-memory implementation.
//!
//! The backend never parses or infers types itself. It walks the AST exposed by a [`FrontEnd`] and asks it
//! two questions: "what is the inferred type of this node?" and "where does this import specifier lead?".
//!
//! [`TypedProgram`] is the plain-data front end: every answer is precomputed, which makes it serializable
//! (the CLI loads it from JSON) and trivial to construct in tests.

use crate::ast::{NodeId, SourceUnit, UnitId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where an import specifier resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleTarget {
    /// Another source unit of the same program; it is inlined at the import site.
    Unit(UnitId),
    /// The native runtime namespace; nothing is inlined.
    Runtime,
}

/// Queries the backend issues against the front end.
pub trait FrontEnd {
    /// The parsed unit for `id`.
    fn unit(&self, id: UnitId) -> Option<&SourceUnit>;

    /// Statically inferred type text of an expression or declaration node.
    fn type_of(&self, node: NodeId) -> Option<&str>;

    /// Resolve an import specifier written in unit `from`.
    fn resolve_module(&self, specifier: &str, from: UnitId) -> Option<ModuleTarget>;
}

/// A resolved import edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleLink {
    pub from: UnitId,
    pub specifier: String,
    pub target: ModuleTarget,
}

/// A fully typed program: units, inferred types and module links.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypedProgram {
    /// Units indexed by [`UnitId`].
    pub units: Vec<SourceUnit>,
    /// Unit the backend starts emitting from.
    #[serde(default)]
    pub entry: Option<UnitId>,
    /// Inferred type text per node.
    #[serde(default)]
    pub types: BTreeMap<NodeId, String>,
    #[serde(default)]
    pub modules: Vec<ModuleLink>,
}

impl TypedProgram {
    /// Entry unit: the explicit one, else the first unit.
    pub fn entry_unit(&self) -> Option<UnitId> {
        match self.entry {
            Some(id) => Some(id),
            None if !self.units.is_empty() => Some(UnitId(0)),
            None => None,
        }
    }
}

impl FrontEnd for TypedProgram {
    fn unit(&self, id: UnitId) -> Option<&SourceUnit> {
        self.units.get(id.index())
    }

    fn type_of(&self, node: NodeId) -> Option<&str> {
        self.types.get(&node).map(String::as_str)
    }

    fn resolve_module(&self, specifier: &str, from: UnitId) -> Option<ModuleTarget> {
        self.modules
            .iter()
            .find(|link| link.from == from && link.specifier == specifier)
            .map(|link| link.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(path: &str) -> SourceUnit {
        SourceUnit {
            path: path.to_string(),
            source: String::new(),
            statements: Vec::new(),
        }
    }

    #[test]
    fn entry_defaults_to_first_unit() {
        let mut program = TypedProgram::default();
        assert_eq!(program.entry_unit(), None);
        program.units.push(unit("main.ts"));
        assert_eq!(program.entry_unit(), Some(UnitId(0)));
        program.entry = Some(UnitId(3));
        assert_eq!(program.entry_unit(), Some(UnitId(3)));
    }

    #[test]
    fn module_links_are_scoped_to_the_importing_unit() {
        let program = TypedProgram {
            units: vec![unit("main.ts"), unit("lib.ts")],
            modules: vec![ModuleLink {
                from: UnitId(0),
                specifier: "./lib.ts".to_string(),
                target: ModuleTarget::Unit(UnitId(1)),
            }],
            ..Default::default()
        };
        assert_eq!(program.resolve_module("./lib.ts", UnitId(0)), Some(ModuleTarget::Unit(UnitId(1))));
        assert_eq!(program.resolve_module("./lib.ts", UnitId(1)), None);
    }

    #[test]
    fn loads_from_json() {
        let json = r#"{
            "units": [{
                "path": "main.ts",
                "statements": [
                    {"id": 1, "kind": {"Expr": {"id": 2, "kind": {"Ident": "x"}}}},
                    {"id": 3, "kind": "Break"}
                ]
            }],
            "types": {"2": "u8"},
            "modules": [{"from": 0, "specifier": "TypeSlang", "target": "Runtime"}]
        }"#;
        let program: TypedProgram = serde_json::from_str(json).expect("valid program json");
        assert_eq!(program.units[0].statements.len(), 2);
        assert_eq!(program.type_of(NodeId(2)), Some("u8"));
        assert_eq!(program.resolve_module("TypeSlang", UnitId(0)), Some(ModuleTarget::Runtime));
    }
}
