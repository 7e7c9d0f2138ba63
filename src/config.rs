//! Emission configuration for TypeSlang
//!
//! Controls the runtime preamble and the layout of the emitted C++.

use typeslang_core::lang::runtime;

/// Emission configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitConfig {
    /// Header included at the top of every translation unit (`#include <...>`)
    pub runtime_include: String,
    /// Namespace the runtime types live in (`using namespace ...;`)
    pub runtime_namespace: String,
    /// Number of spaces per indentation level
    pub indent_width: usize,
    /// Whether to label the struct and prototype sections (`// Structs`, `// Functions`)
    pub section_comments: bool,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            runtime_include: runtime::DEFAULT_INCLUDE.to_string(),
            runtime_namespace: runtime::DEFAULT_NAMESPACE.to_string(),
            indent_width: 4,
            section_comments: true,
        }
    }
}

impl EmitConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the runtime header path
    pub fn with_runtime_include(mut self, include: impl Into<String>) -> Self {
        self.runtime_include = include.into();
        self
    }

    /// Set the runtime namespace
    pub fn with_runtime_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.runtime_namespace = namespace.into();
        self
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Enable or disable section labels
    pub fn with_section_comments(mut self, enabled: bool) -> Self {
        self.section_comments = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Default config tests
    // ========================================

    #[test]
    fn test_default_runtime_include() {
        let config = EmitConfig::default();
        assert_eq!(config.runtime_include, "TypeSlang/runtime.cpp");
    }

    #[test]
    fn test_default_runtime_namespace() {
        let config = EmitConfig::default();
        assert_eq!(config.runtime_namespace, "JS");
    }

    #[test]
    fn test_default_indent_width() {
        let config = EmitConfig::default();
        assert_eq!(config.indent_width, 4);
    }

    #[test]
    fn test_default_section_comments() {
        let config = EmitConfig::default();
        assert!(config.section_comments);
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(EmitConfig::new(), EmitConfig::default());
    }

    // ========================================
    // Builder method tests
    // ========================================

    #[test]
    fn test_with_runtime_include() {
        let config = EmitConfig::new().with_runtime_include("vendor/ts_runtime.hpp");
        assert_eq!(config.runtime_include, "vendor/ts_runtime.hpp");
        // Other fields unchanged
        assert_eq!(config.runtime_namespace, "JS");
    }

    #[test]
    fn test_with_runtime_namespace() {
        let config = EmitConfig::new().with_runtime_namespace("TS");
        assert_eq!(config.runtime_namespace, "TS");
        assert_eq!(config.indent_width, 4);
    }

    #[test]
    fn test_with_indent_width() {
        let config = EmitConfig::new().with_indent_width(2);
        assert_eq!(config.indent_width, 2);
    }

    #[test]
    fn test_with_indent_width_zero() {
        let config = EmitConfig::new().with_indent_width(0);
        assert_eq!(config.indent_width, 0);
    }

    #[test]
    fn test_with_section_comments_disabled() {
        let config = EmitConfig::new().with_section_comments(false);
        assert!(!config.section_comments);
    }

    // ========================================
    // Builder chaining tests
    // ========================================

    #[test]
    fn test_builder_chain_all() {
        let config = EmitConfig::new()
            .with_runtime_include("rt.hpp")
            .with_runtime_namespace("rt")
            .with_indent_width(8)
            .with_section_comments(false);
        assert_eq!(config.runtime_include, "rt.hpp");
        assert_eq!(config.runtime_namespace, "rt");
        assert_eq!(config.indent_width, 8);
        assert!(!config.section_comments);
    }
}
