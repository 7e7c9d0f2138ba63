//! CLI module for the TypeSlang backend
//!
//! This module provides the command-line interface around the C++ emitter. Programs arrive as JSON-serialized
//! [`TypedProgram`](typeslang_syntax::TypedProgram)s written by the front end.
//!
//! ## Commands
//!
//! - `emit <program.json>` - Compile the entry unit to C++ (stdout or `-o FILE`)
//! - `check <program.json>` - Compile without writing output
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::config::EmitConfig;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Backend of the TypeSlang compiler: typed programs to C++
#[derive(Parser, Debug)]
#[command(name = "typeslang")]
#[command(version = VERSION)]
#[command(about = "Lower typed TypeSlang programs to C++", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a typed program to C++
    Emit {
        /// Serialized typed program (JSON)
        #[arg(value_name = "PROGRAM")]
        program: PathBuf,
        /// Write the C++ source here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        #[command(flatten)]
        options: EmitOptions,
    },

    /// Compile a typed program without writing output
    Check {
        /// Serialized typed program (JSON)
        #[arg(value_name = "PROGRAM")]
        program: PathBuf,
        #[command(flatten)]
        options: EmitOptions,
    },
}

/// Flags overriding [`EmitConfig`] defaults.
#[derive(Args, Debug, Default, Clone)]
pub struct EmitOptions {
    /// Runtime header to include
    #[arg(long, value_name = "PATH")]
    pub runtime_include: Option<String>,
    /// Namespace of the runtime types
    #[arg(long, value_name = "NS")]
    pub namespace: Option<String>,
    /// Spaces per indentation level
    #[arg(long, value_name = "N")]
    pub indent: Option<usize>,
    /// Omit the `// Structs` and `// Functions` section labels
    #[arg(long)]
    pub no_section_comments: bool,
}

impl EmitOptions {
    /// Apply the flags on top of the default configuration.
    pub fn to_config(&self) -> EmitConfig {
        let mut config = EmitConfig::new().with_section_comments(!self.no_section_comments);
        if let Some(include) = &self.runtime_include {
            config = config.with_runtime_include(include.clone());
        }
        if let Some(namespace) = &self.namespace {
            config = config.with_runtime_namespace(namespace.clone());
        }
        if let Some(width) = self.indent {
            config = config.with_indent_width(width);
        }
        config
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Emit {
            program,
            output,
            options,
        } => commands::emit_file(&program, output.as_deref(), &options.to_config()),
        Command::Check { program, options } => commands::check_file(&program, &options.to_config()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_emit() {
        let cli = Cli::try_parse_from(["typeslang", "emit", "program.json"]).unwrap();
        if let Command::Emit { program, output, .. } = cli.command {
            assert_eq!(program, PathBuf::from("program.json"));
            assert!(output.is_none());
        } else {
            panic!("Expected Emit command");
        }
    }

    #[test]
    fn test_cli_parse_emit_with_output() {
        let cli = Cli::try_parse_from(["typeslang", "emit", "program.json", "-o", "out/main.cpp"]).unwrap();
        if let Command::Emit { output, .. } = cli.command {
            assert_eq!(output, Some(PathBuf::from("out/main.cpp")));
        } else {
            panic!("Expected Emit command");
        }
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["typeslang", "check", "program.json"]).unwrap();
        assert!(matches!(cli.command, Command::Check { .. }));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["typeslang"]).is_err());
    }

    #[test]
    fn test_emit_options_override_config() {
        let cli = Cli::try_parse_from([
            "typeslang",
            "emit",
            "program.json",
            "--runtime-include",
            "rt.hpp",
            "--namespace",
            "rt",
            "--indent",
            "2",
            "--no-section-comments",
        ])
        .unwrap();
        let Command::Emit { options, .. } = cli.command else {
            panic!("Expected Emit command");
        };
        let config = options.to_config();
        assert_eq!(config.runtime_include, "rt.hpp");
        assert_eq!(config.runtime_namespace, "rt");
        assert_eq!(config.indent_width, 2);
        assert!(!config.section_comments);
    }

    #[test]
    fn test_emit_options_default_to_config_defaults() {
        assert_eq!(EmitOptions::default().to_config(), EmitConfig::default());
    }
}
