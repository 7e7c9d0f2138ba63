//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use typeslang_syntax::TypedProgram;

use super::{CliError, CliResult, ExitCode};
use crate::backend::{self, EmitError};
use crate::config::EmitConfig;
use crate::diagnostics;

/// Maximum program file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// during deserialization.
const MAX_PROGRAM_SIZE: u64 = 100 * 1024 * 1024;

/// Read a program file.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_PROGRAM_SIZE` (100 MB)
pub fn read_program_text(path: &Path) -> CliResult<String> {
    let metadata = fs::metadata(path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", path.display(), e)))?;

    if metadata.len() > MAX_PROGRAM_SIZE {
        return Err(CliError::failure(format!(
            "Program file '{}' is too large ({} bytes, max {} bytes)",
            path.display(),
            metadata.len(),
            MAX_PROGRAM_SIZE
        )));
    }

    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", path.display(), e)))
}

/// Read and deserialize a typed program.
pub fn load_program(path: &Path) -> CliResult<TypedProgram> {
    let text = read_program_text(path)?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::failure(format!("Invalid program file '{}': {}", path.display(), e)))
}

/// Compile `program`, rendering any error against the offending unit's source.
pub fn compile(program: &TypedProgram, config: &EmitConfig) -> CliResult<String> {
    backend::compile_program(program, config).map_err(|err| CliError::failure(render(program, &err)))
}

fn render(program: &TypedProgram, err: &EmitError) -> String {
    let source = program
        .units
        .iter()
        .find(|unit| unit.path == err.unit)
        .map(|unit| unit.source.as_str());
    diagnostics::format_error(source, err).trim_end().to_string()
}

/// Compile a program file and write the C++ output (stdout when `output` is `None`).
pub fn emit_file(path: &Path, output: Option<&Path>, config: &EmitConfig) -> CliResult<ExitCode> {
    let program = load_program(path)?;
    let cpp = compile(&program, config)?;

    match output {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    CliError::failure(format!("Error creating directory '{}': {}", parent.display(), e))
                })?;
            }
            fs::write(out, &cpp)
                .map_err(|e| CliError::failure(format!("Error writing '{}': {}", out.display(), e)))?;
            tracing::info!(output = %out.display(), bytes = cpp.len(), "wrote C++ output");
        }
        None => print!("{cpp}"),
    }
    Ok(ExitCode::SUCCESS)
}

/// Compile a program file without writing output.
pub fn check_file(path: &Path, config: &EmitConfig) -> CliResult<ExitCode> {
    let program = load_program(path)?;
    compile(&program, config)?;
    println!("✓ {} compiles", path.display());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use typeslang_syntax::builder::ProgramBuilder;

    fn write_program(dir: &Path, program: &TypedProgram) -> std::path::PathBuf {
        let path = dir.join("program.json");
        fs::write(&path, serde_json::to_string(program).unwrap()).unwrap();
        path
    }

    fn hello_program() -> TypedProgram {
        let mut b = ProgramBuilder::new();
        let main = b.function("main", vec![], Some("i32"), vec![b.ret(Some(b.num("0")))]);
        let unit = b.add_unit("main.ts", vec![main]);
        b.finish(unit)
    }

    #[test]
    fn emit_writes_output_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_program(dir.path(), &hello_program());
        let output = dir.path().join("build/cpp/main.cpp");

        let code = emit_file(&input, Some(&output), &EmitConfig::default()).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        let cpp = fs::read_to_string(&output).unwrap();
        assert!(cpp.starts_with("#include <TypeSlang/runtime.cpp>\n"));
        assert!(cpp.contains("i32 main() {\n    return 0;\n}\n"));
    }

    #[test]
    fn check_accepts_valid_program() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_program(dir.path(), &hello_program());
        assert_eq!(check_file(&input, &EmitConfig::default()).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_program(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.message.contains("Cannot access file"));
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_program(&path).unwrap_err();
        assert!(err.message.contains("Invalid program file"));
    }

    #[test]
    fn compile_errors_are_rendered() {
        let mut b = ProgramBuilder::new();
        let stray = b.expr_stmt(b.num("1"));
        let unit = b.add_unit("main.ts", vec![stray]);
        let program = b.finish(unit);
        let err = compile(&program, &EmitConfig::default()).unwrap_err();
        assert!(err.message.contains("typeslang::unsupported_construct"), "{}", err.message);
        assert!(err.message.contains("main.ts"), "{}", err.message);
    }
}
