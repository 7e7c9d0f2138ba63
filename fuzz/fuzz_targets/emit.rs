#![no_main]

use libfuzzer_sys::fuzz_target;
use typeslang::{EmitConfig, compile_program};
use typeslang_syntax::TypedProgram;

fuzz_target!(|data: &[u8]| {
    // Only well-formed program JSON reaches the emitter; it must fail with an error, never a panic.
    if let Ok(program) = serde_json::from_slice::<TypedProgram>(data) {
        let _ = compile_program(&program, &EmitConfig::default());
    }
});
