//! Purpose: Compile the C stub engine into a shared library for launcher tests.
//! Role: Cargo build-script; exports the stub path as `STUB_ENGINE_PATH`.
//! Invariants: `cargo:rerun-if-changed` covers the stub source.
//! Invariants: A missing C toolchain only skips the stub; it never fails the build.
//! Invariants: Uses only Cargo-provided env vars (e.g. `OUT_DIR`, `TARGET`).
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=c/stub_engine.c");

    let target = env::var("TARGET").unwrap_or_default();
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR"));

    if target.contains("windows-msvc") {
        println!("cargo:warning=stub engine is not built for MSVC targets; FFI tests will skip");
        return;
    }

    let source = manifest_dir.join("c").join("stub_engine.c");
    let output = out_dir.join(stub_file_name(&target));

    match compile_stub(&target, &source, &output) {
        Ok(()) => println!("cargo:rustc-env=STUB_ENGINE_PATH={}", output.display()),
        Err(reason) => {
            println!("cargo:warning=stub engine not built ({reason}); FFI tests will skip")
        }
    }
}

fn stub_file_name(target: &str) -> &'static str {
    if target.contains("apple") {
        "libstub_engine.dylib"
    } else if target.contains("windows") {
        "stub_engine.dll"
    } else {
        "libstub_engine.so"
    }
}

fn compile_stub(target: &str, source: &Path, output: &Path) -> Result<(), String> {
    let compiler = cc::Build::new()
        .cargo_metadata(false)
        .warnings(false)
        .try_get_compiler()
        .map_err(|err| err.to_string())?;

    let mut cmd = compiler.to_command();
    if target.contains("apple") {
        cmd.arg("-dynamiclib");
    } else {
        cmd.arg("-shared");
    }
    if !target.contains("windows") {
        cmd.arg("-fPIC");
    }
    cmd.arg("-o").arg(output).arg(source);

    let status = cmd.status().map_err(|err| err.to_string())?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("compiler exited with {status}"))
    }
}
