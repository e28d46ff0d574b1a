//! Purpose: Library crate backing the `engine-launcher` binary and its tests.
//! Exports: `core` (entry point, errors), `config`, `binding`, `launcher`, `diagnostics`.
//! Role: Keeps the FFI boundary in `binding` so tests can swap in stub loaders.
//! Invariants: Only `binding` contains `unsafe` foreign calls.
//! Invariants: Nothing here writes to stdout except `Launcher::run` via its writer.
pub mod binding;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod launcher;
pub mod library_paths;
