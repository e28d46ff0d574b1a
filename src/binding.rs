//! Purpose: The one place the launcher crosses into foreign code.
//! Exports: `EngineLoader`, `DylibLoader`, `CallOutcome`.
//! Role: Load the engine library, resolve the entry symbol, call it once.
//! Invariants: Exactly one load and one call per `call_entry`; no retries.
//! Invariants: Pointer-form entries receive a null pointer and nothing else.
//! Invariants: The library is unloaded when `call_entry` returns.
//! Invariants: The file system is never consulted here; `library_found` comes from the caller.
//! Notes: A signature mismatch with the callee cannot be detected here and is UB.
use std::path::Path;
use std::ptr;

use libc::{c_int, c_void};
use libloading::{Library, Symbol};
use tracing::debug;

use crate::core::entry::{EntryPoint, EntrySignature};
use crate::core::error::{Error, ErrorKind};

type NoArgsFn = unsafe extern "C" fn();
type NullPointerFn = unsafe extern "C" fn(*mut c_void);
type IntReturnFn = unsafe extern "C" fn() -> c_int;

/// What the launcher observed from the foreign call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CallOutcome {
    /// Present only for `int`-returning entries.
    pub returned: Option<i32>,
}

/// Seam between the launcher and the dynamic loader.
///
/// Test doubles implement this to record what the launcher asked for.
/// `library_found` is the launcher's single existence check, used only to
/// classify a load failure.
pub trait EngineLoader {
    fn call_entry(
        &mut self,
        library: &Path,
        library_found: bool,
        entry: &EntryPoint,
    ) -> Result<CallOutcome, Error>;
}

#[derive(Debug, Default)]
pub struct DylibLoader;

impl DylibLoader {
    pub fn new() -> Self {
        Self
    }
}

impl EngineLoader for DylibLoader {
    fn call_entry(
        &mut self,
        library: &Path,
        library_found: bool,
        entry: &EntryPoint,
    ) -> Result<CallOutcome, Error> {
        debug!(library = %library.display(), "loading engine library");
        // SAFETY: loading runs the library's initializers; the engine is trusted.
        let lib = unsafe { Library::new(library) }
            .map_err(|err| load_error(library, library_found, err))?;

        let symbol = entry.symbol_bytes();
        // SAFETY (all arms): the symbol is typed with the configured signature, which
        // must match the export; `func` is called while `lib` is still loaded, and the
        // pointer form receives only null, which the callee must not dereference.
        let outcome = match entry.signature() {
            EntrySignature::NoArgs => {
                let func: Symbol<NoArgsFn> = unsafe { lib.get(&symbol) }
                    .map_err(|err| symbol_error(library, entry, err))?;
                debug!(symbol = entry.symbol(), "calling entry()");
                unsafe { func() };
                CallOutcome::default()
            }
            EntrySignature::NullPointer => {
                let func: Symbol<NullPointerFn> = unsafe { lib.get(&symbol) }
                    .map_err(|err| symbol_error(library, entry, err))?;
                debug!(symbol = entry.symbol(), "calling entry(NULL)");
                unsafe { func(ptr::null_mut()) };
                CallOutcome::default()
            }
            EntrySignature::IntReturn => {
                let func: Symbol<IntReturnFn> = unsafe { lib.get(&symbol) }
                    .map_err(|err| symbol_error(library, entry, err))?;
                debug!(symbol = entry.symbol(), "calling entry() -> int");
                let returned = unsafe { func() };
                CallOutcome {
                    returned: Some(returned),
                }
            }
        };

        drop(lib);
        debug!(library = %library.display(), "engine library unloaded");
        Ok(outcome)
    }
}

fn load_error(library: &Path, library_found: bool, err: libloading::Error) -> Error {
    if library_found {
        Error::new(ErrorKind::Load)
            .with_message("dynamic loader rejected the engine library")
            .with_hint("Check the library architecture and its own shared-library dependencies.")
            .with_path(library)
            .with_source(err)
    } else {
        Error::new(ErrorKind::NotFound)
            .with_message("engine library not found")
            .with_hint("Build the engine or point ENGINE_LAUNCHER_LIBRARY at it.")
            .with_path(library)
            .with_source(err)
    }
}

fn symbol_error(library: &Path, entry: &EntryPoint, err: libloading::Error) -> Error {
    Error::new(ErrorKind::Symbol)
        .with_message("entry symbol not exported by engine library")
        .with_hint("Set ENGINE_LAUNCHER_SYMBOL to a symbol the library exports with C linkage.")
        .with_path(library)
        .with_symbol(entry.symbol())
        .with_source(err)
}
