//! Purpose: Resolve the launcher configuration once at process start.
//! Exports: `LauncherConfig`, env var name constants.
//! Role: Replace build-time constant paths with an injected value tests can override.
//! Invariants: Env vars win over defaults; empty values count as unset.
//! Invariants: A bare library file name means the file in the working directory.
//! Invariants: Resolution never touches the file system; existence is the launcher's job.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::core::entry::{DEFAULT_ENTRY_SYMBOL, EntryPoint, EntrySignature};
use crate::core::error::{Error, ErrorKind};
use crate::library_paths::{anchor_bare_name, default_library_path};

pub const LIBRARY_ENV: &str = "ENGINE_LAUNCHER_LIBRARY";
pub const SYMBOL_ENV: &str = "ENGINE_LAUNCHER_SYMBOL";
pub const SIGNATURE_ENV: &str = "ENGINE_LAUNCHER_SIGNATURE";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LauncherConfig {
    library: PathBuf,
    entry: EntryPoint,
}

impl LauncherConfig {
    pub fn new(library: impl Into<PathBuf>, entry: EntryPoint) -> Self {
        Self {
            library: anchor_bare_name(library.into()),
            entry,
        }
    }

    /// Reads the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let library = non_empty(LIBRARY_ENV)
            .map(PathBuf::from)
            .map(anchor_bare_name)
            .unwrap_or_else(default_library_path);

        let symbol = match non_empty(SYMBOL_ENV) {
            Some(value) => value.into_string().map_err(|_| {
                Error::new(ErrorKind::Usage)
                    .with_message(format!("{SYMBOL_ENV} is not valid UTF-8"))
            })?,
            None => DEFAULT_ENTRY_SYMBOL.to_string(),
        };

        let signature = match non_empty(SIGNATURE_ENV) {
            Some(value) => value
                .to_str()
                .ok_or_else(|| {
                    Error::new(ErrorKind::Usage)
                        .with_message(format!("{SIGNATURE_ENV} is not valid UTF-8"))
                })?
                .parse::<EntrySignature>()
                .map_err(|err| {
                    err.with_hint(format!("Set {SIGNATURE_ENV} to void, pointer, or int."))
                })?,
            None => EntrySignature::default(),
        };

        let entry = EntryPoint::new(symbol, signature)
            .map_err(|err| err.with_hint(format!("Check the value of {SYMBOL_ENV}.")))?;

        Ok(Self { library, entry })
    }

    pub fn library(&self) -> &Path {
        &self.library
    }

    pub fn entry(&self) -> &EntryPoint {
        &self.entry
    }
}
