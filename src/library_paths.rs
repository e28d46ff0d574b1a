//! Purpose: Platform library file naming and per-profile default library paths.
//! Exports: `library_file_name`, `default_library_path`, `anchor_bare_name`, `DEFAULT_LIBRARY_STEM`.
//! Role: Keep the debug/release default path in one place for config and tests.
//! Invariants: Default paths are relative and resolve against the working directory.
//! Invariants: Debug builds default to `engine/build/debug`, release to `engine/build/release`.
//! Invariants: Bare file names are anchored to `./` so the loader opens the file that was checked.

use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_LIBRARY_STEM: &str = "engine";

pub fn dynamic_lib_prefix() -> &'static str {
    match env::consts::OS {
        "windows" => "",
        _ => "lib",
    }
}

pub fn dynamic_lib_extension() -> &'static str {
    match env::consts::OS {
        "windows" => "dll",
        "macos" | "ios" => "dylib",
        _ => "so",
    }
}

pub fn library_file_name(stem: &str) -> String {
    format!(
        "{}{stem}.{}",
        dynamic_lib_prefix(),
        dynamic_lib_extension()
    )
}

pub fn profile_dir() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

pub fn default_library_path() -> PathBuf {
    PathBuf::from("engine")
        .join("build")
        .join(profile_dir())
        .join(library_file_name(DEFAULT_LIBRARY_STEM))
}

/// `dlopen` searches the loader paths for names without a separator, while the
/// existence check looks in the working directory. Prefixing `./` makes both
/// refer to the same file.
pub fn anchor_bare_name(path: PathBuf) -> PathBuf {
    if path.parent() == Some(Path::new("")) {
        Path::new(".").join(path)
    } else {
        path
    }
}
