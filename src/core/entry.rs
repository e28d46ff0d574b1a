//! Purpose: Describe which exported function the launcher calls and how.
//! Exports: `EntryPoint`, `EntrySignature`, `DEFAULT_ENTRY_SYMBOL`.
//! Role: Typed description of the foreign call shared by config and binding.
//! Invariants: Symbol names are non-empty and NUL-free.
//! Invariants: The pointer form only ever receives a null pointer.
use std::fmt;
use std::str::FromStr;

use crate::core::error::{Error, ErrorKind};

pub const DEFAULT_ENTRY_SYMBOL: &str = "say_hello";

/// C-ABI shape of the exported entry point.
///
/// The launcher cannot verify this against the library; a mismatch with the
/// callee's real signature is undefined behavior.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EntrySignature {
    /// `extern "C" fn()`
    #[default]
    NoArgs,
    /// `extern "C" fn(*mut c_void)`, always called with null.
    NullPointer,
    /// `extern "C" fn() -> c_int`, return value is observed and discarded.
    IntReturn,
}

impl EntrySignature {
    pub fn as_str(self) -> &'static str {
        match self {
            EntrySignature::NoArgs => "void",
            EntrySignature::NullPointer => "pointer",
            EntrySignature::IntReturn => "int",
        }
    }
}

impl fmt::Display for EntrySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntrySignature {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "void" | "none" => Ok(EntrySignature::NoArgs),
            "pointer" | "ptr" => Ok(EntrySignature::NullPointer),
            "int" | "main" => Ok(EntrySignature::IntReturn),
            other => Err(Error::new(ErrorKind::Usage)
                .with_message(format!("unknown entry signature `{other}`"))
                .with_hint("Use one of: void, pointer, int.")),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntryPoint {
    symbol: String,
    signature: EntrySignature,
}

impl EntryPoint {
    pub fn new(symbol: impl Into<String>, signature: EntrySignature) -> Result<Self, Error> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("entry symbol must not be empty"));
        }
        if symbol.contains('\0') {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("entry symbol must not contain NUL bytes")
                .with_symbol(symbol.replace('\0', "\\0")));
        }
        Ok(Self { symbol, signature })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn signature(&self) -> EntrySignature {
        self.signature
    }

    /// Symbol name with a trailing NUL, as the dynamic loader expects it.
    pub fn symbol_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.symbol.len() + 1);
        bytes.extend_from_slice(self.symbol.as_bytes());
        bytes.push(0);
        bytes
    }
}

impl Default for EntryPoint {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_ENTRY_SYMBOL.to_string(),
            signature: EntrySignature::default(),
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.signature)
    }
}
