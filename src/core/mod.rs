// Core modules describing the foreign entry point and error modeling.
pub mod entry;
pub mod error;
