//! GLideN64 texture stream parsing.
//!
//! This module provides the byte-level reader, the config header validation,
//! and the on-disk structures of a texture stream (`.hts`) file.

mod header;
mod reader;
mod structs;

#[cfg(test)]
pub(crate) mod testing;

pub use header::*;
pub use reader::*;
pub use structs::*;
