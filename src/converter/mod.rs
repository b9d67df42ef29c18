//! The extraction pipeline.
//!
//! This module turns a texture stream into a tar archive. The steps run in
//! this order:
//!
//! 1. **Index walk** - Reads the storage index entry by entry
//! 2. **Record decode** - Detours to each record, reads its header and payload
//! 3. **Preparation** - Converts the raw pixels to an image file
//! 4. **Entry write** - Appends the image to the archive
//! 5. **Finalize** - Appends the end-of-archive marker

mod archive;
mod context;
mod record;
mod walker;

pub use archive::*;
pub use context::*;
pub use record::*;
pub use walker::*;
