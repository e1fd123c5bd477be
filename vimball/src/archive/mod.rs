//! The vimball archive codec.
//!
//! [`Archive`] encodes an ordered list of [`Entry`] values to the vimball
//! text format and decodes it back, enforcing the signature and member
//! structure. Compression and file naming live alongside it.

mod compression;
mod error;
mod format;
mod naming;

pub use compression::{gunzip, gzip, is_gzip, read_archive_bytes, GZIP_MAGIC};
pub use error::DecodeError;
pub use format::{Archive, Entry, HEADER, MEMBER_MARKER};
pub use naming::{
    archive_filename, archive_stem, looks_like_vimball, recipe_name, GZ_SUFFIX,
    RECIPE_EXTENSION, VBA_EXTENSION,
};
