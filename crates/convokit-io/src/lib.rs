#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`] variants for file access and encoding/decoding failures.
pub mod error;

/// High-level image reading functions.
///
/// Decodes any format supported by the `image` crate into [`functional::GenericImage`].
pub mod functional;

/// PNG image encoding.
///
/// Produces the bytes of a filtered image for download or writes them to disk.
pub mod png;

pub use error::IoError;
