//! Decoding of strip-organized TIFF images
//!
//! TIFF (Tagged Image File Format) stores one or more images as a chain of
//! tagged directories. This crate reads classic (32-bit offset) TIFF files,
//! decodes each directory into a [`Frame`] descriptor and extracts raw,
//! uncompressed sample data from strip storage, normalizing the byte order
//! along the way. Compressed strips, tiles and palette images are refused
//! with a typed error instead of being decoded partially.
//!
//! # Related Links
//! * <https://web.archive.org/web/20210108073850/https://www.adobe.io/open/standards/TIFF.html> - The TIFF specification

pub mod decoder;
mod error;
mod frame;
mod range;
pub mod tags;

pub use self::decoder::{Decoder, SampleValue};
pub use self::error::{TiffError, TiffResult};
pub use self::frame::Frame;
