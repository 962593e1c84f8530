use std::io;

use crate::decoder::SampleValue;
use crate::tags::{CompressionMethod, Orientation, PhotometricInterpretation};

/// Tiff error kinds.
///
/// Every failure the decoder can report. Header problems abort an open,
/// per-frame problems leave the decoder usable with [`Decoder::good`]
/// cleared, and extraction problems are raised before any strip I/O happens,
/// with the exception of [`TiffError::StripDataLost`].
///
/// [`Decoder::good`]: crate::Decoder::good
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TiffError {
    /// The file could not be opened at all.
    #[error("could not open the tiff file: {0}")]
    OpenFileFailed(#[source] io::Error),

    /// An I/O error occurred on the underlying stream while decoding.
    #[error("i/o error while decoding: {0}")]
    Io(#[from] io::Error),

    /// The first two header bytes are neither `II` nor `MM`.
    #[error("invalid tiff byte order marker {0:?}")]
    InvalidByteOrder([u8; 2]),

    /// The header version field is not 42.
    #[error("invalid tiff magic number {0}")]
    InvalidMagicNumber(u16),

    /// The directory chain is exhausted.
    #[error("no more images in the tiff file")]
    NoMoreImages,

    /// The sample storage of this frame has no decodable layout.
    #[error("the sample storage layout is not supported")]
    UnsupportedFormat,

    /// Only uncompressed strips can be extracted.
    #[error("compression method {0:?} is not supported")]
    UnsupportedCompression(CompressionMethod),

    /// The frame carries tile tags; tiles are flagged but never decoded.
    #[error("tiled images are not supported")]
    UnsupportedTiles,

    /// Anything but the standard top-left orientation.
    #[error("orientation {0:?} is not supported")]
    UnsupportedOrientation(Orientation),

    /// Palette-mapped images cannot be extracted.
    #[error("photometric interpretation {0:?} is not supported")]
    UnsupportedPhotometricInterpretation(PhotometricInterpretation),

    /// `BitsPerSample` declared different widths for different channels.
    #[error("samples of differing bit depths are not supported")]
    NonUniformBitsPerSample,

    /// The frame width or height is zero.
    #[error("invalid image size")]
    InvalidImageSize,

    /// Sample extraction handles 8, 16, 32 and 64 bit samples only.
    #[error("bits per sample must be 8, 16, 32 or 64, not {0}")]
    InvalidBitsPerSample(u32),

    /// A resolution rational has a zero denominator.
    #[error("invalid resolution rational")]
    InvalidResolution,

    /// A strip delivered fewer bytes than its declared byte count. Carries
    /// the samples assembled so far; bytes the file did not deliver read as
    /// zero.
    #[error("strip data lost during extraction")]
    StripDataLost(Vec<SampleValue>),

    /// No frame has been decoded successfully yet.
    #[error("the reader has not decoded a frame yet")]
    NotReady,

    /// The next-directory pointers form a chain longer than the file can
    /// hold.
    #[error("cycle detected in the directory offsets")]
    CycleInOffsets,
}

/// Result of an image decoding process
pub type TiffResult<T> = Result<T, TiffError>;
