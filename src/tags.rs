//! Tag and constant definitions from the TIFF specification.

macro_rules! tags {
    // Enums that keep unrecognized file values in an `Unknown` variant.
    {
        $( #[$enum_attr:meta] )*
        $vis:vis enum $name:ident unknown {
            $( $( #[$variant_attr:meta] )* $variant:ident = $val:literal, )*
        }
    } => {
        $( #[$enum_attr] )*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
        #[non_exhaustive]
        $vis enum $name {
            $( $( #[$variant_attr] )* $variant, )*
            /// A value the decoder does not recognize
            Unknown(u16),
        }

        impl $name {
            #[inline]
            pub const fn from_u16(val: u16) -> Option<Self> {
                match val {
                    $( $val => Some($name::$variant), )*
                    _ => None,
                }
            }

            #[inline]
            pub const fn from_u16_exhaustive(val: u16) -> Self {
                match Self::from_u16(val) {
                    Some(known) => known,
                    None => $name::Unknown(val),
                }
            }

            #[inline]
            pub const fn to_u16(self) -> u16 {
                match self {
                    $( $name::$variant => $val, )*
                    $name::Unknown(val) => val,
                }
            }
        }
    };
    // Enums where unrecognized values are rejected during conversion.
    {
        $( #[$enum_attr:meta] )*
        $vis:vis enum $name:ident {
            $( $( #[$variant_attr:meta] )* $variant:ident = $val:literal, )*
        }
    } => {
        $( #[$enum_attr] )*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
        #[non_exhaustive]
        $vis enum $name {
            $( $( #[$variant_attr] )* $variant, )*
        }

        impl $name {
            #[inline]
            pub const fn from_u16(val: u16) -> Option<Self> {
                match val {
                    $( $val => Some($name::$variant), )*
                    _ => None,
                }
            }

            #[inline]
            pub const fn to_u16(self) -> u16 {
                match self {
                    $( $name::$variant => $val, )*
                }
            }
        }
    };
}

tags! {
/// The tags the directory walk dispatches or recognizes; everything else is
/// skipped silently.
pub enum Tag unknown {
    ImageWidth = 256,
    ImageLength = 257,
    BitsPerSample = 258,
    Compression = 259,
    PhotometricInterpretation = 262,
    FillOrder = 266,
    ImageDescription = 270,
    StripOffsets = 273,
    Orientation = 274,
    SamplesPerPixel = 277,
    RowsPerStrip = 278,
    StripByteCounts = 279,
    XResolution = 282,
    YResolution = 283,
    PlanarConfiguration = 284,
    ResolutionUnit = 296,
    TileWidth = 322,
    TileLength = 323,
    TileOffsets = 324,
    TileByteCounts = 325,
    ExtraSamples = 338,
    SampleFormat = 339,
}
}

tags! {
/// The type of an IFD entry (a 2 byte field).
pub enum Type unknown {
    /// 8-bit unsigned integer
    BYTE = 1,
    /// 8-bit byte that contains a 7-bit ASCII code; the last byte must be zero
    ASCII = 2,
    /// 16-bit unsigned integer
    SHORT = 3,
    /// 32-bit unsigned integer
    LONG = 4,
    /// Fraction stored as two 32-bit unsigned integers
    RATIONAL = 5,
}
}

tags! {
/// See [TIFF compression tags](https://www.awaresystems.be/imaging/tiff/tifftags/compression.html)
/// for reference.
pub enum CompressionMethod unknown {
    None = 1,
    Huffman = 2,
    LZW = 5,
    Deflate = 8,
    PackBits = 0x8005,
}
}

tags! {
pub enum PhotometricInterpretation {
    WhiteIsZero = 0,
    BlackIsZero = 1,
    RGB = 2,
    RGBPalette = 3,
    TransparencyMask = 4,
    CMYK = 5,
    YCbCr = 6,
    CIELab = 8,
}
}

tags! {
pub enum PlanarConfiguration {
    Chunky = 1,
    Planar = 2,
}
}

tags! {
/// Row and column order of the stored image relative to the visual one.
pub enum Orientation unknown {
    TopLeft = 1,
    TopRight = 2,
    BottomRight = 3,
    BottomLeft = 4,
    LeftTop = 5,
    RightTop = 6,
    RightBottom = 7,
    LeftBottom = 8,
}
}

tags! {
/// Bit order within the bytes of a strip.
pub enum FillOrder {
    MsbFirst = 1,
    LsbFirst = 2,
}
}

tags! {
/// Type to represent resolution units
pub enum ResolutionUnit {
    None = 1,
    Inch = 2,
    Centimeter = 3,
}
}

tags! {
pub enum SampleFormat unknown {
    Uint = 1,
    Int = 2,
    IEEEFP = 3,
    Void = 4,
}
}
