//! All IO functionality needed for TIFF decoding

use std::io::{self, Read, Seek};

/// Byte order of a TIFF file or of the running host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    /// little endian byte order
    LittleEndian,
    /// big endian byte order
    BigEndian,
}

impl ByteOrder {
    /// Byte order of the running host, probed from the in-memory layout of a
    /// multi-byte integer.
    ///
    /// Returns `None` when the layout is neither pure little- nor pure
    /// big-endian; decoding cannot proceed on such a host once the file
    /// order is known.
    pub fn host() -> Option<ByteOrder> {
        match 0x0102_0304_u32.to_ne_bytes() {
            [4, 3, 2, 1] => Some(ByteOrder::LittleEndian),
            [1, 2, 3, 4] => Some(ByteOrder::BigEndian),
            _ => None,
        }
    }

    /// Given a buffer of `element_size`-byte words, convert its contents from
    /// `self` to the `to` byte order in place.
    ///
    /// A no-op for single-byte elements and matching orders; applying the
    /// same conversion twice restores the input. Trailing bytes that do not
    /// fill a whole word are left untouched.
    pub fn convert(self, element_size: usize, buffer: &mut [u8], to: ByteOrder) {
        if self == to {
            return;
        }

        match element_size {
            1 => {}
            2 => {
                for chunk in buffer.chunks_exact_mut(2) {
                    let chunk: &mut [u8; 2] = chunk.try_into().unwrap();
                    *chunk = u16::from_be_bytes(*chunk).to_le_bytes();
                }
            }
            4 => {
                for chunk in buffer.chunks_exact_mut(4) {
                    let chunk: &mut [u8; 4] = chunk.try_into().unwrap();
                    *chunk = u32::from_be_bytes(*chunk).to_le_bytes();
                }
            }
            8 => {
                for chunk in buffer.chunks_exact_mut(8) {
                    let chunk: &mut [u8; 8] = chunk.try_into().unwrap();
                    *chunk = u64::from_be_bytes(*chunk).to_le_bytes();
                }
            }
            _ => unreachable!("element size must be 1, 2, 4 or 8"),
        }
    }
}

macro_rules! read_fn {
    ($name:ident, $type:ty) => {
        /// reads an $type
        #[inline(always)]
        fn $name(&mut self) -> Result<$type, io::Error> {
            let mut n = [0u8; std::mem::size_of::<$type>()];
            self.read_exact(&mut n)?;
            Ok(match self.byte_order() {
                ByteOrder::LittleEndian => <$type>::from_le_bytes(n),
                ByteOrder::BigEndian => <$type>::from_be_bytes(n),
            })
        }
    };
}

/// Reader that is aware of the byte order.
pub trait EndianReader: Read {
    /// Byte order that should be adhered to
    fn byte_order(&self) -> ByteOrder;

    read_fn!(read_u16, u16);
    read_fn!(read_u32, u32);
}

/// Reader that decodes multi-byte values according to a file's byte order.
#[derive(Debug)]
pub struct SmartReader<R> {
    reader: R,
    pub byte_order: ByteOrder,
}

impl<R> SmartReader<R> {
    /// Wraps a reader
    pub fn wrap(reader: R, byte_order: ByteOrder) -> SmartReader<R> {
        SmartReader { reader, byte_order }
    }
}

impl<R: Read> EndianReader for SmartReader<R> {
    #[inline(always)]
    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}

impl<R: Read> Read for SmartReader<R> {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl<R: Read + Seek> Seek for SmartReader<R> {
    #[inline]
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        self.reader.seek(pos)
    }
}
