//! Decoding of TIFF directories and strip-organized sample data.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::frame::Frame;
use crate::range::overlap;
use crate::tags::{
    CompressionMethod, Orientation, PhotometricInterpretation, PlanarConfiguration,
    ResolutionUnit, SampleFormat,
};
use crate::{TiffError, TiffResult};

use self::ifd::Entry;
use self::stream::{ByteOrder, EndianReader, SmartReader};

pub(crate) mod ifd;
mod stream;

/// One decoded sample, carrying its raw bit pattern.
///
/// The decoder preserves the stored pattern exactly; reinterpreting it as a
/// signed integer or an IEEE float is an explicit conversion the caller
/// asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl SampleValue {
    /// Width of the sample in bits.
    pub fn bits(self) -> u32 {
        match self {
            SampleValue::U8(_) => 8,
            SampleValue::U16(_) => 16,
            SampleValue::U32(_) => 32,
            SampleValue::U64(_) => 64,
        }
    }

    /// The bit pattern zero-extended to 64 bits.
    pub fn to_bits(self) -> u64 {
        match self {
            SampleValue::U8(v) => u64::from(v),
            SampleValue::U16(v) => u64::from(v),
            SampleValue::U32(v) => u64::from(v),
            SampleValue::U64(v) => v,
        }
    }

    /// Reinterprets an 8-bit pattern as a signed integer.
    pub fn to_i8(self) -> Option<i8> {
        match self {
            SampleValue::U8(v) => Some(v as i8),
            _ => None,
        }
    }

    /// Reinterprets a 16-bit pattern as a signed integer.
    pub fn to_i16(self) -> Option<i16> {
        match self {
            SampleValue::U16(v) => Some(v as i16),
            _ => None,
        }
    }

    /// Reinterprets a 32-bit pattern as a signed integer.
    pub fn to_i32(self) -> Option<i32> {
        match self {
            SampleValue::U32(v) => Some(v as i32),
            _ => None,
        }
    }

    /// Reinterprets a 64-bit pattern as a signed integer.
    pub fn to_i64(self) -> Option<i64> {
        match self {
            SampleValue::U64(v) => Some(v as i64),
            _ => None,
        }
    }

    /// Reinterprets a 32-bit pattern as an IEEE 754 float.
    pub fn to_f32(self) -> Option<f32> {
        match self {
            SampleValue::U32(v) => Some(f32::from_bits(v)),
            _ => None,
        }
    }

    /// Reinterprets a 64-bit pattern as an IEEE 754 float.
    pub fn to_f64(self) -> Option<f64> {
        match self {
            SampleValue::U64(v) => Some(f64::from_bits(v)),
            _ => None,
        }
    }
}

/// The representation of a TIFF reader.
///
/// Owns the stream and the most recently decoded [`Frame`]. Every operation
/// is a synchronous seek-and-read against the underlying stream; the decoder
/// is used from one thread to completion or discarded.
#[derive(Debug)]
pub struct Decoder<R>
where
    R: Read + Seek,
{
    reader: SmartReader<R>,
    host_byte_order: Option<ByteOrder>,
    file_size: u64,
    first_ifd_offset: u64,
    next_ifd_offset: Option<u64>,
    frame: Frame,
    good: bool,
}

impl Decoder<File> {
    /// Opens `path` and wraps the file in a decoder.
    ///
    /// Nothing is parsed until [`Decoder::open`] is called.
    pub fn from_path<P: AsRef<Path>>(path: P) -> TiffResult<Decoder<File>> {
        let file = File::open(path).map_err(TiffError::OpenFileFailed)?;
        Ok(Decoder::new(file))
    }
}

impl<R: Read + Seek> Decoder<R> {
    /// Create a new decoder that decodes from the stream `r`.
    pub fn new(r: R) -> Decoder<R> {
        Decoder {
            reader: SmartReader::wrap(r, ByteOrder::LittleEndian),
            host_byte_order: ByteOrder::host(),
            file_size: 0,
            first_ifd_offset: 0,
            next_ifd_offset: None,
            frame: Frame::default(),
            good: false,
        }
    }

    /// Reads the header and decodes the first directory.
    ///
    /// Header failures (unreadable stream, bad byte order marker, bad magic
    /// number) abort the open. A failed first-frame decode is reported too,
    /// but leaves the decoder holding whatever the directory walk recorded;
    /// [`Decoder::good`] stays false until a directory decodes cleanly.
    pub fn open(&mut self) -> TiffResult<()> {
        if self.host_byte_order.is_none() {
            return Err(TiffError::UnsupportedFormat);
        }

        self.file_size = self.reader.seek(SeekFrom::End(0))?;
        self.reader.seek(SeekFrom::Start(0))?;

        let mut marker = [0u8; 2];
        self.reader.read_exact(&mut marker)?;
        self.reader.byte_order = match &marker {
            b"II" => ByteOrder::LittleEndian,
            b"MM" => ByteOrder::BigEndian,
            _ => return Err(TiffError::InvalidByteOrder(marker)),
        };

        let magic = self.reader.read_u16()?;
        if magic != 42 {
            return Err(TiffError::InvalidMagicNumber(magic));
        }

        self.first_ifd_offset = u64::from(self.reader.read_u32()?);
        self.next_ifd_offset = match self.first_ifd_offset {
            0 => None,
            n => Some(n),
        };

        debug!(
            file_size = self.file_size,
            byte_order = ?self.reader.byte_order,
            first_ifd_offset = self.first_ifd_offset,
            "opened tiff stream"
        );

        self.decode_next_frame()
    }

    /// Whether the last directory decode succeeded.
    pub fn good(&self) -> bool {
        self.good
    }

    /// Returns `true` if another directory is linked after the current one.
    pub fn has_next_frame(&self) -> bool {
        self.good
            && match self.next_ifd_offset {
                Some(offset) => offset < self.file_size,
                None => false,
            }
    }

    /// Decodes the next directory into a fresh frame.
    pub fn read_next_frame(&mut self) -> TiffResult<()> {
        if !self.has_next_frame() {
            return Err(TiffError::NoMoreImages);
        }
        self.decode_next_frame()
    }

    fn decode_next_frame(&mut self) -> TiffResult<()> {
        self.frame = Frame::default();

        let offset = match self.next_ifd_offset {
            Some(offset) if offset + 2 <= self.file_size => offset,
            _ => {
                self.good = false;
                return Err(TiffError::NoMoreImages);
            }
        };

        self.reader.seek(SeekFrom::Start(offset))?;
        let entry_count = self.reader.read_u16()?;

        let mut deferred = None;
        for _ in 0..entry_count {
            let entry = Entry::read_from(&mut self.reader, self.file_size)?;
            trace!(tag = entry.tag.to_u16(), count = entry.count, "directory entry");
            if let Err(err) = self.frame.apply_entry(&entry) {
                warn!(tag = entry.tag.to_u16(), %err, "directory entry rejected");
                deferred.get_or_insert(err);
            }
        }

        // The height is only known once the whole directory has been seen.
        self.frame.height = self.frame.image_length;

        self.reader
            .seek(SeekFrom::Start(offset + 2 + 12 * u64::from(entry_count)))?;
        self.next_ifd_offset = match self.reader.read_u32()? {
            0 => None,
            n => Some(u64::from(n)),
        };

        debug!(
            width = self.frame.width,
            height = self.frame.height,
            strips = self.frame.strip_count,
            "decoded directory with {entry_count} entries"
        );

        self.good = deferred.is_none();
        match deferred {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Counts the directories in the file without disturbing the decode
    /// state.
    ///
    /// Walks the chain reading only entry counts and next pointers; the
    /// stream cursor is restored afterwards, also on failure. A chain with
    /// more nodes than the file could possibly hold is reported as
    /// [`TiffError::CycleInOffsets`].
    pub fn count_frames(&mut self) -> TiffResult<u32> {
        if !self.good {
            return Err(TiffError::NotReady);
        }
        let pos = self.reader.stream_position()?;
        let counted = self.count_frames_from(self.first_ifd_offset);
        self.reader.seek(SeekFrom::Start(pos))?;
        counted
    }

    fn count_frames_from(&mut self, start: u64) -> TiffResult<u32> {
        // Every directory occupies at least its count field and next
        // pointer, so a longer chain cannot fit in the file.
        let max_dirs = self.file_size / 6 + 1;
        let mut frames = 0u32;
        let mut next = start;
        while next > 0 {
            if u64::from(frames) >= max_dirs {
                return Err(TiffError::CycleInOffsets);
            }
            self.reader.seek(SeekFrom::Start(next))?;
            let entries = self.reader.read_u16()?;
            self.reader
                .seek(SeekFrom::Current(12 * i64::from(entries)))?;
            next = u64::from(self.reader.read_u32()?);
            frames += 1;
        }
        Ok(frames)
    }

    pub fn width(&self) -> u32 {
        self.frame.width
    }

    pub fn height(&self) -> u32 {
        self.frame.height
    }

    /// Free-text description of the current frame, if any.
    pub fn image_description(&self) -> &str {
        &self.frame.description
    }

    /// Horizontal and vertical resolution of the current frame.
    pub fn resolution(&self) -> (f32, f32) {
        self.frame.resolution
    }

    pub fn resolution_unit(&self) -> ResolutionUnit {
        self.frame.resolution_unit
    }

    pub fn bits_per_sample(&self) -> u32 {
        self.frame.bits_per_sample
    }

    pub fn samples_per_pixel(&self) -> u16 {
        self.frame.samples_per_pixel
    }

    pub fn sample_format(&self) -> SampleFormat {
        self.frame.sample_format
    }

    /// The full descriptor of the current frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Extracts the raw data of one sample (channel) of the current frame.
    ///
    /// Returns one value per pixel in row-major order, carrying the stored
    /// bit pattern in host byte order. When a strip delivers fewer bytes
    /// than its declared count the partially assembled data is still
    /// returned, inside [`TiffError::StripDataLost`].
    pub fn sample_data(&mut self, sample: u16) -> TiffResult<Vec<SampleValue>> {
        if !self.good {
            return Err(TiffError::NotReady);
        }
        let host = self.host_byte_order.ok_or(TiffError::UnsupportedFormat)?;

        if self.frame.compression != CompressionMethod::None {
            return Err(TiffError::UnsupportedCompression(self.frame.compression));
        }
        if self.frame.tiled {
            return Err(TiffError::UnsupportedTiles);
        }
        if self.frame.orientation != Orientation::TopLeft {
            return Err(TiffError::UnsupportedOrientation(self.frame.orientation));
        }
        if self.frame.photometric_interpretation == PhotometricInterpretation::RGBPalette {
            return Err(TiffError::UnsupportedPhotometricInterpretation(
                self.frame.photometric_interpretation,
            ));
        }
        if self.frame.width == 0 || self.frame.height == 0 {
            return Err(TiffError::InvalidImageSize);
        }
        let bits = self.frame.bits_per_sample;
        if !matches!(bits, 8 | 16 | 32 | 64) {
            return Err(TiffError::InvalidBitsPerSample(bits));
        }
        if self.frame.strip_count == 0
            || self.frame.strip_offsets.len() != self.frame.strip_count as usize
            || self.frame.strip_byte_counts.len() != self.frame.strip_count as usize
            || self.frame.samples_per_pixel == 0
        {
            return Err(TiffError::UnsupportedFormat);
        }

        let element_size = (bits / 8) as usize;
        let pixels = u64::from(self.frame.width) * u64::from(self.frame.height);
        let Some(plane_len) = pixels
            .checked_mul(element_size as u64)
            .and_then(|n| usize::try_from(n).ok())
        else {
            return Err(TiffError::InvalidImageSize);
        };
        let mut buffer = vec![0u8; plane_len];

        let Decoder { reader, frame, .. } = self;
        let pos = reader.stream_position()?;

        let data_lost = if frame.samples_per_pixel == 1
            || frame.planar_config == PlanarConfiguration::Planar
        {
            read_separate_plane(reader, frame, sample, &mut buffer)?
        } else {
            read_interleaved_sample(reader, frame, sample, &mut buffer)?
        };

        reader.seek(SeekFrom::Start(pos))?;

        // The strips were copied verbatim; bring the words into host order
        // before reinterpreting them.
        reader.byte_order.convert(element_size, &mut buffer, host);
        let values = materialize(&buffer, bits);

        debug!(sample, pixels = values.len(), data_lost, "extracted sample data");

        if data_lost {
            return Err(TiffError::StripDataLost(values));
        }
        Ok(values)
    }
}

/// Copies the bytes of `sample`'s plane out of the strip sequence.
///
/// With one sample per pixel or separate planes, the requested sample is the
/// contiguous logical window `[sample * plane, (sample + 1) * plane)` across
/// the concatenated strips.
fn read_separate_plane<R: Read + Seek>(
    reader: &mut SmartReader<R>,
    frame: &Frame,
    sample: u16,
    buffer: &mut [u8],
) -> TiffResult<bool> {
    let plane = buffer.len() as u64;
    let window = u64::from(sample) * plane..(u64::from(sample) + 1) * plane;

    let mut data_lost = false;
    // Byte position of the current strip within the logical image.
    let mut logical = 0u64;
    for strip in 0..frame.strip_count as usize {
        if logical >= window.end {
            break;
        }
        let strip_len = u64::from(frame.strip_byte_counts[strip]);
        if let Some(wanted) = overlap(&window, &(logical..logical + strip_len)) {
            let seek_to = u64::from(frame.strip_offsets[strip]) + (wanted.start - logical);
            reader.seek(SeekFrom::Start(seek_to))?;

            let out = (wanted.start - window.start) as usize;
            let len = (wanted.end - wanted.start) as usize;
            let read = read_up_to(reader, &mut buffer[out..out + len])?;
            if read != len {
                warn!(strip, expected = len, read, "strip came up short");
                data_lost = true;
            }
        }
        logical += strip_len;
    }
    Ok(data_lost)
}

/// De-interleaves `sample` out of chunky strips.
///
/// Every strip holds whole pixels with all samples stored contiguously; the
/// requested sample's elements sit at `sample * element_size` within each
/// pixel, one full pixel apart.
fn read_interleaved_sample<R: Read + Seek>(
    reader: &mut SmartReader<R>,
    frame: &Frame,
    sample: u16,
    buffer: &mut [u8],
) -> TiffResult<bool> {
    let element_size = (frame.bits_per_sample / 8) as usize;
    let stride = element_size * usize::from(frame.samples_per_pixel);
    let first = usize::from(sample) * element_size;

    let mut data_lost = false;
    let mut out = 0usize;
    let mut scratch = Vec::new();
    for strip in 0..frame.strip_count as usize {
        let strip_len = frame.strip_byte_counts[strip] as usize;
        if strip_len > scratch.len() {
            scratch.resize(strip_len, 0);
        }
        let strip_data = &mut scratch[..strip_len];

        reader.seek(SeekFrom::Start(u64::from(frame.strip_offsets[strip])))?;
        let read = read_up_to(reader, strip_data)?;
        if read != strip_len {
            warn!(strip, expected = strip_len, read, "strip came up short");
            data_lost = true;
            // The scratch buffer is reused between strips.
            strip_data[read..].fill(0);
        }

        let mut at = first;
        while at + element_size <= strip_len && out + element_size <= buffer.len() {
            buffer[out..out + element_size].copy_from_slice(&strip_data[at..at + element_size]);
            out += element_size;
            at += stride;
        }
    }
    Ok(data_lost)
}

/// Reads until `buf` is full or the stream ends, returning the bytes read.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Reinterprets the assembled plane as one tagged value per pixel.
fn materialize(buffer: &[u8], bits: u32) -> Vec<SampleValue> {
    match bits {
        8 => buffer.iter().map(|&b| SampleValue::U8(b)).collect(),
        16 => buffer
            .chunks_exact(2)
            .map(|c| SampleValue::U16(u16::from_ne_bytes(c.try_into().unwrap())))
            .collect(),
        32 => buffer
            .chunks_exact(4)
            .map(|c| SampleValue::U32(u32::from_ne_bytes(c.try_into().unwrap())))
            .collect(),
        64 => buffer
            .chunks_exact(8)
            .map(|c| SampleValue::U64(u64::from_ne_bytes(c.try_into().unwrap())))
            .collect(),
        _ => unreachable!("bit depth was validated before extraction"),
    }
}
