//! The decoded attributes of one image directory.

use tracing::trace;

use crate::decoder::ifd::Entry;
use crate::tags::{
    CompressionMethod, FillOrder, Orientation, PhotometricInterpretation, PlanarConfiguration,
    ResolutionUnit, SampleFormat, Tag,
};
use crate::{TiffError, TiffResult};

/// One decoded image directory.
///
/// A fresh frame is created for every directory; fields the tag dispatch
/// does not touch keep the baseline values the TIFF specification assigns
/// them.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub compression: CompressionMethod,
    pub samples_per_pixel: u16,
    pub bits_per_sample: u32,
    pub planar_config: PlanarConfiguration,
    pub sample_format: SampleFormat,
    pub orientation: Orientation,
    pub fill_order: FillOrder,
    pub resolution_unit: ResolutionUnit,
    /// Horizontal and vertical resolution, each the ratio of a stored
    /// rational.
    pub resolution: (f32, f32),
    pub photometric_interpretation: PhotometricInterpretation,
    /// Whether any tile tag was present. Tiled frames are flagged, never
    /// decoded.
    pub tiled: bool,
    pub rows_per_strip: u32,
    pub strip_count: u32,
    pub strip_offsets: Vec<u32>,
    /// Byte count of each strip, index-aligned with `strip_offsets`.
    pub strip_byte_counts: Vec<u32>,
    pub description: String,
    /// Staged `ImageLength` value; becomes `height` once the directory scan
    /// completes.
    pub(crate) image_length: u32,
}

impl Default for Frame {
    fn default() -> Frame {
        Frame {
            width: 0,
            height: 0,
            compression: CompressionMethod::None,
            samples_per_pixel: 1,
            bits_per_sample: 0,
            planar_config: PlanarConfiguration::Chunky,
            sample_format: SampleFormat::Uint,
            orientation: Orientation::TopLeft,
            fill_order: FillOrder::MsbFirst,
            resolution_unit: ResolutionUnit::None,
            resolution: (1.0, 1.0),
            photometric_interpretation: PhotometricInterpretation::BlackIsZero,
            tiled: false,
            rows_per_strip: 0,
            strip_count: 0,
            strip_offsets: Vec::new(),
            strip_byte_counts: Vec::new(),
            description: String::new(),
            image_length: 0,
        }
    }
}

impl Frame {
    /// Dispatches one directory entry into the frame.
    ///
    /// Unknown tags fall through untouched. Conditions that leave the frame
    /// usable but imperfect (non-uniform sample widths, a zero resolution
    /// denominator) are reported as errors after the salvageable fields were
    /// recorded; the caller decides whether to continue the walk.
    pub(crate) fn apply_entry(&mut self, entry: &Entry) -> TiffResult<()> {
        match entry.tag {
            Tag::ImageWidth => self.width = entry.value,
            Tag::ImageLength => self.image_length = entry.value,
            Tag::BitsPerSample => {
                self.bits_per_sample = entry.value;
                if let Some(&first) = entry.values.first() {
                    self.bits_per_sample = first;
                    if entry.values.iter().any(|&v| v != first) {
                        return Err(TiffError::NonUniformBitsPerSample);
                    }
                }
            }
            Tag::Compression => {
                self.compression = CompressionMethod::from_u16_exhaustive(entry.value as u16);
            }
            Tag::PhotometricInterpretation => {
                if let Some(p) = PhotometricInterpretation::from_u16(entry.value as u16) {
                    self.photometric_interpretation = p;
                }
            }
            Tag::FillOrder => {
                if let Some(f) = FillOrder::from_u16(entry.value as u16) {
                    self.fill_order = f;
                }
            }
            Tag::ImageDescription => {
                if !entry.values.is_empty() {
                    self.description = entry
                        .values
                        .iter()
                        .map(|&v| v as u8 as char)
                        .take_while(|&c| c != '\0')
                        .collect();
                }
            }
            Tag::StripOffsets => {
                if !entry.values.is_empty() {
                    self.strip_count = entry.count;
                    self.strip_offsets = entry.values.clone();
                }
            }
            Tag::Orientation => {
                self.orientation = Orientation::from_u16_exhaustive(entry.value as u16);
            }
            Tag::SamplesPerPixel => self.samples_per_pixel = entry.value as u16,
            Tag::RowsPerStrip => self.rows_per_strip = entry.value,
            Tag::StripByteCounts => {
                if !entry.values.is_empty() {
                    self.strip_count = entry.count;
                    self.strip_byte_counts = entry.values.clone();
                }
            }
            Tag::XResolution => {
                if entry.value2 == 0 {
                    return Err(TiffError::InvalidResolution);
                }
                self.resolution.0 = entry.value as f32 / entry.value2 as f32;
            }
            Tag::YResolution => {
                if entry.value2 == 0 {
                    return Err(TiffError::InvalidResolution);
                }
                self.resolution.1 = entry.value as f32 / entry.value2 as f32;
            }
            Tag::PlanarConfiguration => {
                if let Some(p) = PlanarConfiguration::from_u16(entry.value as u16) {
                    self.planar_config = p;
                }
            }
            Tag::ResolutionUnit => {
                if let Some(u) = ResolutionUnit::from_u16(entry.value as u16) {
                    self.resolution_unit = u;
                }
            }
            Tag::TileWidth | Tag::TileLength | Tag::TileOffsets | Tag::TileByteCounts => {
                self.tiled = true;
            }
            Tag::SampleFormat => {
                self.sample_format = SampleFormat::from_u16_exhaustive(entry.value as u16);
            }
            // Recognized, but carries no frame field.
            Tag::ExtraSamples => {}
            Tag::Unknown(tag) => trace!(tag, "ignoring unknown tag"),
        }
        Ok(())
    }
}
