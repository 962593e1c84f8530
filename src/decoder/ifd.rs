//! Function for reading TIFF tags

use std::io::{Read, Seek, SeekFrom};

use tracing::trace;

use super::stream::{EndianReader, SmartReader};
use crate::tags::{Tag, Type};
use crate::TiffResult;

/// A decoded directory entry.
///
/// Lives only for one tag's decode and dispatch. `values` holds the decoded
/// elements (the numerators for rationals), `values2` the rational
/// denominators, index-aligned with `values`.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) tag: Tag,
    pub(crate) type_: Type,
    pub(crate) count: u32,
    /// First decoded element, or the raw 4-byte field for unrecognized types.
    pub(crate) value: u32,
    /// First rational denominator.
    pub(crate) value2: u32,
    pub(crate) values: Vec<u32>,
    pub(crate) values2: Vec<u32>,
}

impl Entry {
    /// Reads one directory entry.
    ///
    /// An entry has four fields:
    ///
    /// Tag   2 bytes
    /// Type  2 bytes
    /// Count 4 bytes
    /// Value 4 bytes either a pointer or the value itself
    ///
    /// Consumes exactly 12 bytes: the cursor ends up directly behind the
    /// value/offset slot whether the value was inline or indirected.
    /// Indirected values whose offset fails the file-size bound check leave
    /// `values` empty instead of aborting the directory walk.
    pub(crate) fn read_from<R: Read + Seek>(
        reader: &mut SmartReader<R>,
        file_size: u64,
    ) -> TiffResult<Entry> {
        let tag = Tag::from_u16_exhaustive(reader.read_u16()?);
        let type_ = Type::from_u16_exhaustive(reader.read_u16()?);
        let count = reader.read_u32()?;

        let mut entry = Entry {
            tag,
            type_,
            count,
            value: 0,
            value2: 0,
            values: Vec::new(),
            values2: Vec::new(),
        };

        let slot_end = reader.stream_position()? + 4;

        match type_ {
            Type::BYTE | Type::ASCII => {
                if count <= 4 {
                    // The slot is consumed in full even when fewer elements
                    // are declared, keeping the cursor deterministic.
                    let mut inline = [0u8; 4];
                    reader.read_exact(&mut inline)?;
                    entry
                        .values
                        .extend(inline.iter().take(count as usize).map(|&b| u32::from(b)));
                } else {
                    let offset = u64::from(reader.read_u32()?);
                    if offset + u64::from(count) <= file_size {
                        reader.seek(SeekFrom::Start(offset))?;
                        let mut data = vec![0u8; count as usize];
                        reader.read_exact(&mut data)?;
                        entry.values.extend(data.into_iter().map(u32::from));
                    }
                }
            }
            Type::SHORT => {
                if count <= 2 {
                    for i in 0..2 {
                        let v = u32::from(reader.read_u16()?);
                        if i < count {
                            entry.values.push(v);
                        }
                    }
                } else {
                    let offset = u64::from(reader.read_u32()?);
                    if offset + u64::from(count) * 2 <= file_size {
                        reader.seek(SeekFrom::Start(offset))?;
                        for _ in 0..count {
                            entry.values.push(u32::from(reader.read_u16()?));
                        }
                    }
                }
            }
            Type::LONG => {
                if count <= 1 {
                    let v = reader.read_u32()?;
                    if count == 1 {
                        entry.values.push(v);
                    }
                } else {
                    let offset = u64::from(reader.read_u32()?);
                    if offset + u64::from(count) * 4 <= file_size {
                        reader.seek(SeekFrom::Start(offset))?;
                        for _ in 0..count {
                            entry.values.push(reader.read_u32()?);
                        }
                    }
                }
            }
            Type::RATIONAL => {
                // A numerator/denominator pair never fits the 4-byte slot.
                let offset = u64::from(reader.read_u32()?);
                if offset + u64::from(count) * 8 <= file_size {
                    reader.seek(SeekFrom::Start(offset))?;
                    for _ in 0..count {
                        entry.values.push(reader.read_u32()?);
                        entry.values2.push(reader.read_u32()?);
                    }
                }
            }
            Type::Unknown(ty) => {
                entry.value = reader.read_u32()?;
                trace!(tag = tag.to_u16(), ty, "entry with unrecognized type");
            }
        }

        if let Some(&first) = entry.values.first() {
            entry.value = first;
        }
        if let Some(&first) = entry.values2.first() {
            entry.value2 = first;
        }

        reader.seek(SeekFrom::Start(slot_end))?;

        Ok(entry)
    }
}
