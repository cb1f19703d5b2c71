//! Resource archive reader

use std::collections::HashMap;
use std::ops::Range;

use binrw::BinRead;
use binrw::io::{Cursor, Seek, SeekFrom};
use tracing::debug;

use crate::compound::CompoundBlockTable;
use crate::entry::{DIRECTORY_ENTRY_SIZE, DirectoryEntry};
use crate::error::{ResError, Result};
use crate::header::{DIRECTORY_HEADER_SIZE, DirectoryHeader, FILE_HEADER_SIZE, FileHeader};
use crate::record::FixedRecord;
use crate::unpack::unpack;
use crate::utils::align4;

/// Directory entry together with its payload location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceInfo {
    /// Directory record
    pub entry: DirectoryEntry,
    /// Absolute offset of the payload
    pub data_offset: usize,
}

impl ResourceInfo {
    fn payload_range(&self) -> Range<usize> {
        self.data_offset..self.data_offset + self.entry.length_packed as usize
    }
}

/// Parsed view over the bytes of one archive
///
/// Borrows the archive buffer; payloads are decoded on access.
#[derive(Debug)]
pub struct ResourceFile<'a> {
    data: &'a [u8],
    header: FileHeader,
    directory: DirectoryHeader,
    resources: Vec<ResourceInfo>,
    index: HashMap<u16, usize>,
}

impl<'a> ResourceFile<'a> {
    /// Parse the header and directory of an archive
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < FILE_HEADER_SIZE {
            return Err(ResError::InvalidSignature(
                String::from_utf8_lossy(&data[..data.len().min(16)]).into_owned(),
            ));
        }

        let mut cursor = Cursor::new(data);
        let header = FileHeader::read_le(&mut cursor)?;
        header.validate()?;

        let directory_offset = header.directory_offset as usize;
        check_bounds(data, "directory header", directory_offset, DIRECTORY_HEADER_SIZE)?;
        cursor.seek(SeekFrom::Start(directory_offset as u64))?;
        let directory = DirectoryHeader::read(&mut cursor)?;

        let entry_count = usize::from(directory.entry_count);
        check_bounds(
            data,
            "directory",
            directory_offset + DIRECTORY_HEADER_SIZE,
            entry_count * DIRECTORY_ENTRY_SIZE,
        )?;

        debug!(
            "directory at {:#X}: {} entries, data at {:#X}",
            directory_offset, entry_count, directory.data_offset
        );

        let mut resources = Vec::with_capacity(entry_count);
        let mut index = HashMap::with_capacity(entry_count);
        let mut data_offset = directory.data_offset as usize;

        for position in 0..entry_count {
            let entry = DirectoryEntry::read_le(&mut cursor)?;
            if index.insert(entry.id, position).is_some() {
                return Err(ResError::DuplicateResource(entry.id));
            }

            let info = ResourceInfo { entry, data_offset };
            let range = info.payload_range();
            check_bounds(data, "resource payload", range.start, range.len())?;

            resources.push(info);
            data_offset = align4(data_offset + entry.length_packed as usize);
        }

        Ok(Self {
            data,
            header,
            directory,
            resources,
            index,
        })
    }

    /// File header
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Directory header
    pub fn directory(&self) -> &DirectoryHeader {
        &self.directory
    }

    /// All resources in directory order
    pub fn resources(&self) -> &[ResourceInfo] {
        &self.resources
    }

    /// Number of resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Whether `id` is present
    pub fn contains(&self, id: u16) -> bool {
        self.index.contains_key(&id)
    }

    /// Location and metadata of resource `id`
    pub fn resource_info(&self, id: u16) -> Result<&ResourceInfo> {
        self.index
            .get(&id)
            .map(|&position| &self.resources[position])
            .ok_or(ResError::ResourceNotFound(id))
    }

    /// Number of blocks: the table's count for compound resources, otherwise 1
    pub fn block_count(&self, id: u16) -> Result<u16> {
        let info = self.resource_info(id)?;
        if info.entry.flags.is_compound() {
            Ok(CompoundBlockTable::parse(self.raw(info))?.block_count())
        } else {
            Ok(1)
        }
    }

    /// Decoded bytes of one block
    pub fn block(&self, id: u16, block_index: u16) -> Result<Vec<u8>> {
        let info = self.resource_info(id)?;
        let entry = &info.entry;
        let raw = self.raw(info);

        if !entry.flags.is_compound() {
            if block_index != 0 {
                return Err(ResError::NotCompound {
                    id,
                    index: block_index,
                });
            }
            return if entry.flags.is_packed() {
                unpack(raw, entry.length_unpacked as usize, 0)
            } else {
                Ok(raw.to_vec())
            };
        }

        let table = CompoundBlockTable::parse(raw)?;
        let range = table.block_range(block_index)?;

        if entry.flags.is_packed() {
            let header_size = table.size();
            if range.start < header_size {
                return Err(ResError::InvalidBlockTable(format!(
                    "block {block_index} starts at {} inside the {header_size}-byte table",
                    range.start
                )));
            }
            check_block(entry, &range)?;
            unpack(&raw[header_size..], range.len(), range.start - header_size)
        } else {
            raw.get(range.clone())
                .map(<[u8]>::to_vec)
                .ok_or_else(|| block_out_of_payload(entry, &range))
        }
    }

    /// Decoded bytes of every block, in order
    pub fn blocks(&self, id: u16) -> Result<Vec<Vec<u8>>> {
        let info = self.resource_info(id)?;
        let entry = &info.entry;
        let raw = self.raw(info);

        if !entry.flags.is_compound() {
            return Ok(vec![self.block(id, 0)?]);
        }

        let table = CompoundBlockTable::parse(raw)?;

        if entry.flags.is_packed() {
            let header_size = table.size();
            let unpacked_length = (entry.length_unpacked as usize)
                .checked_sub(header_size)
                .ok_or_else(|| {
                    ResError::InvalidBlockTable(format!(
                        "unpacked length {} is smaller than the {header_size}-byte table",
                        entry.length_unpacked
                    ))
                })?;
            let unpacked = unpack(&raw[header_size..], unpacked_length, 0)?;

            table
                .block_ranges()
                .map(|range| {
                    if range.start < header_size {
                        return Err(block_out_of_payload(entry, &range));
                    }
                    unpacked
                        .get(range.start - header_size..range.end - header_size)
                        .map(<[u8]>::to_vec)
                        .ok_or_else(|| block_out_of_payload(entry, &range))
                })
                .collect()
        } else {
            table
                .block_ranges()
                .map(|range| {
                    raw.get(range.clone())
                        .map(<[u8]>::to_vec)
                        .ok_or_else(|| block_out_of_payload(entry, &range))
                })
                .collect()
        }
    }

    /// Interpret one block as an array of fixed-size records
    pub fn read_records<T: FixedRecord>(&self, id: u16, block_index: u16) -> Result<Vec<T>> {
        let block = self.block(id, block_index)?;
        if T::SIZE > block.len() || block.len() % T::SIZE != 0 {
            return Err(ResError::SizeMismatch {
                length: block.len(),
                record_size: T::SIZE,
            });
        }

        let mut cursor = Cursor::new(&block);
        (0..block.len() / T::SIZE)
            .map(|_| T::read_le(&mut cursor).map_err(ResError::from))
            .collect()
    }

    /// Read a single record from the start of a block
    pub fn read_record<T: FixedRecord>(&self, id: u16, block_index: u16) -> Result<T> {
        let block = self.block(id, block_index)?;
        if T::SIZE > block.len() {
            return Err(ResError::SizeMismatch {
                length: block.len(),
                record_size: T::SIZE,
            });
        }
        Ok(T::read_le(&mut Cursor::new(&block))?)
    }

    fn raw(&self, info: &ResourceInfo) -> &'a [u8] {
        // Ranges were bounds-checked in `parse`
        &self.data[info.payload_range()]
    }
}

fn check_bounds(data: &[u8], what: &'static str, offset: usize, needed: usize) -> Result<()> {
    let available = data.len().saturating_sub(offset);
    if needed > available {
        return Err(ResError::Truncated {
            what,
            offset,
            needed,
            available,
        });
    }
    Ok(())
}

fn check_block(entry: &DirectoryEntry, range: &Range<usize>) -> Result<()> {
    if range.end > entry.length_unpacked as usize {
        return Err(block_out_of_payload(entry, range));
    }
    Ok(())
}

fn block_out_of_payload(entry: &DirectoryEntry, range: &Range<usize>) -> ResError {
    ResError::InvalidBlockTable(format!(
        "block {}..{} lies outside the {}-byte payload of resource {:#06X}",
        range.start, range.end, entry.length_unpacked, entry.id
    ))
}
