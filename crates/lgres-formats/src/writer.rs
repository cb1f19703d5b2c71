//! Resource archive writer
//!
//! Archives are written in one forward pass: file header, payloads (each
//! padded to a 4-byte boundary), directory header and entries. The directory
//! offset is patched into the file header at the end. Payloads are always
//! stored unpacked.

use binrw::BinWrite;
use binrw::io::{Cursor, Seek, SeekFrom, Write};
use tracing::debug;

use crate::compound::CompoundBlockTable;
use crate::entry::{DirectoryEntry, ResourceFlags};
use crate::error::{ResError, Result};
use crate::header::{DirectoryHeader, FILE_HEADER_SIZE, FileHeader};
use crate::utils::{U24_MAX, padding_for};

/// Payload length of `chunks`, including the block table when `flags` is compound
pub fn payload_length<C: AsRef<[u8]>>(flags: ResourceFlags, chunks: &[C]) -> usize {
    let data: usize = chunks.iter().map(|chunk| chunk.as_ref().len()).sum();
    if flags.is_compound() {
        data + CompoundBlockTable::table_size(chunks.len())
    } else {
        data
    }
}

/// Streams resources into a new archive held in memory
#[derive(Debug)]
pub struct ResourceFileWriter {
    header: FileHeader,
    cursor: Cursor<Vec<u8>>,
    entries: Vec<DirectoryEntry>,
}

impl ResourceFileWriter {
    /// Start an archive whose header carries `comment`
    pub fn new(comment: &str) -> Result<Self> {
        let header = FileHeader::new(comment)?;
        let mut cursor = Cursor::new(Vec::new());
        header.write_le(&mut cursor)?;

        Ok(Self {
            header,
            cursor,
            entries: Vec::new(),
        })
    }

    /// Number of resources written so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no resource has been written
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append one resource payload
    ///
    /// `entry.length_packed` must equal the payload length of `chunks`. The
    /// entry is recorded with the Packed flag cleared.
    pub fn add_resource<C: AsRef<[u8]>>(
        &mut self,
        entry: &DirectoryEntry,
        chunks: &[C],
    ) -> Result<()> {
        let id = entry.id;
        let actual = payload_length(entry.flags, chunks);
        if actual > U24_MAX as usize {
            return Err(ResError::LengthOverflow { id, length: actual });
        }
        if actual != entry.length_packed as usize {
            return Err(ResError::LengthMismatch {
                id,
                declared: entry.length_packed,
                actual,
            });
        }

        if entry.flags.is_compound() {
            if chunks.len() > usize::from(u16::MAX) {
                return Err(ResError::TooManyBlocks {
                    id,
                    count: chunks.len(),
                });
            }
            CompoundBlockTable::from_lengths(chunks.iter().map(|c| c.as_ref().len()))
                .write_le(&mut self.cursor)?;
        }

        for chunk in chunks {
            self.cursor.write_all(chunk.as_ref())?;
        }

        // Every payload starts aligned, so its own length decides the padding
        let padding = padding_for(entry.length_packed as usize);
        self.cursor.write_all(&[0u8; 3][..padding])?;

        self.entries.push(DirectoryEntry::unpacked(
            id,
            entry.flags,
            entry.length_packed,
            entry.content_type,
        ));
        Ok(())
    }

    /// Write the directory, patch the header and return the archive bytes
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let entry_count = u16::try_from(self.entries.len())
            .map_err(|_| ResError::TooManyEntries(self.entries.len()))?;

        let directory_offset = self.cursor.stream_position()?;
        self.header.directory_offset = u32::try_from(directory_offset)
            .map_err(|_| ResError::ArchiveTooLarge(directory_offset))?;

        DirectoryHeader {
            entry_count,
            data_offset: FILE_HEADER_SIZE as u32,
        }
        .write(&mut self.cursor)?;
        for entry in &self.entries {
            entry.write_le(&mut self.cursor)?;
        }

        self.cursor.seek(SeekFrom::Start(0))?;
        self.header.write_le(&mut self.cursor)?;

        debug!(
            "wrote {} resources, directory at {:#X}",
            entry_count, directory_offset
        );

        Ok(self.cursor.into_inner())
    }
}
