//! File header and directory header structures
//!
//! The file header is a fixed 128-byte block at offset 0:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0      | 16   | Signature `LG Res File v2\r\n` |
//! | 16     | 96   | ASCII comment, terminated by CTRL-Z |
//! | 112    | 12   | Reserved |
//! | 124    | 4    | Directory offset (u32 LE) |
//!
//! The directory header sits at the directory offset and is followed by the
//! directory entries.

use binrw::io::{Read, Seek, Write};
use binrw::{BinRead, BinResult, BinWrite};

use crate::error::{ResError, Result};

/// File signature every archive starts with
pub const FILE_SIGNATURE: [u8; SIGNATURE_LENGTH] = *b"LG Res File v2\r\n";

/// Length of the signature block
pub const SIGNATURE_LENGTH: usize = 16;

/// Length of the comment block
pub const COMMENT_LENGTH: usize = 96;

/// Length of the reserved block
pub const RESERVED_LENGTH: usize = 12;

/// Total size of the file header
pub const FILE_HEADER_SIZE: usize = SIGNATURE_LENGTH + COMMENT_LENGTH + RESERVED_LENGTH + 4;

/// Size of the directory header
pub const DIRECTORY_HEADER_SIZE: usize = 6;

/// Terminator written after the comment text
const CTRL_Z: u8 = 0x1A;

/// Archive file header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// Signature bytes
    pub signature: [u8; SIGNATURE_LENGTH],
    /// Raw comment block
    pub comment: [u8; COMMENT_LENGTH],
    /// Reserved bytes, preserved as read
    pub reserved: [u8; RESERVED_LENGTH],
    /// Absolute offset of the directory header
    pub directory_offset: u32,
}

impl FileHeader {
    /// Create a header with the standard signature and the given comment
    ///
    /// The comment is followed by a CTRL-Z terminator, so at most 95 ASCII
    /// bytes fit.
    pub fn new(comment: &str) -> Result<Self> {
        if !comment.is_ascii() {
            return Err(ResError::InvalidComment);
        }
        let bytes = comment.as_bytes();
        if bytes.len() >= COMMENT_LENGTH {
            return Err(ResError::CommentTooLong(bytes.len()));
        }

        let mut block = [0u8; COMMENT_LENGTH];
        block[..bytes.len()].copy_from_slice(bytes);
        block[bytes.len()] = CTRL_Z;

        Ok(Self {
            signature: FILE_SIGNATURE,
            comment: block,
            reserved: [0; RESERVED_LENGTH],
            directory_offset: 0,
        })
    }

    /// Comment text up to the first CTRL-Z or NUL
    pub fn comment(&self) -> String {
        let end = self
            .comment
            .iter()
            .position(|&b| b == CTRL_Z || b == 0)
            .unwrap_or(COMMENT_LENGTH);
        String::from_utf8_lossy(&self.comment[..end]).into_owned()
    }

    /// Check the signature
    pub fn validate(&self) -> Result<()> {
        if self.signature != FILE_SIGNATURE {
            return Err(ResError::InvalidSignature(
                String::from_utf8_lossy(&self.signature).into_owned(),
            ));
        }
        Ok(())
    }
}

impl BinRead for FileHeader {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let mut signature = [0u8; SIGNATURE_LENGTH];
        reader.read_exact(&mut signature)?;

        let mut comment = [0u8; COMMENT_LENGTH];
        reader.read_exact(&mut comment)?;

        let mut reserved = [0u8; RESERVED_LENGTH];
        reader.read_exact(&mut reserved)?;

        let directory_offset = u32::read_options(reader, endian, ())?;

        Ok(Self {
            signature,
            comment,
            reserved,
            directory_offset,
        })
    }
}

impl BinWrite for FileHeader {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        writer.write_all(&self.signature)?;
        writer.write_all(&self.comment)?;
        writer.write_all(&self.reserved)?;
        self.directory_offset.write_options(writer, endian, ())?;
        Ok(())
    }
}

/// Directory header preceding the directory entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct DirectoryHeader {
    /// Number of directory entries
    pub entry_count: u16,
    /// Absolute offset of the first resource payload
    pub data_offset: u32,
}
