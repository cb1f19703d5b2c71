//! Error types for LG resource archives

use thiserror::Error;

/// Errors that can occur when parsing, decoding or writing resource archives
#[derive(Debug, Error)]
pub enum ResError {
    /// File does not start with the `LG Res File v2\r\n` signature
    #[error("invalid file signature: expected \"LG Res File v2\\r\\n\", got {0:?}")]
    InvalidSignature(String),

    /// Data ends before a structure or payload is complete
    #[error("truncated {what} at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        /// Structure being read
        what: &'static str,
        /// Offset the structure starts at
        offset: usize,
        /// Bytes required
        needed: usize,
        /// Bytes remaining from `offset`
        available: usize,
    },

    /// Resource id is not present in the directory
    #[error("resource {0:#06X} not found")]
    ResourceNotFound(u16),

    /// Resource id appears twice in one directory
    #[error("duplicate resource {0:#06X} in directory")]
    DuplicateResource(u16),

    /// Non-zero block requested from a resource without a block table
    #[error("resource {id:#06X} is not compound, cannot access block {index}")]
    NotCompound {
        /// Resource id
        id: u16,
        /// Requested block index
        index: u16,
    },

    /// Block index outside the compound block table
    #[error("block index {index} out of range: resource has only {count} blocks")]
    BlockIndex {
        /// Requested block index
        index: u16,
        /// Number of blocks in the resource
        count: u16,
    },

    /// Compound block table offsets are inconsistent with the payload
    #[error("invalid block table: {0}")]
    InvalidBlockTable(String),

    /// Block length is not a whole number of records
    #[error("chunk length {length} is not divisible by record size {record_size}")]
    SizeMismatch {
        /// Block length in bytes
        length: usize,
        /// Size of one record in bytes
        record_size: usize,
    },

    /// Packed stream ran out of input before end-of-stream or the declared length
    #[error("packed stream truncated at byte {offset}")]
    TruncatedStream {
        /// Input offset where more data was required
        offset: usize,
    },

    /// Dictionary code points outside the decoded output
    #[error("dictionary code {value:#06X} references byte {offset} but only {position} bytes are decoded")]
    InvalidReference {
        /// Dictionary index (code - 0x0100)
        value: u16,
        /// Source offset of the referenced bytes
        offset: usize,
        /// Number of bytes decoded so far
        position: usize,
    },

    /// Header comment does not fit the 96-byte comment block
    #[error("comment is {0} bytes, at most 95 fit in the header")]
    CommentTooLong(usize),

    /// Header comment contains non-ASCII characters
    #[error("comment must be ASCII")]
    InvalidComment,

    /// Length does not fit the 24-bit directory field
    #[error("resource {id:#06X} length {length} exceeds the 24-bit limit")]
    LengthOverflow {
        /// Resource id
        id: u16,
        /// Offending length
        length: usize,
    },

    /// Declared directory length disagrees with the bytes being written
    #[error("resource {id:#06X} declares {declared} bytes but its payload is {actual} bytes")]
    LengthMismatch {
        /// Resource id
        id: u16,
        /// Length in the directory entry
        declared: u32,
        /// Bytes actually produced
        actual: usize,
    },

    /// Archive grew past the 32-bit offset range
    #[error("archive size {0} exceeds the 32-bit offset range")]
    ArchiveTooLarge(u64),

    /// More entries than a 16-bit directory count can describe
    #[error("too many resources for one directory: {0}")]
    TooManyEntries(usize),

    /// More blocks than a 16-bit block count can describe
    #[error("resource {id:#06X} has too many blocks: {count}")]
    TooManyBlocks {
        /// Resource id
        id: u16,
        /// Number of chunks
        count: usize,
    },

    /// Binary read/write error
    #[error("binary parsing error: {0}")]
    BinRw(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<binrw::Error> for ResError {
    fn from(e: binrw::Error) -> Self {
        Self::BinRw(e.to_string())
    }
}

/// Result type alias for resource archive operations
pub type Result<T> = std::result::Result<T, ResError>;
