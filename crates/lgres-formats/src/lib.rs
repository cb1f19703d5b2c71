//! Parser and writer for LG Res File v2 resource archives
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::use_self)] // Type clarity
//! Resource archives bundle game content (palettes, strings, images, fonts,
//! movies, maps) under 16-bit resource ids. This crate reads the container
//! layout, decodes packed payloads and writes new archives.
//!
//! # Layout
//!
//! - **File header** (128 bytes): signature, comment, reserved bytes and the
//!   directory offset
//! - **Payload region**: one payload per resource, each padded to 4 bytes
//! - **Directory**: entry count, payload start, then one 10-byte entry per
//!   resource with 24-bit lengths
//!
//! Compound resources start with a block table that splits the payload into
//! independently addressable blocks. Packed resources use a 14-bit dictionary
//! code stream, see [`unpack`].
//!
//! # Example
//!
//! ```rust,no_run
//! use lgres_formats::{ContentType, DirectoryEntry, ResourceFile, ResourceFileWriter, ResourceFlags};
//! use lgres_formats::writer::payload_length;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let chunks = [b"hello".to_vec()];
//! let flags = ResourceFlags::default();
//! let entry = DirectoryEntry::unpacked(
//!     10,
//!     flags,
//!     payload_length(flags, &chunks) as u32,
//!     ContentType::String,
//! );
//!
//! let mut writer = ResourceFileWriter::new("example")?;
//! writer.add_resource(&entry, &chunks)?;
//! let data = writer.finish()?;
//!
//! let file = ResourceFile::parse(&data)?;
//! assert_eq!(file.block(10, 0)?, b"hello");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod archive;
pub mod compound;
pub mod entry;
pub mod error;
pub mod header;
pub mod record;
pub mod unpack;
pub mod utils;
pub mod writer;

pub use archive::{ResourceFile, ResourceInfo};
pub use compound::CompoundBlockTable;
pub use entry::{ContentType, DirectoryEntry, ResourceFlags};
pub use error::{ResError, Result};
pub use header::{DirectoryHeader, FILE_SIGNATURE, FileHeader};
pub use record::{FixedRecord, PaletteColor};
pub use writer::ResourceFileWriter;
