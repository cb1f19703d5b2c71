//! Directory entries, resource flags and content types

use binrw::io::{Read, Seek, Write};
use binrw::{BinRead, BinResult, BinWrite};
use std::fmt;

use crate::utils::{read_u24_le, write_u24_le};

/// Size of one directory entry on disk
pub const DIRECTORY_ENTRY_SIZE: usize = 10;

/// Resource flag bitset
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResourceFlags {
    /// Raw flag value
    pub value: u8,
}

impl ResourceFlags {
    /// No flags
    pub const NONE: u8 = 0x00;

    /// Payload is dictionary-compressed
    pub const PACKED: u8 = 0x01;

    /// Payload starts with a block table
    pub const COMPOUND: u8 = 0x02;

    /// Engine loads the resource when the archive is opened
    pub const LOAD_ON_OPEN: u8 = 0x08;

    /// Create flags from a raw value
    pub const fn new(value: u8) -> Self {
        Self { value }
    }

    /// Check if flag is set
    pub const fn has(&self, flag: u8) -> bool {
        (self.value & flag) != 0
    }

    /// Set flag
    pub fn set(&mut self, flag: u8) {
        self.value |= flag;
    }

    /// Clear flag
    pub fn clear(&mut self, flag: u8) {
        self.value &= !flag;
    }

    /// Copy of these flags with `flag` cleared
    #[must_use]
    pub const fn without(self, flag: u8) -> Self {
        Self {
            value: self.value & !flag,
        }
    }

    /// Payload is packed
    pub const fn is_packed(&self) -> bool {
        self.has(Self::PACKED)
    }

    /// Payload is compound
    pub const fn is_compound(&self) -> bool {
        self.has(Self::COMPOUND)
    }
}

impl fmt::Display for ResourceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.has(Self::PACKED) {
            names.push("Packed");
        }
        if self.has(Self::COMPOUND) {
            names.push("Compound");
        }
        if self.has(Self::LOAD_ON_OPEN) {
            names.push("LoadOnOpen");
        }
        if names.is_empty() {
            write!(f, "None")
        } else {
            write!(f, "{}", names.join(" | "))
        }
    }
}

/// Resource content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Colour palette
    Palette,
    /// Text strings
    String,
    /// Bitmap image
    Image,
    /// Font
    Font,
    /// Animation
    Animation,
    /// VOC sound
    Voc,
    /// 3D object
    Obj3D,
    /// Movie
    Movie,
    /// Level map
    Map,
    /// Reserved or unrecognised value, preserved as read
    Unknown(u8),
}

impl ContentType {
    /// Parse from byte value
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => Self::Palette,
            0x01 => Self::String,
            0x02 => Self::Image,
            0x03 => Self::Font,
            0x04 => Self::Animation,
            0x07 => Self::Voc,
            0x0F => Self::Obj3D,
            0x11 => Self::Movie,
            0x30 => Self::Map,
            other => Self::Unknown(other),
        }
    }

    /// Byte value on disk
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Palette => 0x00,
            Self::String => 0x01,
            Self::Image => 0x02,
            Self::Font => 0x03,
            Self::Animation => 0x04,
            Self::Voc => 0x07,
            Self::Obj3D => 0x0F,
            Self::Movie => 0x11,
            Self::Map => 0x30,
            Self::Unknown(other) => other,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(value) => write!(f, "Unknown({value:#04X})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// One directory record
///
/// Layout (10 bytes, little-endian):
/// `u16` id, `u24` unpacked length, `u8` flags, `u24` packed length,
/// `u8` content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Resource id
    pub id: u16,
    /// Decoded payload length, including a compound block table
    pub length_unpacked: u32,
    /// Flags
    pub flags: ResourceFlags,
    /// On-disk payload length
    pub length_packed: u32,
    /// Content type
    pub content_type: ContentType,
}

impl DirectoryEntry {
    /// Entry for an unpacked payload of `length` bytes
    pub const fn unpacked(
        id: u16,
        flags: ResourceFlags,
        length: u32,
        content_type: ContentType,
    ) -> Self {
        Self {
            id,
            length_unpacked: length,
            flags: flags.without(ResourceFlags::PACKED),
            length_packed: length,
            content_type,
        }
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Id = {:#06X}, LengthUnpacked = {}, Flags = {}, LengthPacked = {}, ContentType = {}",
            self.id, self.length_unpacked, self.flags, self.length_packed, self.content_type
        )
    }
}

impl BinRead for DirectoryEntry {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let id = u16::read_options(reader, endian, ())?;
        let length_unpacked = read_u24_le(reader)?;
        let flags = ResourceFlags::read_options(reader, endian, ())?;
        let length_packed = read_u24_le(reader)?;
        let content_type = ContentType::from_byte(u8::read_options(reader, endian, ())?);

        Ok(Self {
            id,
            length_unpacked,
            flags,
            length_packed,
            content_type,
        })
    }
}

impl BinWrite for DirectoryEntry {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        self.id.write_options(writer, endian, ())?;
        write_u24_le(writer, self.length_unpacked)?;
        self.flags.write_options(writer, endian, ())?;
        write_u24_le(writer, self.length_packed)?;
        writer.write_all(&[self.content_type.to_byte()])?;
        Ok(())
    }
}
