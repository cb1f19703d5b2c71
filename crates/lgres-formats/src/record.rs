//! Fixed-size records stored inside resource blocks

use binrw::{BinRead, BinWrite};

/// Record with a fixed on-disk size, read little-endian
pub trait FixedRecord: for<'a> BinRead<Args<'a> = ()> {
    /// Size of one record in bytes
    const SIZE: usize;
}

impl FixedRecord for u8 {
    const SIZE: usize = 1;
}

impl FixedRecord for u16 {
    const SIZE: usize = 2;
}

impl FixedRecord for u32 {
    const SIZE: usize = 4;
}

/// One palette entry
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[brw(little)]
pub struct PaletteColor {
    /// Red component
    pub red: u8,
    /// Green component
    pub green: u8,
    /// Blue component
    pub blue: u8,
}

impl FixedRecord for PaletteColor {
    const SIZE: usize = 3;
}
