//! Little-endian 24-bit integers and payload alignment

use binrw::io::{Read, Write};

/// Largest value a 24-bit length field can hold
pub const U24_MAX: u32 = 0x00FF_FFFF;

/// Payload alignment inside the data region
pub const PAYLOAD_ALIGNMENT: usize = 4;

/// Decode a little-endian 24-bit unsigned integer
pub const fn u24_from_le_bytes(bytes: [u8; 3]) -> u32 {
    (bytes[0] as u32) | ((bytes[1] as u32) << 8) | ((bytes[2] as u32) << 16)
}

/// Encode the low 24 bits of `value` as little-endian bytes
pub const fn u24_to_le_bytes(value: u32) -> [u8; 3] {
    [value as u8, (value >> 8) as u8, (value >> 16) as u8]
}

/// Read a little-endian 24-bit unsigned integer
pub fn read_u24_le<R: Read>(reader: &mut R) -> std::io::Result<u32> {
    let mut bytes = [0u8; 3];
    reader.read_exact(&mut bytes)?;
    Ok(u24_from_le_bytes(bytes))
}

/// Write a little-endian 24-bit unsigned integer
pub fn write_u24_le<W: Write>(writer: &mut W, value: u32) -> std::io::Result<()> {
    writer.write_all(&u24_to_le_bytes(value))
}

/// Round `offset` up to the next multiple of 4
pub const fn align4(offset: usize) -> usize {
    (offset + 3) & !0x3
}

/// Number of zero bytes that follow a payload of `length` bytes
pub const fn padding_for(length: usize) -> usize {
    (PAYLOAD_ALIGNMENT - (length & 0x3)) & 0x3
}
