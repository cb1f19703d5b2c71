//! Compound resource block tables
//!
//! A compound payload starts with a `u16` block count followed by
//! `block_count + 1` cumulative `u32` offsets. Offsets are measured from the
//! start of the unpacked payload, so the first one normally equals the table
//! size. The table itself is never compressed.

use std::ops::Range;

use binrw::io::{Seek, Write};
use binrw::{BinResult, BinWrite};

use crate::error::{ResError, Result};

/// Block table of a compound resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundBlockTable {
    /// `block_count + 1` cumulative offsets
    pub offsets: Vec<u32>,
}

impl CompoundBlockTable {
    /// Serialized size of a table describing `block_count` blocks
    pub const fn table_size(block_count: usize) -> usize {
        2 + (block_count + 1) * 4
    }

    /// Read the table at the start of `payload`
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let count_bytes: [u8; 2] = payload
            .get(..2)
            .and_then(|b| b.try_into().ok())
            .ok_or(ResError::Truncated {
                what: "block count",
                offset: 0,
                needed: 2,
                available: payload.len(),
            })?;
        let block_count = usize::from(u16::from_le_bytes(count_bytes));

        let size = Self::table_size(block_count);
        let table = payload.get(2..size).ok_or(ResError::Truncated {
            what: "block table",
            offset: 0,
            needed: size,
            available: payload.len(),
        })?;

        let offsets: Vec<u32> = table
            .chunks_exact(4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        if offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(ResError::InvalidBlockTable(format!(
                "offsets are not ascending: {offsets:?}"
            )));
        }

        Ok(Self { offsets })
    }

    /// Build a table for blocks of the given lengths, laid out directly after the table
    pub fn from_lengths<I>(lengths: I) -> Self
    where
        I: IntoIterator<Item = usize>,
        I::IntoIter: ExactSizeIterator,
    {
        let lengths = lengths.into_iter();
        let mut offset = Self::table_size(lengths.len()) as u32;
        let mut offsets = Vec::with_capacity(lengths.len() + 1);
        offsets.push(offset);
        for length in lengths {
            offset += length as u32;
            offsets.push(offset);
        }
        Self { offsets }
    }

    /// Number of blocks
    pub fn block_count(&self) -> u16 {
        self.offsets.len().saturating_sub(1) as u16
    }

    /// Serialized size of this table
    pub fn size(&self) -> usize {
        Self::table_size(usize::from(self.block_count()))
    }

    /// Byte range of block `index` within the unpacked payload
    pub fn block_range(&self, index: u16) -> Result<Range<usize>> {
        let count = self.block_count();
        if index >= count {
            return Err(ResError::BlockIndex { index, count });
        }
        let i = usize::from(index);
        Ok(self.offsets[i] as usize..self.offsets[i + 1] as usize)
    }

    /// Byte ranges of all blocks, in order
    pub fn block_ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.offsets
            .windows(2)
            .map(|w| w[0] as usize..w[1] as usize)
    }
}

impl BinWrite for CompoundBlockTable {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        self.block_count().write_options(writer, endian, ())?;
        for offset in &self.offsets {
            offset.write_options(writer, endian, ())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::io::Cursor;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_from_lengths() {
        let table = CompoundBlockTable::from_lengths([10usize, 0, 5]);
        assert_eq!(table.block_count(), 3);
        assert_eq!(table.size(), 18);
        assert_eq!(table.offsets, vec![18, 28, 28, 33]);
        assert_eq!(table.block_range(2).unwrap(), 28..33);

        let ranges: Vec<_> = table.block_ranges().collect();
        assert_eq!(ranges, vec![18..28, 28..28, 28..33]);
    }

    #[test]
    fn test_table_bytes() {
        let table = CompoundBlockTable::from_lengths([1usize]);
        let mut buf = Vec::new();
        table
            .write_options(&mut Cursor::new(&mut buf), binrw::Endian::Little, ())
            .expect("Should write table");
        assert_eq!(buf, [1, 0, 10, 0, 0, 0, 11, 0, 0, 0]);

        buf.push(0xAA);
        let parsed = CompoundBlockTable::parse(&buf).expect("Should parse table");
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_block_index_out_of_range() {
        let table = CompoundBlockTable::from_lengths([4usize, 4]);
        assert!(matches!(
            table.block_range(2),
            Err(ResError::BlockIndex { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_reject_truncated_table() {
        assert!(matches!(
            CompoundBlockTable::parse(&[3]),
            Err(ResError::Truncated { .. })
        ));
        // Claims two blocks but carries only two offsets
        assert!(matches!(
            CompoundBlockTable::parse(&[2, 0, 14, 0, 0, 0, 15, 0, 0, 0]),
            Err(ResError::Truncated { .. })
        ));
    }

    #[test]
    fn test_reject_descending_offsets() {
        let bytes = [2, 0, 14, 0, 0, 0, 20, 0, 0, 0, 16, 0, 0, 0];
        assert!(matches!(
            CompoundBlockTable::parse(&bytes),
            Err(ResError::InvalidBlockTable(_))
        ));
    }
}
