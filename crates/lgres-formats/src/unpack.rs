//! Dictionary decompression for packed resources
//!
//! Packed payloads are a stream of 14-bit codes stored most-significant-bit
//! first. Codes below `0x0100` are literal bytes. `0x3FFF` ends the stream and
//! `0x3FFE` resets the dictionary. Every other code `c` refers to dictionary
//! entry `c - 0x0100`.
//!
//! Each code read (literal or not) defines one dictionary entry, indexed by
//! its position in the stream since the last reset. The entry remembers where
//! that code's output began and, for dictionary codes, which entry the code
//! referred to. Expanding an entry copies its own output plus the first byte
//! of the output that followed it, so its length is one more than the length
//! of the entry it refers to (or 2 for an entry created by a literal).

use tracing::debug;

use crate::error::{ResError, Result};

/// Code that terminates the stream
pub const END_OF_STREAM: u16 = 0x3FFF;

/// Code that clears the dictionary
pub const RESET_DICTIONARY: u16 = 0x3FFE;

/// First dictionary code; everything below is a literal byte
pub const FIRST_REFERENCE: u16 = 0x0100;

/// Number of dictionary entries
pub const DICTIONARY_SIZE: usize = (RESET_DICTIONARY - 0x00FF) as usize;

/// Width of one code in bits
const CODE_BITS: u32 = 14;

/// Reads 14-bit codes MSB-first from a byte slice
struct CodeReader<'a> {
    data: &'a [u8],
    position: usize,
    buffer: u32,
    bits: u32,
}

impl<'a> CodeReader<'a> {
    const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            buffer: 0,
            bits: 0,
        }
    }

    fn next_code(&mut self) -> Result<u16> {
        while self.bits < CODE_BITS {
            let byte = *self
                .data
                .get(self.position)
                .ok_or(ResError::TruncatedStream {
                    offset: self.position,
                })?;
            self.position += 1;
            self.buffer = (self.buffer << 8) | u32::from(byte);
            self.bits += 8;
        }

        self.bits -= CODE_BITS;
        let code = (self.buffer >> self.bits) & 0x3FFF;
        // Drop consumed bits so the buffer never grows past 21 bits
        self.buffer &= (1 << self.bits) - 1;
        Ok(code as u16)
    }
}

/// Back-reference dictionary state
struct Dictionary {
    offset: Vec<usize>,
    reference: Vec<Option<u16>>,
    length: Vec<usize>,
    next_index: usize,
}

impl Dictionary {
    fn new() -> Self {
        Self {
            offset: vec![0; DICTIONARY_SIZE],
            reference: vec![None; DICTIONARY_SIZE],
            length: vec![1; DICTIONARY_SIZE],
            next_index: 0,
        }
    }

    fn reset(&mut self) {
        self.offset.fill(0);
        self.reference.fill(None);
        self.length.fill(1);
        self.next_index = 0;
    }

    /// Record the entry created by `code`, whose output starts at `position`
    fn record(&mut self, code: u16, position: usize) {
        let index = self.next_index;
        if index < DICTIONARY_SIZE {
            self.offset[index] = position;
            if code >= FIRST_REFERENCE {
                self.reference[index] = Some(code - FIRST_REFERENCE);
            }
        }
        self.next_index += 1;
    }

    /// Expansion length of entry `value`, computed on first use
    fn expansion_length(&mut self, value: u16) -> usize {
        let v = usize::from(value);
        if self.length[v] == 1 {
            self.length[v] += match self.reference[v] {
                Some(reference) => self.length[usize::from(reference)],
                None => 1,
            };
        }
        self.length[v]
    }
}

/// Decode a packed stream
///
/// Produces `unpacked_length` bytes, discarding the first `skip` decoded
/// bytes. Skipped bytes still enter the history window because later codes
/// may copy from them. Decoding stops at the end-of-stream code or once
/// `skip + unpacked_length` bytes are decoded; a stream that ends early
/// leaves the remainder zero-filled.
pub fn unpack(packed: &[u8], unpacked_length: usize, skip: usize) -> Result<Vec<u8>> {
    let limit = skip + unpacked_length;
    let mut output: Vec<u8> = Vec::with_capacity(limit);
    let mut dictionary = Dictionary::new();
    let mut reader = CodeReader::new(packed);

    while output.len() < limit {
        let code = reader.next_code()?;

        match code {
            END_OF_STREAM => break,
            RESET_DICTIONARY => dictionary.reset(),
            literal if literal < FIRST_REFERENCE => {
                dictionary.record(code, output.len());
                output.push(literal as u8);
            }
            _ => {
                dictionary.record(code, output.len());

                let value = code - FIRST_REFERENCE;
                let length = dictionary.expansion_length(value);
                let start = dictionary.offset[usize::from(value)];

                for i in 0..length {
                    if output.len() >= limit {
                        break;
                    }
                    let byte = *output.get(start + i).ok_or(ResError::InvalidReference {
                        value,
                        offset: start + i,
                        position: output.len(),
                    })?;
                    output.push(byte);
                }
            }
        }
    }

    if output.len() < limit {
        debug!(
            "packed stream ended after {} of {} bytes, zero-filling",
            output.len(),
            limit
        );
        output.resize(limit, 0);
    }

    Ok(output.split_off(skip))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    /// Pack a code sequence into the 14-bit MSB-first bitstream
    pub(crate) fn pack_codes(codes: &[u16]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut buffer: u32 = 0;
        let mut bits = 0u32;
        for &code in codes {
            buffer = (buffer << 14) | u32::from(code & 0x3FFF);
            bits += 14;
            while bits >= 8 {
                bits -= 8;
                out.push((buffer >> bits) as u8);
            }
            buffer &= (1 << bits) - 1;
        }
        if bits > 0 {
            out.push((buffer << (8 - bits)) as u8);
        }
        out
    }

    fn r(value: u16) -> u16 {
        FIRST_REFERENCE + value
    }

    #[test]
    fn test_code_reader_bit_order() {
        // 0x0041 and 0x3FFF packed MSB-first: 00000001 00000111 11111111 1111xxxx
        let data = pack_codes(&[0x41, END_OF_STREAM]);
        assert_eq!(data, [0x01, 0x07, 0xFF, 0xF0]);

        let mut reader = CodeReader::new(&data);
        assert_eq!(reader.next_code().unwrap(), 0x41);
        assert_eq!(reader.next_code().unwrap(), END_OF_STREAM);
        assert!(reader.next_code().is_err());
    }

    #[test]
    fn test_literals() {
        let data = pack_codes(&[b'a'.into(), b'b'.into(), b'c'.into(), END_OF_STREAM]);
        assert_eq!(unpack(&data, 3, 0).unwrap(), b"abc");
    }

    #[test]
    fn test_back_reference_to_literal_entry() {
        // Entry 0 = "a" + next byte "b"
        let data = pack_codes(&[b'a'.into(), b'b'.into(), r(0), END_OF_STREAM]);
        assert_eq!(unpack(&data, 4, 0).unwrap(), b"abab");
    }

    #[test]
    fn test_chained_references() {
        // Entry 2 was produced by r(0) ("ab"), so expanding it yields "ab" + "a"
        let codes = [b'a'.into(), b'b'.into(), r(0), r(2), END_OF_STREAM];
        assert_eq!(unpack(&pack_codes(&codes), 7, 0).unwrap(), b"abababa");
    }

    #[test]
    fn test_overlapping_copy() {
        // Expanding entry 1 reads bytes written by the same copy
        let codes = [b'a'.into(), r(0), r(1), END_OF_STREAM];
        assert_eq!(unpack(&pack_codes(&codes), 6, 0).unwrap(), b"aaaaaa");
    }

    #[test]
    fn test_stops_at_declared_length() {
        let codes = [b'a'.into(), b'b'.into(), r(0), END_OF_STREAM];
        assert_eq!(unpack(&pack_codes(&codes), 3, 0).unwrap(), b"aba");
    }

    #[test]
    fn test_short_stream_is_zero_filled() {
        let data = pack_codes(&[b'x'.into(), END_OF_STREAM]);
        assert_eq!(unpack(&data, 3, 0).unwrap(), [b'x', 0, 0]);
    }

    #[test]
    fn test_skip_discards_prefix() {
        let codes = [b'a'.into(), b'b'.into(), r(0), b'c'.into(), END_OF_STREAM];
        let data = pack_codes(&codes);
        assert_eq!(unpack(&data, 5, 0).unwrap(), b"ababc");
        assert_eq!(unpack(&data, 2, 2).unwrap(), b"ab");
        assert_eq!(unpack(&data, 3, 2).unwrap(), b"abc");
    }

    #[test]
    fn test_skip_keeps_history_for_references() {
        // Second half copies from the skipped first half
        let codes = [b'x'.into(), b'y'.into(), b'z'.into(), r(0), r(1), END_OF_STREAM];
        let data = pack_codes(&codes);
        let full = unpack(&data, 7, 0).unwrap();
        assert_eq!(full, b"xyzxyyz");
        assert_eq!(unpack(&data, 4, 3).unwrap(), &full[3..]);
    }

    #[test]
    fn test_dictionary_reset() {
        let tail = [b'q'.into(), b'r'.into(), r(0), r(1), END_OF_STREAM];
        let expected_tail = unpack(&pack_codes(&tail), 6, 0).unwrap();

        let mut codes = vec![b'a'.into(), b'b'.into(), r(0), RESET_DICTIONARY];
        codes.extend_from_slice(&tail);
        let combined = unpack(&pack_codes(&codes), 4 + 6, 0).unwrap();

        assert_eq!(&combined[..4], b"abab");
        assert_eq!(&combined[4..], &expected_tail[..]);
    }

    #[test]
    fn test_truncated_stream() {
        let data = pack_codes(&[b'a'.into()]);
        assert!(matches!(
            unpack(&data[..1], 2, 0),
            Err(ResError::TruncatedStream { .. })
        ));
    }

    #[test]
    fn test_invalid_reference() {
        // First code refers to an entry whose output does not exist yet
        let data = pack_codes(&[r(5), END_OF_STREAM]);
        assert!(matches!(
            unpack(&data, 4, 0),
            Err(ResError::InvalidReference { value: 5, .. })
        ));
    }

    proptest! {
        #[test]
        fn literal_streams_decode_verbatim(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let mut codes: Vec<u16> = bytes.iter().map(|&b| u16::from(b)).collect();
            codes.push(END_OF_STREAM);
            let decoded = unpack(&pack_codes(&codes), bytes.len(), 0).unwrap();
            prop_assert_eq!(decoded, bytes);
        }

        #[test]
        fn skip_matches_full_decode_suffix(
            bytes in proptest::collection::vec(any::<u8>(), 1..256),
            split in any::<prop::sample::Index>(),
        ) {
            let mut codes: Vec<u16> = bytes.iter().map(|&b| u16::from(b)).collect();
            // Repeat the first two bytes through the dictionary
            codes.push(r(0));
            codes.push(END_OF_STREAM);
            let data = pack_codes(&codes);

            let total = bytes.len() + 2;
            let full = unpack(&data, total, 0).unwrap();
            let skip = split.index(total);
            let partial = unpack(&data, total - skip, skip).unwrap();
            prop_assert_eq!(&partial[..], &full[skip..]);
        }
    }
}
