//! Bit cursor over packed sub-byte samples.
//!
//! Samples are packed least-significant bits first: in a 2-bit stream the
//! first sample is `byte & 0b11`, the second `(byte >> 2) & 0b11`, and so on.

use crate::error::RasterError;

/// Reads fixed-width unsigned fields from a byte slice.
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    byte: usize,
    bit: u32,
}

impl<'a> BitReader<'a> {
    /// Start reading at an absolute bit offset into `data`.
    pub(crate) fn at(data: &'a [u8], bit_offset: usize) -> Self {
        Self {
            data,
            byte: bit_offset / 8,
            bit: (bit_offset % 8) as u32,
        }
    }

    /// Read the next `bits`-wide field (1..=8) and advance past it.
    pub(crate) fn read(&mut self, bits: u32) -> Result<u8, RasterError> {
        debug_assert!((1..=8).contains(&bits));
        let mut value: u32 = 0;
        let mut filled = 0;
        while filled < bits {
            let current = *self.data.get(self.byte).ok_or(RasterError::BufferTooSmall {
                needed: self.byte + 1,
                actual: self.data.len(),
            })?;
            let take = (bits - filled).min(8 - self.bit);
            let chunk = (u32::from(current) >> self.bit) & ((1 << take) - 1);
            value |= chunk << filled;
            filled += take;
            self.bit += take;
            if self.bit == 8 {
                self.bit = 0;
                self.byte += 1;
            }
        }
        Ok(value as u8)
    }
}

/// Writes fixed-width unsigned fields into a zeroed byte slice.
pub(crate) struct BitWriter<'a> {
    data: &'a mut [u8],
    byte: usize,
    bit: u32,
}

impl<'a> BitWriter<'a> {
    pub(crate) fn new(data: &'a mut [u8]) -> Self {
        Self {
            data,
            byte: 0,
            bit: 0,
        }
    }

    /// Append the low `bits` bits (1..=8) of `value`.
    ///
    /// The destination must be zero-filled; bits are OR-ed in.
    pub(crate) fn write(&mut self, bits: u32, value: u8) -> Result<(), RasterError> {
        debug_assert!((1..=8).contains(&bits));
        let mut remaining = u32::from(value) & ((1 << bits) - 1);
        let mut left = bits;
        while left > 0 {
            let len = self.data.len();
            let slot = self
                .data
                .get_mut(self.byte)
                .ok_or(RasterError::BufferTooSmall {
                    needed: self.byte + 1,
                    actual: len,
                })?;
            let take = left.min(8 - self.bit);
            *slot |= ((remaining & ((1 << take) - 1)) << self.bit) as u8;
            remaining >>= take;
            left -= take;
            self.bit += take;
            if self.bit == 8 {
                self.bit = 0;
                self.byte += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_bit_fields_read_low_bits_first() {
        // indices 0, 1, 2, 3 packed LSB-first
        let data = [0b11_10_01_00u8];
        let mut r = BitReader::at(&data, 0);
        assert_eq!(r.read(2).unwrap(), 0);
        assert_eq!(r.read(2).unwrap(), 1);
        assert_eq!(r.read(2).unwrap(), 2);
        assert_eq!(r.read(2).unwrap(), 3);
        assert!(r.read(2).is_err());
    }

    #[test]
    fn four_bit_fields_do_not_skip_bytes() {
        let data = [0x21u8, 0x43, 0x65];
        let mut r = BitReader::at(&data, 0);
        let read: [u8; 6] = core::array::from_fn(|_| r.read(4).unwrap());
        assert_eq!(read, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn unaligned_start_and_straddling_field() {
        let data = [0b1000_0000u8, 0b0000_0001];
        let mut r = BitReader::at(&data, 7);
        assert_eq!(r.read(2).unwrap(), 0b11);
    }

    #[test]
    fn writer_mirrors_reader() {
        let mut out = [0u8; 2];
        let mut w = BitWriter::new(&mut out);
        for v in [1u8, 0, 1, 1, 0, 0, 0, 1, 1] {
            w.write(1, v).unwrap();
        }
        assert_eq!(out, [0b1000_1101, 0b0000_0001]);
        let mut r = BitReader::at(&out, 0);
        let back: [u8; 9] = core::array::from_fn(|_| r.read(1).unwrap());
        assert_eq!(back, [1, 0, 1, 1, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn writer_reports_overflow() {
        let mut out = [0u8; 1];
        let mut w = BitWriter::new(&mut out);
        w.write(4, 0xF).unwrap();
        w.write(4, 0xA).unwrap();
        assert!(w.write(4, 1).is_err());
        assert_eq!(out, [0xAF]);
    }
}
