//! Big-endian integer, float and varint decoding over a bounded byte slice.

use litewalk_result::{Error, Result};

/// Cursor over `raw[..end]`. Every read advances the cursor and fails with
/// [`Error::Corrupt`] instead of reading past `end`.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    raw: &'a [u8],
    end: usize,
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Reader over all of `raw`, starting at `pos`.
    pub fn new(raw: &'a [u8], pos: usize) -> Result<Self> {
        Self::bounded(raw, raw.len(), pos)
    }

    /// Reader over `raw[..end]`, starting at `pos`.
    pub fn bounded(raw: &'a [u8], end: usize, pos: usize) -> Result<Self> {
        if end > raw.len() || pos > end {
            return Err(Error::corrupt(format_args!(
                "reader window {pos}..{end} lies outside {} bytes",
                raw.len()
            )));
        }
        Ok(Self { raw, end, pos })
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::corrupt(format_args!(
                "read of {len} bytes at offset {} runs past {}",
                self.pos, self.end
            )));
        }
        let out = &self.raw[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Big-endian two's-complement integer of `width` bytes (1 to 8),
    /// sign-extended to 64 bits.
    pub fn read_int(&mut self, width: usize) -> Result<i64> {
        if !(1..=8).contains(&width) {
            return Err(Error::Internal(format!("integer width {width} out of range")));
        }
        let b = self.read_bytes(width)?;
        let mut acc: u64 = 0;
        for &byte in b {
            acc = (acc << 8) | byte as u64;
        }
        let shift = 64 - 8 * width as u32;
        Ok(((acc << shift) as i64) >> shift)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let b = self.read_bytes(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(b);
        Ok(f64::from_be_bytes(arr))
    }

    /// SQLite varint: 1 to 9 bytes, seven bits per byte, high bit set on all
    /// but the last. A ninth byte contributes all eight of its bits.
    pub fn read_varint(&mut self) -> Result<u64> {
        let mut acc: u64 = 0;
        for _ in 0..8 {
            let byte = self.read_u8()?;
            acc = (acc << 7) | (byte & 0x7f) as u64;
            if byte & 0x80 == 0 {
                return Ok(acc);
            }
        }
        let last = self.read_u8()?;
        Ok((acc << 8) | last as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varint(bytes: &[u8]) -> (u64, usize) {
        let mut r = ByteReader::new(bytes, 0).unwrap();
        let v = r.read_varint().unwrap();
        (v, r.position())
    }

    #[test]
    fn single_and_multi_byte_varints() {
        assert_eq!(varint(&[0x00]), (0, 1));
        assert_eq!(varint(&[0x7f]), (127, 1));
        assert_eq!(varint(&[0x81, 0x00]), (128, 2));
        assert_eq!(varint(&[0x82, 0x2c]), (300, 2));
        assert_eq!(varint(&[0xff, 0xff, 0x7f]), (0x1f_ffff, 3));
    }

    #[test]
    fn nine_byte_varint_uses_all_bits_of_last_byte() {
        let bytes = [0xff; 9];
        assert_eq!(varint(&bytes), (u64::MAX, 9));

        // -1 as a rowid.
        let (v, _) = varint(&bytes);
        assert_eq!(v as i64, -1);
    }

    #[test]
    fn truncated_varint_is_corrupt() {
        let mut r = ByteReader::new(&[0x81, 0x82], 0).unwrap();
        assert!(matches!(r.read_varint(), Err(Error::Corrupt(_))));
    }

    #[test]
    fn signed_integers_sign_extend() {
        let mut r = ByteReader::new(&[0xff, 0xff, 0xfe, 0x00, 0x80, 0x00, 0x7f], 0).unwrap();
        assert_eq!(r.read_int(3).unwrap(), -2);
        assert_eq!(r.read_int(1).unwrap(), 0);
        assert_eq!(r.read_int(2).unwrap(), -32768);
        assert_eq!(r.read_int(1).unwrap(), 127);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn six_byte_integer() {
        let bytes = 0x0000_8000_0000_0001u64.to_be_bytes();
        let mut r = ByteReader::new(&bytes[2..], 0).unwrap();
        assert_eq!(r.read_int(6).unwrap(), -(1i64 << 47) + 1);
    }

    #[test]
    fn bounded_reader_stops_at_end() {
        let raw = [1u8, 2, 3, 4, 5, 6];
        let mut r = ByteReader::bounded(&raw, 4, 1).unwrap();
        assert_eq!(r.read_u16().unwrap(), 0x0203);
        assert!(matches!(r.read_u16(), Err(Error::Corrupt(_))));
        assert_eq!(r.read_u8().unwrap(), 4);

        assert!(ByteReader::bounded(&raw, 7, 0).is_err());
        assert!(ByteReader::bounded(&raw, 3, 4).is_err());
    }

    #[test]
    fn reads_big_endian_double() {
        let bytes = 8.8f64.to_be_bytes();
        let mut r = ByteReader::new(&bytes, 0).unwrap();
        assert_eq!(r.read_f64().unwrap(), 8.8);
    }
}
