use std::borrow::Cow;
use std::fmt;
use std::io::{Cursor, Read};

use crate::error::{OfpSerializationError, Result};

/// Test whether bit `bit` of `x` is set.
pub fn test_bit(bit: u64, x: u64) -> bool {
    (x >> bit) & 1 == 1
}

/// Append `count` zero bytes of reserved padding.
pub fn write_padding_bytes(bytes: &mut Vec<u8>, count: usize) {
    bytes.resize(bytes.len() + count, 0);
}

/// Return the `size` bytes of `buf` starting at `offset`, or `BufferTooShort` if fewer remain.
pub fn take_exact(buf: &[u8], offset: usize, size: usize) -> Result<&[u8]> {
    match buf.get(offset..).and_then(|rest| rest.get(..size)) {
        Some(region) => Ok(region),
        None => {
            Err(OfpSerializationError::BufferTooShort {
                expected: size,
                actual: buf.len().saturating_sub(offset),
            })
        }
    }
}

/// Contents of a NUL-padded string field, up to its terminator.
///
/// Switches put arbitrary bytes in these fields, so they are kept as bytes rather than
/// decoded as UTF-8. A value never holds a NUL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FixedString {
    raw: Vec<u8>,
}

impl FixedString {
    /// Wrap `raw`, cutting it at its first NUL as the wire would.
    pub fn from_bytes(mut raw: Vec<u8>) -> FixedString {
        if let Some(end) = raw.iter().position(|&b| b == 0) {
            raw.truncate(end);
        }
        FixedString { raw: raw }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// The contents as text, if they are valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.raw).ok()
    }

    pub fn to_string_lossy(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.raw)
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl<'a> From<&'a str> for FixedString {
    fn from(s: &'a str) -> FixedString {
        FixedString::from_bytes(s.as_bytes().to_vec())
    }
}

impl From<String> for FixedString {
    fn from(s: String) -> FixedString {
        FixedString::from_bytes(s.into_bytes())
    }
}

impl fmt::Display for FixedString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_string_lossy())
    }
}

/// Read a NUL-padded string field of `size` bytes.
///
/// The string ends at the first NUL or at the end of the field, whichever comes first.
/// Bytes after the terminator are consumed and dropped.
pub fn read_fixed_size_string(bytes: &mut Cursor<&[u8]>, size: usize) -> Result<FixedString> {
    let mut raw = vec![0; size];
    bytes.read_exact(&mut raw)?;
    Ok(FixedString::from_bytes(raw))
}

/// Write `s` into a NUL-padded field of `size` bytes. One byte is always left for the
/// terminator, so `s` may hold at most `size - 1` bytes.
pub fn write_fixed_size_string(bytes: &mut Vec<u8>, s: &FixedString, size: usize) -> Result<()> {
    check_fixed_size_string(s, size)?;
    bytes.extend_from_slice(s.as_bytes());
    write_padding_bytes(bytes, size - s.len());
    Ok(())
}

pub fn check_fixed_size_string(s: &FixedString, size: usize) -> Result<()> {
    let max = size - 1;
    if s.len() > max {
        return Err(OfpSerializationError::NameTooLong {
            len: s.len(),
            max: max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_exact_rejects_short_buffers() {
        let buf = [1u8, 2, 3, 4];
        assert_eq!(take_exact(&buf, 1, 3).unwrap(), &[2, 3, 4]);
        match take_exact(&buf, 2, 3) {
            Err(OfpSerializationError::BufferTooShort { expected, actual }) => {
                assert_eq!((expected, actual), (3, 2));
            }
            other => panic!("unexpected {:?}", other),
        }
        // An offset past the end is not an underflow.
        assert!(take_exact(&buf, 9, 1).is_err());
    }

    #[test]
    fn take_exact_empty_region_past_the_end() {
        assert!(take_exact(&[1u8, 2], 2, 0).unwrap().is_empty());
        assert!(matches!(take_exact(&[], 4, 0),
                         Err(OfpSerializationError::BufferTooShort { expected: 0, actual: 0 })));
        assert!(take_exact(&[0u8; 4], usize::MAX, 0).is_err());
    }

    #[test]
    fn fixed_string_stops_at_first_nul() {
        let raw = b"eth0\0\0junk\0";
        let mut cur = Cursor::new(&raw[..]);
        assert_eq!(read_fixed_size_string(&mut cur, raw.len()).unwrap().as_bytes(), b"eth0");
        assert_eq!(cur.position() as usize, raw.len());
    }

    #[test]
    fn fixed_string_without_terminator_uses_whole_field() {
        let raw = b"abcd";
        let mut cur = Cursor::new(&raw[..]);
        assert_eq!(read_fixed_size_string(&mut cur, 4).unwrap().as_str(), Some("abcd"));
    }

    #[test]
    fn fixed_string_keeps_non_utf8_bytes() {
        let raw = [0xff, 0x61, 0, 0];
        let mut cur = Cursor::new(&raw[..]);
        let s = read_fixed_size_string(&mut cur, 4).unwrap();
        assert_eq!(s.as_bytes(), &[0xff, 0x61]);
        assert_eq!(s.as_str(), None);
        assert_eq!(s.to_string(), "\u{fffd}a");
        let mut bytes = vec![];
        write_fixed_size_string(&mut bytes, &s, 4).unwrap();
        assert_eq!(bytes, raw);
    }

    #[test]
    fn fixed_string_reserves_terminator() {
        let mut bytes = vec![];
        write_fixed_size_string(&mut bytes, &"abc".into(), 4).unwrap();
        assert_eq!(bytes, b"abc\0");
        assert!(matches!(write_fixed_size_string(&mut vec![], &"abcd".into(), 4),
                         Err(OfpSerializationError::NameTooLong { len: 4, max: 3 })));
    }

    #[test]
    fn fixed_string_from_bytes_cuts_at_nul() {
        let s = FixedString::from_bytes(b"ab\0cd".to_vec());
        assert_eq!(s.as_bytes(), b"ab");
        assert_eq!(FixedString::from("ab"), s);
    }

    #[test]
    fn bits() {
        assert!(test_bit(0, 1));
        assert!(!test_bit(1, 1));
        assert!(test_bit(63, 1 << 63));
    }
}
