//! Length-prefixed trailing lists: actions, packet queues, queue properties and flow stats
//! entries.
//!
//! Every item begins with a header that declares the item's total length, header included.
//! A list is bounded by a length supplied from outside the list (an enclosing record's
//! length field or the message envelope) and the items must fill that bound exactly.

use std::iter::FromIterator;
use std::slice;

use log::{trace, warn};

use crate::error::{OfpSerializationError, Result};
use crate::ofp_utils::take_exact;

/// Item lengths are multiples of this.
pub const OFP_ALIGNMENT: usize = 8;

/// An element of a length-prefixed list.
pub trait ListItem: Sized {
    /// Leading bytes that must be read to learn the declared length.
    const HEADER_SIZE: usize;
    /// Smallest legal declared length.
    const MIN_LEN: usize;
    const NAME: &'static str;

    /// Declared length of the item, given its first `HEADER_SIZE` bytes.
    fn declared_len(header: &[u8]) -> usize;
    /// Parse one item from exactly its declared bytes.
    fn parse(item: &[u8]) -> Result<Self>;
    /// Byte-size of the item on the wire, computed from its content.
    fn size_of(item: &Self) -> usize;
    fn marshal(item: &Self, bytes: &mut Vec<u8>) -> Result<()>;
}

/// A decoded or to-be-encoded list together with the number of bytes it occupies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundedList<T> {
    items: Vec<T>,
    byte_len: usize,
}

impl<T: ListItem> BoundedList<T> {
    pub fn new(items: Vec<T>) -> BoundedList<T> {
        let byte_len = items.iter().map(T::size_of).sum();
        BoundedList {
            items: items,
            byte_len: byte_len,
        }
    }

    pub fn empty() -> BoundedList<T> {
        BoundedList::new(vec![])
    }

    /// Bytes the list occupies on the wire.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

impl<T> BoundedList<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<T> {
        self.items.iter()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl<T: ListItem> Default for BoundedList<T> {
    fn default() -> Self {
        BoundedList::empty()
    }
}

impl<T: ListItem> From<Vec<T>> for BoundedList<T> {
    fn from(items: Vec<T>) -> Self {
        BoundedList::new(items)
    }
}

impl<T: ListItem> FromIterator<T> for BoundedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        BoundedList::new(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a BoundedList<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Single-pass iterator over the items of a bounded region.
///
/// Yields `Err` at most once and then stops. When it stops without an error, exactly
/// `region.len()` bytes have been consumed.
pub struct ListWalker<'a, T> {
    region: &'a [u8],
    consumed: usize,
    failed: bool,
    _item: std::marker::PhantomData<T>,
}

impl<'a, T: ListItem> ListWalker<'a, T> {
    /// Walk the whole of `region`.
    pub fn new(region: &'a [u8]) -> ListWalker<'a, T> {
        ListWalker {
            region: region,
            consumed: 0,
            failed: false,
            _item: std::marker::PhantomData,
        }
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn next_item(&mut self) -> Result<T> {
        let total_len = self.region.len();
        let remaining = total_len - self.consumed;
        if remaining < T::MIN_LEN {
            return Err(OfpSerializationError::LengthMismatch {
                what: T::NAME,
                declared: total_len,
                actual: self.consumed,
            });
        }
        let rest = &self.region[self.consumed..];
        let item_len = T::declared_len(&rest[..T::HEADER_SIZE]);
        if item_len < T::MIN_LEN || item_len % OFP_ALIGNMENT != 0 {
            return Err(OfpSerializationError::InvalidItemLength {
                len: item_len,
                min: T::MIN_LEN,
            });
        }
        if item_len > remaining {
            return Err(OfpSerializationError::LengthMismatch {
                what: T::NAME,
                declared: total_len,
                actual: self.consumed + item_len,
            });
        }
        let item = T::parse(&rest[..item_len])?;
        trace!("{} at offset {}: {} bytes", T::NAME, self.consumed, item_len);
        self.consumed += item_len;
        Ok(item)
    }
}

impl<'a, T: ListItem> Iterator for ListWalker<'a, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        if self.failed || self.consumed >= self.region.len() {
            return None;
        }
        let item = self.next_item();
        if let Err(ref e) = item {
            warn!("rejecting {} list: {}", T::NAME, e);
            self.failed = true;
        }
        Some(item)
    }
}

/// Parse the `total_len` bytes of `buf` starting at `start` as a list of `T`.
///
/// Nothing outside `buf[start..start + total_len]` is read, whatever the item headers
/// claim.
pub fn parse_list<T: ListItem>(buf: &[u8], start: usize, total_len: usize)
                               -> Result<BoundedList<T>> {
    let region = take_exact(buf, start, total_len)?;
    let items = ListWalker::new(region).collect::<Result<Vec<T>>>()?;
    Ok(BoundedList {
        items: items,
        byte_len: total_len,
    })
}

/// Marshal every item of `list`, returning the number of bytes written.
pub fn marshal_list<T: ListItem>(list: &BoundedList<T>, bytes: &mut Vec<u8>) -> Result<usize> {
    let start = bytes.len();
    for item in list {
        T::marshal(item, bytes)?;
    }
    let written = bytes.len() - start;
    if written != list.byte_len() {
        return Err(OfpSerializationError::LengthMismatch {
            what: T::NAME,
            declared: list.byte_len(),
            actual: written,
        });
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openflow0x01::action::RawAction;

    fn action(typ: u16, len: u16) -> Vec<u8> {
        let mut v = vec![0; len as usize];
        v[0..2].copy_from_slice(&typ.to_be_bytes());
        v[2..4].copy_from_slice(&len.to_be_bytes());
        v
    }

    #[test]
    fn walks_items_in_order() {
        let mut buf = action(0, 8);
        buf.extend(action(11, 16));
        let list = parse_list::<RawAction>(&buf, 0, 24).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.byte_len(), 24);
        assert_eq!(list.items()[1].type_code(), 11);
    }

    #[test]
    fn empty_region_is_empty_list() {
        let list = parse_list::<RawAction>(&[], 0, 0).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.byte_len(), 0);
    }

    #[test]
    fn empty_region_past_the_buffer_is_an_error() {
        assert!(matches!(parse_list::<RawAction>(&[], 4, 0),
                         Err(OfpSerializationError::BufferTooShort { expected: 0, actual: 0 })));
        assert!(parse_list::<RawAction>(&action(0, 8), 8, 0).unwrap().is_empty());
    }

    #[test]
    fn items_short_of_the_bound_are_a_mismatch() {
        let mut buf = action(0, 8);
        buf.extend(vec![0; 4]);
        assert!(matches!(parse_list::<RawAction>(&buf, 0, 12),
                         Err(OfpSerializationError::LengthMismatch { declared: 12, actual: 8, .. })));
    }

    #[test]
    fn items_past_the_bound_are_a_mismatch() {
        let mut buf = action(0, 8);
        buf.extend(action(0, 16));
        assert!(matches!(parse_list::<RawAction>(&buf, 0, 16),
                         Err(OfpSerializationError::LengthMismatch { declared: 16, actual: 24, .. })));
    }

    #[test]
    fn zero_and_unaligned_lengths_are_rejected() {
        let buf = vec![0u8; 16];
        assert!(matches!(parse_list::<RawAction>(&buf, 0, 16),
                         Err(OfpSerializationError::InvalidItemLength { len: 0, .. })));
        let mut buf = action(0, 12);
        buf.extend(vec![0; 4]);
        assert!(matches!(parse_list::<RawAction>(&buf, 0, 16),
                         Err(OfpSerializationError::InvalidItemLength { len: 12, .. })));
    }

    #[test]
    fn bound_is_clamped_to_the_buffer() {
        let buf = action(0, 8);
        assert!(matches!(parse_list::<RawAction>(&buf, 0, 16),
                         Err(OfpSerializationError::BufferTooShort { expected: 16, actual: 8 })));
    }

    #[test]
    fn huge_declared_length_never_reads_past_region() {
        // The item claims 0xfff8 bytes but the bound is 8.
        let mut buf = action(0, 0xfff8);
        buf.truncate(8);
        buf.extend(vec![0xee; 64]);
        assert!(matches!(parse_list::<RawAction>(&buf, 0, 8),
                         Err(OfpSerializationError::LengthMismatch { declared: 8, .. })));
    }

    #[test]
    fn walker_stops_after_first_error() {
        let buf = vec![0u8; 16];
        let mut walker = ListWalker::<RawAction>::new(&buf);
        assert!(walker.next().unwrap().is_err());
        assert!(walker.next().is_none());
    }

    #[test]
    fn marshal_writes_every_item() {
        let mut buf = action(0, 8);
        buf.extend(action(11, 16));
        let list = parse_list::<RawAction>(&buf, 0, 24).unwrap();
        let mut out = vec![];
        assert_eq!(marshal_list(&list, &mut out).unwrap(), 24);
        assert_eq!(out, buf);
    }
}
