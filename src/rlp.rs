//! Canonical Ethereum RLP encoding and decoding.

use crate::{Error, Result};

/// An RLP encoder.
///
/// Leaves are byte strings or minimally-encoded unsigned integers; interior
/// nodes are ordered lists.
#[derive(Default)]
pub struct Encoder {
    out: Vec<u8>,
}

impl Encoder {
    /// Creates a new RLP encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes a byte string item.
    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        match data {
            [b] if *b < 0x80 => self.out.push(*b),
            _ => {
                prefix(&mut self.out, 0x80, data.len());
                self.out.extend_from_slice(data);
            }
        }
        self
    }

    /// Encodes a 256-bit unsigned integer as its minimal big-endian bytes.
    ///
    /// Zero encodes as the empty byte string.
    pub fn uint(&mut self, value: [u8; 32]) -> &mut Self {
        let zeros = value.iter().take_while(|&&b| b == 0).count();
        self.bytes(&value[zeros..])
    }

    /// Encodes a list item whose children are written by `f`.
    pub fn list(&mut self, f: impl FnOnce(&mut Encoder)) -> &mut Self {
        let mut children = Encoder::new();
        f(&mut children);
        prefix(&mut self.out, 0xc0, children.out.len());
        self.out.extend_from_slice(&children.out);
        self
    }

    /// Returns the encoded bytes.
    pub fn finish(self) -> Vec<u8> {
        self.out
    }
}

fn prefix(out: &mut Vec<u8>, offset: u8, len: usize) {
    if len < 56 {
        out.push(offset + len as u8);
    } else {
        let be = (len as u64).to_be_bytes();
        let zeros = be.iter().take_while(|&&b| b == 0).count();
        out.push(offset + 55 + (8 - zeros) as u8);
        out.extend_from_slice(&be[zeros..]);
    }
}

/// An RLP decoder over a borrowed byte slice.
#[derive(Debug)]
pub struct Decoder<'a>(&'a [u8]);

/// An RLP item.
#[derive(Debug)]
pub enum Item<'a> {
    /// A byte string.
    Bytes(&'a [u8]),
    /// A list of RLP items.
    List(Decoder<'a>),
}

impl<'a> Decoder<'a> {
    /// Creates a new RLP decoder.
    pub fn new(data: &'a [u8]) -> Self {
        Self(data)
    }

    /// Decodes a struct from a top-level RLP list, rejecting trailing bytes
    /// after the list and unconsumed elements inside it.
    pub fn decode_struct<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Decoder<'a>) -> Result<T>,
    {
        if self.0.is_empty() {
            return Err(Error::EmptyInput);
        }
        let result = self.item(f)?;
        self.done()?;
        Ok(result)
    }

    /// Decodes a list item fully with `f`, rejecting unconsumed elements.
    pub fn item<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Decoder<'a>) -> Result<T>,
    {
        let mut list = self.list()?;
        let result = f(&mut list)?;
        if !list.0.is_empty() {
            return Err(Error::FieldTypeMismatch);
        }
        Ok(result)
    }

    /// Decodes a list item.
    pub fn list(&mut self) -> Result<Self> {
        match self.next()? {
            Some(Item::List(list)) => Ok(list),
            _ => Err(Error::FieldTypeMismatch),
        }
    }

    /// Decodes each element of a list item with `f`.
    pub fn vec<T, F>(&mut self, mut f: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Decoder<'a>) -> Result<T>,
    {
        let mut list = self.list()?;
        let mut items = Vec::new();
        while !list.0.is_empty() {
            items.push(f(&mut list)?);
        }
        Ok(items)
    }

    /// Decodes a bytes item.
    pub fn bytes(&mut self) -> Result<&'a [u8]> {
        match self.next()? {
            Some(Item::Bytes(data)) => Ok(data),
            _ => Err(Error::FieldTypeMismatch),
        }
    }

    /// Decodes a fixed-length bytes item.
    pub fn bytes_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.bytes()?
            .try_into()
            .map_err(|_| Error::FieldTypeMismatch)
    }

    /// Decodes a 20-byte address item.
    pub fn address(&mut self) -> Result<[u8; 20]> {
        self.bytes()?.try_into().map_err(|_| Error::InvalidAddress)
    }

    /// Decodes an unsigned integer item into a 256-bit big-endian word.
    ///
    /// The encoding must be minimal: no leading zero bytes, at most 32 bytes.
    pub fn uint(&mut self) -> Result<[u8; 32]> {
        let bytes = self.bytes()?;
        if bytes.first() == Some(&0) {
            return Err(Error::FieldTypeMismatch);
        }
        let offset = 32usize
            .checked_sub(bytes.len())
            .ok_or(Error::FieldTypeMismatch)?;
        let mut uint = [0; 32];
        uint[offset..].copy_from_slice(bytes);
        Ok(uint)
    }

    /// Decodes a boolean item, encoded as the integer 0 or 1.
    pub fn bool(&mut self) -> Result<bool> {
        match self.bytes()? {
            [] => Ok(false),
            [1] => Ok(true),
            _ => Err(Error::FieldTypeMismatch),
        }
    }

    /// Ensures the decoder is empty.
    pub fn done(&self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(Error::TrailingBytes)
        }
    }

    /// Decodes the next RLP item, or `None` at the end of input.
    pub fn next(&mut self) -> Result<Option<Item<'a>>> {
        let Some(&tag) = self.0.first() else {
            return Ok(None);
        };
        let (item, rest) = if tag <= 0x7f {
            let (data, rest) = self.0.split_at(1);
            (Item::Bytes(data), rest)
        } else if tag <= 0xbf {
            let (data, rest) = prefixed_len(tag, 0x80, self.0)?;
            if let [b] = data
                && *b < 0x80
            {
                // A single byte below 0x80 must encode as itself.
                return Err(Error::BadLengthPrefix);
            }
            (Item::Bytes(data), rest)
        } else {
            let (data, rest) = prefixed_len(tag, 0xc0, self.0)?;
            (Item::List(Decoder(data)), rest)
        };
        self.0 = rest;
        Ok(Some(item))
    }
}

fn prefixed_len(tag: u8, offset: u8, data: &[u8]) -> Result<(&[u8], &[u8])> {
    let long = offset + 55;
    if tag <= long {
        let len = (tag - offset) as usize;
        data.get(1..)
            .and_then(|rest| rest.split_at_checked(len))
            .ok_or(Error::BadLengthPrefix)
    } else {
        let llen = (tag - long) as usize;
        let lbytes = data.get(1..1 + llen).ok_or(Error::BadLengthPrefix)?;
        if lbytes.first() == Some(&0) {
            return Err(Error::BadLengthPrefix);
        }
        let mut be = [0; 8];
        be[8 - llen..].copy_from_slice(lbytes);
        let len = u64::from_be_bytes(be);
        if len < 56 {
            // Lengths below 56 must use the short form.
            return Err(Error::BadLengthPrefix);
        }
        let len = usize::try_from(len).map_err(|_| Error::BadLengthPrefix)?;
        data.get(1 + llen..)
            .and_then(|rest| rest.split_at_checked(len))
            .ok_or(Error::BadLengthPrefix)
    }
}
