//! Bank/offset addressing over the flat cartridge image.
//!
//! The image is split into 0x4000-byte banks. Offsets in banks 0-2 are
//! already linear (the fixed system banks); every other bank is paged in at
//! 0x4000, so its offsets carry that window base.

use std::fmt::{Display, Error, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Result};

/// Size of one switchable bank
pub const BANK_SIZE: usize = 0x4000;

/// Highest bank number whose offsets are used as-is
const LAST_FIXED_BANK: u8 = 2;

/// Translate a bank and in-bank offset into an index into the image.
///
/// No bounds checking happens here: an index past the end is reported by
/// the read that uses it.
pub fn linear(bank: u8, offset: u16) -> usize {
    if bank > LAST_FIXED_BANK {
        (bank as usize - 1) * BANK_SIZE + offset as usize
    } else {
        offset as usize
    }
}

/// A location in the image as the game sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address {
    pub bank: u8,
    pub offset: u16,
}

impl Address {
    pub fn new(bank: u8, offset: u16) -> Self {
        Address { bank, offset }
    }

    /// Index of this address in the flat image
    pub fn linear(&self) -> usize {
        linear(self.bank, self.offset)
    }

    /// The same bank, `n` bytes further on
    pub fn offset_by(&self, n: u16) -> Result<Address> {
        self.offset
            .checked_add(n)
            .map(|offset| Address::new(self.bank, offset))
            .ok_or(DecodeError::AddressOverflow(*self))
    }

    /// The same bank, at a different offset (pointer targets are bank-relative)
    pub fn with_offset(&self, offset: u16) -> Address {
        Address::new(self.bank, offset)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), Error> {
        write!(f, "{:02x}:{:04x}", self.bank, self.offset)
    }
}

/// Borrow `width` bytes starting at a linear index
pub fn slice_at(buf: &[u8], at: usize, width: usize) -> Result<&[u8]> {
    at.checked_add(width)
        .and_then(|end| buf.get(at..end))
        .ok_or(DecodeError::OutOfBounds {
            linear: at,
            width,
            len: buf.len(),
        })
}

/// Read one byte at an address
pub fn read_byte(buf: &[u8], addr: Address) -> Result<u8> {
    Ok(slice_at(buf, addr.linear(), 1)?[0])
}

/// Read a little-endian word at an address
pub fn read_ptr(buf: &[u8], addr: Address) -> Result<u16> {
    let bytes = slice_at(buf, addr.linear(), 2)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Copy out a fixed number of bytes at an address
pub fn read_array<const N: usize>(buf: &[u8], addr: Address) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(slice_at(buf, addr.linear(), N)?);
    Ok(out)
}
