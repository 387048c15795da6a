//! Treasure and sprite descriptors.
//!
//! A treasure row is 4 bytes per id. When the first byte has bit 7 set the
//! row is a pointer (bytes 1-2) to a sub-table instead, and the sub-id picks
//! a 4-byte row there. The last descriptor byte indexes the sprite table.
//!
//! Sprite slots are 3 bytes wide, but the pointer they hold straddles the
//! slot start: its high byte is the slot's second byte and its low byte is
//! the byte just before the slot.

use std::fmt::{Display, Error, Formatter};

use log::debug;
use serde::Serialize;

use crate::address::{read_array, read_byte, read_ptr, slice_at, Address};
use crate::catalog::Resolution;
use crate::error::{DecodeError, Result};
use crate::layout::Layout;
use crate::render::hex;

const TREASURE_SIZE: u16 = 4;
const SPRITE_SIZE: u16 = 3;
const INDIRECT: u8 = 0x80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpriteDescriptor {
    #[serde(serialize_with = "hex::address")]
    pub address: Address,
    #[serde(serialize_with = "hex::bytes")]
    pub bytes: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreasureDescriptor {
    #[serde(serialize_with = "hex::address")]
    pub address: Address,
    #[serde(serialize_with = "hex::bytes")]
    pub bytes: [u8; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Resolution>,
    pub sprite: SpriteDescriptor,
}

impl TreasureDescriptor {
    /// Index into the sprite table's second level
    pub fn sprite_sub_index(&self) -> u8 {
        self.bytes[3]
    }
}

pub struct DescriptorResolver<'a> {
    buf: &'a [u8],
    layout: &'a Layout,
}

impl<'a> DescriptorResolver<'a> {
    pub fn new(buf: &'a [u8], layout: &'a Layout) -> Self {
        DescriptorResolver { buf, layout }
    }

    pub fn treasure(&self, id: u8, sub_id: u8) -> Result<TreasureDescriptor> {
        let table = self.layout.treasures;
        let mut row = table.offset_by(id as u16 * TREASURE_SIZE)?;
        if read_byte(self.buf, row)? & INDIRECT != 0 {
            row = table.with_offset(read_ptr(self.buf, row.offset_by(1)?)?);
            debug!("Treasure {:#04x} has sub-table at {}", id, row);
        }
        let address = row.offset_by(sub_id as u16 * TREASURE_SIZE)?;
        let bytes = read_array::<4>(self.buf, address)?;
        let sprite = self.sprite(self.layout.treasure_sprite_index, bytes[3])?;
        Ok(TreasureDescriptor {
            address,
            bytes,
            name: None,
            sprite,
        })
    }

    pub fn sprite(&self, index: u8, sub_index: u8) -> Result<SpriteDescriptor> {
        let table = self.layout.sprites;
        let slot = table.offset_by(index as u16 * SPRITE_SIZE)?;
        let at = slot.linear();
        // low byte sits one before the slot
        let before = at.checked_sub(1).ok_or(DecodeError::OutOfBounds {
            linear: at,
            width: 2,
            len: self.buf.len(),
        })?;
        let window = slice_at(self.buf, before, 3)?;
        let target = u16::from_le_bytes([window[0], window[2]]);
        let address = table
            .with_offset(target)
            .offset_by(sub_index as u16 * SPRITE_SIZE)?;
        debug!(
            "Sprite {:#04x}/{:#04x}: slot {} points at {:04x}",
            index, sub_index, slot, target
        );
        Ok(SpriteDescriptor {
            address,
            bytes: read_array::<3>(self.buf, address)?,
        })
    }
}

impl Display for SpriteDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), Error> {
        let [a, b, c] = self.bytes;
        write!(f, "{}: {:02x} {:02x} {:02x}", self.address, a, b, c)
    }
}

impl Display for TreasureDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), Error> {
        let [a, b, c, d] = self.bytes;
        write!(f, "{}: {:02x} {:02x} {:02x} {:02x}", self.address, a, b, c, d)?;
        if let Some(name) = &self.name {
            write!(f, " [{}]", name)?;
        }
        write!(f, "\nsprite {}", self.sprite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Title;
    use crate::test_utils::ImageBuilder;

    fn seasons_with_sprites() -> ImageBuilder {
        let mut builder = ImageBuilder::new(Title::Seasons);
        builder.sprite_pointer(0x60, 0x7000);
        for sub in 0..4u16 {
            let addr = Address::new(0x3f, 0x7000 + sub * 3);
            builder.set(addr, &[0x50 + sub as u8, 0x0a, 0x10]);
        }
        builder
    }

    #[test]
    fn test_direct_treasure() {
        let mut builder = seasons_with_sprites();
        let row = builder.treasure_row(0x05);
        builder.set(row, &[0x00, 0x05, 0x11, 0x02]);
        let layout = builder.layout.clone();
        let memory = builder.build();

        let treasure = DescriptorResolver::new(&memory, &layout)
            .treasure(0x05, 0x00)
            .unwrap();
        assert_eq!(treasure.address, Address::new(0x15, 0x5129 + 0x05 * 4));
        assert_eq!(treasure.bytes, [0x00, 0x05, 0x11, 0x02]);
        assert_eq!(treasure.sprite.address, Address::new(0x3f, 0x7006));
        assert_eq!(treasure.sprite.bytes, [0x52, 0x0a, 0x10]);
    }

    #[test]
    fn test_indirect_treasure_uses_sub_table() {
        let mut builder = seasons_with_sprites();
        builder.treasure_indirect(0x28, 0x7000);
        // rupees, 20 count
        builder.set(Address::new(0x15, 0x7000 + 3 * 4), &[0x09, 0x28, 0x03, 0x01]);
        let layout = builder.layout.clone();
        let memory = builder.build();

        let treasure = DescriptorResolver::new(&memory, &layout)
            .treasure(0x28, 0x03)
            .unwrap();
        assert_eq!(treasure.address, Address::new(0x15, 0x700c));
        assert_eq!(treasure.bytes, [0x09, 0x28, 0x03, 0x01]);
        assert_eq!(treasure.sprite_sub_index(), 0x01);
        assert_eq!(treasure.sprite.bytes, [0x51, 0x0a, 0x10]);
    }

    #[test]
    fn test_sprite_pointer_straddles_slot() {
        let mut builder = ImageBuilder::new(Title::Ages);
        let slot = Address::new(0x3f, 0x6427 + 0x10 * 3);
        // lo, slot[0], hi
        builder.set(Address::new(0x3f, slot.offset - 1), &[0x34, 0xee, 0x72]);
        builder.set(Address::new(0x3f, 0x7234 + 2 * 3), &[0x01, 0x02, 0x03]);
        let layout = builder.layout.clone();
        let memory = builder.build();

        let sprite = DescriptorResolver::new(&memory, &layout)
            .sprite(0x10, 0x02)
            .unwrap();
        assert_eq!(sprite.address, Address::new(0x3f, 0x723a));
        assert_eq!(sprite.bytes, [0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_sprite_slot_at_image_start_is_out_of_bounds() {
        let mut layout = Layout::for_title(Title::Seasons);
        layout.sprites = Address::new(0, 0);
        let memory = vec![0u8; 0x100];
        assert!(matches!(
            DescriptorResolver::new(&memory, &layout).sprite(0, 0),
            Err(DecodeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_treasure_past_end_of_image() {
        let layout = Layout::for_title(Title::Seasons);
        let memory = vec![0u8; layout.treasures.linear()];
        assert!(DescriptorResolver::new(&memory, &layout)
            .treasure(0, 0)
            .is_err());
    }
}
