//! Chest tables: per group, a run of 4-byte entries
//! (info, room, treasure id, treasure sub-id) ended by an info byte of 0xff.
//! Any other info value is kept as-is; its meaning is not known.

use std::fmt::{Display, Error, Formatter};

use log::debug;
use serde::Serialize;

use crate::address::{read_array, read_byte, read_ptr, Address};
use crate::catalog::Resolution;
use crate::decoder::read_music;
use crate::error::Result;
use crate::layout::Layout;
use crate::render::hex;

const END_OF_TABLE: u8 = 0xff;
const ENTRY_SIZE: u16 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChestRecord {
    /// Location of the treasure id byte
    #[serde(serialize_with = "hex::address")]
    pub address: Address,
    #[serde(serialize_with = "hex::byte")]
    pub group: u8,
    #[serde(serialize_with = "hex::byte")]
    pub room: u8,
    #[serde(serialize_with = "hex::byte")]
    pub info: u8,
    #[serde(serialize_with = "hex::byte")]
    pub treasure_id: u8,
    #[serde(serialize_with = "hex::byte")]
    pub treasure_sub_id: u8,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "hex::opt_byte"
    )]
    pub music: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_name: Option<Resolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treasure: Option<Resolution>,
}

pub struct ChestTableScanner<'a> {
    buf: &'a [u8],
    layout: &'a Layout,
}

impl<'a> ChestTableScanner<'a> {
    pub fn new(buf: &'a [u8], layout: &'a Layout) -> Self {
        ChestTableScanner { buf, layout }
    }

    fn group_table(&self, group: u8) -> Result<Address> {
        let table = self.layout.chests;
        let list = table.with_offset(read_ptr(self.buf, table.offset_by(group as u16 * 2)?)?);
        debug!("Chests for group {:02x} start at {}", group, list);
        Ok(list)
    }

    /// Visit entries in table order until the terminator or until `visit`
    /// returns false.
    fn walk<F>(&self, group: u8, mut visit: F) -> Result<()>
    where
        F: FnMut(ChestRecord) -> bool,
    {
        let mut addr = self.group_table(group)?;
        loop {
            // the terminator is a single byte, nothing after it is read
            let info = read_byte(self.buf, addr)?;
            if info == END_OF_TABLE {
                return Ok(());
            }
            let [room, treasure_id, treasure_sub_id] =
                read_array::<3>(self.buf, addr.offset_by(1)?)?;
            let record = ChestRecord {
                address: addr.offset_by(2)?,
                group,
                room,
                info,
                treasure_id,
                treasure_sub_id,
                music: None,
                music_name: None,
                treasure: None,
            };
            if !visit(record) {
                return Ok(());
            }
            addr = addr.offset_by(ENTRY_SIZE)?;
        }
    }

    /// The chest in one room, if any. The first matching entry wins.
    pub fn find(&self, group: u8, room: u8) -> Result<Option<ChestRecord>> {
        let mut found = None;
        self.walk(group, |record| {
            if record.room == room {
                found = Some(record);
                false
            } else {
                true
            }
        })?;
        Ok(found)
    }

    /// Every chest in a group, each tagged with its room's music cue
    pub fn scan_group(&self, group: u8) -> Result<Vec<ChestRecord>> {
        let mut records = Vec::new();
        self.walk(group, |record| {
            records.push(record);
            true
        })?;
        for record in records.iter_mut() {
            record.music = Some(read_music(self.buf, self.layout, group, record.room)?);
        }
        Ok(records)
    }
}

impl Display for ChestRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), Error> {
        write!(
            f,
            "{}: room {:02x}:{:02x} info={:#04x} treasure {:#04x} {:#04x}",
            self.address, self.group, self.room, self.info, self.treasure_id, self.treasure_sub_id
        )?;
        if let Some(treasure) = &self.treasure {
            write!(f, " [{}]", treasure)?;
        }
        match (&self.music_name, self.music) {
            (Some(name), _) => write!(f, " music {}", name)?,
            (None, Some(cue)) => write!(f, " music {:#04x}", cue)?,
            (None, None) => {}
        }
        Ok(())
    }
}
