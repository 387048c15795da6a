//! Room object streams.
//!
//! A room's objects are a sequence of groups, each introduced by a mode byte
//! in 0xf0..=0xff. Most groups repeat a fixed-size entry until the next byte
//! in that range; pointer tags splice in a stream stored elsewhere in the same
//! bank. A room ends at 0xff. A spliced stream also ends at 0xfe, which the
//! top level does not treat as an end.

use log::{debug, trace, warn};

use crate::address::{read_array, read_byte, read_ptr, Address};
use crate::error::{DecodeError, Result};
use crate::layout::Layout;
use crate::record::{Coords, IdPair, IdTriple, InteractionMode, Record, RecordKind};

/// Bytes at or above this end a repeated group
const SENTINEL: u8 = 0xf0;

/// Pointer tags may not nest deeper than this
const MAX_NESTING: usize = 8;

/// What a mode byte introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Group(InteractionMode),
    Pointer,
    EndOfPointer,
    EndOfRoom,
    /// 0xf0, known to exist but not decoded
    Unsupported,
    Unknown(u8),
}

impl Tag {
    pub fn from_byte(byte: u8) -> Tag {
        if let Some(mode) = InteractionMode::from_tag(byte) {
            return Tag::Group(mode);
        }
        match byte {
            0xf0 => Tag::Unsupported,
            0xf3..=0xf5 => Tag::Pointer,
            0xfe => Tag::EndOfPointer,
            0xff => Tag::EndOfRoom,
            _ => Tag::Unknown(byte),
        }
    }
}

/// Which mode bytes end a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamScope {
    /// A room's own stream: ends only at 0xff
    TopLevel,
    /// A stream reached through a pointer tag: ends at 0xfe or 0xff
    Nested,
}

impl StreamScope {
    pub fn terminates(&self, byte: u8) -> bool {
        match self {
            StreamScope::TopLevel => byte == 0xff,
            StreamScope::Nested => byte == 0xfe || byte == 0xff,
        }
    }
}

pub struct RecordStreamDecoder<'a> {
    buf: &'a [u8],
}

impl<'a> RecordStreamDecoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        RecordStreamDecoder { buf }
    }

    /// Decode a room's stream starting at `start`
    pub fn decode(&self, start: Address) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        self.decode_stream(start, StreamScope::TopLevel, &mut records)?;
        Ok(records)
    }

    /// Decode until a terminator of `scope` is at the cursor, appending to
    /// `records`. Returns the cursor, left on the terminator.
    pub fn decode_stream(
        &self,
        start: Address,
        scope: StreamScope,
        records: &mut Vec<Record>,
    ) -> Result<Address> {
        self.decode_stream_at_depth(start, scope, 0, records)
    }

    fn decode_stream_at_depth(
        &self,
        start: Address,
        scope: StreamScope,
        depth: usize,
        records: &mut Vec<Record>,
    ) -> Result<Address> {
        let mut cursor = start;
        while !scope.terminates(self.byte(cursor)?) {
            cursor = self.step_at_depth(cursor, depth, records)?;
        }
        Ok(cursor)
    }

    /// Decode the single group whose mode byte is at `at` and return the
    /// address just past it.
    pub fn step(&self, at: Address, records: &mut Vec<Record>) -> Result<Address> {
        self.step_at_depth(at, 0, records)
    }

    fn step_at_depth(
        &self,
        at: Address,
        depth: usize,
        records: &mut Vec<Record>,
    ) -> Result<Address> {
        let tag = self.byte(at)?;
        let addr = at.offset_by(1)?;

        match Tag::from_byte(tag) {
            Tag::Group(mode) => self.read_group(mode, addr, records),
            Tag::Pointer => {
                if depth >= MAX_NESTING {
                    return Err(DecodeError::NestingTooDeep(at));
                }
                let target = at.with_offset(read_ptr(self.buf, addr)?);
                debug!("Following pointer tag {:#04x} at {} to {}", tag, at, target);
                self.decode_stream_at_depth(target, StreamScope::Nested, depth + 1, records)?;
                // resume after the pointer, not after the spliced stream
                addr.offset_by(2)
            }
            Tag::EndOfPointer => addr.offset_by(1),
            Tag::EndOfRoom => Ok(addr),
            Tag::Unsupported | Tag::Unknown(_) => {
                warn!("Skipped interaction type {:#04x} at {}", tag, at);
                self.skip_to_sentinel(addr)
            }
        }
    }

    fn read_group(
        &self,
        mode: InteractionMode,
        mut addr: Address,
        records: &mut Vec<Record>,
    ) -> Result<Address> {
        match mode {
            InteractionMode::NoValue => {
                while !self.at_sentinel(addr)? {
                    let [id, sub_id] = read_array::<2>(self.buf, addr)?;
                    let kind = RecordKind::NoValue {
                        id: IdPair::new(id, sub_id),
                    };
                    self.push(records, addr, kind);
                    addr = addr.offset_by(2)?;
                }
            }
            InteractionMode::DoubleValue => {
                while !self.at_sentinel(addr)? {
                    let [id, sub_id, row, col] = read_array::<4>(self.buf, addr)?;
                    self.push(
                        records,
                        addr,
                        RecordKind::DoubleValue {
                            id: IdPair::new(id, sub_id),
                            coords: Coords::new(row, col),
                        },
                    );
                    addr = addr.offset_by(4)?;
                }
            }
            InteractionMode::RandomEntities => {
                // exactly one entry, no repetition
                let [packed, id, sub_id] = read_array::<3>(self.buf, addr)?;
                self.push(
                    records,
                    addr,
                    RecordKind::RandomEntities {
                        count: packed >> 5,
                        param: packed & 0x0f,
                        id: IdPair::new(id, sub_id),
                    },
                );
                addr = addr.offset_by(3)?;
            }
            InteractionMode::SpecificEntity => {
                let param = self.byte(addr)?;
                addr = addr.offset_by(1)?;
                while !self.at_sentinel(addr)? {
                    let [id, sub_id, row, col] = read_array::<4>(self.buf, addr)?;
                    self.push(
                        records,
                        addr,
                        RecordKind::SpecificEntity {
                            param,
                            id: IdPair::new(id, sub_id),
                            coords: Coords::new(row, col),
                        },
                    );
                    addr = addr.offset_by(4)?;
                }
            }
            InteractionMode::Part => {
                while !self.at_sentinel(addr)? {
                    let [id, sub_id, packed] = read_array::<3>(self.buf, addr)?;
                    self.push(
                        records,
                        addr,
                        RecordKind::Part {
                            id: IdPair::new(id, sub_id),
                            coords: Coords::unpack(packed),
                        },
                    );
                    addr = addr.offset_by(3)?;
                }
            }
            InteractionMode::ParamObject => {
                while !self.at_sentinel(addr)? {
                    let [param, id, sub_id, extra, row, col] = read_array::<6>(self.buf, addr)?;
                    self.push(
                        records,
                        addr,
                        RecordKind::ParamObject {
                            param,
                            id: IdTriple { id, sub_id, extra },
                            coords: Coords::new(row, col),
                        },
                    );
                    addr = addr.offset_by(6)?;
                }
            }
            InteractionMode::ItemDrop => {
                let param = self.byte(addr)?;
                addr = addr.offset_by(1)?;
                while !self.at_sentinel(addr)? {
                    let [id, packed] = read_array::<2>(self.buf, addr)?;
                    self.push(
                        records,
                        addr,
                        RecordKind::ItemDrop {
                            param,
                            id,
                            coords: Coords::unpack(packed),
                        },
                    );
                    addr = addr.offset_by(2)?;
                }
            }
        }
        Ok(addr)
    }

    fn skip_to_sentinel(&self, mut addr: Address) -> Result<Address> {
        while !self.at_sentinel(addr)? {
            addr = addr.offset_by(1)?;
        }
        Ok(addr)
    }

    fn push(&self, records: &mut Vec<Record>, addr: Address, kind: RecordKind) {
        let record = Record::new(addr, kind);
        trace!("{}", record);
        records.push(record);
    }

    fn at_sentinel(&self, addr: Address) -> Result<bool> {
        Ok(self.byte(addr)? >= SENTINEL)
    }

    fn byte(&self, addr: Address) -> Result<u8> {
        read_byte(self.buf, addr)
    }
}

/// Find where a room's object stream starts: a per-group pointer, then a
/// per-room pointer inside that group's table.
pub fn room_stream_start(buf: &[u8], layout: &Layout, group: u8, room: u8) -> Result<Address> {
    let table = layout.objects;
    let group_table = table.with_offset(read_ptr(buf, table.offset_by(group as u16 * 2)?)?);
    let room_ptr = read_ptr(buf, group_table.offset_by(room as u16 * 2)?)?;
    let start = Address::new(layout.object_data_bank, room_ptr);
    debug!("Objects for room {:02x}:{:02x} start at {}", group, room, start);
    Ok(start)
}

/// Decode the objects placed in one room
pub fn read_objects(buf: &[u8], layout: &Layout, group: u8, room: u8) -> Result<Vec<Record>> {
    let start = room_stream_start(buf, layout, group, room)?;
    RecordStreamDecoder::new(buf).decode(start)
}

/// Decode every room of every object group, threading an accumulator
/// through `f` in group-major order.
pub fn fold_rooms<A, F>(buf: &[u8], layout: &Layout, init: A, mut f: F) -> Result<A>
where
    F: FnMut(A, u8, u8, Vec<Record>) -> Result<A>,
{
    let rooms = layout.rooms_per_group.min(0x100);
    let mut acc = init;
    for group in 0..layout.object_groups {
        for room in 0..rooms {
            let room = room as u8;
            let records = read_objects(buf, layout, group, room)?;
            acc = f(acc, group, room, records)?;
        }
    }
    Ok(acc)
}

/// Music cue of a room: a per-group pointer to one byte per room
pub fn read_music(buf: &[u8], layout: &Layout, group: u8, room: u8) -> Result<u8> {
    let table = layout.music;
    let row = table.with_offset(read_ptr(buf, table.offset_by(group as u16 * 2)?)?);
    read_byte(buf, row.offset_by(room as u16)?)
}
