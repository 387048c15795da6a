// Test utilities for building synthetic cartridge images without a real ROM.
// Only built for tests or with the `test-utils` feature; the setters index
// the image directly and panic on addresses outside it.
use crate::address::{Address, BANK_SIZE};
use crate::header::Title;
use crate::layout::Layout;

/// 64 banks, enough to reach the sprite table in bank 0x3f
pub const IMAGE_SIZE: usize = 0x40 * BANK_SIZE;

/// Where per-group room pointer tables are placed in the object table bank
const ROOM_TABLES: u16 = 0x6000;
/// Where the builder allocates object streams in the data bank
const STREAM_AREA: u16 = 0x7000;
/// Every room starts out pointing here: a lone 0xff
const EMPTY_STREAM: u16 = 0x4000;
const MUSIC_ROWS: u16 = 0x6000;
const CHEST_LISTS: u16 = 0x6000;
const CHEST_LIST_SIZE: u16 = 0x40;

pub struct ImageBuilder {
    pub memory: Vec<u8>,
    pub title: Title,
    pub layout: Layout,
    next_stream: u16,
}

impl ImageBuilder {
    /// An image where every room is empty, every chest list is empty and
    /// every music cue is 0x00.
    pub fn new(title: Title) -> Self {
        Self::with_layout(title, Layout::for_title(title))
    }

    pub fn with_layout(title: Title, layout: Layout) -> Self {
        let mut builder = ImageBuilder {
            memory: vec![0u8; IMAGE_SIZE],
            title,
            layout,
            next_stream: STREAM_AREA,
        };
        let signature = title.signature();
        builder.memory[0x134..0x134 + signature.len()].copy_from_slice(signature);
        builder.setup_rooms();
        builder.setup_music();
        builder.setup_chests();
        builder
    }

    fn setup_rooms(&mut self) {
        let objects = self.layout.objects;
        let data_bank = self.layout.object_data_bank;
        self.set(Address::new(data_bank, EMPTY_STREAM), &[0xff]);
        for group in 0..self.layout.object_groups as u16 {
            let room_table = ROOM_TABLES + group * 0x200;
            self.set_ptr(Address::new(objects.bank, objects.offset + group * 2), room_table);
            for room in 0..0x100u16 {
                self.set_ptr(Address::new(objects.bank, room_table + room * 2), EMPTY_STREAM);
            }
        }
    }

    fn setup_music(&mut self) {
        let music = self.layout.music;
        for group in 0..self.group_count() {
            self.set_ptr(
                Address::new(music.bank, music.offset + group * 2),
                MUSIC_ROWS + group * 0x100,
            );
        }
    }

    fn setup_chests(&mut self) {
        let chests = self.layout.chests;
        for group in 0..self.group_count() {
            let list = CHEST_LISTS + group * CHEST_LIST_SIZE;
            self.set_ptr(Address::new(chests.bank, chests.offset + group * 2), list);
            self.set(Address::new(chests.bank, list), &[0xff]);
        }
    }

    fn group_count(&self) -> u16 {
        self.layout.object_groups.max(self.layout.chest_groups) as u16
    }

    pub fn set(&mut self, addr: Address, bytes: &[u8]) {
        let at = addr.linear();
        self.memory[at..at + bytes.len()].copy_from_slice(bytes);
    }

    pub fn set_ptr(&mut self, addr: Address, value: u16) {
        self.set(addr, &value.to_le_bytes());
    }

    /// Place raw stream bytes in the object data bank and return where
    pub fn stream(&mut self, bytes: &[u8]) -> Address {
        let addr = Address::new(self.layout.object_data_bank, self.next_stream);
        self.set(addr, bytes);
        self.next_stream += bytes.len() as u16;
        addr
    }

    /// Give a room its own object stream
    pub fn room_objects(&mut self, group: u8, room: u8, bytes: &[u8]) -> Address {
        let addr = self.stream(bytes);
        self.point_room_at(group, room, addr.offset);
        addr
    }

    /// Point a room at an arbitrary offset in the data bank
    pub fn point_room_at(&mut self, group: u8, room: u8, offset: u16) {
        let objects = self.layout.objects;
        let room_table = ROOM_TABLES + group as u16 * 0x200;
        self.set_ptr(
            Address::new(objects.bank, room_table + room as u16 * 2),
            offset,
        );
    }

    pub fn music(&mut self, group: u8, room: u8, cue: u8) {
        let bank = self.layout.music.bank;
        self.set(
            Address::new(bank, MUSIC_ROWS + group as u16 * 0x100 + room as u16),
            &[cue],
        );
    }

    /// Replace a group's chest list; the 0xff terminator is appended
    pub fn chests(&mut self, group: u8, entries: &[[u8; 4]]) {
        let bank = self.layout.chests.bank;
        let mut at = CHEST_LISTS + group as u16 * CHEST_LIST_SIZE;
        for entry in entries {
            self.set(Address::new(bank, at), entry);
            at += 4;
        }
        self.set(Address::new(bank, at), &[0xff]);
    }

    /// Address of the 4-byte row `index` of the treasure table
    pub fn treasure_row(&self, index: u16) -> Address {
        let table = self.layout.treasures;
        Address::new(table.bank, table.offset + index * 4)
    }

    /// Make treasure `id` indirect through a sub-table at `offset`
    pub fn treasure_indirect(&mut self, id: u8, offset: u16) {
        let row = self.treasure_row(id as u16);
        let [lo, hi] = offset.to_le_bytes();
        self.set(row, &[0x80, lo, hi, 0x00]);
    }

    /// Point sprite `index` at `offset`: high byte after the slot, low byte
    /// before it.
    pub fn sprite_pointer(&mut self, index: u8, offset: u16) {
        let table = self.layout.sprites;
        let slot = Address::new(table.bank, table.offset + index as u16 * 3);
        let [lo, hi] = offset.to_le_bytes();
        let at = slot.linear();
        self.memory[at + 1] = hi;
        self.memory[at - 1] = lo;
    }

    pub fn build(self) -> Vec<u8> {
        self.memory
    }
}
