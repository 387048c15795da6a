use std::fmt::{Display, Error, Formatter};
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::catalog::{Catalog, Domain, Resolution};
use crate::chest::{ChestRecord, ChestTableScanner};
use crate::decoder::{fold_rooms, read_music, read_objects};
use crate::descriptor::{DescriptorResolver, SpriteDescriptor, TreasureDescriptor};
use crate::error::Result;
use crate::header::{Header, Title};
use crate::layout::Layout;
use crate::patch::{PatchMode, PatchWriter};
use crate::record::{InteractionMode, Record};
use crate::render::hex;

/// Whether results carry catalog names next to the raw ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    Raw,
    Symbolic,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomDecodeResult {
    #[serde(serialize_with = "hex::byte")]
    pub group: u8,
    #[serde(serialize_with = "hex::byte")]
    pub room: u8,
    #[serde(serialize_with = "hex::byte")]
    pub music: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_name: Option<Resolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chest: Option<ChestRecord>,
    pub objects: Vec<Record>,
}

/// A search hit: the record and the room it came from
#[derive(Debug, Clone, Serialize)]
pub struct LocatedRecord {
    #[serde(serialize_with = "hex::byte")]
    pub group: u8,
    #[serde(serialize_with = "hex::byte")]
    pub room: u8,
    #[serde(serialize_with = "hex::byte")]
    pub music: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_name: Option<Resolution>,
    pub record: Record,
}

/// Which records `Rom::search_objects` keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectQuery {
    pub mode: InteractionMode,
    pub id: Option<u8>,
    pub sub_id: Option<u8>,
}

impl ObjectQuery {
    pub fn new(mode: InteractionMode, id: Option<u8>, sub_id: Option<u8>) -> Self {
        ObjectQuery { mode, id, sub_id }
    }

    /// A record without a sub-id never matches a sub-id filter
    pub fn matches(&self, record: &Record) -> bool {
        record.mode() == self.mode
            && self.id.map_or(true, |id| record.primary_id() == id)
            && self
                .sub_id
                .map_or(true, |sub_id| record.sub_id() == Some(sub_id))
    }
}

pub struct Rom {
    memory: Vec<u8>,
    header: Header,
    layout: Layout,
    catalog: Catalog,
}

impl Rom {
    /// Identify the image and pick the layout and names for its release
    pub fn from_memory(memory: Vec<u8>) -> Result<Rom> {
        let header = Header::new(&memory)?;
        let layout = Layout::for_title(header.title);
        let catalog = Catalog::for_title(header.title);
        debug!("{}", header);
        Ok(Rom {
            memory,
            header,
            layout,
            catalog,
        })
    }

    pub fn load(path: &Path) -> Result<Rom> {
        info!("Reading image {}", path.display());
        Rom::from_memory(fs::read(path)?)
    }

    /// Replace the built-in table locations
    pub fn with_layout(mut self, layout: Layout) -> Rom {
        self.layout = layout;
        self
    }

    pub fn title(&self) -> Title {
        self.header.title
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn read_music(&self, group: u8, room: u8) -> Result<u8> {
        read_music(&self.memory, &self.layout, group, room)
    }

    fn music_name(&self, cue: u8, naming: Naming) -> Option<Resolution> {
        match naming {
            Naming::Raw => None,
            Naming::Symbolic => Some(self.catalog.music(cue)),
        }
    }

    fn name_chest(&self, chest: &mut ChestRecord, naming: Naming) {
        if naming == Naming::Symbolic {
            chest.treasure = Some(self.catalog.resolve(
                Domain::Treasures,
                chest.treasure_id,
                chest.treasure_sub_id,
            ));
            chest.music_name = chest.music.map(|cue| self.catalog.music(cue));
        }
    }

    /// Music, objects and chest of one room
    pub fn decode_room(&self, group: u8, room: u8, naming: Naming) -> Result<RoomDecodeResult> {
        let music = self.read_music(group, room)?;
        let mut objects = read_objects(&self.memory, &self.layout, group, room)?;
        let mut chest = ChestTableScanner::new(&self.memory, &self.layout).find(group, room)?;

        if naming == Naming::Symbolic {
            self.catalog.name_records(&mut objects);
        }
        if let Some(chest) = chest.as_mut() {
            self.name_chest(chest, naming);
        }

        Ok(RoomDecodeResult {
            group,
            room,
            music,
            music_name: self.music_name(music, naming),
            chest,
            objects,
        })
    }

    /// Chests of one group or of every group, optionally only those in rooms
    /// playing a given music cue
    pub fn scan_chests(
        &self,
        group: Option<u8>,
        music: Option<u8>,
        naming: Naming,
    ) -> Result<Vec<ChestRecord>> {
        let scanner = ChestTableScanner::new(&self.memory, &self.layout);
        let groups: Vec<u8> = match group {
            Some(group) => vec![group],
            None => (0..self.layout.chest_groups).collect(),
        };

        let mut found = Vec::new();
        for group in groups {
            for mut chest in scanner.scan_group(group)? {
                if music.map_or(true, |cue| chest.music == Some(cue)) {
                    self.name_chest(&mut chest, naming);
                    found.push(chest);
                }
            }
        }
        debug!("Found {} chests", found.len());
        Ok(found)
    }

    /// Every matching record in every room, in group then room order
    pub fn search_objects(
        &self,
        mode: InteractionMode,
        id: Option<u8>,
        sub_id: Option<u8>,
        naming: Naming,
    ) -> Result<Vec<LocatedRecord>> {
        let query = ObjectQuery::new(mode, id, sub_id);
        let hits = fold_rooms(&self.memory, &self.layout, Vec::new(), |mut hits, group, room, records| {
            let matching: Vec<Record> = records.into_iter().filter(|r| query.matches(r)).collect();
            if matching.is_empty() {
                return Ok(hits);
            }
            let music = self.read_music(group, room)?;
            for mut record in matching {
                if naming == Naming::Symbolic {
                    record.name = Some(self.catalog.name_record(&record));
                }
                hits.push(LocatedRecord {
                    group,
                    room,
                    music,
                    music_name: self.music_name(music, naming),
                    record,
                });
            }
            Ok(hits)
        })?;
        debug!("Found {} matching records", hits.len());
        Ok(hits)
    }

    pub fn resolve_treasure(&self, id: u8, sub_id: u8, naming: Naming) -> Result<TreasureDescriptor> {
        let mut treasure = DescriptorResolver::new(&self.memory, &self.layout).treasure(id, sub_id)?;
        if naming == Naming::Symbolic {
            treasure.name = Some(self.catalog.resolve(Domain::Treasures, id, sub_id));
        }
        Ok(treasure)
    }

    pub fn resolve_sprite(&self, index: u8, sub_index: u8) -> Result<SpriteDescriptor> {
        DescriptorResolver::new(&self.memory, &self.layout).sprite(index, sub_index)
    }

    /// Plan `mode` over every room and return the patched image. The loaded
    /// image is left as it was.
    pub fn apply_patch(&self, mode: PatchMode) -> Result<Vec<u8>> {
        let records = fold_rooms(&self.memory, &self.layout, Vec::new(), |mut acc, _, _, records| {
            acc.extend(records.into_iter().filter(|r| mode.targets(r.mode())));
            Ok(acc)
        })?;
        let writer = PatchWriter::plan(mode, &records);
        info!("{} records to patch", writer.len());
        writer.apply(&self.memory)
    }
}

impl Display for RoomDecodeResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), Error> {
        write!(f, "room {:02x}:{:02x}\nmusic: ", self.group, self.room)?;
        match &self.music_name {
            Some(name) => writeln!(f, "{} ({:#04x})", name, self.music)?,
            None => writeln!(f, "{:#04x}", self.music)?,
        }
        match &self.chest {
            Some(chest) => writeln!(f, "chest: {}", chest)?,
            None => writeln!(f, "chest: none")?,
        }
        writeln!(f, "objects:")?;
        for record in &self.objects {
            writeln!(f, "  {}", record)?;
        }
        Ok(())
    }
}

impl Display for LocatedRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), Error> {
        write!(f, "room {:02x}:{:02x} ", self.group, self.room)?;
        match &self.music_name {
            Some(name) => write!(f, "music {}", name)?,
            None => write!(f, "music {:#04x}", self.music)?,
        }
        write!(f, ": {}", self.record)
    }
}
