use std::fmt::{Display, Error, Formatter};

use serde::Serialize;

use crate::address::Address;
use crate::catalog::Resolution;
use crate::render::hex;

/// Record-group tags that produce records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    NoValue,
    DoubleValue,
    RandomEntities,
    SpecificEntity,
    Part,
    ParamObject,
    ItemDrop,
}

impl InteractionMode {
    pub fn from_tag(tag: u8) -> Option<InteractionMode> {
        match tag {
            0xf1 => Some(InteractionMode::NoValue),
            0xf2 => Some(InteractionMode::DoubleValue),
            0xf6 => Some(InteractionMode::RandomEntities),
            0xf7 => Some(InteractionMode::SpecificEntity),
            0xf8 => Some(InteractionMode::Part),
            0xf9 => Some(InteractionMode::ParamObject),
            0xfa => Some(InteractionMode::ItemDrop),
            _ => None,
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            InteractionMode::NoValue => 0xf1,
            InteractionMode::DoubleValue => 0xf2,
            InteractionMode::RandomEntities => 0xf6,
            InteractionMode::SpecificEntity => 0xf7,
            InteractionMode::Part => 0xf8,
            InteractionMode::ParamObject => 0xf9,
            InteractionMode::ItemDrop => 0xfa,
        }
    }
}

/// (primary id, sub-id) as stored in the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IdPair {
    #[serde(serialize_with = "hex::byte")]
    pub id: u8,
    #[serde(serialize_with = "hex::byte")]
    pub sub_id: u8,
}

impl IdPair {
    pub fn new(id: u8, sub_id: u8) -> Self {
        IdPair { id, sub_id }
    }
}

/// Three ids of a parameterized object; the third byte is not understood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IdTriple {
    #[serde(serialize_with = "hex::byte")]
    pub id: u8,
    #[serde(serialize_with = "hex::byte")]
    pub sub_id: u8,
    #[serde(serialize_with = "hex::byte")]
    pub extra: u8,
}

/// Screen position, row first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Coords {
    #[serde(serialize_with = "hex::byte")]
    pub row: u8,
    #[serde(serialize_with = "hex::byte")]
    pub col: u8,
}

impl Coords {
    pub fn new(row: u8, col: u8) -> Self {
        Coords { row, col }
    }

    /// Unpack a tile-position byte (row in the high nibble, column in the
    /// low nibble) into the pixel position of the tile centre.
    pub fn unpack(packed: u8) -> Self {
        Coords {
            row: (packed >> 4) * 0x10 + 0x08,
            col: (packed & 0x0f) * 0x10 + 0x08,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RecordKind {
    NoValue {
        id: IdPair,
    },
    DoubleValue {
        id: IdPair,
        coords: Coords,
    },
    RandomEntities {
        #[serde(serialize_with = "hex::byte")]
        count: u8,
        #[serde(serialize_with = "hex::byte")]
        param: u8,
        id: IdPair,
    },
    SpecificEntity {
        #[serde(serialize_with = "hex::byte")]
        param: u8,
        id: IdPair,
        coords: Coords,
    },
    Part {
        id: IdPair,
        coords: Coords,
    },
    ParamObject {
        #[serde(serialize_with = "hex::byte")]
        param: u8,
        id: IdTriple,
        coords: Coords,
    },
    ItemDrop {
        #[serde(serialize_with = "hex::byte")]
        param: u8,
        #[serde(serialize_with = "hex::byte")]
        id: u8,
        coords: Coords,
    },
}

/// One decoded object, tagged with where its bytes start in the image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(serialize_with = "hex::address")]
    pub address: Address,
    #[serde(flatten)]
    pub kind: RecordKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Resolution>,
}

impl Record {
    pub fn new(address: Address, kind: RecordKind) -> Self {
        Record {
            address,
            kind,
            name: None,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        match self.kind {
            RecordKind::NoValue { .. } => InteractionMode::NoValue,
            RecordKind::DoubleValue { .. } => InteractionMode::DoubleValue,
            RecordKind::RandomEntities { .. } => InteractionMode::RandomEntities,
            RecordKind::SpecificEntity { .. } => InteractionMode::SpecificEntity,
            RecordKind::Part { .. } => InteractionMode::Part,
            RecordKind::ParamObject { .. } => InteractionMode::ParamObject,
            RecordKind::ItemDrop { .. } => InteractionMode::ItemDrop,
        }
    }

    pub fn primary_id(&self) -> u8 {
        match self.kind {
            RecordKind::NoValue { id }
            | RecordKind::DoubleValue { id, .. }
            | RecordKind::RandomEntities { id, .. }
            | RecordKind::SpecificEntity { id, .. }
            | RecordKind::Part { id, .. } => id.id,
            RecordKind::ParamObject { id, .. } => id.id,
            RecordKind::ItemDrop { id, .. } => id,
        }
    }

    /// Item drops have a single id and no sub-id
    pub fn sub_id(&self) -> Option<u8> {
        match self.kind {
            RecordKind::NoValue { id }
            | RecordKind::DoubleValue { id, .. }
            | RecordKind::RandomEntities { id, .. }
            | RecordKind::SpecificEntity { id, .. }
            | RecordKind::Part { id, .. } => Some(id.sub_id),
            RecordKind::ParamObject { id, .. } => Some(id.sub_id),
            RecordKind::ItemDrop { .. } => None,
        }
    }

    pub fn coords(&self) -> Option<Coords> {
        match self.kind {
            RecordKind::NoValue { .. } | RecordKind::RandomEntities { .. } => None,
            RecordKind::DoubleValue { coords, .. }
            | RecordKind::SpecificEntity { coords, .. }
            | RecordKind::Part { coords, .. }
            | RecordKind::ParamObject { coords, .. }
            | RecordKind::ItemDrop { coords, .. } => Some(coords),
        }
    }
}

impl Display for Coords {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "({:#04x}, {:#04x})", self.row, self.col)
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}: {:#04x}", self.address, self.mode().tag())?;
        match &self.kind {
            RecordKind::NoValue { id } => {
                write!(f, " {:#04x} {:#04x}", id.id, id.sub_id)?;
            }
            RecordKind::DoubleValue { id, coords } | RecordKind::Part { id, coords } => {
                write!(f, " {:#04x} {:#04x} at {}", id.id, id.sub_id, coords)?;
            }
            RecordKind::RandomEntities { count, param, id } => {
                write!(
                    f,
                    " {:#04x} {:#04x} x{} param={:#04x}",
                    id.id, id.sub_id, count, param
                )?;
            }
            RecordKind::SpecificEntity { param, id, coords } => {
                write!(
                    f,
                    " {:#04x} {:#04x} at {} param={:#04x}",
                    id.id, id.sub_id, coords, param
                )?;
            }
            RecordKind::ParamObject { param, id, coords } => {
                write!(
                    f,
                    " {:#04x} {:#04x} {:#04x} at {} param={:#04x}",
                    id.id, id.sub_id, id.extra, coords, param
                )?;
            }
            RecordKind::ItemDrop { param, id, coords } => {
                write!(f, " {:#04x} at {} param={:#04x}", id, coords, param)?;
            }
        }
        if let Some(name) = &self.name {
            write!(f, " [{}]", name)?;
        }
        Ok(())
    }
}
