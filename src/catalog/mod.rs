//! Symbolic names for the raw ids found in room data.
//!
//! Each domain is a two-level table: primary id to a name plus a map of
//! sub-id variants. Every release shares a base layer; a per-release overlay
//! is consulted first. Lookups never fail: anything missing comes back as
//! the raw number.

mod tables;

use std::fmt::{Display, Error, Formatter};

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::header::Title;
use crate::record::{Record, RecordKind};
use crate::render::hex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Entities,
    DoubleValue,
    NoValue,
    Parts,
    Treasures,
    ParamObjects,
    ItemDrops,
    Music,
    InteractionModes,
}

/// Ordered so that the weaker of two confidences is the minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Confidence {
    Unverified,
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Name {
    pub text: &'static str,
    pub confidence: Confidence,
}

impl Name {
    /// A trailing '?' in table text marks an unconfirmed name
    pub fn parse(raw: &'static str) -> Name {
        match raw.strip_suffix('?') {
            Some(text) => Name {
                text,
                confidence: Confidence::Unverified,
            },
            None => Name {
                text: raw,
                confidence: Confidence::Confirmed,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub name: Name,
    pub variants: IndexMap<u8, Name>,
}

pub type Table = IndexMap<u8, Entry>;

/// A resolved name, or the raw id when the table has nothing for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Named(Name),
    Raw(u8),
}

impl Label {
    pub fn confidence(&self) -> Confidence {
        match self {
            Label::Named(name) => name.confidence,
            Label::Raw(_) => Confidence::Confirmed,
        }
    }

    pub fn text(&self) -> Option<&'static str> {
        match self {
            Label::Named(name) => Some(name.text),
            Label::Raw(_) => None,
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Label::Named(name) => match name.confidence {
                Confidence::Confirmed => write!(f, "{}", name.text),
                Confidence::Unverified => write!(f, "{}?", name.text),
            },
            Label::Raw(id) => write!(f, "{:#04x}", id),
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    #[serde(serialize_with = "hex::byte")]
    pub id: u8,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "hex::opt_byte"
    )]
    pub sub_id: Option<u8>,
    pub primary: Label,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<Label>,
}

impl Resolution {
    /// The weaker of the primary and variant confidences
    pub fn confidence(&self) -> Confidence {
        let primary = self.primary.confidence();
        match &self.variant {
            Some(variant) => primary.min(variant.confidence()),
            None => primary,
        }
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.primary)?;
        if let Some(variant) = &self.variant {
            write!(f, ", {}", variant)?;
        }
        Ok(())
    }
}

/// Name tables for one release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    title: Title,
}

impl Catalog {
    pub fn for_title(title: Title) -> Catalog {
        Catalog { title }
    }

    pub fn title(&self) -> Title {
        self.title
    }

    /// Overlay first, then the shared base
    fn layers(&self, domain: Domain) -> impl Iterator<Item = &'static Table> + Clone {
        let overlays: &'static std::collections::HashMap<(Title, Domain), Table> =
            &tables::OVERLAYS;
        let base: &'static std::collections::HashMap<Domain, Table> = &tables::BASE;
        overlays
            .get(&(self.title, domain))
            .into_iter()
            .chain(base.get(&domain))
    }

    pub fn entry(&self, domain: Domain, id: u8) -> Option<&'static Entry> {
        self.layers(domain).find_map(|table| table.get(&id))
    }

    /// Resolve a (primary id, sub-id) pair. Unknown ids, and unknown sub-ids
    /// of known ids, come back raw.
    pub fn resolve(&self, domain: Domain, id: u8, sub_id: u8) -> Resolution {
        let primary = match self.entry(domain, id) {
            Some(entry) => Label::Named(entry.name),
            None => Label::Raw(id),
        };
        let variant = self
            .layers(domain)
            .find_map(|table| table.get(&id).and_then(|e| e.variants.get(&sub_id)))
            .map(|name| Label::Named(*name))
            .unwrap_or(Label::Raw(sub_id));
        Resolution {
            id,
            sub_id: Some(sub_id),
            primary,
            variant: Some(variant),
        }
    }

    /// Resolve an id from a single-level domain (music, item drops, modes)
    pub fn resolve_single(&self, domain: Domain, id: u8) -> Resolution {
        let primary = match self.entry(domain, id) {
            Some(entry) => Label::Named(entry.name),
            None => Label::Raw(id),
        };
        Resolution {
            id,
            sub_id: None,
            primary,
            variant: None,
        }
    }

    pub fn music(&self, cue: u8) -> Resolution {
        self.resolve_single(Domain::Music, cue)
    }

    pub fn name_record(&self, record: &Record) -> Resolution {
        match record.kind {
            RecordKind::NoValue { id } => self.resolve(Domain::NoValue, id.id, id.sub_id),
            RecordKind::DoubleValue { id, .. } => {
                self.resolve(Domain::DoubleValue, id.id, id.sub_id)
            }
            RecordKind::RandomEntities { id, .. } | RecordKind::SpecificEntity { id, .. } => {
                self.resolve(Domain::Entities, id.id, id.sub_id)
            }
            RecordKind::Part { id, .. } => self.resolve(Domain::Parts, id.id, id.sub_id),
            RecordKind::ParamObject { id, .. } => {
                self.resolve(Domain::ParamObjects, id.id, id.sub_id)
            }
            RecordKind::ItemDrop { id, .. } => self.resolve_single(Domain::ItemDrops, id),
        }
    }

    /// Attach names in place. Which records exist is untouched.
    pub fn name_records(&self, records: &mut [Record]) {
        for record in records.iter_mut() {
            record.name = Some(self.name_record(record));
        }
    }
}
