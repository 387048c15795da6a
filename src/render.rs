//! Output formats. Every result type has a one-line `Display`; this module
//! adds the TOML form, with ids and addresses written as hex strings.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;

/// `serialize_with` helpers that keep numbers in the notation used by
/// disassemblies of the game
pub mod hex {
    use serde::Serializer;

    use crate::address::Address;

    pub fn byte<S: Serializer>(value: &u8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("{:#04x}", value))
    }

    pub fn opt_byte<S: Serializer>(value: &Option<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => byte(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn bytes<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(value.iter().map(|b| format!("{:#04x}", b)))
    }

    pub fn address<S: Serializer>(value: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }
}

/// Render `value` as a TOML document under a single top-level key.
/// TOML has no top-level arrays, so lists always need the key.
pub fn to_toml<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String> {
    let mut document = BTreeMap::new();
    document.insert(key, value);
    Ok(toml::to_string(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::catalog::Catalog;
    use crate::header::Title;
    use crate::record::{Coords, IdPair, Record, RecordKind};

    fn entity() -> Record {
        Record::new(
            Address::new(0x11, 0x6001),
            RecordKind::SpecificEntity {
                param: 0,
                id: IdPair::new(0x09, 0x01),
                coords: Coords::new(0x58, 0x48),
            },
        )
    }

    #[test]
    fn test_records_render_as_array_of_tables() {
        let text = to_toml("records", &vec![entity(), entity()]).unwrap();
        assert_eq!(text.matches("[[records]]").count(), 2);
        assert!(text.contains("address = \"11:6001\""));
        assert!(text.contains("mode = \"specific_entity\""));
        assert!(text.contains("row = \"0x58\""));
        // unnamed records carry no name table
        assert!(!text.contains("name"));
    }

    #[test]
    fn test_names_render_with_unverified_marker() {
        let mut record = entity();
        record.kind = RecordKind::DoubleValue {
            id: IdPair::new(0xdc, 0x01),
            coords: Coords::new(0x18, 0x28),
        };
        Catalog::for_title(Title::Ages).name_records(std::slice::from_mut(&mut record));
        let text = to_toml("record", &record).unwrap();
        assert!(text.contains("primary = \"various\""));
        assert!(text.contains("variant = \"doorway warp?\""));
    }
}
