use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::Result;
use crate::header::Title;

/// Where each release keeps its room tables, plus how far the scans go.
///
/// Defaults come from `Layout::for_title`; a TOML file may override any of
/// them for a patched or differently revised image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Per-group pointers to one music byte per room
    pub music: Address,
    /// Per-group pointers to per-room object stream pointers
    pub objects: Address,
    /// Bank the object streams themselves live in
    pub object_data_bank: u8,
    /// Per-group pointers to the 4-byte chest tables
    pub chests: Address,
    /// 4-byte treasure descriptors, one row per treasure id
    pub treasures: Address,
    /// 3-byte sprite index table
    pub sprites: Address,
    #[serde(default = "default_object_groups")]
    pub object_groups: u8,
    #[serde(default = "default_chest_groups")]
    pub chest_groups: u8,
    #[serde(default = "default_rooms_per_group")]
    pub rooms_per_group: u16,
    #[serde(default = "default_treasure_sprite_index")]
    pub treasure_sprite_index: u8,
}

fn default_object_groups() -> u8 {
    6
}

fn default_chest_groups() -> u8 {
    8
}

fn default_rooms_per_group() -> u16 {
    0x100
}

fn default_treasure_sprite_index() -> u8 {
    0x60
}

impl Layout {
    pub fn for_title(title: Title) -> Layout {
        match title {
            Title::Seasons => Layout {
                music: Address::new(0x04, 0x483c),
                objects: Address::new(0x11, 0x5b3b),
                object_data_bank: 0x11,
                chests: Address::new(0x15, 0x4f6c),
                treasures: Address::new(0x15, 0x5129),
                sprites: Address::new(0x3f, 0x6425),
                object_groups: default_object_groups(),
                chest_groups: default_chest_groups(),
                rooms_per_group: default_rooms_per_group(),
                treasure_sprite_index: default_treasure_sprite_index(),
            },
            Title::Ages => Layout {
                music: Address::new(0x04, 0x495c),
                objects: Address::new(0x15, 0x432b),
                object_data_bank: 0x12,
                chests: Address::new(0x16, 0x5108),
                treasures: Address::new(0x16, 0x5332),
                sprites: Address::new(0x3f, 0x6427),
                object_groups: default_object_groups(),
                chest_groups: default_chest_groups(),
                rooms_per_group: default_rooms_per_group(),
                treasure_sprite_index: default_treasure_sprite_index(),
            },
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Layout> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Layout> {
        debug!("Loading layout from {}", path.display());
        let text = fs::read_to_string(path)?;
        Layout::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    #[test]
    fn test_ages_streams_live_outside_the_pointer_bank() {
        let layout = Layout::for_title(Title::Ages);
        assert_eq!(layout.objects.bank, 0x15);
        assert_eq!(layout.object_data_bank, 0x12);

        let layout = Layout::for_title(Title::Seasons);
        assert_eq!(layout.objects.bank, layout.object_data_bank);
    }

    #[test]
    fn test_layout_from_toml() {
        let text = r#"
object_data_bank = 0x11
chest_groups = 2

[music]
bank = 0x04
offset = 0x483c

[objects]
bank = 0x11
offset = 0x5b3b

[chests]
bank = 0x15
offset = 0x4f6c

[treasures]
bank = 0x15
offset = 0x5129

[sprites]
bank = 0x3f
offset = 0x6425
"#;
        let layout = Layout::from_toml_str(text).unwrap();
        assert_eq!(layout.chest_groups, 2);
        assert_eq!(layout.object_groups, 6);
        assert_eq!(layout.rooms_per_group, 0x100);
        assert_eq!(layout.music, Layout::for_title(Title::Seasons).music);
    }

    #[test]
    fn test_layout_round_trips_through_toml() {
        let layout = Layout::for_title(Title::Ages);
        let text = toml::to_string(&layout).unwrap();
        assert_eq!(Layout::from_toml_str(&text).unwrap(), layout);
    }

    #[test]
    fn test_bad_layout() {
        assert!(matches!(
            Layout::from_toml_str("music = 3"),
            Err(DecodeError::Config(_))
        ));
    }
}
