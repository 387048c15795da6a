// Name tables. A trailing '?' marks a name that was never confirmed in game;
// it is stripped on load and recorded as unverified instead.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::{Domain, Entry, Name, Table};
use crate::header::Title;

type Row = (u8, &'static str, &'static [(u8, &'static str)]);

const MUSIC: &[Row] = &[
    (0x03, "overworld", &[]),
    (0x07, "ambi's palace", &[]),
    (0x0b, "lynna village", &[]),
    (0x0c, "zora village", &[]),
    (0x0d, "essence room", &[]),
    (0x0e, "house", &[]),
    (0x0f, "fairy fountain", &[]),
    (0x12, "hero's cave", &[]),
    (0x13, "D1", &[]),
    (0x14, "D2", &[]),
    (0x15, "D3", &[]),
    (0x16, "D4", &[]),
    (0x17, "D5", &[]),
    (0x18, "D6", &[]),
    (0x19, "D7", &[]),
    (0x1a, "D8", &[]),
    (0x1b, "onox's castle", &[]),
    (0x1e, "maku tree", &[]),
    (0x20, "sea of no return", &[]),
    (0x24, "symmetry city present", &[]),
    (0x25, "symmetry city past", &[]),
    (0x28, "subrosia", &[]),
    (0x30, "fairies' woods", &[]),
    (0x35, "samasa desert", &[]),
    (0x36, "cave", &[]),
    // sound effects share the id space
    (0x4c, "got item", &[]),
    (0x4d, "puzzle solved (short)", &[]),
    (0x4e, "damage enemy", &[]),
    // listed twice upstream as "charge sword" and "damage link"
    (0x4f, "damage link?", &[]),
    (0x50, "ping", &[]),
    (0x51, "shoot rock", &[]),
    (0x52, "engulf", &[]),
    (0x53, "jump", &[]),
    (0x54, "open menu", &[]),
    (0x55, "close menu", &[]),
    (0x56, "select option", &[]),
    (0x57, "restore heart", &[]),
    (0x58, "deflect", &[]),
    (0x59, "falling enemy", &[]),
    (0x5a, "menu says no", &[]),
    (0x5b, "puzzle solved (long)", &[]),
    (0x5c, "preparing magic", &[]),
    (0x5d, "sword beam", &[]),
    (0x5e, "small key", &[]),
    (0x60, "low hearts", &[]),
    (0x70, "onox walk", &[]),
    (0x80, "minecart", &[]),
    (0x90, "gale seed", &[]),
    (0xa0, "dimitri?", &[]),
    (0xb0, "rumble", &[]),
    (0xc0, "spell?", &[]),
    (0xd0, "scent seed impact", &[]),
    (0xd1, "growl?", &[]),
    (0xd2, "thunder", &[]),
    (0xd3, "whirlwind", &[]),
];

const SEASONS_MUSIC: &[Row] = &[
    (0x04, "temple remains", &[]),
    (0x05, "tarm ruins", &[]),
    (0x0a, "horon village", &[]),
    (0x3e, "goron mountain", &[]),
    (0x46, "northern peak", &[]),
];

const AGES_MUSIC: &[Row] = &[
    (0x04, "overworld past", &[]),
    (0x05, "crescent island", &[]),
    (0x0a, "lynna city", &[]),
    (0x3e, "rolling ridge", &[]),
    (0x46, "black tower", &[]),
];

const INTERACTION_MODES: &[Row] = &[
    (0xf1, "NV interaction", &[]),
    (0xf2, "DV interaction", &[]),
    (0xf6, "random entities", &[]),
    (0xf7, "specific entity", &[]),
    (0xf8, "part", &[]),
    (0xf9, "object with param", &[]),
    (0xfa, "item drop", &[]),
];

const NV_INTERACTIONS: &[Row] = &[];

const ENTITIES: &[Row] = &[
    (0x09, "octorok", &[(0x00, "red 0x00"), (0x01, "red 0x01")]),
    (0x0a, "goriya", &[(0x00, "boomerang")]),
    (0x0e, "trap", &[(0x00, "spinner"), (0x01, "blade")]),
    (0x31, "stalfos", &[(0x00, "blue")]),
    (0x32, "keese", &[]),
    (0x34, "zol", &[(0x01, "red")]),
    (0x35, "floormaster", &[]),
    (0x38, "great fairy", &[]),
    (0x39, "fire keese", &[]),
    (0x3e, "peahat", &[]),
    (0x43, "gel", &[]),
    (0x53, "dragonfly", &[]),
    (
        0x59,
        "fixed drop",
        &[
            (0x00, "fairy"),
            (0x01, "heart"),
            (0x04, "bombs"),
            (0x05, "ember seeds"),
            (0x06, "scent seeds"),
            (0x07, "pegasus seeds"),
            (0x08, "gale seeds"),
            (0x09, "mystery seeds"),
        ],
    ),
    (
        0x5a,
        "seed tree",
        &[
            (0x00, "ember"),
            (0x01, "mystery"),
            (0x02, "scent"),
            (0x03, "pegasus"),
            (0x04, "gale (sunken city)"),
            (0x05, "gale (tarm ruins)"),
        ],
    ),
    (0x70, "goriya bros", &[]),
    (0x78, "aquamentus", &[]),
];

const SEASONS_ENTITIES: &[Row] = &[(0x32, "keese", &[(0x00, "normal")])];

const DV_INTERACTIONS: &[Row] = &[
    (
        0x12,
        "dungeon",
        &[
            (0x00, "entry text"),
            (0x01, "small key when room cleared"),
            (0x02, "chest when room cleared"),
            (0x04, "stairs when room cleared"),
        ],
    ),
    (0x13, "push block trigger", &[]),
    (
        0x1e,
        "doors",
        &[
            (0x04, "N opens on trigger"),
            (0x08, "N opens when room cleared"),
            (0x09, "E opens when room cleared"),
            (0x0a, "S opens when room cleared"),
            (0x0b, "W opens when room cleared"),
            (0x14, "N opens for torches"),
            (0x15, "W opens for torches"),
        ],
    ),
    (0x20, "dungeon script", &[]),
    (0x21, "gnarled keyhole", &[]),
    (0x31, "subrosia portal", &[]),
    (0x38, "d1 old man", &[]),
    (0x46, "shopkeeper", &[]),
    (0x47, "shop item", &[]),
    (0x4b, "palace guard(s)", &[]),
    (
        0x6b,
        "placed item",
        &[
            (0x0a, "piece of heart"),
            (0x0c, "flippers"),
            (0x91, "gasha seed"),
            (0x1f, "gasha seed?"),
            (0x20, "seed satchel"),
        ],
    ),
    (0x78, "toggle tile", &[]),
    (0x7e, "miniboss portal", &[]),
    (0x7f, "essence", &[]),
    (0x9d, "impa", &[]),
    (0xb3, "harp of ages", &[]),
    (0xce, "deku scrub", &[]),
    (0xc6, "wooden sword", &[]),
    (0xc7, "various", &[(0x04, "renewable bush")]),
    (
        0xdc,
        "various",
        &[
            (0x01, "doorway warp?"),
            (0x02, "chimney warp?"),
            (0x07, "piece of heart"),
            (0x11, "mermaid's cave boss key"),
            (0x15, "sea of storms present chest"),
            (0x16, "sea of storms past chest"),
        ],
    ),
    (
        0xe1,
        "time portal",
        &[
            (0x00, "dormant"),
            (0x01, "east of maku tree"),
            (0x02, "south of maku tree"),
        ],
    ),
    (0xe2, "statue eyes", &[]),
];

const PARTS: &[Row] = &[(0x13, "owl statue", &[])];

const TREASURES: &[Row] = &[
    (0x00, "none", &[]),
    (0x03, "bombs", &[(0x00, "10 count")]),
    (0x04, "cane of somaria", &[]),
    (0x05, "sword", &[(0x00, "L-1")]),
    (0x06, "boomerang", &[(0x01, "L-2")]),
    (0x08, "magnet gloves", &[]),
    (0x0a, "switch hook", &[(0x01, "long hook")]),
    (0x0f, "seed shooter", &[]),
    (0x13, "slingshot", &[(0x00, "L-1"), (0x01, "L-2")]),
    (0x16, "power bracelet", &[]),
    (0x17, "feather", &[(0x00, "L-1"), (0x01, "L-2")]),
    (
        0x28,
        "rupees",
        &[
            (0x00, "1 count"),
            (0x01, "5 count"),
            (0x02, "10 count"),
            (0x03, "20 count"),
            (0x04, "30 count"),
            (0x05, "50 count"),
            (0x06, "100 count"),
        ],
    ),
    (0x2b, "piece of heart", &[]),
    (
        0x2d,
        "ring",
        &[
            (0x04, "discovery ring"),
            (0x05, "moblin ring"),
            (0x06, "steadfast ring"),
            (0x07, "rang ring L-1"),
            (0x08, "blast ring"),
            (0x09, "quicksand ring"),
            (0x0a, "quicksand ring"),
            (0x0b, "armor ring L-2"),
            (0x0e, "power ring L-1"),
            (0x10, "subrosian ring"),
        ],
    ),
    (0x30, "small key", &[]),
    (0x31, "boss key", &[]),
    (0x32, "compass", &[]),
    (0x33, "dungeon map", &[]),
    (0x34, "gasha seed", &[]),
    (0x4a, "mermaid suit", &[]),
    (0x4b, "slate", &[]),
    (0x4f, "x-shaped jewel", &[]),
    (0x50, "red ore", &[]),
    (0x51, "blue ore", &[]),
    (0x54, "master's plaque", &[]),
];

const SEASONS_TREASURES: &[Row] = &[
    (0x30, "small key", &[(0x03, "in chest")]),
    (0x31, "boss key", &[(0x03, "in chest")]),
    (0x32, "compass", &[(0x02, "in chest")]),
    (0x33, "dungeon map", &[(0x02, "in chest")]),
];

const PARAM_OBJECTS: &[Row] = &[(0x40, "palace guard", &[])];

const ITEM_DROPS: &[Row] = &[
    (0x05, "ember seeds", &[]),
    (0x06, "scent seeds", &[]),
    (0x07, "pegasus seeds", &[]),
    (0x08, "gale seeds", &[]),
    (0x09, "mystery seeds", &[]),
];

fn table(rows: &[Row]) -> Table {
    rows.iter()
        .map(|&(id, name, variants)| {
            let variants: IndexMap<u8, Name> = variants
                .iter()
                .map(|&(sub_id, name)| (sub_id, Name::parse(name)))
                .collect();
            (
                id,
                Entry {
                    name: Name::parse(name),
                    variants,
                },
            )
        })
        .collect()
}

lazy_static! {
    pub static ref BASE: HashMap<Domain, Table> = {
        let mut m = HashMap::new();
        m.insert(Domain::Music, table(MUSIC));
        m.insert(Domain::InteractionModes, table(INTERACTION_MODES));
        m.insert(Domain::NoValue, table(NV_INTERACTIONS));
        m.insert(Domain::DoubleValue, table(DV_INTERACTIONS));
        m.insert(Domain::Entities, table(ENTITIES));
        m.insert(Domain::Parts, table(PARTS));
        m.insert(Domain::Treasures, table(TREASURES));
        m.insert(Domain::ParamObjects, table(PARAM_OBJECTS));
        m.insert(Domain::ItemDrops, table(ITEM_DROPS));
        m
    };
    pub static ref OVERLAYS: HashMap<(Title, Domain), Table> = {
        let mut m = HashMap::new();
        m.insert((Title::Seasons, Domain::Music), table(SEASONS_MUSIC));
        m.insert((Title::Seasons, Domain::Entities), table(SEASONS_ENTITIES));
        m.insert((Title::Seasons, Domain::Treasures), table(SEASONS_TREASURES));
        m.insert((Title::Ages, Domain::Music), table(AGES_MUSIC));
        m
    };
}
