//! Byte patches over decoded records.
//!
//! A patch plan is built from records already decoded out of the source
//! image, then applied to a copy of it. Every write is bounds-checked before
//! any byte changes, so a failed plan never leaves a half-written image.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};

use crate::address::Address;
use crate::error::{DecodeError, Result};
use crate::record::{InteractionMode, Record};

/// Count 7, parameter 0, then keese 0x32/0x00
const SEVEN_KEESE: &[u8] = &[0xe0, 0x32, 0x00];
/// Keese 0x32/0x00
const ONE_KEESE: &[u8] = &[0x32, 0x00];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMode {
    /// Every random-entities group becomes seven keese and every specific
    /// entity becomes one keese
    Keesanity,
}

impl PatchMode {
    /// Bytes written at a record's address, or None to leave it alone
    pub fn payload(&self, mode: InteractionMode) -> Option<&'static [u8]> {
        match self {
            PatchMode::Keesanity => match mode {
                InteractionMode::RandomEntities => Some(SEVEN_KEESE),
                InteractionMode::SpecificEntity => Some(ONE_KEESE),
                _ => None,
            },
        }
    }

    pub fn targets(&self, mode: InteractionMode) -> bool {
        self.payload(mode).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub address: Address,
    pub bytes: &'static [u8],
}

#[derive(Debug, Default)]
pub struct PatchWriter {
    // keyed by address: a stream shared by several rooms is patched once
    patches: IndexMap<Address, &'static [u8]>,
}

impl PatchWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan patches for `records` in decode order. Records the mode does
    /// not touch are ignored.
    pub fn plan<'r, I>(mode: PatchMode, records: I) -> Self
    where
        I: IntoIterator<Item = &'r Record>,
    {
        let mut writer = PatchWriter::new();
        for record in records {
            if let Some(bytes) = mode.payload(record.mode()) {
                writer.add(record.address, bytes);
            }
        }
        writer
    }

    pub fn add(&mut self, address: Address, bytes: &'static [u8]) {
        self.patches.insert(address, bytes);
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn patches(&self) -> impl Iterator<Item = Patch> + '_ {
        self.patches.iter().map(|(&address, &bytes)| Patch { address, bytes })
    }

    /// Return a patched copy of `image`. The input is never modified.
    pub fn apply(&self, image: &[u8]) -> Result<Vec<u8>> {
        for patch in self.patches() {
            let fits = patch
                .address
                .linear()
                .checked_add(patch.bytes.len())
                .map_or(false, |end| end <= image.len());
            if !fits {
                return Err(DecodeError::PatchOutOfBounds {
                    address: patch.address,
                    len: patch.bytes.len(),
                });
            }
        }

        let mut out = image.to_vec();
        for patch in self.patches() {
            let at = patch.address.linear();
            debug!("Patching {} with {:02x?}", patch.address, patch.bytes);
            out[at..at + patch.bytes.len()].copy_from_slice(patch.bytes);
        }
        info!("Applied {} patches", self.len());
        Ok(out)
    }
}

/// Write an image next to `path` and move it into place, so readers never
/// see a partial file.
pub fn write_image(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut temp = PathBuf::from(path);
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    temp.set_file_name(name);

    {
        let mut file = fs::File::create(&temp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    if let Err(e) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(e.into());
    }
    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
