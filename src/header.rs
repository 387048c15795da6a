/*
Cartridge header fields used for identification
        0x0134  title (11 bytes on colour carts)
        0x013f  manufacturer code
        0x0143  colour flag
        0x0144  licensee
        0x014f  end of header
*/
use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::address::slice_at;
use crate::error::{DecodeError, Result};

const TITLE_START: usize = 0x134;
const TITLE_END: usize = 0x143;

/// The two releases this decoder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Title {
    Seasons,
    Ages,
}

impl Title {
    /// Title-field prefix that identifies the release
    pub fn signature(&self) -> &'static [u8] {
        match self {
            Title::Seasons => b"ZELDA DIN",
            Title::Ages => b"ZELDA NAYRU",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Title::Seasons => "seasons",
            Title::Ages => "ages",
        }
    }
}

impl Display for Title {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), Error> {
        write!(f, "{}", self.name())
    }
}

pub struct Header {
    pub title: Title,
    pub raw_title: String,
}

impl Header {
    /// Identify the release from the title field. Fails before any decoding
    /// if neither signature matches.
    pub fn new(bytes: &[u8]) -> Result<Header> {
        let field = slice_at(bytes, TITLE_START, TITLE_END - TITLE_START)?;
        let raw_title: String = field
            .iter()
            .take_while(|&&b| b != 0)
            .filter(|&&b| (0x20..0x7f).contains(&b))
            .map(|&b| b as char)
            .collect();
        debug!("Cartridge title field: {:?}", raw_title);

        let title = [Title::Seasons, Title::Ages]
            .into_iter()
            .find(|t| field.starts_with(t.signature()))
            .ok_or_else(|| DecodeError::UnknownTitle(raw_title.clone()))?;
        info!("Detected {} image", title);

        Ok(Header { title, raw_title })
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), Error> {
        write!(
            f,
            "
Title field:              {}
Release:                  {}
",
            self.raw_title, self.title,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ImageBuilder;

    #[test]
    fn test_detect_seasons() {
        let memory = ImageBuilder::new(Title::Seasons).build();
        let header = Header::new(&memory).unwrap();
        assert_eq!(header.title, Title::Seasons);
        assert!(header.raw_title.starts_with("ZELDA DIN"));
    }

    #[test]
    fn test_detect_ages() {
        let memory = ImageBuilder::new(Title::Ages).build();
        assert_eq!(Header::new(&memory).unwrap().title, Title::Ages);
    }

    #[test]
    fn test_unknown_title() {
        let mut memory = vec![0u8; 0x8000];
        memory[0x134..0x13d].copy_from_slice(b"TETRIS\0\0\0");
        match Header::new(&memory) {
            Err(DecodeError::UnknownTitle(t)) => assert_eq!(t, "TETRIS"),
            other => panic!("expected UnknownTitle, got {:?}", other.map(|h| h.title)),
        }
    }

    #[test]
    fn test_image_too_small_for_header() {
        let memory = vec![0u8; 0x100];
        assert!(matches!(
            Header::new(&memory),
            Err(DecodeError::OutOfBounds { .. })
        ));
    }
}
