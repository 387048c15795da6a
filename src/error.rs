// Decode Error Handling

use std::fmt;

use crate::address::Address;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    // Buffer access
    OutOfBounds {
        linear: usize,
        width: usize,
        len: usize,
    },
    AddressOverflow(Address),

    // Malformed streams
    NestingTooDeep(Address),

    // Image identification
    UnknownTitle(String),

    // Patch mode
    PatchOutOfBounds { address: Address, len: usize },

    // Layout files and output
    Config(String),
    Render(String),
    Io(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::OutOfBounds { linear, width, len } => {
                write!(
                    f,
                    "Read of {} byte(s) at {:#07x} is past the end of the image ({:#07x} bytes)",
                    width, linear, len
                )
            }
            DecodeError::AddressOverflow(addr) => {
                write!(f, "Cursor at {} ran out of the 16-bit offset space", addr)
            }
            DecodeError::NestingTooDeep(addr) => {
                write!(f, "Pointer tags nested too deeply at {}", addr)
            }
            DecodeError::UnknownTitle(title) => {
                write!(f, "Unknown ROM: {:?}", title)
            }
            DecodeError::PatchOutOfBounds { address, len } => {
                write!(
                    f,
                    "Patch of {} byte(s) at {} falls outside the image",
                    len, address
                )
            }
            DecodeError::Config(msg) => {
                write!(f, "Layout error: {}", msg)
            }
            DecodeError::Render(msg) => {
                write!(f, "Render error: {}", msg)
            }
            DecodeError::Io(msg) => {
                write!(f, "IO error: {}", msg)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<std::io::Error> for DecodeError {
    fn from(e: std::io::Error) -> Self {
        DecodeError::Io(e.to_string())
    }
}

impl From<toml::de::Error> for DecodeError {
    fn from(e: toml::de::Error) -> Self {
        DecodeError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for DecodeError {
    fn from(e: toml::ser::Error) -> Self {
        DecodeError::Render(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
