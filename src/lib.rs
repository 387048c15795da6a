#![crate_name = "roomdata"]

#[macro_use]
extern crate lazy_static;

pub mod address;
pub mod catalog;
pub mod chest;
pub mod decoder;
pub mod descriptor;
pub mod error;
pub mod header;
pub mod layout;
pub mod patch;
pub mod record;
pub mod render;
pub mod rom;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod decoder_tests;

pub use error::{DecodeError, Result};
pub use rom::{Naming, Rom};

/*
Tables read from each release, as bank:offset
                Seasons     Ages
music           04:483c     04:495c     per group, one cue byte per room
objects         11:5b3b     15:432b     per group, per room stream pointer
object data     bank 11     bank 12     where the streams themselves live
chests          15:4f6c     16:5108     per group, 4-byte entries
treasures       15:5129     16:5332     4-byte rows, bit 7 = sub-table
sprites         3f:6425     3f:6427     3-byte slots
*/
