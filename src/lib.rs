/*
    aoskit
    https://github.com/aoskit/aoskit

    Copyright 2025 aoskit contributors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------
*/

//! # aoskit
//!
//! aoskit is a Rust library for unpacking and repacking AOS archive files, the
//! proprietary asset container used by a family of visual-novel engines.
//!
//! An AOS archive is a fixed-layout container: a 273-byte header, a 40-byte-per-entry
//! index, and a concatenated data region. Entries are dispatched by file extension:
//! Huffman-compressed Shift-JIS scripts (`.scr`), run-length-encoded BMP-derived
//! images with an optional multi-frame animation variant (`.abm`), alpha masks
//! (`.msk`), and opaque data.
//!
//! The main entry points are [`archive::AosArchive`] for the container itself, and
//! the [`extract`] and [`repack`] modules which drive whole-archive conversion to
//! and from a directory of decoded assets.

pub mod archive;
pub mod bitstream;
pub mod extract;
pub mod formats;
pub mod io;
pub mod repack;
pub mod util;

use std::fmt;
use std::fmt::{Display, Formatter};

use bitflags::bitflags;
use thiserror::Error;

/// Size of the fixed AOS archive header, in bytes.
pub const AOS_HEADER_SIZE: usize = 273;
/// Size of one AOS index entry, in bytes.
pub const AOS_ENTRY_SIZE: usize = 40;
/// Size of the Shift-JIS archive name field in the header, in bytes.
pub const ARCHIVE_NAME_FIELD_SIZE: usize = 261;
/// Size of the Shift-JIS file name field in an index entry, in bytes.
pub const ENTRY_NAME_FIELD_SIZE: usize = 32;

#[derive(Debug, Error)]
pub enum AosError {
    #[error("An IO error occurred reading or writing the archive: {0}")]
    IoError(String),
    #[error("A filesystem error occurred or path not found")]
    FsError,
    #[error("Unknown or unsupported file format")]
    UnknownFormat,
    #[error("The format parser encountered an error")]
    FormatParseError,
    #[error("An invalid function parameter was supplied")]
    ParameterError,
    #[error("Entry name does not fit the 32-byte Shift-JIS name field: {0}")]
    NameTooLong(String),
    #[error("A name could not be encoded as Shift-JIS: {0}")]
    EncodingError(String),
}

// Manually implement `From<io::Error>` for `AosError`
impl From<std::io::Error> for AosError {
    fn from(err: std::io::Error) -> Self {
        AosError::IoError(err.to_string())
    }
}

// Manually implement `From<binrw::Error>` for `AosError`
impl From<binrw::Error> for AosError {
    fn from(err: binrw::Error) -> Self {
        AosError::IoError(err.to_string())
    }
}

bitflags! {
    /// Bit flags controlling inner codec processing during archive extraction and repacking.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[rustfmt::skip]
    pub struct ProcessOptions: u32 {
        const NO_DECODE = 0b0000_0001; // Write entries verbatim during extract
        const NO_ENCODE = 0b0000_0010; // Store files verbatim during repack
    }
}

/// The content kind of an archive entry, determined by its file extension.
/// Extension matching is ASCII case-insensitive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::EnumIter)]
pub enum ContentKind {
    #[doc = "A Huffman-compressed Shift-JIS script (`.scr`)."]
    Script,
    #[doc = "A BMP-derived, run-length-encoded image, possibly animated (`.abm`)."]
    AbmImage,
    #[doc = "An alpha mask stored as plain BMP data (`.msk`)."]
    Mask,
    #[doc = "Anything else; carried through without transformation."]
    Opaque,
}

impl ContentKind {
    /// The archive-internal extensions claimed by this content kind.
    pub fn extensions(&self) -> Vec<&'static str> {
        match self {
            ContentKind::Script => vec!["scr"],
            ContentKind::AbmImage => vec!["abm"],
            ContentKind::Mask => vec!["msk"],
            ContentKind::Opaque => Vec::new(),
        }
    }

    /// Classify an entry by the extension of its (decoded) file name.
    pub fn from_name(name: &str) -> ContentKind {
        use strum::IntoEnumIterator;

        let (_, ext) = util::split_extension(name);
        let ext = ext.to_ascii_lowercase();
        ContentKind::iter()
            .find(|kind| kind.extensions().contains(&ext.as_str()))
            .unwrap_or(ContentKind::Opaque)
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ContentKind::Script => write!(f, "script"),
            ContentKind::AbmImage => write!(f, "ABM image"),
            ContentKind::Mask => write!(f, "mask"),
            ContentKind::Opaque => write!(f, "opaque data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_kind_dispatch_is_case_insensitive() {
        assert_eq!(ContentKind::from_name("open.scr"), ContentKind::Script);
        assert_eq!(ContentKind::from_name("TITLE.ABM"), ContentKind::AbmImage);
        assert_eq!(ContentKind::from_name("shadow.Msk"), ContentKind::Mask);
        assert_eq!(ContentKind::from_name("readme"), ContentKind::Opaque);
        assert_eq!(ContentKind::from_name("data.bin"), ContentKind::Opaque);
    }
}
