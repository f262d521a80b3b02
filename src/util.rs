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

//! The `util` module provides Shift-JIS name field handling and small stream
//! helpers shared by the archive and format parsers.

use encoding_rs::SHIFT_JIS;

use crate::AosError;

/// Encode `name` as Shift-JIS. Returns an error if any character has no
/// Shift-JIS representation.
pub fn encode_sjis(name: &str) -> Result<Vec<u8>, AosError> {
    let (bytes, _, had_errors) = SHIFT_JIS.encode(name);
    if had_errors {
        return Err(AosError::EncodingError(name.to_string()));
    }
    Ok(bytes.into_owned())
}

/// Encode `name` into a fixed-size, null-padded Shift-JIS field.
///
/// Validation is against the *encoded byte length*, not the character count;
/// multi-byte names can otherwise overflow the field undetected. A name that
/// exactly fills the field is stored with no terminator.
pub fn encode_name_field(name: &str, field_size: usize) -> Result<Vec<u8>, AosError> {
    let encoded = encode_sjis(name)?;
    if encoded.len() > field_size {
        return Err(AosError::NameTooLong(name.to_string()));
    }

    let mut field = vec![0u8; field_size];
    field[..encoded.len()].copy_from_slice(&encoded);
    Ok(field)
}

/// Decode a null-padded Shift-JIS name field, trimming trailing NULs.
pub fn decode_name_field(field: &[u8]) -> String {
    let end = field.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
    let (name, _, had_errors) = SHIFT_JIS.decode(&field[..end]);
    if had_errors {
        log::warn!("Name field contained invalid Shift-JIS sequences: {:02X?}", &field[..end]);
    }
    name.into_owned()
}

/// Split a file name into (stem, extension), where the extension excludes the dot.
/// Returns the whole name and an empty extension if there is no dot.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext),
        _ => (name, ""),
    }
}
