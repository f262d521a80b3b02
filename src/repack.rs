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

    src/repack.rs

    Implements the archive pack driver: enumerates a directory of assets in
    filesystem order, re-encodes scripts, and writes an AOS archive whose
    name is the directory name with an `.aos` extension.

    All entry names are validated (as encoded Shift-JIS bytes) before any
    output is produced; a single overlong name fails the whole operation.
*/

use std::fs;
use std::path::Path;

use crate::archive::{AosArchive, AosEntry};
use crate::formats::scr::ScrFormat;
use crate::io::Cursor;
use crate::util::{encode_name_field, split_extension};
use crate::{AosError, ProcessOptions, ENTRY_NAME_FIELD_SIZE};

/// Pack the files of `input_dir` into an AOS archive at `output_path`.
/// `.txt` files are script-encoded and stored as `.scr` unless
/// `ProcessOptions::NO_ENCODE` is set; everything else is stored verbatim.
pub fn repack_directory(input_dir: &Path, output_path: &Path, options: ProcessOptions) -> Result<(), AosError> {
    let dir_name = input_dir
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or(AosError::FsError)?;

    let mut entries = Vec::new();

    // Enumeration order is the canonical entry order; no sort is applied.
    for dir_entry in fs::read_dir(input_dir)? {
        let dir_entry = dir_entry?;
        let path = dir_entry.path();
        if path.is_dir() {
            log::warn!("repack_directory: Skipping subdirectory {:?}", path);
            continue;
        }

        let file_name = dir_entry.file_name();
        let file_name = file_name.to_str().ok_or(AosError::FsError)?;
        let data = fs::read(&path)?;

        let (name, data) = encode_entry(file_name, data, options)?;

        // Validate before anything is written; AosArchive::write re-checks.
        encode_name_field(&name, ENTRY_NAME_FIELD_SIZE)?;
        log::trace!("repack_directory: Adding {:?} ({} bytes)", name, data.len());
        entries.push(AosEntry { name, data });
    }

    let archive = AosArchive {
        name: format!("{}.aos", dir_name),
        entries,
    };

    // Stage the whole archive in memory so a failure leaves no partial file.
    let mut staged = Cursor::new(Vec::new());
    archive.write(&mut staged)?;
    fs::write(output_path, staged.into_inner())?;

    log::info!(
        "repack_directory: {:?} -> {:?} ({} entries)",
        input_dir,
        output_path,
        archive.entries.len()
    );
    Ok(())
}

fn encode_entry(file_name: &str, data: Vec<u8>, options: ProcessOptions) -> Result<(String, Vec<u8>), AosError> {
    if options.contains(ProcessOptions::NO_ENCODE) {
        return Ok((file_name.to_string(), data));
    }

    let (stem, ext) = split_extension(file_name);
    if ext.eq_ignore_ascii_case("txt") {
        let encoded = ScrFormat::encode(&data)?;
        return Ok((format!("{}.scr", stem), encoded));
    }

    // `.abm` images and everything else pass through unchanged.
    Ok((file_name.to_string(), data))
}
