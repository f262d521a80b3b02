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

    src/extract.rs

    Implements the archive unpack driver: reads an AOS archive, dispatches
    each entry to the script or ABM codec by extension, and writes the
    decoded assets into an output directory named after the archive.

    ABM decode failures are deliberately non-fatal: the entry is written
    through unchanged so a partially damaged archive still extracts.
*/

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::archive::{AosArchive, AosEntry};
use crate::formats::abm::{AbmAnimationHeader, AbmContent, AbmFormat};
use crate::formats::bmp;
use crate::formats::scr::ScrFormat;
use crate::io::Cursor;
use crate::util::split_extension;
use crate::{AosError, ContentKind, ProcessOptions};

/// Sidecar document written next to the frames of a multi-frame animation.
#[derive(Serialize)]
struct AnimationSidecar<'a> {
    version: &'static str,
    frames: Vec<&'a str>,
    #[serde(flatten)]
    animation: &'a AbmAnimationHeader,
}

/// Extract `archive_path` into `<output_root>/<archive_stem>/`, decoding
/// scripts and images unless `ProcessOptions::NO_DECODE` is set. Returns the
/// output directory.
pub fn extract_archive(archive_path: &Path, output_root: &Path, options: ProcessOptions) -> Result<PathBuf, AosError> {
    let file = fs::File::open(archive_path)?;
    let archive = AosArchive::read(BufReader::new(file))?;

    let stem = archive_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or(AosError::FsError)?;
    let output_dir = output_root.join(stem);
    fs::create_dir_all(&output_dir)?;

    log::info!(
        "extract_archive: {:?} -> {:?} ({} entries)",
        archive_path,
        output_dir,
        archive.entries.len()
    );

    for entry in &archive.entries {
        extract_entry(entry, &output_dir, options)?;
    }

    Ok(output_dir)
}

fn extract_entry(entry: &AosEntry, output_dir: &Path, options: ProcessOptions) -> Result<(), AosError> {
    validate_entry_name(&entry.name)?;

    if options.contains(ProcessOptions::NO_DECODE) {
        fs::write(output_dir.join(&entry.name), &entry.data)?;
        return Ok(());
    }

    let (stem, _) = split_extension(&entry.name);
    let kind = ContentKind::from_name(&entry.name);
    log::debug!("extract_entry: {:?} dispatched as {}", entry.name, kind);

    match kind {
        ContentKind::Script => {
            let decoded = ScrFormat::decode(&entry.data)?;
            fs::write(output_dir.join(format!("{}.txt", stem)), decoded)?;
        }
        ContentKind::AbmImage => {
            match AbmFormat::decode(Cursor::new(&entry.data), stem) {
                Ok(content) => {
                    if !write_decoded_abm(&content, output_dir, stem)? {
                        // Recognized but undecodable variants pass through.
                        fs::write(output_dir.join(&entry.name), &entry.data)?;
                    }
                }
                Err(e) => {
                    log::warn!("extract_entry: ABM decode of {:?} failed ({}); writing raw", entry.name, e);
                    fs::write(output_dir.join(&entry.name), &entry.data)?;
                }
            }
        }
        ContentKind::Mask => {
            fs::write(output_dir.join(format!("{}.bmp", stem)), &entry.data)?;
        }
        ContentKind::Opaque => {
            fs::write(output_dir.join(&entry.name), &entry.data)?;
        }
    }

    Ok(())
}

/// Write a decoded ABM to disk: one `.bmp` for a single bitmap, one `.bmp`
/// per frame plus a `.json` sidecar for an animation. Returns false if the
/// content was not decodable (`NotImplemented`/`Unknown`).
pub fn write_decoded_abm(content: &AbmContent, output_dir: &Path, stem: &str) -> Result<bool, AosError> {
    match content {
        AbmContent::Single(bitmap) => {
            fs::write(output_dir.join(format!("{}.bmp", stem)), bmp::encode(bitmap)?)?;
            Ok(true)
        }
        AbmContent::MultiFrame {
            width,
            height,
            header,
            frames,
        } => {
            for frame in frames {
                fs::write(
                    output_dir.join(format!("{}.bmp", frame.name)),
                    bmp::encode_pixels(*width, *height, 32, &frame.data)?,
                )?;
            }

            let sidecar = AnimationSidecar {
                version: env!("CARGO_PKG_VERSION"),
                frames: frames.iter().map(|f| f.name.as_str()).collect(),
                animation: header,
            };
            let json = serde_json::to_string_pretty(&sidecar).map_err(|e| AosError::IoError(e.to_string()))?;
            fs::write(output_dir.join(format!("{}.json", stem)), json)?;
            Ok(true)
        }
        AbmContent::NotImplemented | AbmContent::Unknown => Ok(false),
    }
}

// Entry names come from the archive and are used to build output paths;
// reject anything that could escape the output directory.
fn validate_entry_name(name: &str) -> Result<(), AosError> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with("..") {
        log::error!("validate_entry_name: Refusing suspicious entry name {:?}", name);
        return Err(AosError::FsError);
    }
    Ok(())
}
