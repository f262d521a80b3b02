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

mod common;

use std::fs;
use std::io::Cursor;

use common::init;

use aoskit::archive::{AosArchive, AosEntry};
use aoskit::extract::extract_archive;
use aoskit::formats::scr::ScrFormat;
use aoskit::repack::repack_directory;
use aoskit::ProcessOptions;

#[test]
fn empty_directory_repacks_to_a_bare_header() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sample");
    fs::create_dir(&input).unwrap();
    let archive_path = dir.path().join("sample.aos");

    repack_directory(&input, &archive_path, ProcessOptions::empty()).unwrap();

    let bytes = fs::read(&archive_path).unwrap();
    assert_eq!(bytes.len(), 273);
    // signature 0, data_offset 273, index_size 0
    assert_eq!(&bytes[0..12], &hex::decode("000000001101000000000000").unwrap()[..]);

    let archive = AosArchive::read(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.name, "sample.aos");
    assert!(archive.entries.is_empty());
}

#[test]
fn empty_archive_extracts_to_an_empty_directory() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("empty.aos");

    let archive = AosArchive {
        name: "empty.aos".to_string(),
        entries: Vec::new(),
    };
    let mut staged = Cursor::new(Vec::new());
    archive.write(&mut staged).unwrap();
    fs::write(&archive_path, staged.into_inner()).unwrap();

    let out_dir = extract_archive(&archive_path, dir.path(), ProcessOptions::empty()).unwrap();
    assert_eq!(out_dir, dir.path().join("empty"));
    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
}

#[test]
fn extract_then_repack_is_byte_identical_with_passthrough_flags() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("game.aos");

    // Entry data is arbitrary; with --nodecode/--noencode nothing interprets it.
    let archive = AosArchive {
        name: "game.aos".to_string(),
        entries: vec![
            AosEntry {
                name: "open.scr".to_string(),
                data: vec![0xAA; 100],
            },
            AosEntry {
                name: "title.abm".to_string(),
                data: vec![0xBB; 200],
            },
            AosEntry {
                name: "mask.msk".to_string(),
                data: vec![0xCC; 50],
            },
        ],
    };
    let mut staged = Cursor::new(Vec::new());
    archive.write(&mut staged).unwrap();
    let original = staged.into_inner();
    fs::write(&archive_path, &original).unwrap();

    let out_dir = extract_archive(&archive_path, dir.path(), ProcessOptions::NO_DECODE).unwrap();

    // Filesystem enumeration order is the canonical entry order for repack,
    // and offsets follow from it. Header, names, sizes, and data bytes must
    // survive regardless.
    let repacked_path = dir.path().join("game2.aos");
    repack_directory(&out_dir, &repacked_path, ProcessOptions::NO_ENCODE).unwrap();

    let repacked = AosArchive::read(Cursor::new(fs::read(&repacked_path).unwrap())).unwrap();
    assert_eq!(repacked.entries.len(), 3);
    let mut entries = repacked.entries.clone();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(entries[0].name, "mask.msk");
    assert_eq!(entries[0].data, vec![0xCC; 50]);
    assert_eq!(entries[1].name, "open.scr");
    assert_eq!(entries[1].data, vec![0xAA; 100]);
    assert_eq!(entries[2].name, "title.abm");
    assert_eq!(entries[2].data, vec![0xBB; 200]);

    // The repacked archive's name field comes from the directory name.
    assert_eq!(repacked.name, "game.aos");
}

#[test]
fn scripts_decode_on_extract_and_reencode_on_repack() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("story.aos");

    let script_text = b"Once upon a time, in a visual novel far away...".to_vec();
    let archive = AosArchive {
        name: "story.aos".to_string(),
        entries: vec![AosEntry {
            name: "intro.scr".to_string(),
            data: ScrFormat::encode(&script_text).unwrap(),
        }],
    };
    let mut staged = Cursor::new(Vec::new());
    archive.write(&mut staged).unwrap();
    fs::write(&archive_path, staged.into_inner()).unwrap();

    let out_dir = extract_archive(&archive_path, dir.path(), ProcessOptions::empty()).unwrap();
    let decoded = fs::read(out_dir.join("intro.txt")).unwrap();
    assert_eq!(decoded, script_text);

    // Repacking re-encodes the .txt back to a .scr entry that decodes to the
    // same text (the bit stream need not be identical, the content must be).
    let repacked_path = dir.path().join("story2.aos");
    repack_directory(&out_dir, &repacked_path, ProcessOptions::empty()).unwrap();

    let repacked = AosArchive::read(Cursor::new(fs::read(&repacked_path).unwrap())).unwrap();
    assert_eq!(repacked.entries.len(), 1);
    assert_eq!(repacked.entries[0].name, "intro.scr");
    assert_eq!(ScrFormat::decode(&repacked.entries[0].data).unwrap(), script_text);
}

#[test]
fn mask_entries_change_extension_only() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("masks.aos");

    let mask_bytes = vec![0x42u8; 64];
    let archive = AosArchive {
        name: "masks.aos".to_string(),
        entries: vec![AosEntry {
            name: "shadow.msk".to_string(),
            data: mask_bytes.clone(),
        }],
    };
    let mut staged = Cursor::new(Vec::new());
    archive.write(&mut staged).unwrap();
    fs::write(&archive_path, staged.into_inner()).unwrap();

    let out_dir = extract_archive(&archive_path, dir.path(), ProcessOptions::empty()).unwrap();
    assert_eq!(fs::read(out_dir.join("shadow.bmp")).unwrap(), mask_bytes);
}

#[test]
fn overlong_sjis_name_fails_repack_before_writing() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad");
    fs::create_dir(&input).unwrap();

    // 17 katakana characters encode to 34 Shift-JIS bytes.
    let long_name = format!("{}.dat", "ア".repeat(17));
    fs::write(input.join(long_name), b"x").unwrap();

    let archive_path = dir.path().join("bad.aos");
    assert!(repack_directory(&input, &archive_path, ProcessOptions::empty()).is_err());
    assert!(!archive_path.exists());
}
