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

use common::{bmp_headers, init, multi_frame_abm};

use aoskit::archive::{AosArchive, AosEntry};
use aoskit::extract::extract_archive;
use aoskit::formats::abm::{AbmContent, AbmFormat};
use aoskit::ProcessOptions;

#[test]
fn multi_frame_names_are_synthesized_from_the_stem() {
    init();
    // Three 2x1 frames of all-transparent RLE-32 data.
    let frames = vec![vec![0x01; 6], vec![0x02; 6], vec![0x03; 6]];
    let bytes = multi_frame_abm(2, 1, 2, &frames);

    let content = AbmFormat::decode(Cursor::new(&bytes), "abc").unwrap();
    let AbmContent::MultiFrame { width, height, header, frames } = content else {
        panic!("expected a multi-frame decode");
    };

    assert_eq!((width, height), (2, 1));
    assert_eq!(header.frame_count, 3);
    assert_eq!(header.frame_offsets.len(), 3);
    assert_eq!(header.frame_sequence, vec![0]);

    let names: Vec<&str> = frames.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["abc#000", "abc#001", "abc#002"]);
}

#[test]
fn multi_frame_pixels_gain_synthesized_alpha() {
    init();
    let frames = vec![vec![0x10, 0x20, 0x30, 0x40, 0x50, 0x60]];
    let bytes = multi_frame_abm(2, 1, 2, &frames);

    let content = AbmFormat::decode(Cursor::new(&bytes), "px").unwrap();
    let AbmContent::MultiFrame { frames, .. } = content else {
        panic!("expected a multi-frame decode");
    };

    // Verbatim runs synthesize 0xFF alpha after every third component; a
    // single-row image is its own vertical flip.
    assert_eq!(frames[0].data, hex::decode("102030ff405060ff").unwrap());
}

#[test]
fn single_24_bit_bitmap_decodes_and_flips() {
    init();
    // 1x2 image: two BGR pixels stored bottom-row-first in the file.
    let mut bytes = bmp_headers(1, 2, 24, 54);
    bytes.push(0xFF);
    bytes.push(0x06);
    bytes.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);

    let content = AbmFormat::decode(Cursor::new(&bytes), "bg").unwrap();
    let AbmContent::Single(bitmap) = content else {
        panic!("expected a single-bitmap decode");
    };

    assert_eq!(bitmap.bit_count, 24);
    assert_eq!((bitmap.width, bitmap.height), (1, 2));
    // Bottom row first in the file; top-row-first after the flip.
    assert_eq!(bitmap.data, vec![0x04, 0x05, 0x06, 0x01, 0x02, 0x03]);
}

#[test]
fn bad_signature_is_fatal() {
    init();
    let mut bytes = bmp_headers(1, 1, 24, 54);
    bytes[0] = b'X';
    assert!(AbmFormat::decode(Cursor::new(&bytes), "x").is_err());
}

#[test]
fn zero_frame_count_is_fatal() {
    init();
    let bytes = multi_frame_abm(2, 1, 2, &[]);
    assert!(AbmFormat::decode(Cursor::new(&bytes), "x").is_err());
}

#[test]
fn unknown_and_unimplemented_bit_counts_pass_through() {
    init();
    let bytes = bmp_headers(4, 4, 8, 54);
    assert!(matches!(
        AbmFormat::decode(Cursor::new(&bytes), "m").unwrap(),
        AbmContent::NotImplemented
    ));

    let bytes = bmp_headers(4, 4, 16, 54);
    assert!(matches!(
        AbmFormat::decode(Cursor::new(&bytes), "m").unwrap(),
        AbmContent::Unknown
    ));
}

#[test]
fn extraction_writes_frames_and_sidecar() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("anim.aos");

    let frames = vec![vec![0x01; 6], vec![0x02; 6]];
    let abm_bytes = multi_frame_abm(2, 1, 2, &frames);

    let archive = AosArchive {
        name: "anim.aos".to_string(),
        entries: vec![AosEntry {
            name: "spin.abm".to_string(),
            data: abm_bytes,
        }],
    };
    let mut staged = Cursor::new(Vec::new());
    archive.write(&mut staged).unwrap();
    fs::write(&archive_path, staged.into_inner()).unwrap();

    let out_dir = extract_archive(&archive_path, dir.path(), ProcessOptions::empty()).unwrap();

    assert!(out_dir.join("spin#000.bmp").exists());
    assert!(out_dir.join("spin#001.bmp").exists());

    let sidecar = fs::read_to_string(out_dir.join("spin.json")).unwrap();
    assert!(sidecar.contains("\"spin#000\""));
    assert!(sidecar.contains("\"spin#001\""));
    assert!(sidecar.contains("\"frame_count\": 2"));
    assert!(sidecar.contains("\"abm_type\": 1"));
}

#[test]
fn undecodable_abm_entries_are_written_through() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("broken.aos");

    // Not a BMP at all; the extract path must fall back to the raw entry.
    let garbage = vec![0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01, 0x02, 0x03];
    let archive = AosArchive {
        name: "broken.aos".to_string(),
        entries: vec![AosEntry {
            name: "bad.abm".to_string(),
            data: garbage.clone(),
        }],
    };
    let mut staged = Cursor::new(Vec::new());
    archive.write(&mut staged).unwrap();
    fs::write(&archive_path, staged.into_inner()).unwrap();

    let out_dir = extract_archive(&archive_path, dir.path(), ProcessOptions::empty()).unwrap();
    assert_eq!(fs::read(out_dir.join("bad.abm")).unwrap(), garbage);
}
