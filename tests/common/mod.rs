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

    tests/common/mod.rs

    Common support routines for tests.
*/

#![allow(dead_code)]

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Build the 14-byte BMP file header and 40-byte info header that prefix
/// every ABM fixture.
pub fn bmp_headers(width: i32, height: i32, bit_count: u16, pixel_offset: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(54);
    buf.extend_from_slice(b"BM");
    push_u32(&mut buf, 0); // file_size; the parser does not consult it
    push_u16(&mut buf, 0);
    push_u16(&mut buf, 0);
    push_u32(&mut buf, pixel_offset);

    push_u32(&mut buf, 0x28);
    push_u32(&mut buf, width as u32);
    push_u32(&mut buf, height as u32);
    push_u16(&mut buf, 1); // planes
    push_u16(&mut buf, bit_count);
    push_u32(&mut buf, 0); // compression
    push_u32(&mut buf, 0); // image_size
    push_u32(&mut buf, 0); // x_ppm
    push_u32(&mut buf, 0); // y_ppm
    push_u32(&mut buf, 0); // colors_used
    push_u32(&mut buf, 0); // colors_important
    buf
}

/// Build a multi-frame ABM fixture: headers, animation header, then one
/// RLE-32 verbatim-run frame per entry of `frames`, each holding the three
/// color components of every pixel (alpha is synthesized by the decoder).
pub fn multi_frame_abm(width: i32, height: i32, bit_count: u16, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = bmp_headers(width, height, bit_count, 0);

    let anim_start = buf.len();
    let frame_count = frames.len() as u32;
    // abm_type, anim_mode, frame_count, frame_sequence_size, offsets, sequence
    let anim_size = 2 + 2 + 4 + 4 + frame_count as usize * 4 + 2;

    push_u16(&mut buf, 1); // abm_type
    push_u16(&mut buf, 0); // anim_mode
    push_u32(&mut buf, frame_count);
    push_u32(&mut buf, 2); // frame_sequence_size in bytes -> one u16 entry

    let mut offset = (anim_start + anim_size) as u32;
    for frame in frames {
        push_u32(&mut buf, offset);
        offset += 2 + frame.len() as u32; // opcode + count + payload
    }
    push_u16(&mut buf, 0); // frame_sequence[0]

    for frame in frames {
        buf.push(0xFF);
        buf.push(frame.len() as u8);
        buf.extend_from_slice(frame);
    }
    buf
}
