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

    src/formats/bmp.rs

    A plain BMP emitter for decoded ABM bitmaps: the standard 14+40-byte
    header pair followed by unpadded pixel rows. Decoded buffers are
    top-row-first; BMP stores bottom-row-first, so rows are written in
    reverse and the files render upright in any viewer.
*/

use binrw::BinWrite;

use crate::formats::abm::{AbmBitmap, BmpFileHeader, BmpInfoHeader, BMP_INFO_HEADER_SIZE, BMP_SIGNATURE};
use crate::io::Cursor;
use crate::AosError;

const PIXEL_DATA_OFFSET: u32 = 54;

/// Serialize a top-row-first pixel buffer as a standard BMP file.
pub fn encode_pixels(width: u32, height: u32, bit_count: u16, data: &[u8]) -> Result<Vec<u8>, AosError> {
    let bytes_per_pixel = match bit_count {
        24 => 3usize,
        32 => 4usize,
        _ => {
            log::error!("encode_pixels: Unsupported BMP bit_count: {}", bit_count);
            return Err(AosError::ParameterError);
        }
    };

    let stride = width as usize * bytes_per_pixel;
    let rows = height as usize;
    if data.len() != stride * rows {
        log::error!("encode_pixels: Pixel buffer is {} bytes; expected {}", data.len(), stride * rows);
        return Err(AosError::ParameterError);
    }

    let image_size = (stride * rows) as u32;
    let file_header = BmpFileHeader {
        file_type: BMP_SIGNATURE,
        file_size: PIXEL_DATA_OFFSET + image_size,
        reserved1: 0,
        reserved2: 0,
        pixel_offset: PIXEL_DATA_OFFSET,
    };
    let info_header = BmpInfoHeader {
        info_size: BMP_INFO_HEADER_SIZE,
        width: width as i32,
        height: height as i32,
        planes: 1,
        bit_count,
        compression: 0,
        image_size,
        x_ppm: 0,
        y_ppm: 0,
        colors_used: 0,
        colors_important: 0,
    };

    let mut out = Cursor::new(Vec::with_capacity(PIXEL_DATA_OFFSET as usize + data.len()));
    file_header.write(&mut out)?;
    info_header.write(&mut out)?;

    let mut buf = out.into_inner();
    for row in (0..rows).rev() {
        buf.extend_from_slice(&data[row * stride..(row + 1) * stride]);
    }

    Ok(buf)
}

/// Serialize a decoded bitmap as a standard BMP file.
pub fn encode(bitmap: &AbmBitmap) -> Result<Vec<u8>, AosError> {
    encode_pixels(bitmap.width, bitmap.height, bitmap.bit_count, &bitmap.data)
}
