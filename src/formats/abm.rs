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

    src/formats/abm.rs

    A parser for the ABM ("animated BMP") image format.

    An ABM file begins with standard 14-byte BMP file and 40-byte info
    headers, but the info header's bit_count field selects an engine-specific
    payload rather than a real bit depth: values 1-3 are multi-frame
    animations described by an animation header that follows the BMP headers,
    24 and 32 are single run-length-encoded bitmaps, and 8 is an alpha-mask
    scheme that has not been observed in the wild and is left undecoded.

    Decoded pixel buffers are BGR (24-bit) or BGRA (32-bit), stored
    top-row-first after the vertical flip from BMP row order.
*/

use binrw::{binrw, BinRead, BinReaderExt};
use serde::Serialize;

use crate::io::{ReadSeek, SeekFrom};
use crate::AosError;

pub const BMP_SIGNATURE: u16 = 0x4D42;
pub const BMP_INFO_HEADER_SIZE: u32 = 0x28;

#[derive(Debug)]
#[binrw]
#[brw(little)]
pub struct BmpFileHeader {
    pub file_type: u16,
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    pub pixel_offset: u32,
}

#[derive(Debug)]
#[binrw]
#[brw(little)]
pub struct BmpInfoHeader {
    pub info_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_ppm: i32,
    pub y_ppm: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

/// Animation header of a multi-frame ABM, read immediately after the BMP info
/// header. `frame_offsets` are absolute file offsets; `frame_sequence_size`
/// counts bytes, so the sequence holds half that many u16 entries.
#[derive(Debug, Serialize)]
#[binrw]
#[brw(little)]
pub struct AbmAnimationHeader {
    pub abm_type: u16,
    pub anim_mode: u16,
    pub frame_count: u32,
    pub frame_sequence_size: u32,
    #[br(count = frame_count)]
    pub frame_offsets: Vec<u32>,
    #[br(count = frame_sequence_size / 2)]
    pub frame_sequence: Vec<u16>,
}

/// A single decoded bitmap, top-row-first.
#[derive(Debug)]
pub struct AbmBitmap {
    pub width: u32,
    pub height: u32,
    pub bit_count: u16,
    pub data: Vec<u8>,
}

/// One frame of a decoded animation, named `"{stem}#{index:03}"`.
#[derive(Debug)]
pub struct AbmFrame {
    pub name: String,
    pub data: Vec<u8>,
}

/// The result of decoding an ABM entry.
#[derive(Debug)]
pub enum AbmContent {
    Single(AbmBitmap),
    MultiFrame {
        width: u32,
        height: u32,
        header: AbmAnimationHeader,
        frames: Vec<AbmFrame>,
    },
    #[doc = "Bit-count 8 (encoded alpha mask); recognized but not decoded."]
    NotImplemented,
    #[doc = "Unrecognized bit-count; left undecoded."]
    Unknown,
}

/// The three animated dispatch cases, by info-header bit_count.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum AnimVariant {
    // bit_count 1: frame 0 stored as raw BGR triplets, the rest RLE-32.
    FirstFrameOpaque,
    // bit_count 2: all frames RLE-32 with transparency.
    Transparent,
    // bit_count 3: all frames RLE-32, fully opaque after padding.
    Opaque,
}

pub struct AbmFormat;

impl AbmFormat {
    pub fn detect<RS: ReadSeek>(mut image: RS) -> bool {
        let mut detected = false;
        _ = image.seek(SeekFrom::Start(0));

        if let Ok(file_header) = BmpFileHeader::read(&mut image) {
            if file_header.file_type == BMP_SIGNATURE {
                if let Ok(info_header) = BmpInfoHeader::read(&mut image) {
                    detected = info_header.info_size == BMP_INFO_HEADER_SIZE;
                }
            }
        }

        detected
    }

    /// Decode an ABM image. `stem` is the entry's file stem, used to
    /// synthesize frame names for the multi-frame variant.
    pub fn decode<RS: ReadSeek>(mut image: RS, stem: &str) -> Result<AbmContent, AosError> {
        image.seek(SeekFrom::Start(0))?;

        let file_header = BmpFileHeader::read(&mut image)?;
        if file_header.file_type != BMP_SIGNATURE {
            log::error!("decode: Bad BMP signature: {:04X}", file_header.file_type);
            return Err(AosError::UnknownFormat);
        }

        let info_header = BmpInfoHeader::read(&mut image)?;
        if info_header.info_size != BMP_INFO_HEADER_SIZE {
            log::error!("decode: Bad BMP info header size: {:02X}", info_header.info_size);
            return Err(AosError::UnknownFormat);
        }

        log::trace!(
            "decode: {}x{} bit_count: {} pixel_offset: {:X}",
            info_header.width,
            info_header.height,
            info_header.bit_count,
            file_header.pixel_offset
        );

        let (width, height) = image_dimensions(&info_header)?;

        match info_header.bit_count {
            1 => Self::decode_animation(image, width, height, AnimVariant::FirstFrameOpaque, stem),
            2 => Self::decode_animation(image, width, height, AnimVariant::Transparent, stem),
            3 => Self::decode_animation(image, width, height, AnimVariant::Opaque, stem),
            8 => {
                log::warn!("decode: Encoded alpha mask (bit_count 8) is not implemented");
                Ok(AbmContent::NotImplemented)
            }
            24 => {
                image.seek(SeekFrom::Start(file_header.pixel_offset as u64))?;
                let unpacked = expand_rle24(&mut image, width as usize * height as usize * 3)?;
                Ok(AbmContent::Single(AbmBitmap {
                    width,
                    height,
                    bit_count: 24,
                    data: flip_vertical(&unpacked, width as usize, height as usize, 3),
                }))
            }
            32 => {
                image.seek(SeekFrom::Start(file_header.pixel_offset as u64))?;
                let unpacked = expand_rle32(&mut image, width as usize * height as usize * 4)?;
                Ok(AbmContent::Single(AbmBitmap {
                    width,
                    height,
                    bit_count: 32,
                    data: flip_vertical(&unpacked, width as usize, height as usize, 4),
                }))
            }
            other => {
                log::warn!("decode: Unknown ABM bit_count: {}", other);
                Ok(AbmContent::Unknown)
            }
        }
    }

    /// Decode the multi-frame variants. The animation header sits at the
    /// current position (immediately after the BMP headers); every frame
    /// normalizes to 32-bit BGRA for downstream consumers.
    fn decode_animation<RS: ReadSeek>(
        mut image: RS,
        width: u32,
        height: u32,
        variant: AnimVariant,
        stem: &str,
    ) -> Result<AbmContent, AosError> {
        let anim_header = AbmAnimationHeader::read(&mut image)?;
        if anim_header.frame_count == 0 {
            log::error!("decode_animation: Animation header with zero frames");
            return Err(AosError::FormatParseError);
        }

        log::trace!(
            "decode_animation: type: {} mode: {} frames: {} sequence entries: {}",
            anim_header.abm_type,
            anim_header.anim_mode,
            anim_header.frame_count,
            anim_header.frame_sequence.len()
        );

        let frame_size = width as usize * height as usize * 4;
        let mut frames = Vec::with_capacity(anim_header.frame_count as usize);

        for (index, &offset) in anim_header.frame_offsets.iter().enumerate() {
            image.seek(SeekFrom::Start(offset as u64))?;

            let unpacked = if index == 0 && variant == AnimVariant::FirstFrameOpaque {
                read_raw_bgr_frame(&mut image, width, height)?
            }
            else {
                expand_rle32(&mut image, frame_size)?
            };

            frames.push(AbmFrame {
                name: frame_name(stem, index),
                data: flip_vertical(&unpacked, width as usize, height as usize, 4),
            });
        }

        Ok(AbmContent::MultiFrame {
            width,
            height,
            header: anim_header,
            frames,
        })
    }
}

fn image_dimensions(info_header: &BmpInfoHeader) -> Result<(u32, u32), AosError> {
    if info_header.width <= 0 || info_header.height <= 0 {
        log::error!(
            "image_dimensions: Non-positive dimensions: {}x{}",
            info_header.width,
            info_header.height
        );
        return Err(AosError::FormatParseError);
    }
    Ok((info_header.width as u32, info_header.height as u32))
}

/// Synthesize the canonical frame name: stem, '#', three-digit ordinal.
pub fn frame_name(stem: &str, index: usize) -> String {
    format!("{}#{:03}", stem, index)
}

/// The first frame of a bit_count-1 animation is stored as raw 3-byte BGR
/// pixels; widen to BGRA with full alpha.
fn read_raw_bgr_frame<RS: ReadSeek>(reader: &mut RS, width: u32, height: u32) -> Result<Vec<u8>, AosError> {
    let mut raw = vec![0u8; width as usize * height as usize * 3];
    reader.read_exact(&mut raw)?;

    let mut dest = vec![0u8; width as usize * height as usize * 4];
    for (pixel, bgr) in raw.chunks_exact(3).enumerate() {
        let o = pixel * 4;
        dest[o] = bgr[0];
        dest[o + 1] = bgr[1];
        dest[o + 2] = bgr[2];
        dest[o + 3] = 0xFF;
    }
    Ok(dest)
}

/// RLE decoder for 24-bit (3 bytes per pixel) bitmaps.
///
/// Opcode 0x00: skip run (destination stays zero). Opcode 0xFF: verbatim run.
/// Any other byte is a literal pair: the opcode byte and the byte after it
/// are both written, but the destination index advances by only one, so the
/// second byte is provisional and the next step may overwrite it.
pub(crate) fn expand_rle24<RS: ReadSeek>(reader: &mut RS, unpacked_size: usize) -> Result<Vec<u8>, AosError> {
    let mut dest = vec![0u8; unpacked_size];
    let mut i = 0usize;

    while i < unpacked_size {
        let opcode: u8 = reader.read_le()?;
        match opcode {
            0x00 => {
                let n: u8 = reader.read_le()?;
                if n == 0 {
                    continue;
                }
                i += n as usize;
            }
            0xFF => {
                let n: u8 = reader.read_le()?;
                if n == 0 {
                    continue;
                }
                let end = i + n as usize;
                if end > unpacked_size {
                    log::error!("expand_rle24: Literal run of {} overruns buffer at {}", n, i);
                    return Err(AosError::FormatParseError);
                }
                reader.read_exact(&mut dest[i..end])?;
                i = end;
            }
            literal => {
                dest[i] = literal;
                let next: u8 = reader.read_le()?;
                if i + 1 < unpacked_size {
                    dest[i + 1] = next;
                }
                i += 1;
            }
        }
    }

    Ok(dest)
}

/// RLE decoder for 32-bit (4 bytes per pixel, BGRA) bitmaps.
///
/// Same opcode structure as RLE-24, but the input carries only the three
/// color components of each pixel; the decoder synthesizes the alpha byte
/// whenever the third component completes: zero for skip runs, 0xFF for
/// verbatim runs, and a copy of the source byte for single literals.
pub(crate) fn expand_rle32<RS: ReadSeek>(reader: &mut RS, unpacked_size: usize) -> Result<Vec<u8>, AosError> {
    let mut dest = vec![0u8; unpacked_size];
    let mut i = 0usize;
    // Cycles 0..2 over the B, G, R components of the pixel in progress.
    let mut color_component = 0u32;

    while i < unpacked_size {
        let opcode: u8 = reader.read_le()?;
        match opcode {
            0x00 => {
                let n: u8 = reader.read_le()?;
                if n == 0 {
                    continue;
                }
                for _ in 0..n {
                    i += 1;
                    color_component += 1;
                    if color_component == 3 {
                        // Alpha slot of a fully transparent pixel; left zero.
                        i += 1;
                        color_component = 0;
                    }
                }
            }
            0xFF => {
                let n: u8 = reader.read_le()?;
                if n == 0 {
                    continue;
                }
                for _ in 0..n {
                    if i >= unpacked_size {
                        log::error!("expand_rle32: Literal run overruns buffer at {}", i);
                        return Err(AosError::FormatParseError);
                    }
                    dest[i] = reader.read_le()?;
                    i += 1;
                    color_component += 1;
                    if color_component == 3 {
                        if i < unpacked_size {
                            dest[i] = 0xFF;
                        }
                        i += 1;
                        color_component = 0;
                    }
                }
            }
            literal => {
                dest[i] = literal;
                i += 1;
                color_component += 1;
                if color_component == 3 {
                    if i < unpacked_size {
                        dest[i] = literal;
                    }
                    i += 1;
                    color_component = 0;
                }
            }
        }
    }

    Ok(dest)
}

/// Reverse row order. BMP pixel data is bottom-row-first; decoded buffers are
/// top-row-first for downstream consumers.
pub(crate) fn flip_vertical(buffer: &[u8], width: usize, height: usize, bytes_per_pixel: usize) -> Vec<u8> {
    let stride = width * bytes_per_pixel;
    let mut flipped = vec![0u8; buffer.len()];

    for row in 0..height {
        let src = row * stride;
        let dst = (height - 1 - row) * stride;
        flipped[dst..dst + stride].copy_from_slice(&buffer[src..src + stride]);
    }
    flipped
}
