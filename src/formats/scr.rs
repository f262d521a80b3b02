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

    src/formats/scr.rs

    The AOS script codec.

    A `.scr` entry is exactly a Huffman-compressed byte stream: the
    uncompressed length as a little-endian u32, the bit-serialized coding
    tree, the encoded body, and trailing pad bits to the next byte boundary.
    Scripts are opaque Shift-JIS text as far as this tool is concerned;
    decoding reproduces the original bytes exactly.
*/

use crate::formats::compression::huffman;
use crate::AosError;

pub struct ScrFormat;

impl ScrFormat {
    /// Decode a compressed script entry to its original bytes.
    pub fn decode(data: &[u8]) -> Result<Vec<u8>, AosError> {
        let expanded = huffman::expand_slice(data)?;
        log::debug!("ScrFormat: expanded {} -> {} bytes", data.len(), expanded.len());
        Ok(expanded)
    }

    /// Encode plain script bytes into a compressed entry.
    pub fn encode(data: &[u8]) -> Result<Vec<u8>, AosError> {
        let compressed = huffman::compress_slice(data)?;
        log::debug!("ScrFormat: compressed {} -> {} bytes", data.len(), compressed.len());
        Ok(compressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_round_trip_is_byte_exact() {
        // Shift-JIS encoded dialogue line; the codec must treat it as opaque bytes.
        let script: &[u8] = &[
            0x82, 0xB1, 0x82, 0xF1, 0x82, 0xC9, 0x82, 0xBF, 0x82, 0xCD, 0x0D, 0x0A, 0x82, 0xA0, 0x82, 0xA2,
        ];
        let encoded = ScrFormat::encode(script).unwrap();
        let decoded = ScrFormat::decode(&encoded).unwrap();
        assert_eq!(decoded, script);
    }

    #[test]
    fn declared_length_governs_decode() {
        let encoded = ScrFormat::encode(b"ABAB").unwrap();
        // Extra trailing garbage after the pad bits must not change the output.
        let mut padded = encoded.clone();
        padded.extend_from_slice(&[0xFF, 0xFF]);
        assert_eq!(ScrFormat::decode(&padded).unwrap(), b"ABAB");
    }
}
