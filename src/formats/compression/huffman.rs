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

    src/formats/compression/huffman.rs

    The canonical-free Huffman coder used for AOS script entries.

    A compressed stream is the uncompressed length as a little-endian u32,
    followed by the coding tree serialized as a bit prefix (pre-order: bit 1
    introduces an internal node and its two subtrees, bit 0 introduces a leaf
    followed by the symbol as 8 bits MSB-first), followed by the code bits for
    each input byte. There is no EOF sentinel; the declared length governs
    decode termination.

    Encoding builds a linked tree with parent back-links so each leaf's code
    can be collected by walking upward. Decoding rebuilds the tree into two
    flat arrays indexed by internal-node id; values below 256 are leaf symbols
    and values of 256 and up name internal nodes. The two representations are
    deliberately separate.
*/

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::bitstream::{BitReader, BitWriter};
use crate::io::{Cursor, Read, Seek, Write};
use crate::AosError;

/// Node ids below this value are leaf symbols; the rest are internal nodes.
const LEAF_LIMIT: u16 = 256;
/// Id of the root of any multi-leaf tree.
const ROOT_ID: u16 = 256;
/// Capacity of the flat decode tables. A well-formed stream has at most 256
/// leaves and therefore at most 255 internal nodes (ids 256..=510).
const NODE_TABLE_SIZE: usize = 511;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Arena node for the encoding tree. Leaves carry their symbol; internal
/// nodes carry child indices. Parent links record which side the node hangs
/// from so the upward code walk knows the bit to collect.
struct HuffNode {
    count: u32,
    symbol: Option<u8>,
    children: Option<(usize, usize)>,
    parent: Option<(usize, Side)>,
}

/// Flat-array decoding tree. `bit0`/`bit1` are indexed by internal-node id;
/// stored values are either leaf symbols (< 256) or further internal ids.
struct DecodeTable {
    bit0: [u16; NODE_TABLE_SIZE],
    bit1: [u16; NODE_TABLE_SIZE],
    root: u16,
}

/// Build the encoding tree from a byte histogram. The heap is keyed by
/// (count, allocation order): ordering among equal counts is deterministic
/// but arbitrary, so encoder output is stable without being bit-identical to
/// any other implementation. Returns the arena and the root index.
fn build_tree(freq: &[u32; 256]) -> (Vec<HuffNode>, usize) {
    let mut nodes: Vec<HuffNode> = Vec::with_capacity(NODE_TABLE_SIZE);
    let mut heap: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();

    for (symbol, &count) in freq.iter().enumerate() {
        if count == 0 {
            continue;
        }
        nodes.push(HuffNode {
            count,
            symbol: Some(symbol as u8),
            children: None,
            parent: None,
        });
        heap.push(Reverse((count, nodes.len() - 1)));
    }

    while heap.len() > 1 {
        // First popped becomes the left child (bit 0), second the right (bit 1).
        let Reverse((left_count, left)) = heap.pop().unwrap();
        let Reverse((right_count, right)) = heap.pop().unwrap();

        let parent = nodes.len();
        nodes.push(HuffNode {
            count: left_count + right_count,
            symbol: None,
            children: Some((left, right)),
            parent: None,
        });
        nodes[left].parent = Some((parent, Side::Left));
        nodes[right].parent = Some((parent, Side::Right));
        heap.push(Reverse((left_count + right_count, parent)));
    }

    let root = heap.pop().map(|Reverse((_, idx))| idx).unwrap_or(0);
    (nodes, root)
}

/// Collect each leaf's code by walking to the root (0 for a left edge, 1 for
/// a right edge) and reversing. A single-leaf tree yields the empty code.
fn build_codes(nodes: &[HuffNode]) -> Vec<Option<Vec<bool>>> {
    let mut codes: Vec<Option<Vec<bool>>> = vec![None; 256];

    for (idx, node) in nodes.iter().enumerate() {
        let Some(symbol) = node.symbol else {
            continue;
        };
        let mut bits = Vec::new();
        let mut cursor = idx;
        while let Some((parent, side)) = nodes[cursor].parent {
            bits.push(side == Side::Right);
            cursor = parent;
        }
        bits.reverse();
        codes[symbol as usize] = Some(bits);
    }

    codes
}

/// Serialize the tree pre-order through the bit writer.
fn write_tree<W: Write>(nodes: &[HuffNode], idx: usize, writer: &mut BitWriter<W>) -> Result<(), AosError> {
    match nodes[idx].children {
        Some((left, right)) => {
            writer.write_bit(true)?;
            write_tree(nodes, left, writer)?;
            write_tree(nodes, right, writer)?;
        }
        None => {
            writer.write_bit(false)?;
            writer.write_byte(nodes[idx].symbol.unwrap_or(0))?;
        }
    }
    Ok(())
}

/// Rebuild one tree node from the bit stream, assigning internal-node ids in
/// pre-order starting at 256. Returns the node's id: a symbol for a leaf, an
/// internal id otherwise. The table cap is defensive; a well-formed stream
/// never reaches it.
fn read_tree<R: Read>(reader: &mut BitReader<R>, table: &mut DecodeTable, next_id: &mut u16) -> Result<u16, AosError> {
    if reader.read_bit()? {
        let id = *next_id;
        if id as usize >= NODE_TABLE_SIZE {
            log::warn!("Huffman tree exceeded {} nodes; truncating", NODE_TABLE_SIZE);
            return Ok(0);
        }
        *next_id += 1;

        let left = read_tree(reader, table, next_id)?;
        let right = read_tree(reader, table, next_id)?;
        table.bit0[id as usize] = left;
        table.bit1[id as usize] = right;
        Ok(id)
    }
    else {
        Ok(reader.read_bits(8)?)
    }
}

/// Main compression function.
/// `expanded_in` is an object with a `Read` trait, usually `std::fs::File` or `std::io::Cursor<&[u8]>`.
/// `compressed_out` is an object with `Write` and `Seek` traits.
/// Returns (in_size, out_size) or error. Input must contain at least one byte.
pub fn compress<R, W>(expanded_in: &mut R, compressed_out: &mut W) -> Result<(u64, u64), AosError>
where
    R: Read,
    W: Write + Seek,
{
    let mut data = Vec::new();
    expanded_in.read_to_end(&mut data)?;
    if data.is_empty() || data.len() >= u32::MAX as usize {
        return Err(AosError::ParameterError);
    }

    let mut freq = [0u32; 256];
    for &byte in &data {
        freq[byte as usize] += 1;
    }

    let (nodes, root) = build_tree(&freq);
    let codes = build_codes(&nodes);

    let out_start = compressed_out.stream_position()?;
    let mut writer = BitWriter::new(&mut *compressed_out);
    writer.write_u32_le(data.len() as u32)?;
    write_tree(&nodes, root, &mut writer)?;

    for &byte in &data {
        // Every byte of the input has a nonzero count and therefore a code. A
        // single-symbol input has the empty code, emitting no bits at all.
        let code = codes[byte as usize].as_ref().ok_or(AosError::FormatParseError)?;
        for &bit in code {
            writer.write_bit(bit)?;
        }
    }
    writer.flush()?;

    let out_size = compressed_out.stream_position()? - out_start;
    log::trace!("compress: {} bytes in, {} bytes out", data.len(), out_size);
    Ok((data.len() as u64, out_size))
}

/// Main decompression function.
/// `compressed_in` is an object with `Read` and `Seek` traits.
/// `expanded_out` is an object with a `Write` trait.
/// Returns (in_size, out_size) or error. Trailing pad bits are ignored.
pub fn expand<R, W>(compressed_in: &mut R, expanded_out: &mut W) -> Result<(u64, u64), AosError>
where
    R: Read + Seek,
    W: Write,
{
    let in_start = compressed_in.stream_position()?;
    let mut reader = BitReader::new(&mut *compressed_in);
    let unpacked_size = reader.read_u32_le()? as usize;
    if unpacked_size == 0 {
        return Ok((4, 0));
    }

    let mut table = DecodeTable {
        bit0: [0; NODE_TABLE_SIZE],
        bit1: [0; NODE_TABLE_SIZE],
        root: 0,
    };
    let mut next_id = ROOT_ID;
    table.root = read_tree(&mut reader, &mut table, &mut next_id)?;

    let buffer = if table.root < LEAF_LIMIT {
        // Degenerate single-leaf tree: the symbol's code is empty, so the body
        // carries no bits and the declared length alone drives the output.
        vec![table.root as u8; unpacked_size]
    }
    else {
        let mut buffer = Vec::with_capacity(unpacked_size);
        for _ in 0..unpacked_size {
            let mut id = table.root;
            while id >= LEAF_LIMIT {
                id = if reader.read_bit()? {
                    table.bit1[id as usize]
                }
                else {
                    table.bit0[id as usize]
                };
            }
            buffer.push(id as u8);
        }
        buffer
    };

    expanded_out.write_all(&buffer)?;
    expanded_out.flush()?;
    log::trace!("expand: {} bytes out ({} tree nodes)", buffer.len(), next_id - ROOT_ID);

    drop(reader);
    let in_size = compressed_in.stream_position()? - in_start;
    Ok((in_size, unpacked_size as u64))
}

/// Convenience function, calls `compress` with a slice returning a Vec
pub fn compress_slice(slice: &[u8]) -> Result<Vec<u8>, AosError> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    compress(&mut src, &mut ans)?;
    Ok(ans.into_inner())
}

/// Convenience function, calls `expand` with a slice returning a Vec
pub fn expand_slice(slice: &[u8]) -> Result<Vec<u8>, AosError> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    expand(&mut src, &mut ans)?;
    Ok(ans.into_inner())
}

#[test]
fn invertibility() {
    let test_data = "AB".as_bytes();
    let compressed = compress_slice(test_data).expect("compression failed");
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(test_data.to_vec(), expanded);

    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let compressed = compress_slice(test_data).expect("compression failed");
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(test_data.to_vec(), expanded);

    let test_data: Vec<u8> = (0u16..=255).map(|b| b as u8).cycle().take(4096).collect();
    let compressed = compress_slice(&test_data).expect("compression failed");
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(test_data, expanded);
}

#[test]
fn length_prefix_is_little_endian() {
    let compressed = compress_slice("ABAB".as_bytes()).expect("compression failed");
    assert_eq!(&compressed[0..4], &[4, 0, 0, 0]);
}

#[test]
fn single_symbol_input_round_trips() {
    // One distinct byte value serializes as a bare leaf (`0 <byte>`) and an
    // empty body; the decoder must not read code bits for it.
    let test_data = vec![0x41u8; 10];
    let compressed = compress_slice(&test_data).expect("compression failed");
    // 4-byte length prefix, then 9 tree bits padded to 2 bytes.
    assert_eq!(compressed.len(), 6);
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(test_data, expanded);
}

#[test]
fn empty_input_is_rejected() {
    assert!(matches!(compress_slice(&[]), Err(AosError::ParameterError)));
}

#[test]
fn two_leaf_tree_shape() {
    // "AB": two leaves under one internal node. The serialized tree is
    // 1 0 <A> 0 <B> (or with the leaves swapped), 19 bits, followed by one
    // code bit per symbol: 21 bits, padded to 3 bytes after the prefix.
    let compressed = compress_slice("AB".as_bytes()).expect("compression failed");
    assert_eq!(compressed.len(), 4 + 3);
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(expanded, b"AB");
}
