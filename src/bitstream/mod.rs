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

//! Big-endian bit-level reader and writer over an underlying byte stream.
//!
//! Bits are packed most-significant-first: the first bit written lands in bit 7
//! of the current byte. Integer fields in the surrounding containers are
//! little-endian; the two conventions never mix within one field. The writer
//! exposes a byte-aligned little-endian `u32` pass-through for the uncompressed
//! size prefix of Huffman streams.

use crate::io::{Error, ErrorKind, Read, Write};

/// Accumulates bits most-significant-first and emits whole bytes to the
/// underlying writer.
pub struct BitWriter<W: Write> {
    inner: W,
    current: u8,
    // Index 0..=7 of the next bit position; 0 maps to bit 7 of `current`.
    bit_index: u32,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            current: 0,
            bit_index: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<(), Error> {
        if bit {
            self.current |= 1 << (7 - self.bit_index);
        }
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
            self.bit_index = 0;
        }
        Ok(())
    }

    pub fn write_bits(&mut self, bits: &[bool]) -> Result<(), Error> {
        for &bit in bits {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Write a whole byte as 8 bits, most-significant bit first.
    pub fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        for shift in (0..8).rev() {
            self.write_bit((byte >> shift) & 1 != 0)?;
        }
        Ok(())
    }

    /// Write a little-endian `u32` directly to the underlying stream.
    /// The writer must be byte-aligned.
    pub fn write_u32_le(&mut self, value: u32) -> Result<(), Error> {
        if self.bit_index != 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "integer write on an unaligned bit writer",
            ));
        }
        self.inner.write_all(&value.to_le_bytes())
    }

    /// Emit any partial byte (unused low-order positions as 0) and flush the
    /// underlying stream. Idempotent on an aligned writer.
    pub fn flush(&mut self) -> Result<(), Error> {
        if self.bit_index > 0 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
            self.bit_index = 0;
        }
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Consumes bits most-significant-first from the underlying reader.
pub struct BitReader<R: Read> {
    inner: R,
    current: u8,
    // Unread bits left in `current`, 0..=8. The next bit is
    // `(current >> (bits_remaining - 1)) & 1`.
    bits_remaining: u32,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            current: 0,
            bits_remaining: 0,
        }
    }

    pub fn read_bit(&mut self) -> Result<bool, Error> {
        if self.bits_remaining == 0 {
            let mut buf = [0u8; 1];
            self.inner.read_exact(&mut buf)?;
            self.current = buf[0];
            self.bits_remaining = 8;
        }
        self.bits_remaining -= 1;
        Ok((self.current >> self.bits_remaining) & 1 != 0)
    }

    /// Read `count` bits (up to 16) as an unsigned integer, most-significant
    /// bit first, straddling byte boundaries as needed.
    pub fn read_bits(&mut self, count: u32) -> Result<u16, Error> {
        debug_assert!(count <= 16);
        let mut value = 0u16;
        for _ in 0..count {
            value = (value << 1) | self.read_bit()? as u16;
        }
        Ok(value)
    }

    /// Read a little-endian `u32` directly from the underlying stream.
    /// The reader must be byte-aligned.
    pub fn read_u32_le(&mut self) -> Result<u32, Error> {
        if self.bits_remaining != 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "integer read on an unaligned bit reader",
            ));
        }
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }
}
