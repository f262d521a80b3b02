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

    src/archive.rs

    A parser for the AOS archive container.

    The container is a fixed layout: a 273-byte header (u32 signature,
    normally zero; u32 absolute data offset; u32 index size; 261-byte
    Shift-JIS archive name), an index of 40-byte entry records (32-byte
    Shift-JIS file name, u32 offset relative to the data region, u32 size),
    and the concatenated entry data. Entries appear in the index in data
    order, each offset equal to the cumulative size of those before it.
*/

use binrw::{binrw, BinRead, BinWrite};

use crate::io::{ReadSeek, SeekFrom, WriteSeek};
use crate::util::{decode_name_field, encode_name_field};
use crate::{AosError, AOS_ENTRY_SIZE, AOS_HEADER_SIZE, ARCHIVE_NAME_FIELD_SIZE, ENTRY_NAME_FIELD_SIZE};

#[derive(Debug)]
#[binrw]
#[brw(little)]
pub struct AosHeader {
    pub signature: u32,
    pub data_offset: u32,
    pub index_size: u32,
    pub archive_name: [u8; ARCHIVE_NAME_FIELD_SIZE],
}

#[derive(Debug)]
#[binrw]
#[brw(little)]
pub struct AosEntryRecord {
    pub file_name: [u8; ENTRY_NAME_FIELD_SIZE],
    pub offset: u32,
    pub size: u32,
}

/// One archive entry held in memory: the decoded Shift-JIS file name and the
/// entry's raw bytes from the data region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AosEntry {
    pub name: String,
    pub data: Vec<u8>,
}

/// An AOS archive, fully resident. Entry order is the index order, which is
/// preserved exactly on write.
#[derive(Debug, Default)]
pub struct AosArchive {
    pub name: String,
    pub entries: Vec<AosEntry>,
}

impl AosArchive {
    /// Check whether the stream looks like an AOS archive: the header
    /// arithmetic `data_offset == 273 + index_size` must hold and the index
    /// must be a whole number of 40-byte records.
    pub fn detect<RS: ReadSeek>(mut image: RS) -> bool {
        let mut detected = false;
        _ = image.seek(SeekFrom::Start(0));

        if let Ok(header) = AosHeader::read(&mut image) {
            detected = header.data_offset as usize == AOS_HEADER_SIZE + header.index_size as usize
                && header.index_size as usize % AOS_ENTRY_SIZE == 0;
        }

        detected
    }

    /// Read an archive from a stream.
    pub fn read<RS: ReadSeek>(mut image: RS) -> Result<AosArchive, AosError> {
        image.seek(SeekFrom::Start(0))?;
        let header = AosHeader::read(&mut image)?;

        if header.signature != 0 {
            // The engine writes zero here, but nothing checks it on load.
            log::warn!("read: Nonzero archive signature: {:08X}", header.signature);
        }
        if header.data_offset as usize != AOS_HEADER_SIZE + header.index_size as usize {
            log::warn!(
                "read: data_offset {:X} does not match header + index size {:X}",
                header.data_offset,
                AOS_HEADER_SIZE + header.index_size as usize
            );
        }

        let name = decode_name_field(&header.archive_name);
        let entry_count = header.index_size as usize / AOS_ENTRY_SIZE;
        log::trace!("read: Archive {:?} with {} entries", name, entry_count);

        let mut records = Vec::with_capacity(entry_count);
        for _ in 0..entry_count {
            records.push(AosEntryRecord::read(&mut image)?);
        }

        // Seek explicitly even when the index ends at the data region.
        image.seek(SeekFrom::Start(header.data_offset as u64))?;

        let mut entries = Vec::with_capacity(entry_count);
        for record in &records {
            let entry_name = decode_name_field(&record.file_name);
            log::trace!(
                "read: Entry {:?} offset {:X} size {}",
                entry_name,
                record.offset,
                record.size
            );

            image.seek(SeekFrom::Start(header.data_offset as u64 + record.offset as u64))?;
            let mut data = vec![0u8; record.size as usize];
            image.read_exact(&mut data)?;
            entries.push(AosEntry { name: entry_name, data });
        }

        Ok(AosArchive { name, entries })
    }

    /// Write the archive: header, a zeroed index placeholder, the data region
    /// with running offsets, then the index backfilled at offset 273.
    pub fn write<WS: WriteSeek>(&self, output: &mut WS) -> Result<(), AosError> {
        let index_size = (self.entries.len() * AOS_ENTRY_SIZE) as u32;
        let data_offset = AOS_HEADER_SIZE as u32 + index_size;

        let mut archive_name = [0u8; ARCHIVE_NAME_FIELD_SIZE];
        let name_field = encode_name_field(&self.name, ARCHIVE_NAME_FIELD_SIZE)?;
        archive_name.copy_from_slice(&name_field);

        let header = AosHeader {
            signature: 0,
            data_offset,
            index_size,
            archive_name,
        };

        output.seek(SeekFrom::Start(0))?;
        header.write(output)?;
        output.write_all(&vec![0u8; index_size as usize])?;

        let mut records = Vec::with_capacity(self.entries.len());
        let mut running_offset = 0u32;
        for entry in &self.entries {
            let mut file_name = [0u8; ENTRY_NAME_FIELD_SIZE];
            let field = encode_name_field(&entry.name, ENTRY_NAME_FIELD_SIZE)?;
            file_name.copy_from_slice(&field);

            records.push(AosEntryRecord {
                file_name,
                offset: running_offset,
                size: entry.data.len() as u32,
            });
            output.write_all(&entry.data)?;
            running_offset += entry.data.len() as u32;
        }

        output.seek(SeekFrom::Start(AOS_HEADER_SIZE as u64))?;
        for record in &records {
            record.write(output)?;
        }
        output.seek(SeekFrom::End(0))?;
        output.flush()?;

        log::debug!(
            "write: {} entries, {} data bytes, data_offset {:X}",
            self.entries.len(),
            running_offset,
            data_offset
        );
        Ok(())
    }
}
