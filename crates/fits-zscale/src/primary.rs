//! Decoding session for a single primary image HDU.

use alloc::vec::Vec;

use crate::block::{header_byte_len, header_records, scan_header_block, segment_blocks, BLOCK_SIZE};
use crate::error::{Error, Result};
use crate::image::{DecodedImage, ImageLayout};
use crate::io::ByteSource;
use crate::table::HeaderTable;

/// Parsed header of the primary HDU and the position of its data segment.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryHdu {
    /// Header keywords in first-occurrence order.
    pub table: HeaderTable,
    /// Bytes occupied by the header blocks; the data segment starts here.
    pub header_len: usize,
    /// Total number of 2880-byte blocks in the input.
    pub block_count: usize,
}

impl PrimaryHdu {
    /// Segment `data` and build the header table.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let blocks = segment_blocks(data)?;
        let header_len = header_byte_len(&blocks);
        let table = HeaderTable::from_records(header_records(&blocks));
        log::debug!(
            "primary header: {} keywords in {} bytes",
            table.len(),
            header_len
        );
        Ok(PrimaryHdu {
            table,
            header_len,
            block_count: blocks.len(),
        })
    }

    /// Geometry and encoding declared by the header.
    pub fn layout(&self) -> Result<ImageLayout> {
        ImageLayout::from_table(&self.table)
    }

    /// Decode the image from the same buffer passed to [`PrimaryHdu::parse`].
    pub fn decode(&self, data: &[u8]) -> Result<DecodedImage> {
        let rest = data.get(self.header_len..).unwrap_or(&[]);
        self.layout()?.decode(rest)
    }

    /// Read the header block by block from `source`, then fetch and decode
    /// exactly the data segment.
    pub fn read<S: ByteSource + ?Sized>(source: &mut S) -> Result<(Self, DecodedImage)> {
        let len = source.len();
        let block = BLOCK_SIZE as u64;
        if !len.is_multiple_of(block) {
            return Err(Error::MalformedInput { len });
        }

        let mut records = Vec::new();
        let mut offset = 0u64;
        while offset < len {
            let raw = source.read_range(offset, offset + block)?;
            let scan = scan_header_block(&raw);
            records.extend(scan.records);
            offset += block;
            if scan.end_found {
                break;
            }
        }

        let hdu = PrimaryHdu {
            table: HeaderTable::from_records(records),
            header_len: offset as usize,
            block_count: (len / block) as usize,
        };

        let layout = hdu.layout()?;
        let needed = layout.data_byte_len()? as u64;
        if offset + needed > len {
            return Err(Error::TruncatedData {
                expected: needed,
                available: len - offset,
            });
        }
        let data = source.read_range(offset, offset + needed)?;
        let image = layout.decode(&data)?;
        Ok((hdu, image))
    }
}

/// Decode a complete in-memory FITS file into its header table and image.
pub fn decode_fits(data: &[u8]) -> Result<(HeaderTable, DecodedImage)> {
    let hdu = PrimaryHdu::parse(data)?;
    let image = hdu.decode(data)?;
    Ok((hdu.table, image))
}

/// Decode a FITS file from a byte source into its header table and image.
pub fn read_fits<S: ByteSource + ?Sized>(source: &mut S) -> Result<(HeaderTable, DecodedImage)> {
    let (hdu, image) = PrimaryHdu::read(source)?;
    Ok((hdu.table, image))
}
