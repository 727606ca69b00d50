//! Segmentation of a FITS byte stream into 2880-byte blocks.

use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::header::{is_blank_row, is_end_row, parse_record, HeaderRecord};

/// FITS block size in bytes (each logical record is one block).
pub const BLOCK_SIZE: usize = 2880;

/// FITS card (keyword record) size in bytes.
pub const CARD_SIZE: usize = 80;

/// Number of cards that fit in a single block.
pub const CARDS_PER_BLOCK: usize = BLOCK_SIZE / CARD_SIZE;

/// Returns the number of FITS blocks required to hold `num_bytes` bytes.
///
/// This is a ceiling division: 0 bytes requires 0 blocks, 1 byte requires 1
/// block, 2880 bytes requires 1 block, 2881 bytes requires 2 blocks.
pub const fn blocks_needed(num_bytes: usize) -> usize {
    if num_bytes == 0 {
        return 0;
    }
    num_bytes.div_ceil(BLOCK_SIZE)
}

/// Returns the total byte length (in whole blocks) required to hold `num_bytes`.
pub const fn padded_byte_len(num_bytes: usize) -> usize {
    blocks_needed(num_bytes) * BLOCK_SIZE
}

/// One 2880-byte slice of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<'a> {
    /// Byte offset of the first byte of the block.
    pub offset_start: usize,
    /// Byte offset one past the last byte; always `offset_start + BLOCK_SIZE`.
    pub offset_end: usize,
    /// The block's bytes.
    pub raw: &'a [u8],
    /// `true` if the block was scanned for header rows.
    pub is_header_block: bool,
    /// Records parsed from this block, in row order. Empty for data blocks.
    pub records: Vec<HeaderRecord>,
}

/// Result of scanning one header block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderScan {
    /// Records parsed before the END row (or from the whole block).
    pub records: Vec<HeaderRecord>,
    /// `true` if the END row was found in this block.
    pub end_found: bool,
}

/// Parse the rows of one header block.
///
/// Blank rows are skipped. The END row stops the scan and is not recorded.
/// Any trailing bytes shorter than a full row are ignored.
pub fn scan_header_block(raw: &[u8]) -> HeaderScan {
    let mut scan = HeaderScan::default();
    for row in raw.chunks_exact(CARD_SIZE) {
        if is_blank_row(row) {
            continue;
        }
        if is_end_row(row) {
            scan.end_found = true;
            break;
        }
        scan.records.push(parse_record(row));
    }
    scan
}

/// Partition `data` into blocks, parsing header rows until the END row.
///
/// Blocks after the one holding the END row are data blocks and are returned
/// with offsets only.
pub fn segment_blocks(data: &[u8]) -> Result<Vec<Block<'_>>> {
    if !data.len().is_multiple_of(BLOCK_SIZE) {
        return Err(Error::MalformedInput {
            len: data.len() as u64,
        });
    }

    let mut blocks = Vec::with_capacity(data.len() / BLOCK_SIZE);
    let mut end_found = false;

    for (index, raw) in data.chunks_exact(BLOCK_SIZE).enumerate() {
        let offset_start = index * BLOCK_SIZE;
        let mut block = Block {
            offset_start,
            offset_end: offset_start + BLOCK_SIZE,
            raw,
            is_header_block: false,
            records: Vec::new(),
        };

        if !end_found {
            let scan = scan_header_block(raw);
            log::trace!(
                "header block {index}: {} records, end={}",
                scan.records.len(),
                scan.end_found
            );
            end_found = scan.end_found;
            block.is_header_block = true;
            block.records = scan.records;
        }

        blocks.push(block);
    }

    if !end_found {
        log::warn!("no END record found in {} blocks", blocks.len());
    }
    log::debug!("segmented {} bytes into {} blocks", data.len(), blocks.len());

    Ok(blocks)
}

/// Collect the header records of all header blocks, in order.
pub fn header_records(blocks: &[Block<'_>]) -> Vec<HeaderRecord> {
    blocks
        .iter()
        .filter(|b| b.is_header_block)
        .flat_map(|b| b.records.iter().cloned())
        .collect()
}

/// Byte offset immediately after the last header block.
pub fn header_byte_len(blocks: &[Block<'_>]) -> usize {
    blocks
        .iter()
        .take_while(|b| b.is_header_block)
        .last()
        .map(|b| b.offset_end)
        .unwrap_or(0)
}
