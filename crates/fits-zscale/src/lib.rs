//! Pure Rust decoding of FITS primary images with ZScale display intervals.
//!
//! The pipeline is: [`block::segment_blocks`] splits the input into 2880-byte
//! blocks and parses header rows with [`header::parse_record`];
//! [`table::HeaderTable`] folds the records into a keyword table;
//! [`image::decode_image`] turns the data segment into calibrated `f64`
//! samples; [`zscale::zscale_interval`] picks a display range.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod block;
pub mod endian;
pub mod error;
pub mod header;
pub mod image;
pub mod io;
pub mod primary;
pub mod stats;
pub mod table;
pub mod value;
pub mod zscale;

pub use block::{BLOCK_SIZE, CARDS_PER_BLOCK, CARD_SIZE};
pub use error::{Error, Result};
pub use header::HeaderRecord;
pub use image::{decode_image, DecodedImage, ImageLayout, SampleFormat};
pub use primary::{decode_fits, read_fits, PrimaryHdu};
pub use table::HeaderTable;
pub use value::Value;
pub use zscale::{zscale_interval, ContrastInterval, ZScaleOptions};
