//! Image pixel decoding for the primary HDU.
//!
//! Geometry and sample encoding come from the header table; samples are read
//! big-endian and calibrated with BSCALE/BZERO into `f64` physical values.

use alloc::vec::Vec;

use bytemuck::pod_collect_to_vec;

use crate::endian::{be_to_native16, be_to_native32, be_to_native64};
use crate::error::{Error, Result};
use crate::table::HeaderTable;
use crate::zscale::{zscale_interval, ContrastInterval, ZScaleOptions};

/// On-disk sample encoding declared by BITPIX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// BITPIX = 8, unsigned bytes.
    U8,
    /// BITPIX = 16, signed 16-bit integers.
    I16,
    /// BITPIX = 32, signed 32-bit integers.
    I32,
    /// BITPIX = -32, IEEE 754 single precision.
    F32,
    /// BITPIX = -64, IEEE 754 double precision.
    F64,
}

impl SampleFormat {
    /// Map a BITPIX value to its format.
    pub fn from_bitpix(bitpix: i64) -> Result<Self> {
        match bitpix {
            8 => Ok(SampleFormat::U8),
            16 => Ok(SampleFormat::I16),
            32 => Ok(SampleFormat::I32),
            -32 => Ok(SampleFormat::F32),
            -64 => Ok(SampleFormat::F64),
            other => Err(Error::InvalidEncoding(other)),
        }
    }

    /// The BITPIX value for this format.
    pub fn bitpix(self) -> i8 {
        match self {
            SampleFormat::U8 => 8,
            SampleFormat::I16 => 16,
            SampleFormat::I32 => 32,
            SampleFormat::F32 => -32,
            SampleFormat::F64 => -64,
        }
    }

    /// `|BITPIX| / 8`.
    pub fn bytes_per_sample(self) -> usize {
        (self.bitpix().unsigned_abs() / 8) as usize
    }
}

/// Geometry, encoding and calibration of the primary image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageLayout {
    /// NAXIS1.
    pub width: u32,
    /// NAXIS2.
    pub height: u32,
    /// Encoding from BITPIX (-32 when absent).
    pub format: SampleFormat,
    /// BSCALE (1 when absent).
    pub scale: f64,
    /// BZERO (0 when absent).
    pub zero_offset: f64,
}

impl ImageLayout {
    /// Extract the layout from the header table.
    pub fn from_table(table: &HeaderTable) -> Result<Self> {
        let width = table.integer("NAXIS1").unwrap_or(0);
        let height = table.integer("NAXIS2").unwrap_or(0);
        let geometry_error = Error::InvalidGeometry { width, height };
        if width <= 0 || height <= 0 {
            return Err(geometry_error);
        }
        let (width, height) = match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => return Err(geometry_error),
        };

        let bitpix = match table.value("BITPIX") {
            None => i64::from(SampleFormat::F32.bitpix()),
            Some(v) => v
                .as_i64()
                .ok_or_else(|| Error::InvalidEncoding(v.as_f64().map_or(0, |f| f as i64)))?,
        };
        let format = SampleFormat::from_bitpix(bitpix)?;

        let layout = ImageLayout {
            width,
            height,
            format,
            scale: table.number("BSCALE").unwrap_or(1.0),
            zero_offset: table.number("BZERO").unwrap_or(0.0),
        };
        layout.data_byte_len()?;
        Ok(layout)
    }

    /// `width × height`.
    pub fn sample_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Length of the data segment in bytes, failing if it overflows `usize`.
    pub fn data_byte_len(&self) -> Result<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(self.format.bytes_per_sample()))
            .ok_or(Error::InvalidGeometry {
                width: i64::from(self.width),
                height: i64::from(self.height),
            })
    }

    /// Decode the data segment. `data` starts at the first data byte and may
    /// extend past the segment (block padding is ignored).
    pub fn decode(&self, data: &[u8]) -> Result<DecodedImage> {
        let needed = self.data_byte_len()?;
        if data.len() < needed {
            return Err(Error::TruncatedData {
                expected: needed as u64,
                available: data.len() as u64,
            });
        }
        let raw = &data[..needed];
        let (scale, zero) = (self.scale, self.zero_offset);
        let physical = |v: f64| v * scale + zero;

        let samples: Vec<f64> = match self.format {
            SampleFormat::U8 => raw.iter().map(|&b| physical(f64::from(b))).collect(),
            SampleFormat::I16 => {
                let words: Vec<u16> = pod_collect_to_vec(raw);
                words
                    .into_iter()
                    .map(|w| physical(f64::from(be_to_native16(w) as i16)))
                    .collect()
            }
            SampleFormat::I32 => {
                let words: Vec<u32> = pod_collect_to_vec(raw);
                words
                    .into_iter()
                    .map(|w| physical(f64::from(be_to_native32(w) as i32)))
                    .collect()
            }
            SampleFormat::F32 => {
                let words: Vec<u32> = pod_collect_to_vec(raw);
                words
                    .into_iter()
                    .map(|w| physical(f64::from(f32::from_bits(be_to_native32(w)))))
                    .collect()
            }
            SampleFormat::F64 => {
                let words: Vec<u64> = pod_collect_to_vec(raw);
                words
                    .into_iter()
                    .map(|w| physical(f64::from_bits(be_to_native64(w))))
                    .collect()
            }
        };

        log::debug!(
            "decoded {}x{} image, BITPIX {}, {} samples",
            self.width,
            self.height,
            self.format.bitpix(),
            samples.len()
        );

        Ok(DecodedImage {
            width: self.width,
            height: self.height,
            bits_per_sample: self.format.bitpix(),
            scale,
            zero_offset: zero,
            samples,
        })
    }
}

/// Decode the image described by `table` from the bytes following the header.
pub fn decode_image(table: &HeaderTable, data: &[u8]) -> Result<DecodedImage> {
    ImageLayout::from_table(table)?.decode(data)
}

/// Physical pixel values of the primary image, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// BITPIX of the source data.
    pub bits_per_sample: i8,
    /// BSCALE applied to each raw value.
    pub scale: f64,
    /// BZERO added to each scaled value.
    pub zero_offset: f64,
    /// `width × height` values, `raw × scale + zero_offset`.
    pub samples: Vec<f64>,
}

impl DecodedImage {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if the image has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Samples of row `y`.
    pub fn row(&self, y: u32) -> Option<&[f64]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        self.samples.get(start..start + self.width as usize)
    }

    /// Smallest and largest finite sample, or `None` if there are none.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// ZScale display interval of the samples.
    pub fn zscale(&self, options: &ZScaleOptions) -> ContrastInterval {
        zscale_interval(&self.samples, options)
    }

    /// The samples as a `(height, width)` array.
    #[cfg(feature = "array")]
    pub fn to_array(&self) -> ndarray::Array2<f64> {
        ndarray::Array2::from_shape_fn((self.height as usize, self.width as usize), |(y, x)| {
            self.samples[y * self.width as usize + x]
        })
    }
}
