//! Random-access byte sources for FITS decoding.
//!
//! A [`ByteSource`] hands out complete byte ranges on request. In-memory
//! slices work everywhere; with the `std` feature any `Read + Seek` (a file,
//! a cursor) can be wrapped in a [`SeekSource`].

use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Slice-by-range access to a byte stream of known length.
pub trait ByteSource {
    /// Total length of the source in bytes.
    fn len(&self) -> u64;

    /// Returns `true` if the source holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read exactly the bytes in `start..end`.
    ///
    /// Fails with [`Error::TruncatedData`] if the range extends past the end
    /// of the source.
    fn read_range(&mut self, start: u64, end: u64) -> Result<Vec<u8>>;
}

fn check_range(start: u64, end: u64, len: u64) -> Result<()> {
    if start > end || end > len {
        return Err(Error::TruncatedData {
            expected: end.saturating_sub(start),
            available: len.saturating_sub(start),
        });
    }
    Ok(())
}

impl ByteSource for &[u8] {
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn read_range(&mut self, start: u64, end: u64) -> Result<Vec<u8>> {
        check_range(start, end, ByteSource::len(self))?;
        Ok(self[start as usize..end as usize].to_vec())
    }
}

#[cfg(feature = "std")]
pub use self::seek::SeekSource;

#[cfg(feature = "std")]
mod seek {
    use std::io::{Read, Seek, SeekFrom};

    use super::{check_range, ByteSource};
    use crate::error::Result;

    /// A [`ByteSource`] over any seekable reader.
    #[derive(Debug)]
    pub struct SeekSource<R> {
        inner: R,
        len: u64,
    }

    impl<R: Read + Seek> SeekSource<R> {
        /// Wrap `inner`, measuring its length by seeking to the end.
        pub fn new(mut inner: R) -> Result<Self> {
            let len = inner.seek(SeekFrom::End(0))?;
            Ok(SeekSource { inner, len })
        }

        /// Return the wrapped reader.
        pub fn into_inner(self) -> R {
            self.inner
        }
    }

    impl<R: Read + Seek> ByteSource for SeekSource<R> {
        fn len(&self) -> u64 {
            self.len
        }

        fn read_range(&mut self, start: u64, end: u64) -> Result<Vec<u8>> {
            check_range(start, end, self.len)?;
            self.inner.seek(SeekFrom::Start(start))?;
            let mut buf = vec![0u8; (end - start) as usize];
            self.inner.read_exact(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn slice_reads_ranges() {
        let data: Vec<u8> = (0..10).collect();
        let mut src: &[u8] = &data;
        assert_eq!(ByteSource::len(&src), 10);
        assert!(!ByteSource::is_empty(&src));
        assert_eq!(src.read_range(2, 5).unwrap(), vec![2, 3, 4]);
        assert_eq!(src.read_range(10, 10).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn slice_range_past_end_is_truncated() {
        let data = [0u8; 4];
        let mut src: &[u8] = &data;
        assert!(matches!(
            src.read_range(2, 8),
            Err(Error::TruncatedData {
                expected: 6,
                available: 2
            })
        ));
    }

    #[cfg(feature = "std")]
    #[test]
    fn seek_source_over_cursor() {
        let data: Vec<u8> = (0..32).collect();
        let mut src = SeekSource::new(std::io::Cursor::new(data)).unwrap();
        assert_eq!(src.len(), 32);
        assert_eq!(src.read_range(30, 32).unwrap(), vec![30, 31]);
        assert_eq!(src.read_range(0, 3).unwrap(), vec![0, 1, 2]);
        assert!(src.read_range(31, 33).is_err());
        assert_eq!(src.into_inner().into_inner().len(), 32);
    }
}
