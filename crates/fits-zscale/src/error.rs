/// All errors that can occur while decoding a FITS image or estimating its
/// display interval.
#[derive(Debug)]
pub enum Error {
    /// The input length is not a whole number of 2880-byte blocks.
    MalformedInput {
        /// Total length of the rejected input in bytes.
        len: u64,
    },
    /// NAXIS1 or NAXIS2 is missing, zero, or negative.
    InvalidGeometry {
        /// Declared width (NAXIS1), or 0 when absent.
        width: i64,
        /// Declared height (NAXIS2), or 0 when absent.
        height: i64,
    },
    /// Unsupported BITPIX value.
    InvalidEncoding(i64),
    /// The data segment is shorter than the declared geometry requires.
    TruncatedData {
        /// Number of bytes the geometry requires.
        expected: u64,
        /// Number of bytes actually available.
        available: u64,
    },
    /// Least-squares fit over points with no variation in x.
    RegressionDegenerate,
    /// An I/O error from the standard library.
    #[cfg(feature = "std")]
    Io(std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::MalformedInput { len } => write!(
                f,
                "input of {len} bytes is not a multiple of the 2880-byte FITS block size"
            ),
            Error::InvalidGeometry { width, height } => {
                write!(f, "invalid image geometry: {width}x{height}")
            }
            Error::InvalidEncoding(v) => write!(f, "unsupported BITPIX value: {v}"),
            Error::TruncatedData {
                expected,
                available,
            } => write!(
                f,
                "truncated data segment: expected {expected} bytes, found {available}"
            ),
            Error::RegressionDegenerate => {
                write!(f, "linear regression is degenerate (no variation in x)")
            }
            #[cfg(feature = "std")]
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::ToString;

    #[test]
    fn display_malformed_input() {
        let e = Error::MalformedInput { len: 100 };
        assert_eq!(
            e.to_string(),
            "input of 100 bytes is not a multiple of the 2880-byte FITS block size"
        );
    }

    #[test]
    fn display_invalid_geometry() {
        let e = Error::InvalidGeometry {
            width: 0,
            height: 12,
        };
        assert_eq!(e.to_string(), "invalid image geometry: 0x12");
    }

    #[test]
    fn display_invalid_encoding() {
        let e = Error::InvalidEncoding(64);
        assert_eq!(e.to_string(), "unsupported BITPIX value: 64");
    }

    #[test]
    fn display_truncated_data() {
        let e = Error::TruncatedData {
            expected: 8,
            available: 6,
        };
        assert_eq!(
            e.to_string(),
            "truncated data segment: expected 8 bytes, found 6"
        );
    }

    #[test]
    fn display_regression_degenerate() {
        let e = Error::RegressionDegenerate;
        assert!(e.to_string().contains("degenerate"));
    }

    #[cfg(feature = "std")]
    #[test]
    fn io_error_from_conversion() {
        let io_err = std::io::Error::other("oops");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert_eq!(e.to_string(), "I/O error: oops");
    }

    #[test]
    fn debug_formatting() {
        let e = Error::InvalidEncoding(-16);
        let debug = format!("{e:?}");
        assert!(debug.contains("InvalidEncoding"));
        assert!(debug.contains("-16"));
    }

    #[cfg(feature = "std")]
    #[test]
    fn std_error_source() {
        use std::error::Error as StdError;

        let e = Error::RegressionDegenerate;
        assert!(e.source().is_none());

        let e = Error::Io(std::io::Error::other("inner"));
        assert!(e.source().is_some());
    }
}
