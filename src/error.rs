use std::io;

//===========================================================================//

/// Errors produced while encoding or reading ICO files.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IcoError {
    /// The caller passed arguments that can't produce a valid ICO file (for
    /// example, an empty list of sizes).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The rasterizer couldn't produce pixels for one of the requested
    /// sizes.  The whole encoding is aborted.
    #[error("rasterization failed for {width}x{height} image: {source}")]
    RasterizationFailed {
        /// Requested width, in pixels.
        width: u32,
        /// Requested height, in pixels.
        height: u32,
        /// The underlying failure reported by the rasterizer.
        #[source]
        source: io::Error,
    },

    /// Encoded input (ICO, BMP or PNG data) was malformed or unsupported.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Reading or writing failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl IcoError {
    /// Returns the requested `(width, height)` that failed to rasterize, if
    /// this is a rasterization failure.
    pub fn failed_size(&self) -> Option<(u32, u32)> {
        match *self {
            IcoError::RasterizationFailed { width, height, .. } => {
                Some((width, height))
            }
            _ => None,
        }
    }
}

impl From<IcoError> for io::Error {
    fn from(error: IcoError) -> io::Error {
        match error {
            IcoError::Io(error) => error,
            IcoError::InvalidArgument(_) => {
                io::Error::new(io::ErrorKind::InvalidInput, error)
            }
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

//===========================================================================//


//===========================================================================//
