use byteorder::{ByteOrder, LittleEndian};
use std::io;

//===========================================================================//

/// A rectangular grid of 32-bit ARGB pixels (`0xAARRGGBB`), stored in
/// row-major order from top to bottom.  This is what a [`Rasterize`]
/// implementation produces for each requested icon size.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl RasterBuffer {
    /// Creates a buffer from ARGB pixels.  Returns an error if either
    /// dimension is zero or if `pixels` doesn't have exactly `width *
    /// height` entries.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<u32>,
    ) -> io::Result<RasterBuffer> {
        if width == 0 || height == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid raster dimensions ({}x{})", width, height),
            ));
        }
        let expected_len = (width as u64) * (height as u64);
        if (pixels.len() as u64) != expected_len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Invalid pixel count (was {}, but must be {} for {}x{} \
                     raster)",
                    pixels.len(),
                    expected_len,
                    width,
                    height
                ),
            ));
        }
        Ok(RasterBuffer { width, height, pixels })
    }

    /// Creates a buffer from RGBA bytes (four bytes per pixel, in row-major
    /// order from top to bottom).
    pub fn from_rgba_data(
        width: u32,
        height: u32,
        rgba_data: &[u8],
    ) -> io::Result<RasterBuffer> {
        if rgba_data.len() % 4 != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "RGBA data length must be a multiple of 4 (was {})",
                    rgba_data.len()
                ),
            ));
        }
        let pixels = rgba_data
            .chunks_exact(4)
            .map(|rgba| {
                let red = rgba[0] as u32;
                let green = rgba[1] as u32;
                let blue = rgba[2] as u32;
                let alpha = rgba[3] as u32;
                (alpha << 24) | (red << 16) | (green << 8) | blue
            })
            .collect();
        RasterBuffer::new(width, height, pixels)
    }

    /// Returns the width of the raster, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the raster, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the ARGB pixels, in row-major order from top to bottom.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Returns the raw pixel memory: each ARGB word stored little-endian
    /// (so B, G, R, A in byte order), rows top to bottom, with a row pitch
    /// of `4 * width` bytes.
    pub(crate) fn pixel_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; 4 * self.pixels.len()];
        LittleEndian::write_u32_into(&self.pixels, &mut bytes);
        bytes
    }
}

//===========================================================================//

/// Something that can produce a [`RasterBuffer`] of an exact size, usually by
/// resampling a decoded source image.
///
/// Implementations should only read their source, so that one source can be
/// shared by several concurrent encodings.  Any closure of the form
/// `Fn(u32, u32) -> io::Result<RasterBuffer>` is a rasterizer.
pub trait Rasterize {
    /// Renders the source at exactly `width` by `height` pixels.
    fn rasterize(&self, width: u32, height: u32) -> io::Result<RasterBuffer>;
}

impl<F> Rasterize for F
where
    F: Fn(u32, u32) -> io::Result<RasterBuffer>,
{
    fn rasterize(&self, width: u32, height: u32) -> io::Result<RasterBuffer> {
        self(width, height)
    }
}

//===========================================================================//


//===========================================================================//
