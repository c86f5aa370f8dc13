use crate::error::IcoError;
use crate::raster::{RasterBuffer, Rasterize};
use ::image::imageops::{self, FilterType};
use ::image::{ImageBuffer, Rgba};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

//===========================================================================//

// Size limits for decoded images:
const MIN_WIDTH: u32 = 1;
const MIN_HEIGHT: u32 = 1;

//===========================================================================//

/// The resampling filter used when rasterizing an [`IconImage`] at a size
/// other than its own.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum ResizeFilter {
    /// Nearest-neighbor sampling
    Nearest,
    /// Linear (bilinear) filtering
    #[default]
    Triangle,
    /// Cubic filtering
    CatmullRom,
    /// Gaussian filtering
    Gaussian,
    /// Lanczos filtering with a window of 3
    Lanczos3,
}

impl ResizeFilter {
    fn filter_type(self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }

    /// Parses a filter name such as `"nearest"` or `"lanczos3"`
    /// (case-insensitive).
    pub fn from_name(name: &str) -> Option<ResizeFilter> {
        match name.to_ascii_lowercase().as_str() {
            "nearest" => Some(ResizeFilter::Nearest),
            "triangle" | "bilinear" => Some(ResizeFilter::Triangle),
            "catmullrom" | "cubic" => Some(ResizeFilter::CatmullRom),
            "gaussian" => Some(ResizeFilter::Gaussian),
            "lanczos3" => Some(ResizeFilter::Lanczos3),
            _ => None,
        }
    }
}

//===========================================================================//

/// A decoded image with straight (non-premultiplied) RGBA pixels.  Serves as
/// the source that icons are rendered from, and as the result of decoding
/// an entry of an existing ICO file.
#[derive(Clone, Debug)]
pub struct IconImage {
    width: u32,
    height: u32,
    rgba_data: Vec<u8>,
}

impl IconImage {
    /// Creates a new image with the given dimensions and RGBA data.  The
    /// `width` and `height` must be nonzero, and `rgba_data` must have `4 *
    /// width * height` bytes and be in row-major order from top to bottom.
    /// Panics if the dimensions are out of range or if `rgba_data` is the
    /// wrong length.
    pub fn from_rgba_data(
        width: u32,
        height: u32,
        rgba_data: Vec<u8>,
    ) -> IconImage {
        if width < MIN_WIDTH {
            panic!(
                "Invalid width (was {}, but must be at least {})",
                width, MIN_WIDTH
            );
        }
        if height < MIN_HEIGHT {
            panic!(
                "Invalid height (was {}, but must be at least {})",
                height, MIN_HEIGHT
            );
        }
        let expected_data_len = (width as u64) * (height as u64) * 4;
        if (rgba_data.len() as u64) != expected_data_len {
            panic!(
                "Invalid data length (was {}, but must be {} for {}x{} image)",
                rgba_data.len(),
                expected_data_len,
                width,
                height
            );
        }
        IconImage { width, height, rgba_data }
    }

    /// Decodes an image from a PNG file.  Palette, grayscale and 16-bit
    /// images are converted to 8-bit RGBA.  Returns an error if the PNG data
    /// is malformed or can't be decoded.
    pub fn read_png<R: Read>(reader: R) -> Result<IconImage, IcoError> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(
            png::Transformations::EXPAND | png::Transformations::STRIP_16,
        );
        let mut png_reader = match decoder.read_info() {
            Ok(png_reader) => png_reader,
            Err(error) => invalid_data!("Malformed PNG data: {}", error),
        };
        let (width, height) = {
            let info = png_reader.info();
            (info.width, info.height)
        };
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            invalid_data!("Invalid PNG dimensions ({}x{})", width, height);
        }
        let (color_type, bit_depth) = png_reader.output_color_type();
        if bit_depth != png::BitDepth::Eight {
            invalid_data!("Unsupported PNG bit depth: {:?}", bit_depth);
        }
        let mut buffer = vec![0u8; png_reader.output_buffer_size()];
        let frame = match png_reader.next_frame(&mut buffer) {
            Ok(frame) => frame,
            Err(error) => invalid_data!("Malformed PNG data: {}", error),
        };
        buffer.truncate(frame.buffer_size());
        let rgba_data = match color_type {
            png::ColorType::Rgba => buffer,
            png::ColorType::Rgb => {
                let mut rgba = Vec::with_capacity(buffer.len() / 3 * 4);
                for rgb in buffer.chunks_exact(3) {
                    rgba.extend_from_slice(rgb);
                    rgba.push(u8::MAX);
                }
                rgba
            }
            png::ColorType::GrayscaleAlpha => {
                let mut rgba = Vec::with_capacity(buffer.len() * 2);
                for gray_alpha in buffer.chunks_exact(2) {
                    let (gray, alpha) = (gray_alpha[0], gray_alpha[1]);
                    rgba.extend_from_slice(&[gray, gray, gray, alpha]);
                }
                rgba
            }
            png::ColorType::Grayscale => {
                let mut rgba = Vec::with_capacity(buffer.len() * 4);
                for gray in buffer.into_iter() {
                    rgba.extend_from_slice(&[gray, gray, gray, u8::MAX]);
                }
                rgba
            }
            png::ColorType::Indexed => {
                invalid_data!("Unexpanded PNG palette data");
            }
        };
        if (rgba_data.len() as u64) != (width as u64) * (height as u64) * 4 {
            invalid_data!(
                "PNG frame has wrong size for {}x{} image",
                width,
                height
            );
        }
        Ok(IconImage::from_rgba_data(width, height, rgba_data))
    }

    /// Encodes the image as an 8-bit RGBA PNG file.
    pub fn write_png<W: Write>(&self, writer: W) -> Result<(), IcoError> {
        match self.write_png_enc(writer) {
            Ok(()) => Ok(()),
            Err(png::EncodingError::IoError(error)) => {
                Err(IcoError::Io(error))
            }
            Err(png::EncodingError::Format(error)) => {
                invalid_argument!("PNG format error: {}", error);
            }
            Err(png::EncodingError::LimitsExceeded) => {
                invalid_argument!("PNG limits exceeded");
            }
            Err(png::EncodingError::Parameter(error)) => {
                invalid_argument!("PNG parameter error: {}", error);
            }
        }
    }

    fn write_png_enc<W: Write>(
        &self,
        writer: W,
    ) -> Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_color(png::ColorType::Rgba);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.rgba_data)?;
        Ok(())
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the RGBA data for this image, in row-major order from top to
    /// bottom.
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }

    /// Returns a rasterizer that resamples this image with the given filter.
    pub fn with_filter(&self, filter: ResizeFilter) -> Resampler<'_> {
        Resampler { image: self, filter }
    }

    /// Resamples the image to exactly `width` by `height` pixels.  No
    /// filtering happens when the size already matches.
    pub fn resize(
        &self,
        width: u32,
        height: u32,
        filter: ResizeFilter,
    ) -> io::Result<RasterBuffer> {
        if (width, height) == (self.width, self.height) {
            let rgba_data = self.rgba_data.as_slice();
            return RasterBuffer::from_rgba_data(width, height, rgba_data);
        }
        let source = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(
            self.width,
            self.height,
            self.rgba_data.as_slice(),
        )
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "RGBA data doesn't match image dimensions",
            )
        })?;
        let resized =
            imageops::resize(&source, width, height, filter.filter_type());
        RasterBuffer::from_rgba_data(width, height, resized.as_raw())
    }
}

impl Rasterize for IconImage {
    fn rasterize(&self, width: u32, height: u32) -> io::Result<RasterBuffer> {
        self.resize(width, height, ResizeFilter::default())
    }
}

//===========================================================================//

/// Rasterizes an [`IconImage`] with a chosen [`ResizeFilter`].  Created by
/// [`IconImage::with_filter`].
#[derive(Clone, Copy, Debug)]
pub struct Resampler<'a> {
    image: &'a IconImage,
    filter: ResizeFilter,
}

impl Rasterize for Resampler<'_> {
    fn rasterize(&self, width: u32, height: u32) -> io::Result<RasterBuffer> {
        self.image.resize(width, height, self.filter)
    }
}

//===========================================================================//


//===========================================================================//
