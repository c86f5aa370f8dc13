//! A library for converting raster images into multi-resolution ICO files.
//!
//! The encoder renders one source image at each requested size and stores
//! every rendering as an uncompressed 32bpp BMP inside a single ICO file.
//! Rendering is delegated to a [`Rasterize`] implementation: either the
//! built-in resampler of [`IconImage`], or any closure that produces a
//! [`RasterBuffer`].
//!
//! # Example
//!
//! ```no_run
//! use icomaker::{IconImage, SizeRequest};
//! use std::fs::File;
//!
//! let source = IconImage::read_png(File::open("logo.png")?)?;
//! let sizes = SizeRequest::from_pairs(&[(16, 16), (32, 32), (256, 256)])?;
//! let ico = icomaker::encode(&source, &sizes)?;
//! ico.write_to(File::create("logo.ico")?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod dib;
mod encoder;
mod error;
mod icondir;
mod image;
mod raster;
mod restype;
mod rows;
mod size;

pub use crate::dib::build_dib;
pub use crate::encoder::{encode, encode_sizes, IcoFile};
pub use crate::error::IcoError;
pub use crate::icondir::{IconDir, IconDirEntry};
pub use crate::image::{IconImage, Resampler, ResizeFilter};
pub use crate::raster::{RasterBuffer, Rasterize};
pub use crate::restype::ResourceType;
pub use crate::rows::reverse_rows;
pub use crate::size::{IconSize, SizeRequest};

//===========================================================================//
