use crate::error::IcoError;
use crate::image::IconImage;
use crate::raster::RasterBuffer;
use crate::rows::reverse_rows;
use byteorder::{ByteOrder, LittleEndian};

//===========================================================================//

// The only color depth this crate writes (8 bits each of B, G, R and A).
pub(crate) const BITS_PER_PIXEL: u16 = 32;

// BI_RGB: uncompressed pixel data.
const COMPRESSION_NONE: u32 = 0;

//===========================================================================//

/// The BITMAPINFOHEADER struct that starts every BMP image inside an ICO
/// file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct BitmapInfoHeader {
    pub(crate) width: i32,
    /// Twice the image height: ICO readers count the rows of the color data
    /// and of the (here absent) AND mask together.
    pub(crate) height: i32,
    pub(crate) planes: u16,
    pub(crate) bits_per_pixel: u16,
    pub(crate) compression: u32,
    pub(crate) image_size: u32,
}

impl BitmapInfoHeader {
    /// The size of a BITMAPINFOHEADER struct, in bytes.
    pub(crate) const LEN: usize = 40;

    fn for_raster(
        raster: &RasterBuffer,
        image_size: u32,
    ) -> BitmapInfoHeader {
        BitmapInfoHeader {
            width: raster.width() as i32,
            height: 2 * raster.height() as i32,
            planes: 1,
            bits_per_pixel: BITS_PER_PIXEL,
            compression: COMPRESSION_NONE,
            image_size,
        }
    }

    pub(crate) fn to_bytes(&self) -> [u8; BitmapInfoHeader::LEN] {
        let mut bytes = [0u8; BitmapInfoHeader::LEN];
        let header_size = BitmapInfoHeader::LEN as u32;
        LittleEndian::write_u32(&mut bytes[0..4], header_size);
        LittleEndian::write_i32(&mut bytes[4..8], self.width);
        LittleEndian::write_i32(&mut bytes[8..12], self.height);
        LittleEndian::write_u16(&mut bytes[12..14], self.planes);
        LittleEndian::write_u16(&mut bytes[14..16], self.bits_per_pixel);
        LittleEndian::write_u32(&mut bytes[16..20], self.compression);
        LittleEndian::write_u32(&mut bytes[20..24], self.image_size);
        // Horizontal and vertical resolution, colors used, and important
        // colors are all left as zero.
        bytes
    }

    pub(crate) fn from_bytes(
        data: &[u8],
    ) -> Result<BitmapInfoHeader, IcoError> {
        if data.len() < BitmapInfoHeader::LEN {
            invalid_data!(
                "BMP data too short for header (was {} bytes, must be at \
                 least {})",
                data.len(),
                BitmapInfoHeader::LEN
            );
        }
        let header_size = LittleEndian::read_u32(&data[0..4]);
        if header_size != BitmapInfoHeader::LEN as u32 {
            invalid_data!(
                "Invalid BMP header size (was {}, must be {})",
                header_size,
                BitmapInfoHeader::LEN
            );
        }
        Ok(BitmapInfoHeader {
            width: LittleEndian::read_i32(&data[4..8]),
            height: LittleEndian::read_i32(&data[8..12]),
            planes: LittleEndian::read_u16(&data[12..14]),
            bits_per_pixel: LittleEndian::read_u16(&data[14..16]),
            compression: LittleEndian::read_u32(&data[16..20]),
            image_size: LittleEndian::read_u32(&data[20..24]),
        })
    }

    /// Returns the real `(width, height)` of the image, undoing the doubled
    /// height field.
    pub(crate) fn image_size_in_pixels(
        &self,
    ) -> Result<(u32, u32), IcoError> {
        if self.width < 1 {
            invalid_data!(
                "Invalid BMP width (was {}, but must be at least 1)",
                self.width
            );
        }
        if self.height % 2 != 0 {
            invalid_data!(
                "Invalid height field in BMP header \
                 (was {}, but must be divisible by 2)",
                self.height
            );
        }
        if self.height < 2 {
            invalid_data!(
                "Invalid BMP height (was {}, but must be at least 1)",
                self.height / 2
            );
        }
        Ok((self.width as u32, (self.height / 2) as u32))
    }
}

//===========================================================================//

/// Converts one raster into the BMP data stored in an ICO entry: a 40-byte
/// BITMAPINFOHEADER followed by 32bpp BGRA pixels, rows bottom to top.  The
/// result is `40 + 4 * width * height` bytes long.
pub fn build_dib(raster: &RasterBuffer) -> Result<Vec<u8>, IcoError> {
    let stride = 4 * raster.width() as usize;
    let pixels = raster.pixel_bytes();
    let pixels = reverse_rows(&pixels, raster.height() as usize, stride)?;
    let image_size = match u32::try_from(pixels.len()) {
        Ok(image_size) => image_size,
        Err(_) => invalid_argument!(
            "Raster too large for BMP ({}x{})",
            raster.width(),
            raster.height()
        ),
    };
    let header = BitmapInfoHeader::for_raster(raster, image_size);
    let mut dib = Vec::with_capacity(BitmapInfoHeader::LEN + pixels.len());
    dib.extend_from_slice(&header.to_bytes());
    dib.extend_from_slice(&pixels);
    Ok(dib)
}

/// Decodes 32bpp BMP data from an ICO entry back into a top-down RGBA
/// image.  Any AND mask after the color data is ignored.
pub(crate) fn read_dib(data: &[u8]) -> Result<IconImage, IcoError> {
    let header = BitmapInfoHeader::from_bytes(data)?;
    let (width, height) = header.image_size_in_pixels()?;
    if header.bits_per_pixel != BITS_PER_PIXEL {
        invalid_data!(
            "Unsupported BMP bits-per-pixel ({}, only {} is supported)",
            header.bits_per_pixel,
            BITS_PER_PIXEL
        );
    }
    if header.compression != COMPRESSION_NONE {
        invalid_data!("Unsupported BMP compression ({})", header.compression);
    }
    let stride = 4 * width as usize;
    let pixel_len = match stride.checked_mul(height as usize) {
        Some(len) => len,
        None => invalid_data!("Width * Height is too large"),
    };
    let body = &data[BitmapInfoHeader::LEN..];
    if body.len() < pixel_len {
        invalid_data!(
            "BMP pixel data too short (was {} bytes, but {}x{} needs {})",
            body.len(),
            width,
            height,
            pixel_len
        );
    }
    // Rows are stored starting from the *bottom* row.
    let mut rgba =
        reverse_rows(&body[..pixel_len], height as usize, stride)?;
    for pixel in rgba.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }
    Ok(IconImage::from_rgba_data(width, height, rgba))
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{build_dib, read_dib, BitmapInfoHeader};
    use crate::error::IcoError;
    use crate::raster::RasterBuffer;
    use byteorder::{ByteOrder, LittleEndian};

    #[test]
    fn build_2x2_dib() {
        // Top row: red, green.  Bottom row: blue, half-transparent white.
        let raster = RasterBuffer::new(
            2,
            2,
            vec![0xffff0000, 0xff00ff00, 0xff0000ff, 0x80ffffff],
        )
        .unwrap();
        let dib = build_dib(&raster).unwrap();
        let expected: &[u8] = b"\
            \x28\x00\x00\x00\x02\x00\x00\x00\x04\x00\x00\x00\
            \x01\x00\x20\x00\x00\x00\x00\x00\x10\x00\x00\x00\
            \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
            \x00\x00\x00\x00\
            \
            \xff\x00\x00\xff\xff\xff\xff\x80\
            \x00\x00\xff\xff\x00\xff\x00\xff";
        assert_eq!(dib.as_slice(), expected);
    }

    #[test]
    fn dib_length_and_doubled_height() {
        let raster = RasterBuffer::new(5, 3, vec![0; 15]).unwrap();
        let dib = build_dib(&raster).unwrap();
        assert_eq!(dib.len(), 40 + 3 * 5 * 4);
        assert_eq!(LittleEndian::read_i32(&dib[4..8]), 5);
        assert_eq!(LittleEndian::read_i32(&dib[8..12]), 6);
        assert_eq!(LittleEndian::read_u32(&dib[20..24]), 60);
    }

    #[test]
    fn header_for_256_keeps_real_dimensions() {
        let raster = RasterBuffer::new(256, 256, vec![0; 256 * 256]).unwrap();
        let dib = build_dib(&raster).unwrap();
        let header = BitmapInfoHeader::from_bytes(&dib).unwrap();
        assert_eq!(header.width, 256);
        assert_eq!(header.height, 512);
        assert_eq!(header.image_size_in_pixels().unwrap(), (256, 256));
    }

    #[test]
    fn read_back_built_dib() {
        let raster = RasterBuffer::new(
            2,
            2,
            vec![0xffff0000, 0xff00ff00, 0xff0000ff, 0x80ffffff],
        )
        .unwrap();
        let image = read_dib(&build_dib(&raster).unwrap()).unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        let rgba: &[u8] = b"\
            \xff\x00\x00\xff\x00\xff\x00\xff\
            \x00\x00\xff\xff\xff\xff\xff\x80";
        assert_eq!(image.rgba_data(), rgba);
    }

    #[test]
    fn read_ignores_trailing_and_mask() {
        let raster = RasterBuffer::new(1, 1, vec![0xff102030]).unwrap();
        let mut dib = build_dib(&raster).unwrap();
        dib.extend_from_slice(b"\x00\x00\x00\x00");
        let image = read_dib(&dib).unwrap();
        assert_eq!(image.rgba_data(), b"\x10\x20\x30\xff");
    }

    #[test]
    fn read_rejects_odd_height_field() {
        let raster = RasterBuffer::new(1, 1, vec![0]).unwrap();
        let mut dib = build_dib(&raster).unwrap();
        LittleEndian::write_i32(&mut dib[8..12], 3);
        assert!(matches!(read_dib(&dib), Err(IcoError::InvalidData(_))));
    }

    #[test]
    fn read_rejects_other_depths() {
        let raster = RasterBuffer::new(1, 1, vec![0]).unwrap();
        let mut dib = build_dib(&raster).unwrap();
        LittleEndian::write_u16(&mut dib[14..16], 24);
        assert!(matches!(read_dib(&dib), Err(IcoError::InvalidData(_))));
    }

    #[test]
    fn read_rejects_truncated_pixels() {
        let raster = RasterBuffer::new(2, 2, vec![0; 4]).unwrap();
        let dib = build_dib(&raster).unwrap();
        assert!(matches!(
            read_dib(&dib[..dib.len() - 1]),
            Err(IcoError::InvalidData(_))
        ));
        assert!(matches!(
            read_dib(&dib[..20]),
            Err(IcoError::InvalidData(_))
        ));
    }
}

//===========================================================================//
