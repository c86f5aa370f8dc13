use crate::dib::build_dib;
use crate::error::IcoError;
use crate::icondir::{DirectoryEntry, IconDir, IconDirHeader};
use crate::raster::Rasterize;
use crate::restype::ResourceType;
use crate::size::{IconSize, SizeRequest};
use std::io::{self, Cursor, Write};

//===========================================================================//

/// A complete ICO file, as produced by [`encode`].  The bytes can't be
/// changed once encoded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IcoFile {
    data: Vec<u8>,
}

impl IcoFile {
    /// Returns the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the file and returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns the length of the file, in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always returns false; an encoded file has at least one entry.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Writes the encoded bytes out, e.g. to disk.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.data)
    }

    /// Parses the file's own directory, e.g. for rendering a preview.
    pub fn directory(&self) -> Result<IconDir, IcoError> {
        IconDir::read(Cursor::new(self.data.as_slice()))
    }
}

impl AsRef<[u8]> for IcoFile {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<IcoFile> for Vec<u8> {
    fn from(file: IcoFile) -> Vec<u8> {
        file.data
    }
}

//===========================================================================//

/// Renders `source` at every requested size and packs the results into a
/// single ICO file, one uncompressed 32bpp BMP image per size.  Directory
/// entries and image data appear in the order of `sizes`.
///
/// If any size fails to rasterize, returns
/// [`IcoError::RasterizationFailed`] naming that size, and nothing is
/// produced.
pub fn encode<S: Rasterize + ?Sized>(
    source: &S,
    sizes: &SizeRequest,
) -> Result<IcoFile, IcoError> {
    let mut images = Vec::<(IconSize, Vec<u8>)>::with_capacity(sizes.len());
    for &size in sizes {
        images.push((size, rasterize_dib(source, size)?));
    }
    let data = assemble(&images)?;
    log::debug!(
        "Encoded ICO file with {} entries ({} bytes)",
        images.len(),
        data.len()
    );
    Ok(IcoFile { data })
}

/// Like [`encode`], but takes plain `(width, height)` pairs.  Returns
/// [`IcoError::InvalidArgument`] if `sizes` is empty or any dimension is
/// outside 1 to 256.
pub fn encode_sizes<S: Rasterize + ?Sized>(
    source: &S,
    sizes: &[(u32, u32)],
) -> Result<IcoFile, IcoError> {
    encode(source, &SizeRequest::from_pairs(sizes)?)
}

fn rasterize_dib<S: Rasterize + ?Sized>(
    source: &S,
    size: IconSize,
) -> Result<Vec<u8>, IcoError> {
    let failed = |source: io::Error| IcoError::RasterizationFailed {
        width: size.width(),
        height: size.height(),
        source,
    };
    let raster = match source.rasterize(size.width(), size.height()) {
        Ok(raster) => raster,
        Err(error) => {
            log::warn!("Failed to rasterize {} icon: {}", size, error);
            return Err(failed(error));
        }
    };
    if raster.width() != size.width() || raster.height() != size.height() {
        return Err(failed(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Rasterizer returned {}x{} pixels",
                raster.width(),
                raster.height()
            ),
        )));
    }
    build_dib(&raster)
}

/// Lays out the file header, then all directory entries, then all image
/// data, in that order.
fn assemble(images: &[(IconSize, Vec<u8>)]) -> Result<Vec<u8>, IcoError> {
    let num_entries = match u16::try_from(images.len()) {
        Ok(0) => invalid_argument!("At least one icon size must be requested"),
        Ok(num_entries) => num_entries,
        Err(_) => invalid_argument!(
            "Too many entries in ICO file (was {}, but max is {})",
            images.len(),
            u16::MAX
        ),
    };
    let header = IconDirHeader { restype: ResourceType::Icon, num_entries };
    let directory_len =
        IconDirHeader::LEN + DirectoryEntry::LEN * images.len();
    let mut entries = Vec::<DirectoryEntry>::with_capacity(images.len());
    let mut data_offset = directory_len as u64;
    for &(size, ref dib) in images.iter() {
        let data_size = u32::try_from(dib.len());
        let entry = match (data_size, u32::try_from(data_offset)) {
            (Ok(data_size), Ok(offset)) => {
                DirectoryEntry::for_dib(size, data_size, offset)
            }
            _ => invalid_argument!(
                "ICO file too large (entry {} would start at byte {})",
                size,
                data_offset
            ),
        };
        log::debug!(
            "ICO entry {}: {} bytes at offset {}",
            size,
            entry.data_size,
            entry.data_offset
        );
        entries.push(entry);
        data_offset += dib.len() as u64;
    }

    let mut data = Vec::<u8>::with_capacity(data_offset as usize);
    data.extend_from_slice(&header.to_bytes());
    for entry in entries.iter() {
        data.extend_from_slice(&entry.to_bytes());
    }
    for (_, dib) in images.iter() {
        data.extend_from_slice(dib);
    }
    debug_assert_eq!(data.len() as u64, data_offset);
    Ok(data)
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{assemble, encode, encode_sizes};
    use crate::error::IcoError;
    use crate::raster::RasterBuffer;
    use crate::size::{IconSize, SizeRequest};
    use byteorder::{ByteOrder, LittleEndian};
    use std::io;

    fn solid(width: u32, height: u32) -> io::Result<RasterBuffer> {
        let pixels = vec![0xff336699; (width * height) as usize];
        RasterBuffer::new(width, height, pixels)
    }

    #[test]
    fn encode_single_1x1_icon() {
        let file = encode_sizes(&solid, &[(1, 1)]).unwrap();
        let expected: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \
            \x01\x01\x00\x00\x01\x00\x20\x00\
            \x2c\x00\x00\x00\x16\x00\x00\x00\
            \
            \x28\x00\x00\x00\x01\x00\x00\x00\x02\x00\x00\x00\
            \x01\x00\x20\x00\x00\x00\x00\x00\x04\x00\x00\x00\
            \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
            \x00\x00\x00\x00\
            \
            \x99\x66\x33\xff";
        assert_eq!(file.as_bytes(), expected);
    }

    #[test]
    fn encode_16_and_32() {
        let file = encode_sizes(&solid, &[(16, 16), (32, 32)]).unwrap();
        let data = file.as_bytes();
        assert_eq!(data.len(), 5238);
        assert_eq!(LittleEndian::read_u16(&data[4..6]), 2);
        assert_eq!((data[6], data[7]), (16, 16));
        assert_eq!(LittleEndian::read_u32(&data[14..18]), 1064);
        assert_eq!(LittleEndian::read_u32(&data[18..22]), 38);
        assert_eq!((data[22], data[23]), (32, 32));
        assert_eq!(LittleEndian::read_u32(&data[30..34]), 4136);
        assert_eq!(LittleEndian::read_u32(&data[34..38]), 1102);
    }

    #[test]
    fn rasterization_failure_aborts() {
        let flaky = |width: u32, height: u32| {
            if width == 32 {
                Err(io::Error::new(io::ErrorKind::Other, "corrupt source"))
            } else {
                solid(width, height)
            }
        };
        let sizes = SizeRequest::from_pairs(&[(16, 16), (32, 32)]).unwrap();
        match encode(&flaky, &sizes) {
            Err(IcoError::RasterizationFailed { width, height, source }) => {
                assert_eq!((width, height), (32, 32));
                assert_eq!(source.to_string(), "corrupt source");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn wrong_raster_size_is_a_rasterization_failure() {
        let stubborn = |_: u32, _: u32| solid(8, 8);
        let result = encode_sizes(&stubborn, &[(16, 16)]);
        assert_eq!(result.unwrap_err().failed_size(), Some((16, 16)));
    }

    #[test]
    fn empty_sizes_are_rejected() {
        assert!(matches!(
            encode_sizes(&solid, &[]),
            Err(IcoError::InvalidArgument(_))
        ));
        assert!(matches!(assemble(&[]), Err(IcoError::InvalidArgument(_))));
    }

    #[test]
    fn out_of_range_size_is_rejected_before_rasterizing() {
        let never = |_: u32, _: u32| -> io::Result<RasterBuffer> {
            panic!("rasterizer should not be called")
        };
        assert!(matches!(
            encode_sizes(&never, &[(16, 16), (0, 16)]),
            Err(IcoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn assemble_places_blobs_back_to_back() {
        let size = IconSize::new(2, 1).unwrap();
        let images = vec![(size, vec![0xaa; 3]), (size, vec![0xbb; 5])];
        let data = assemble(&images).unwrap();
        assert_eq!(data.len(), 6 + 32 + 8);
        assert_eq!(LittleEndian::read_u32(&data[18..22]), 38);
        assert_eq!(LittleEndian::read_u32(&data[34..38]), 41);
        assert_eq!(&data[38..41], &[0xaa; 3]);
        assert_eq!(&data[41..46], &[0xbb; 5]);
    }
}

//===========================================================================//
