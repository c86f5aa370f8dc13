use crate::dib::{read_dib, BitmapInfoHeader, BITS_PER_PIXEL};
use crate::error::IcoError;
use crate::image::IconImage;
use crate::restype::ResourceType;
use crate::size::{IconSize, MAX_DIMENSION};
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

//===========================================================================//

/// The ICONDIR struct at the start of every ICO file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct IconDirHeader {
    pub(crate) restype: ResourceType,
    pub(crate) num_entries: u16,
}

impl IconDirHeader {
    /// The size of an ICONDIR struct, in bytes.
    pub(crate) const LEN: usize = 6;

    pub(crate) fn to_bytes(&self) -> [u8; IconDirHeader::LEN] {
        let mut bytes = [0u8; IconDirHeader::LEN];
        // Bytes 0..2 are reserved and stay zero.
        LittleEndian::write_u16(&mut bytes[2..4], self.restype.number());
        LittleEndian::write_u16(&mut bytes[4..6], self.num_entries);
        bytes
    }
}

//===========================================================================//

/// The ICONDIRENTRY struct describing where one image lives in the file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DirectoryEntry {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) num_colors: u8,
    pub(crate) color_planes: u16,
    pub(crate) bits_per_pixel: u16,
    pub(crate) data_size: u32,
    pub(crate) data_offset: u32,
}

impl DirectoryEntry {
    /// The size of an ICONDIRENTRY struct, in bytes.
    pub(crate) const LEN: usize = 16;

    /// Describes a 32bpp BMP image of the given size, `data_size` bytes long
    /// and starting `data_offset` bytes into the file.
    pub(crate) fn for_dib(
        size: IconSize,
        data_size: u32,
        data_offset: u32,
    ) -> DirectoryEntry {
        DirectoryEntry {
            width: size.width(),
            height: size.height(),
            num_colors: 0,
            color_planes: 1,
            bits_per_pixel: BITS_PER_PIXEL,
            data_size,
            data_offset,
        }
    }

    pub(crate) fn to_bytes(&self) -> [u8; DirectoryEntry::LEN] {
        let mut bytes = [0u8; DirectoryEntry::LEN];
        // Width and height each get one byte, with zero meaning 256.
        bytes[0] = dimension_byte(self.width);
        bytes[1] = dimension_byte(self.height);
        bytes[2] = self.num_colors;
        // Byte 3 is reserved and stays zero.
        LittleEndian::write_u16(&mut bytes[4..6], self.color_planes);
        LittleEndian::write_u16(&mut bytes[6..8], self.bits_per_pixel);
        LittleEndian::write_u32(&mut bytes[8..12], self.data_size);
        LittleEndian::write_u32(&mut bytes[12..16], self.data_offset);
        bytes
    }

    fn read<R: Read>(reader: &mut R) -> Result<DirectoryEntry, IcoError> {
        let mut bytes = [0u8; DirectoryEntry::LEN];
        reader.read_exact(&mut bytes)?;
        if bytes[3] != 0 {
            invalid_data!(
                "Invalid reserved field value in ICONDIRENTRY \
                 (was {}, but must be 0)",
                bytes[3]
            );
        }
        Ok(DirectoryEntry {
            width: dimension_from_byte(bytes[0]),
            height: dimension_from_byte(bytes[1]),
            num_colors: bytes[2],
            color_planes: LittleEndian::read_u16(&bytes[4..6]),
            bits_per_pixel: LittleEndian::read_u16(&bytes[6..8]),
            data_size: LittleEndian::read_u32(&bytes[8..12]),
            data_offset: LittleEndian::read_u32(&bytes[12..16]),
        })
    }
}

fn dimension_byte(dimension: u32) -> u8 {
    if dimension >= MAX_DIMENSION {
        0
    } else {
        dimension as u8
    }
}

fn dimension_from_byte(byte: u8) -> u32 {
    if byte == 0 {
        MAX_DIMENSION
    } else {
        byte as u32
    }
}

//===========================================================================//

/// The parsed contents of an ICO file: its resource type and directory, with
/// each entry's encoded image data.
#[derive(Clone, Debug)]
pub struct IconDir {
    restype: ResourceType,
    entries: Vec<IconDirEntry>,
}

impl IconDir {
    /// Returns the type of resource stored in this file.
    pub fn resource_type(&self) -> ResourceType {
        self.restype
    }

    /// Returns the entries of the directory, in file order.
    pub fn entries(&self) -> &[IconDirEntry] {
        &self.entries
    }

    /// Reads an ICO or CUR file into memory.  Returns an error if the header
    /// or directory is malformed, or if an entry's data lies outside the
    /// file.  Image data itself isn't checked until it's decoded.
    pub fn read<R: Read + Seek>(mut reader: R) -> Result<IconDir, IcoError> {
        let reserved = reader.read_u16::<LittleEndian>()?;
        if reserved != 0 {
            invalid_data!(
                "Invalid reserved field value in ICONDIR \
                 (was {}, but must be 0)",
                reserved
            );
        }
        let restype = reader.read_u16::<LittleEndian>()?;
        let restype = match ResourceType::from_number(restype) {
            Some(restype) => restype,
            None => invalid_data!("Invalid resource type ({})", restype),
        };
        let num_entries = reader.read_u16::<LittleEndian>()? as usize;
        let mut directory = Vec::<DirectoryEntry>::with_capacity(num_entries);
        for index in 0..num_entries {
            let entry = DirectoryEntry::read(&mut reader)?;
            log::trace!(
                "ICONDIRENTRY {}: {}x{}, {} bpp, {} bytes at offset {}",
                index,
                entry.width,
                entry.height,
                entry.bits_per_pixel,
                entry.data_size,
                entry.data_offset
            );
            directory.push(entry);
        }
        let file_len = reader.seek(SeekFrom::End(0))?;
        let mut entries = Vec::<IconDirEntry>::with_capacity(num_entries);
        for (index, entry) in directory.into_iter().enumerate() {
            let end = entry.data_offset as u64 + entry.data_size as u64;
            if end > file_len {
                invalid_data!(
                    "Data for entry {} ({} bytes at offset {}) extends past \
                     end of file ({} bytes)",
                    index,
                    entry.data_size,
                    entry.data_offset,
                    file_len
                );
            }
            reader.seek(SeekFrom::Start(entry.data_offset as u64))?;
            let mut data = vec![0u8; entry.data_size as usize];
            reader.read_exact(&mut data)?;
            entries.push(IconDirEntry { restype, entry, data });
        }
        Ok(IconDir { restype, entries })
    }
}

//===========================================================================//

/// One entry of an ICO file, as recorded in its directory.
#[derive(Clone, Debug)]
pub struct IconDirEntry {
    restype: ResourceType,
    entry: DirectoryEntry,
    data: Vec<u8>,
}

impl IconDirEntry {
    /// Returns the width recorded in the directory, in pixels (a stored zero
    /// reads as 256).
    pub fn width(&self) -> u32 {
        self.entry.width
    }

    /// Returns the height recorded in the directory, in pixels (a stored
    /// zero reads as 256).
    pub fn height(&self) -> u32 {
        self.entry.height
    }

    /// Returns the number of palette colors recorded in the directory (zero
    /// for true-color images).
    pub fn num_colors(&self) -> u8 {
        self.entry.num_colors
    }

    /// Returns the color planes field.  For cursors this holds the hotspot
    /// X coordinate instead, which this crate doesn't interpret.
    pub fn color_planes(&self) -> u16 {
        self.entry.color_planes
    }

    /// Returns the bits-per-pixel recorded in the directory.  Returns zero
    /// for cursors, whose files store hotspot coordinates in this field.
    pub fn bits_per_pixel(&self) -> u16 {
        if self.restype == ResourceType::Cursor {
            0
        } else {
            self.entry.bits_per_pixel
        }
    }

    /// Returns the offset of the image data from the start of the file.
    pub fn data_offset(&self) -> u32 {
        self.entry.data_offset
    }

    /// Returns the length of the image data, in bytes.
    pub fn data_size(&self) -> u32 {
        self.entry.data_size
    }

    /// Returns the raw, encoded image data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the `(width, height)` stored in the BMP header of the image
    /// data, with the doubled height undone.
    pub fn bmp_size(&self) -> Result<(u32, u32), IcoError> {
        BitmapInfoHeader::from_bytes(&self.data)?.image_size_in_pixels()
    }

    /// Decodes this entry into an image.  Only uncompressed 32bpp BMP data
    /// is supported.  Returns an error if the data is malformed or its
    /// dimensions disagree with the directory.
    pub fn decode(&self) -> Result<IconImage, IcoError> {
        let image = read_dib(&self.data)?;
        if dimension_byte(image.width()) != dimension_byte(self.width())
            || dimension_byte(image.height()) != dimension_byte(self.height())
        {
            invalid_data!(
                "Encoded image has wrong dimensions \
                 (was {}x{}, but should be {}x{})",
                image.width(),
                image.height(),
                self.width(),
                self.height()
            );
        }
        Ok(image)
    }
}

//===========================================================================//


//===========================================================================//
