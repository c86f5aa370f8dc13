extern crate icomaker;

use icomaker::{
    IcoError, IconDir, IconImage, RasterBuffer, ResourceType, SizeRequest,
};
use std::io::{self, Cursor};

//===========================================================================//

fn striped_image(width: u32, height: u32) -> IconImage {
    let mut rgba = Vec::<u8>::new();
    for y in 0..height {
        for _ in 0..width {
            let value = (y * 255 / height.max(2).saturating_sub(1)) as u8;
            rgba.extend_from_slice(&[value, 0x40, 0xff - value, 0xff]);
        }
    }
    IconImage::from_rgba_data(width, height, rgba)
}

// Every pixel differs from its neighbors in at least one channel, so
// flipped rows, swapped channels or a transposed image all show up.
fn pattern_pixel(x: u32, y: u32) -> [u8; 4] {
    let red = (x & 0xff) as u8;
    let green = (y & 0xff) as u8;
    let blue = ((x ^ y).wrapping_mul(17) & 0xff) as u8;
    let alpha = 0x80 | ((x + 3 * y) & 0x7f) as u8;
    [red, green, blue, alpha]
}

fn pattern(width: u32, height: u32) -> io::Result<RasterBuffer> {
    let mut rgba = Vec::with_capacity((4 * width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            rgba.extend_from_slice(&pattern_pixel(x, y));
        }
    }
    RasterBuffer::from_rgba_data(width, height, &rgba)
}

//===========================================================================//

#[test]
fn read_back_encoded_file() {
    let source = striped_image(48, 48);
    let file = icomaker::encode(&source, &SizeRequest::default()).unwrap();
    let icondir = IconDir::read(Cursor::new(file.as_bytes())).unwrap();
    assert_eq!(icondir.resource_type(), ResourceType::Icon);
    let sizes: Vec<(u32, u32)> = icondir
        .entries()
        .iter()
        .map(|entry| (entry.width(), entry.height()))
        .collect();
    assert_eq!(sizes, vec![(16, 16), (32, 32), (48, 48)]);
    let image = icondir.entries()[2].decode().unwrap();
    assert_eq!(image.rgba_data(), source.rgba_data());
}

#[test]
fn preview_survives_png_export() {
    let source = striped_image(32, 32);
    let file = icomaker::encode_sizes(&source, &[(32, 32)]).unwrap();
    let image = file.directory().unwrap().entries()[0].decode().unwrap();
    let mut png_data = Vec::<u8>::new();
    image.write_png(&mut png_data).unwrap();
    let reloaded = IconImage::read_png(png_data.as_slice()).unwrap();
    assert_eq!(reloaded.width(), 32);
    assert_eq!(reloaded.height(), 32);
    assert_eq!(reloaded.rgba_data(), source.rgba_data());
}

#[test]
fn duplicate_sizes_get_separate_entries() {
    let source = striped_image(16, 16);
    let file =
        icomaker::encode_sizes(&source, &[(16, 16), (16, 16)]).unwrap();
    let icondir = file.directory().unwrap();
    let entries = icondir.entries();
    assert_eq!(entries.len(), 2);
    assert_ne!(entries[0].data_offset(), entries[1].data_offset());
    assert_eq!(entries[0].data(), entries[1].data());
}

#[test]
fn independent_decoder_reads_every_entry() {
    let sizes = [
        (16, 16),
        (32, 32),
        (48, 48),
        (64, 64),
        (128, 128),
        (256, 256),
        (256, 1),
        (1, 256),
        (20, 10),
    ];
    let file = icomaker::encode_sizes(&pattern, &sizes).unwrap();
    let icondir = ico::IconDir::read(Cursor::new(file.as_bytes())).unwrap();
    assert_eq!(icondir.resource_type(), ico::ResourceType::Icon);
    assert_eq!(icondir.entries().len(), sizes.len());
    for (entry, &(width, height)) in icondir.entries().iter().zip(&sizes) {
        assert_eq!((entry.width(), entry.height()), (width, height));
        assert_eq!(entry.bits_per_pixel(), 32);
        assert!(!entry.is_png());
        let image = entry.decode().unwrap();
        assert_eq!((image.width(), image.height()), (width, height));
        let rgba = image.rgba_data();
        for y in 0..height {
            for x in 0..width {
                let start = (4 * (y * width + x)) as usize;
                assert_eq!(
                    &rgba[start..start + 4],
                    &pattern_pixel(x, y),
                    "pixel ({}, {}) of {}x{} entry",
                    x,
                    y,
                    width,
                    height
                );
            }
        }
    }
}

#[test]
fn independent_decoder_reads_resized_image() {
    let source = striped_image(48, 48);
    let file = icomaker::encode(&source, &SizeRequest::default()).unwrap();
    let icondir = ico::IconDir::read(Cursor::new(file.as_bytes())).unwrap();
    let sizes: Vec<(u32, u32)> = icondir
        .entries()
        .iter()
        .map(|entry| (entry.width(), entry.height()))
        .collect();
    assert_eq!(sizes, vec![(16, 16), (32, 32), (48, 48)]);
    let image = icondir.entries()[2].decode().unwrap();
    assert_eq!(image.rgba_data(), source.rgba_data());
}

#[test]
fn truncated_file_is_rejected() {
    let source = striped_image(16, 16);
    let file = icomaker::encode_sizes(&source, &[(16, 16)]).unwrap();
    let truncated = &file.as_bytes()[..file.len() - 1];
    match IconDir::read(Cursor::new(truncated)) {
        Err(IcoError::InvalidData(message)) => {
            assert!(message.contains("extends past end of file"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

//===========================================================================//
