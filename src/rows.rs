use crate::error::IcoError;

//===========================================================================//

/// Returns a copy of `data` with its rows in reverse order, so that the
/// bottom row comes first.  `data` must hold exactly `height` rows of
/// `stride` bytes each (including any row padding); rows are moved whole and
/// their contents are never inspected.
///
/// BMP data embedded in an ICO file is stored bottom-up, while rasters are
/// produced top-down, so this converts between the two in either direction.
pub fn reverse_rows(
    data: &[u8],
    height: usize,
    stride: usize,
) -> Result<Vec<u8>, IcoError> {
    match height.checked_mul(stride) {
        Some(len) if len == data.len() => {}
        _ => invalid_argument!(
            "Row layout doesn't match buffer length \
             ({} rows of {} bytes, but buffer has {} bytes)",
            height,
            stride,
            data.len()
        ),
    }
    if stride == 0 {
        return Ok(Vec::new());
    }
    let mut reversed = Vec::with_capacity(data.len());
    for row in data.chunks_exact(stride).rev() {
        reversed.extend_from_slice(row);
    }
    Ok(reversed)
}

//===========================================================================//


//===========================================================================//
