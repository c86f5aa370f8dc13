use crate::error::IcoError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::slice;

//===========================================================================//

// Size limits for images in an ICO file:
pub(crate) const MIN_DIMENSION: u32 = 1;
pub(crate) const MAX_DIMENSION: u32 = 256;

// The ICONDIR header stores the number of entries in a u16.
pub(crate) const MAX_ENTRIES: usize = u16::MAX as usize;

//===========================================================================//

/// The dimensions of one image in an ICO file.  Both dimensions are in the
/// range 1 to 256, inclusive.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "(u32, u32)"))]
#[cfg_attr(feature = "serde", serde(into = "(u32, u32)"))]
pub struct IconSize {
    width: u32,
    height: u32,
}

impl IconSize {
    /// The square sizes offered by most icon editors.
    pub const STANDARD: [IconSize; 6] = [
        IconSize::square_unchecked(16),
        IconSize::square_unchecked(32),
        IconSize::square_unchecked(48),
        IconSize::square_unchecked(64),
        IconSize::square_unchecked(128),
        IconSize::square_unchecked(256),
    ];

    /// Creates a new size.  Returns an error if either dimension is outside
    /// the range 1 to 256.
    pub fn new(width: u32, height: u32) -> Result<IconSize, IcoError> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&width) {
            invalid_argument!(
                "Invalid icon width (was {}, but must be between {} and {})",
                width,
                MIN_DIMENSION,
                MAX_DIMENSION
            );
        }
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&height) {
            invalid_argument!(
                "Invalid icon height (was {}, but must be between {} and {})",
                height,
                MIN_DIMENSION,
                MAX_DIMENSION
            );
        }
        Ok(IconSize { width, height })
    }

    /// Creates a new square size.
    pub fn square(size: u32) -> Result<IconSize, IcoError> {
        IconSize::new(size, size)
    }

    const fn square_unchecked(size: u32) -> IconSize {
        IconSize { width: size, height: size }
    }

    /// Returns the width, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Display for IconSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl TryFrom<(u32, u32)> for IconSize {
    type Error = IcoError;

    fn try_from((width, height): (u32, u32)) -> Result<IconSize, IcoError> {
        IconSize::new(width, height)
    }
}

impl From<IconSize> for (u32, u32) {
    fn from(size: IconSize) -> (u32, u32) {
        (size.width, size.height)
    }
}

//===========================================================================//

/// An ordered, non-empty list of sizes to encode.  Duplicates are allowed,
/// and the order is preserved in the ICO directory.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<IconSize>"))]
#[cfg_attr(feature = "serde", serde(into = "Vec<IconSize>"))]
pub struct SizeRequest {
    sizes: Vec<IconSize>,
}

impl SizeRequest {
    /// Creates a request for the given sizes.  Returns an error if `sizes`
    /// is empty or has more entries than an ICO file can hold.
    pub fn new(sizes: Vec<IconSize>) -> Result<SizeRequest, IcoError> {
        if sizes.is_empty() {
            invalid_argument!("At least one icon size must be requested");
        }
        if sizes.len() > MAX_ENTRIES {
            invalid_argument!(
                "Too many icon sizes (was {}, but max is {})",
                sizes.len(),
                MAX_ENTRIES
            );
        }
        Ok(SizeRequest { sizes })
    }

    /// Creates a request from `(width, height)` pairs, validating each one.
    pub fn from_pairs(pairs: &[(u32, u32)]) -> Result<SizeRequest, IcoError> {
        let sizes = pairs
            .iter()
            .map(|&(width, height)| IconSize::new(width, height))
            .collect::<Result<Vec<IconSize>, IcoError>>()?;
        SizeRequest::new(sizes)
    }

    /// Returns the number of requested sizes.  This is never zero.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Always returns false; a request holds at least one size.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Returns the requested sizes, in order.
    pub fn sizes(&self) -> &[IconSize] {
        &self.sizes
    }

    /// Iterates over the requested sizes, in order.
    pub fn iter(&self) -> slice::Iter<'_, IconSize> {
        self.sizes.iter()
    }
}

impl Default for SizeRequest {
    /// 16x16, 32x32 and 48x48.
    fn default() -> SizeRequest {
        SizeRequest { sizes: IconSize::STANDARD[..3].to_vec() }
    }
}

impl TryFrom<Vec<IconSize>> for SizeRequest {
    type Error = IcoError;

    fn try_from(sizes: Vec<IconSize>) -> Result<SizeRequest, IcoError> {
        SizeRequest::new(sizes)
    }
}

impl From<SizeRequest> for Vec<IconSize> {
    fn from(request: SizeRequest) -> Vec<IconSize> {
        request.sizes
    }
}

impl<'a> IntoIterator for &'a SizeRequest {
    type Item = &'a IconSize;
    type IntoIter = slice::Iter<'a, IconSize>;

    fn into_iter(self) -> slice::Iter<'a, IconSize> {
        self.sizes.iter()
    }
}

//===========================================================================//


//===========================================================================//
