use crate::types::{SpectralError, SpectralResult};
use serde::{Deserialize, Serialize};

/// Validated square moving window
///
/// The width is always odd and at least 1, so the window is centred on the
/// target pixel with a symmetric buffer of `(width - 1) / 2` on every side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Window {
    width: usize,
}

impl Window {
    pub fn new(width: usize) -> SpectralResult<Self> {
        if width == 0 {
            return Err(SpectralError::InvalidParameter(
                "Window width must be positive".to_string(),
            ));
        }
        if width % 2 == 0 {
            return Err(SpectralError::InvalidParameter(format!(
                "Window width must be odd, got {}",
                width
            )));
        }
        Ok(Self { width })
    }

    /// Accepts a signed width, as supplied by bindings or config files
    pub fn from_signed(width: i64) -> SpectralResult<Self> {
        if width <= 0 {
            return Err(SpectralError::InvalidParameter(format!(
                "Window width must be positive, got {}",
                width
            )));
        }
        Self::new(width as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Half-width of the window
    pub fn buffer(&self) -> usize {
        (self.width - 1) / 2
    }

    /// Number of samples in a full window
    pub fn area(&self) -> usize {
        self.width * self.width
    }

    /// Half-open range of centre indices whose window stays inside `len`
    ///
    /// Empty when the window is wider than the axis.
    pub fn interior(&self, len: usize) -> std::ops::Range<usize> {
        let b = self.buffer();
        if len < self.width {
            return 0..0;
        }
        b..len - b
    }
}

impl TryFrom<usize> for Window {
    type Error = SpectralError;

    fn try_from(width: usize) -> SpectralResult<Self> {
        Self::new(width)
    }
}

impl From<Window> for usize {
    fn from(window: Window) -> usize {
        window.width
    }
}

impl Default for Window {
    fn default() -> Self {
        Self { width: 5 }
    }
}
