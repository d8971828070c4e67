#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Narrowest erase/redraw band, in distance units.
pub const MIN_BAND_WIDTH: f64 = 12.0;
/// Band width as a fraction of the viewport width.
pub const BAND_FRACTION: f64 = 0.1;

/// Visible area of the trace, in distance units.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Vertical coordinate of zero amplitude.
    pub fn baseline(&self) -> f64 {
        self.height / 2.0
    }

    /// Width of the band redrawn around the pointer each frame.
    pub fn band_width(&self) -> f64 {
        MIN_BAND_WIDTH.max(self.width * BAND_FRACTION)
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1000.0, 400.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_never_narrower_than_minimum() {
        assert_eq!(Viewport::new(50.0, 10.0).band_width(), MIN_BAND_WIDTH);
        assert_eq!(Viewport::new(1000.0, 400.0).band_width(), 100.0);
    }

    #[test]
    fn baseline_is_vertical_center() {
        assert_eq!(Viewport::new(1000.0, 400.0).baseline(), 200.0);
    }
}
