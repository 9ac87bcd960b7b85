//! Library code for Fractal Zoom.

pub mod color;
pub mod fractal;
pub mod numeric;
pub mod session;
pub mod viewer;
pub mod viewport;

pub use color::{ColorMapper, Palette, PaletteIndex};
pub use fractal::{Fractal, BURNING_SHIP, MANDELBROT};
pub use numeric::Complex;
pub use viewer::{FractalViewer, PixelBuffer};
pub use viewport::Bounds;

/// A pair of integer (width, height) dimensions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    /// Rounds each even dimension down to the next odd number.
    pub fn odd(width: usize, height: usize) -> Self {
        let odd = |v: usize| if v % 2 == 0 { v.saturating_sub(1) } else { v };
        Size {
            width: odd(width),
            height: odd(height),
        }
    }
}

/// Integer (x, y) coordinates of a pixel, from the top-left corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Pixel {
    pub x: usize,
    pub y: usize,
}
