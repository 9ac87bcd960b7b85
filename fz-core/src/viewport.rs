//! Mapping between pixel coordinates and the complex plane.

use std::ops::Range;

use crate::{numeric::Complex, Pixel, Size};

/// A rectangle of the complex plane.
#[derive(Clone, Debug, PartialEq)]
pub struct Bounds {
    pub real: Range<f64>,
    pub imag: Range<f64>,
}

impl Bounds {
    pub fn real_span(&self) -> f64 {
        self.real.end - self.real.start
    }

    pub fn imag_span(&self) -> f64 {
        self.imag.end - self.imag.start
    }

    pub fn center(&self) -> Complex {
        Complex::new(
            (self.real.start + self.real.end) / 2.0,
            (self.imag.start + self.imag.end) / 2.0,
        )
    }

    /// Both ranges are non-empty (and not NaN).
    pub fn is_valid(&self) -> bool {
        self.real.start < self.real.end && self.imag.start < self.imag.end
    }
}

/// Which pixel edge a coordinate is mapped from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fencepost {
    /// Pixel centers: the last pixel in each axis lands exactly on the upper bound.
    Center,
    /// Exclusive end points: one-past-the-last pixel lands exactly on the upper bound.
    End,
}

impl Fencepost {
    fn offset(self) -> f64 {
        match self {
            Fencepost::Center => -1.0,
            Fencepost::End => 0.0,
        }
    }
}

/// A window onto the complex plane, rendered at a fixed pixel size.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    pub bounds: Bounds,
    pub size: Size,
}

impl Viewport {
    pub fn new(bounds: Bounds, size: Size) -> Self {
        Viewport { bounds, size }
    }

    pub fn pixel_to_complex(&self, pixel: Pixel, fencepost: Fencepost) -> Complex {
        let Bounds { real, imag } = &self.bounds;
        let offset = fencepost.offset();
        Complex {
            re: real.start
                + pixel.x as f64 * (real.end - real.start) / (self.size.width as f64 + offset),
            im: imag.start
                + pixel.y as f64 * (imag.end - imag.start) / (self.size.height as f64 + offset),
        }
    }

    /// Inverse of [Viewport::pixel_to_complex] for pixel centers.
    ///
    /// Returns fractional (x, y) pixel coordinates; these may lie outside the image
    /// if the point is outside the bounds.
    pub fn complex_to_pixel(&self, point: Complex) -> (f64, f64) {
        let (step_re, step_im) = self.steps();
        (
            (point.re - self.bounds.real.start) / step_re,
            (point.im - self.bounds.imag.start) / step_im,
        )
    }

    /// The bounds covered by the pixel region from `start` (inclusive) to `end` (exclusive).
    pub fn pixel_region_to_bounds(&self, start: Pixel, end: Pixel) -> Bounds {
        let start = self.pixel_to_complex(start, Fencepost::Center);
        let end = self.pixel_to_complex(end, Fencepost::End);
        Bounds {
            real: start.re..end.re,
            imag: start.im..end.im,
        }
    }

    /// Distance in the complex plane between adjacent pixel centers, per axis.
    pub fn steps(&self) -> (f64, f64) {
        (
            self.bounds.real_span() / (self.size.width - 1) as f64,
            self.bounds.imag_span() / (self.size.height - 1) as f64,
        )
    }
}

/// Grows one axis of `bounds` about its center, so that pixels of an image of `size`
/// cover square regions of the complex plane.
///
/// The other axis is unchanged; if the aspect ratios already match, neither is.
pub fn match_bounds_to_aspect_ratio(bounds: &Bounds, size: Size) -> Bounds {
    let target = (size.width - 1) as f64 / (size.height - 1) as f64;
    let (real_span, imag_span) = (bounds.real_span(), bounds.imag_span());
    let current = real_span / imag_span;
    let center = bounds.center();

    if current < target {
        let half = imag_span * target / 2.0;
        Bounds {
            real: (center.re - half)..(center.re + half),
            imag: bounds.imag.clone(),
        }
    } else if current > target {
        let half = real_span / target / 2.0;
        Bounds {
            real: bounds.real.clone(),
            imag: (center.im - half)..(center.im + half),
        }
    } else {
        bounds.clone()
    }
}
