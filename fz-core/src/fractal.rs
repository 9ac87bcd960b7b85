//! Escape-time fractal functions, and their natural viewing windows.

use crate::{numeric::Complex, viewport::Bounds};

/// Function pointer for evaluating a fractal at a point.
///
/// Returns the number of iterations, at most `max_iter`, before the orbit of the point
/// leaves the circle of radius 2.
pub type EscapeFn = fn(Complex, u32) -> u32;

/// A family of fractals, with the window it is best viewed in.
#[derive(Debug)]
pub struct Fractal {
    pub name: &'static str,
    pub escape: EscapeFn,
    pub natural_bounds: Bounds,
}

impl Fractal {
    pub fn escape_count(&self, point: Complex, max_iter: u32) -> u32 {
        (self.escape)(point, max_iter)
    }
}

pub static MANDELBROT: Fractal = Fractal {
    name: "mandelbrot",
    escape: mandelbrot_escape,
    natural_bounds: Bounds {
        real: -2.4..1.2,
        imag: -1.2..1.2,
    },
};

pub static BURNING_SHIP: Fractal = Fractal {
    name: "burning-ship",
    escape: burning_ship_escape,
    natural_bounds: Bounds {
        real: -2.2..1.4,
        imag: -1.8..0.6,
    },
};

static FRACTALS: &[&Fractal] = &[&MANDELBROT, &BURNING_SHIP];

/// List the fractals that are available for rendering.
pub fn names() -> impl Iterator<Item = &'static str> {
    FRACTALS.iter().map(|f| f.name)
}

pub fn by_name(name: &str) -> Result<&'static Fractal, String> {
    // Linear scan, we don't have that many options:
    FRACTALS
        .iter()
        .copied()
        .find(|f| f.name == name)
        .ok_or_else(|| format!("unknown fractal {}", name))
}

/// Escape count for z <- z^2 + c.
pub fn mandelbrot_escape(c: Complex, max_iter: u32) -> u32 {
    escape_with(c, max_iter, |z| z * z + c)
}

/// Escape count for z <- (|Re z| + i|Im z|)^2 + c.
pub fn burning_ship_escape(c: Complex, max_iter: u32) -> u32 {
    escape_with(c, max_iter, |z| {
        let folded = z.abs_components();
        folded * folded + c
    })
}

#[inline]
fn escape_with(c: Complex, max_iter: u32, next: impl Fn(Complex) -> Complex) -> u32 {
    // The orbit starts at c rather than zero; this skips the trivial first iteration.
    let mut z = c;
    let mut n = 0;
    while z.modulus() <= 2.0 && n < max_iter {
        z = next(z);
        n += 1;
    }
    n
}
