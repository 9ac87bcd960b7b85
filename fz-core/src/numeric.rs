use std::ops::{Add, Mul, Sub};

/// Complex number implementation.
/// A little more granular than num_traits, because we're only interested in certain ops.
///
/// Arithmetic is only defined between two `Complex` values;
/// mixing in a bare scalar is a type error.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Distance from the origin, sqrt(re^2 + im^2).
    pub fn modulus(&self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Squares the given number.
    pub fn square(&self) -> Self {
        // (a+bi)^2 = (a^2-b^2) + 2abi
        let re = self.re * self.re - self.im * self.im;
        let im = 2.0 * (self.re * self.im);
        Self { re, im }
    }

    /// Folds the number into the first quadrant: (|re|, |im|).
    pub fn abs_components(&self) -> Self {
        Self {
            re: self.re.abs(),
            im: self.im.abs(),
        }
    }
}

impl Mul<Complex> for Complex {
    type Output = Complex;

    fn mul(self, rhs: Complex) -> Self {
        // (a + ib) * (c + id)
        // = ac + aid + (ibc + i^2 bd)      (FOIL)
        // = (ac - bd) + i(ad + bc)         (turning i^2 into -1, combining real/imaginary terms)
        let (a, b) = (self.re, self.im);
        let (c, d) = (rhs.re, rhs.im);
        Self {
            re: a * c - b * d,
            im: a * d + b * c,
        }
    }
}

impl Add<Complex> for Complex {
    type Output = Complex;

    fn add(self, rhs: Complex) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl Sub<Complex> for Complex {
    type Output = Complex;

    fn sub(self, rhs: Complex) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}
